//! Channel resolution.
//!
//! Turns a bare channel id into a display name and avatar URL using one of
//! two interchangeable backends:
//!
//! - **Local** - scrapes the channel page directly (default)
//! - **Invidious** - queries an Invidious instance's REST API
//!
//! ```text
//! ┌──────────────┐
//! │ Orchestrator │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │   Resolver   │  ← preferred backend, then one fallback hop
//! └──────┬───────┘
//!    ┌───┴─────┐
//!    ▼         ▼
//! ┌─────┐ ┌─────────┐
//! │Local│ │Invidious│
//! └─────┘ └─────────┘
//! ```

mod backend;
mod chain;
mod factory;
mod invidious;
mod local;

pub use backend::{BackendKind, BoxedBackend, ChannelBackend, check_channel_id};
pub use chain::{ERROR_NOTIFICATION_DURATION, Resolver};
pub use factory::{create_resolver, http_client};
pub use invidious::InvidiousBackend;
pub use local::{LocalBackend, parse_channel_page};
