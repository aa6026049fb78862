//! Data models for tubeport.
//!
//! This module contains all domain models:
//! - Profile
//! - Subscription
//! - HistoryEntry
//! - Channel metadata

pub mod channel;
pub mod history;
pub mod profile;

pub use channel::{ChannelDetails, ChannelInfo, Thumbnail};
pub use history::HistoryEntry;
pub use profile::{PRIMARY_PROFILE_ID, Profile, Subscription};
