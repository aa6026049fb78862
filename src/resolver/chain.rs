//! Backend selection with single-hop fallback.

use std::time::Duration;

use crate::model::ChannelInfo;
use crate::transfer::collab::{Notification, Notifier};

use super::backend::{BackendKind, BoxedBackend};

/// How long backend error notifications stay up.
pub const ERROR_NOTIFICATION_DURATION: Duration = Duration::from_secs(10);

/// Resolves channel ids to display metadata.
///
/// Tries the preferred backend, then (if fallback is enabled) the other one,
/// exactly once each. Never fails: when every attempt errors the result is
/// an empty [`ChannelInfo`].
pub struct Resolver {
    backends: Vec<BoxedBackend>,
    preference: BackendKind,
    fallback: bool,
}

impl Resolver {
    /// Build a resolver over registered backends.
    #[must_use]
    pub fn new(backends: Vec<BoxedBackend>, preference: BackendKind, fallback: bool) -> Self {
        Self {
            backends,
            preference,
            fallback,
        }
    }

    #[must_use]
    pub const fn preference(&self) -> BackendKind {
        self.preference
    }

    #[must_use]
    pub const fn fallback_enabled(&self) -> bool {
        self.fallback
    }

    /// Backends in the order they are attempted.
    #[must_use]
    pub fn attempt_order(&self) -> Vec<&BoxedBackend> {
        let mut kinds = vec![self.preference];
        if self.fallback {
            kinds.push(self.preference.other());
        }

        kinds
            .into_iter()
            .filter_map(|kind| self.backends.iter().find(|b| b.kind() == kind))
            .collect()
    }

    /// Resolve one channel id.
    pub async fn resolve(&self, channel_id: &str, notifier: &dyn Notifier) -> ChannelInfo {
        let order = self.attempt_order();

        for (attempt, backend) in order.iter().enumerate() {
            if attempt > 0 {
                notifier.notify(Notification::message(backend.kind().fallback_message()));
            }

            match backend.channel_info(channel_id).await {
                Ok(details) => {
                    tracing::debug!(channel_id, backend = %backend.kind(), "Resolved channel");
                    return ChannelInfo::from(details);
                }
                Err(err) => {
                    tracing::warn!(channel_id, backend = %backend.kind(), error = %err, "Channel lookup failed");
                    let text = err.to_string();
                    notifier.notify(Notification::copyable(
                        format!("{} API Error (Click to copy): {text}", backend.kind().label()),
                        text,
                        ERROR_NOTIFICATION_DURATION,
                    ));
                }
            }
        }

        ChannelInfo::default()
    }
}
