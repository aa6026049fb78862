//! Invidious API backend.
//!
//! Queries `GET {instance}/api/v1/channels/{id}` on a configured Invidious
//! instance.

use crate::error::{Error, Result};
use crate::model::ChannelDetails;

use super::backend::{BackendKind, ChannelBackend, absolutize_thumbnails, check_channel_id};

/// Invidious channel metadata backend.
pub struct InvidiousBackend {
    client: reqwest::Client,
    instance: String,
}

impl InvidiousBackend {
    /// Create a backend for an instance base URL (e.g. `https://yewtu.be`).
    pub fn new(client: reqwest::Client, instance: impl Into<String>) -> Self {
        Self {
            client,
            instance: instance.into().trim_end_matches('/').to_string(),
        }
    }

    /// The channel endpoint for an id.
    #[must_use]
    pub fn channel_url(&self, channel_id: &str) -> String {
        format!("{}/api/v1/channels/{channel_id}", self.instance)
    }
}

impl ChannelBackend for InvidiousBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Invidious
    }

    async fn channel_info(&self, channel_id: &str) -> Result<ChannelDetails> {
        check_channel_id(channel_id)?;
        let url = self.channel_url(channel_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Resolution(format!("Invidious request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Resolution(format!(
                "Invidious returned {status}: {}",
                body.trim()
            )));
        }

        let mut details: ChannelDetails = response
            .json()
            .await
            .map_err(|e| Error::Resolution(format!("Failed to parse Invidious response: {e}")))?;

        absolutize_thumbnails(&mut details);
        Ok(details)
    }
}
