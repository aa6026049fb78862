//! Channel metadata returned by resolution backends.

use serde::{Deserialize, Serialize};

/// Channel metadata as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDetails {
    pub author: String,
    #[serde(default)]
    pub author_thumbnails: Vec<Thumbnail>,
}

/// One avatar rendition; backends list them smallest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Resolved display metadata for a channel.
///
/// Both fields are `None` when every backend failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInfo {
    pub author_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl ChannelInfo {
    /// True when nothing could be resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.author_name.is_none() && self.thumbnail_url.is_none()
    }
}

impl From<ChannelDetails> for ChannelInfo {
    /// Takes the second avatar rendition, the size FreeTube displays.
    fn from(details: ChannelDetails) -> Self {
        let thumbnail_url = details.author_thumbnails.into_iter().nth(1).map(|t| t.url);
        Self {
            author_name: Some(details.author).filter(|a| !a.is_empty()),
            thumbnail_url,
        }
    }
}
