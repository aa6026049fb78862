//! Local backend: reads channel metadata straight from the channel page.
//!
//! The page embeds its initial state as a `ytInitialData` JSON literal inside
//! a script tag. Three layouts are understood, newest last:
//!
//! - `header.c4TabbedHeaderRenderer` (title + avatar renditions)
//! - `metadata.channelMetadataRenderer` (title + single avatar)
//! - `header.pageHeaderRenderer` (title + avatar view model sources)

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{ChannelDetails, Thumbnail};

use super::backend::{BackendKind, ChannelBackend, absolutize_thumbnails, check_channel_id};

/// Default site root.
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

static INITIAL_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(?:var ytInitialData|window\["ytInitialData"\])\s*=\s*(\{.+?\});\s*</script>"#)
        .expect("initial data pattern is valid")
});

const AVATAR_SOURCES: &str = "/header/pageHeaderRenderer/content/pageHeaderViewModel/image/decoratedAvatarViewModel/avatar/avatarViewModel/image/sources";

/// Page-scraping channel metadata backend.
pub struct LocalBackend {
    client: reqwest::Client,
    base_url: String,
}

impl LocalBackend {
    /// Create a backend against the public site.
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a backend against another site root.
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The page fetched for a channel id.
    #[must_use]
    pub fn channel_url(&self, channel_id: &str) -> String {
        format!("{}/channel/{channel_id}/about?hl=en", self.base_url)
    }
}

impl ChannelBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn channel_info(&self, channel_id: &str) -> Result<ChannelDetails> {
        check_channel_id(channel_id)?;

        let response = self
            .client
            .get(self.channel_url(channel_id))
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            // Skips the EU consent interstitial.
            .header(reqwest::header::COOKIE, "CONSENT=YES+1")
            .send()
            .await
            .map_err(|e| Error::Resolution(format!("Channel page request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Resolution(format!(
                "Channel page returned {status} for {channel_id}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Resolution(format!("Failed to read channel page: {e}")))?;

        parse_channel_page(&html)
    }
}

/// Extract channel metadata from a channel page.
///
/// # Errors
///
/// Returns [`Error::Resolution`] when the page has no `ytInitialData`, when
/// it carries an alert instead of a channel (e.g. "This channel does not
/// exist."), or when none of the known layouts is present.
pub fn parse_channel_page(html: &str) -> Result<ChannelDetails> {
    let raw = INITIAL_DATA
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::Resolution("ytInitialData not found in channel page".into()))?;

    let data: Value = serde_json::from_str(raw.as_str())
        .map_err(|e| Error::Resolution(format!("Failed to parse ytInitialData: {e}")))?;

    let mut details = details_from_initial_data(&data).ok_or_else(|| {
        let alert = data
            .pointer("/alerts/0/alertRenderer/text/simpleText")
            .and_then(Value::as_str);
        Error::Resolution(alert.map_or_else(
            || "Channel metadata not found in page".to_string(),
            |a| format!("Channel page alert: {a}"),
        ))
    })?;

    absolutize_thumbnails(&mut details);
    Ok(details)
}

fn details_from_initial_data(data: &Value) -> Option<ChannelDetails> {
    let layouts = [
        (
            "/header/c4TabbedHeaderRenderer/title",
            "/header/c4TabbedHeaderRenderer/avatar/thumbnails",
        ),
        (
            "/metadata/channelMetadataRenderer/title",
            "/metadata/channelMetadataRenderer/avatar/thumbnails",
        ),
        ("/header/pageHeaderRenderer/pageTitle", AVATAR_SOURCES),
    ];

    layouts.iter().find_map(|(title, thumbnails)| {
        let author = data.pointer(title).and_then(Value::as_str)?;
        Some(ChannelDetails {
            author: author.to_string(),
            author_thumbnails: thumbnails_at(data, thumbnails),
        })
    })
}

fn thumbnails_at(data: &Value, pointer: &str) -> Vec<Thumbnail> {
    data.pointer(pointer)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|t| t.get("url").and_then(Value::as_str))
                .map(|url| Thumbnail {
                    url: url.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
