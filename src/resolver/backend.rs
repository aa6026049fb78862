//! Channel backend trait.
//!
//! Defines the interface both channel-metadata sources implement.
//! Uses async methods for HTTP-based backends.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ChannelDetails;

/// The two interchangeable metadata sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote Invidious API
    Invidious,
    /// Direct page scraping
    #[default]
    Local,
}

impl BackendKind {
    /// The other backend.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Invidious => Self::Local,
            Self::Local => Self::Invidious,
        }
    }

    /// Label used in error notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Invidious => "Invidious",
            Self::Local => "Local",
        }
    }

    /// Notification shown before falling back to this backend.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Invidious => "Falling back to the Invidious API",
            Self::Local => "Falling back to the local API",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invidious => write!(f, "invidious"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invidious" => Ok(Self::Invidious),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown backend: {s} (expected invidious or local)")),
        }
    }
}

/// Reject ids that could escape the URL path segment they are placed in.
///
/// # Errors
///
/// Returns [`Error::Resolution`] for empty ids or ids with characters outside
/// `[A-Za-z0-9_-]`.
pub fn check_channel_id(channel_id: &str) -> Result<()> {
    let valid = !channel_id.is_empty()
        && channel_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(Error::Resolution(format!("Invalid channel id: {channel_id:?}")))
    }
}

/// Make protocol-relative thumbnail URLs absolute.
pub(crate) fn absolutize_thumbnails(details: &mut ChannelDetails) {
    for thumbnail in &mut details.author_thumbnails {
        if thumbnail.url.starts_with("//") {
            thumbnail.url = format!("https:{}", thumbnail.url);
        }
    }
}

/// Trait for channel metadata backends.
///
/// Implemented by the Invidious and local scraping backends.
pub trait ChannelBackend: Send + Sync {
    /// Which source this is.
    fn kind(&self) -> BackendKind;

    /// Fetch author name and avatar renditions for a channel.
    fn channel_info(&self, channel_id: &str) -> impl Future<Output = Result<ChannelDetails>> + Send;
}

/// Boxed backend for dynamic dispatch.
///
/// Since the trait has async methods with `impl Future`, we need this wrapper
/// to hold both backends in one list.
pub struct BoxedBackend {
    inner: Box<dyn ChannelBackendBoxed>,
}

/// Object-safe version of `ChannelBackend` for boxing.
trait ChannelBackendBoxed: Send + Sync {
    fn kind(&self) -> BackendKind;
    fn channel_info_boxed<'a>(
        &'a self,
        channel_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ChannelDetails>> + Send + 'a>>;
}

impl BoxedBackend {
    /// Create a new boxed backend.
    pub fn new<B: ChannelBackend + 'static>(backend: B) -> Self {
        Self {
            inner: Box::new(BoxedBackendWrapper(backend)),
        }
    }

    /// Which source this is.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        self.inner.kind()
    }

    /// Fetch channel metadata.
    pub async fn channel_info(&self, channel_id: &str) -> Result<ChannelDetails> {
        self.inner.channel_info_boxed(channel_id).await
    }
}

/// Wrapper to implement `ChannelBackendBoxed` for any `ChannelBackend`.
struct BoxedBackendWrapper<B: ChannelBackend + 'static>(B);

impl<B: ChannelBackend + 'static> ChannelBackendBoxed for BoxedBackendWrapper<B> {
    fn kind(&self) -> BackendKind {
        self.0.kind()
    }

    fn channel_info_boxed<'a>(
        &'a self,
        channel_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ChannelDetails>> + Send + 'a>> {
        Box::pin(self.0.channel_info(channel_id))
    }
}
