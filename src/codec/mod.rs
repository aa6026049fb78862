//! Interchange format codecs.
//!
//! One module per external grammar:
//!
//! - [`native`] - FreeTube's line-delimited JSON database files (`.db`)
//! - [`opml`] - OPML feed lists, as produced by the YouTube subscription export
//! - [`newpipe`] - NewPipe's JSON subscription export
//!
//! Decoders take untrusted bytes. A container that cannot be parsed at all is
//! a [`FormatError`] and aborts the batch; a single unusable entry inside a
//! well-formed container is a per-record [`RecordError`].
//!
//! [`RecordError`]: crate::error::RecordError

pub mod native;
pub mod newpipe;
pub mod opml;

use serde::Serialize;

use crate::error::RecordError;
use crate::model::Subscription;

/// Supported subscription interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionFormat {
    /// FreeTube `profiles.db`
    FreeTube,
    /// YouTube OPML feed list
    YouTube,
    /// NewPipe JSON export
    NewPipe,
}

impl SubscriptionFormat {
    /// Dialog filters offered when importing this format.
    #[must_use]
    pub const fn import_filters(self) -> &'static [FileFilter] {
        match self {
            Self::FreeTube => &[FileFilter::DATABASE],
            Self::YouTube => &[FileFilter::ANY],
            Self::NewPipe => &[FileFilter::JSON],
        }
    }

    /// Dialog filters offered when exporting this format.
    #[must_use]
    pub const fn export_filters(self) -> &'static [FileFilter] {
        match self {
            Self::FreeTube => &[FileFilter::DATABASE],
            Self::YouTube => &[FileFilter::OPML],
            Self::NewPipe => &[FileFilter::JSON],
        }
    }

    /// Prefix of the default export file name.
    #[must_use]
    pub const fn export_stem(self) -> &'static str {
        match self {
            Self::FreeTube => "freetube-subscriptions",
            Self::YouTube => "youtube-subscriptions",
            Self::NewPipe => "newpipe-subscriptions",
        }
    }

    /// Extension of the default export file name.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::FreeTube => "db",
            Self::YouTube => "opml",
            Self::NewPipe => "json",
        }
    }
}

impl std::fmt::Display for SubscriptionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FreeTube => write!(f, "freetube"),
            Self::YouTube => write!(f, "youtube"),
            Self::NewPipe => write!(f, "newpipe"),
        }
    }
}

/// A named extension filter for file dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub const DATABASE: Self = Self {
        name: "Database File",
        extensions: &["db"],
    };
    pub const OPML: Self = Self {
        name: "Database File",
        extensions: &["opml"],
    };
    pub const JSON: Self = Self {
        name: "Database File",
        extensions: &["json"],
    };
    pub const ANY: Self = Self {
        name: "Database File",
        extensions: &["*"],
    };

    /// Whether `path` passes this filter.
    #[must_use]
    pub fn matches(&self, path: &std::path::Path) -> bool {
        if self.extensions.contains(&"*") {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// A subscription entry decoded from a feed-list or NewPipe file.
///
/// Lacks the display metadata the internal model wants; that comes from
/// channel resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSubscription {
    pub channel_id: String,
    /// Name carried by the file, used when resolution yields none.
    pub name: Option<String>,
}

/// One decoded entry: usable, or the reason it is skipped.
pub type DecodedEntry = Result<RawSubscription, RecordError>;

/// A subscription codec for one external format.
pub trait SubscriptionCodec {
    /// Parse a whole file into entries.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the container cannot be parsed or lacks
    /// its required top-level structure.
    fn decode(bytes: &[u8]) -> Result<Vec<DecodedEntry>, FormatError>;

    /// Render subscriptions into the external format.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if serialization fails.
    fn encode(subscriptions: &[Subscription]) -> Result<Vec<u8>, FormatError>;
}

/// File-level decode failures. Fatal to the batch.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// JSON that does not parse.
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// A line of a line-delimited file that does not parse (1-based).
    #[error("invalid JSON on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// XML that does not parse.
    #[error("invalid XML: {0}")]
    Xml(String),

    /// Not an OPML document.
    #[error("not an OPML document")]
    NotOpml,

    /// OPML body without a top-level outline that has child outlines.
    #[error("no subscription outlines found")]
    MissingOutlines,

    /// NewPipe JSON without a `subscriptions` array.
    #[error("missing \"subscriptions\" array")]
    MissingSubscriptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_filters_match_extensions() {
        assert!(FileFilter::DATABASE.matches(Path::new("/tmp/profiles.db")));
        assert!(FileFilter::DATABASE.matches(Path::new("/tmp/PROFILES.DB")));
        assert!(!FileFilter::DATABASE.matches(Path::new("/tmp/profiles.json")));
        assert!(FileFilter::ANY.matches(Path::new("/tmp/takeout")));
    }

    #[test]
    fn test_export_naming_parts() {
        assert_eq!(SubscriptionFormat::YouTube.export_stem(), "youtube-subscriptions");
        assert_eq!(SubscriptionFormat::NewPipe.extension(), "json");
        assert_eq!(SubscriptionFormat::FreeTube.to_string(), "freetube");
    }

    #[test]
    fn test_json_format_error_names_line() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FormatError::JsonLine { line: 3, source };
        assert!(err.to_string().starts_with("invalid JSON on line 3"));
    }
}
