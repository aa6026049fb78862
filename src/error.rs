//! Error types for tubeport.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (3=format, 4=validation, 6=store, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Per-record problems (`RecordError`) never abort a batch; they are
//! collected as warnings by the transfer orchestrator.

use thiserror::Error;

use crate::codec::FormatError;
use crate::transfer::TransferError;

/// Result type alias for tubeport operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Format (exit 3)
    InvalidFile,

    // Validation (exit 4)
    InvalidArgument,

    // Resolution (exit 5)
    ResolutionError,

    // Store (exit 6)
    StoreError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::InvalidFile => "INVALID_FILE",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ResolutionError => "RESOLUTION_ERROR",
            Self::StoreError => "STORE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::InvalidFile => 3,
            Self::InvalidArgument => 4,
            Self::ResolutionError => 5,
            Self::StoreError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying the same operation can reasonably succeed.
    ///
    /// Upstream backends have transient outages; a malformed file does not
    /// fix itself.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ResolutionError | Self::IoError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in tubeport operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Channel resolution failed: {0}")]
    Resolution(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Transfer(TransferError::Format(_)) => ErrorCode::InvalidFile,
            Self::Transfer(TransferError::Io { .. }) | Self::Io(_) => ErrorCode::IoError,
            Self::Store(_) => ErrorCode::StoreError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Resolution(_) => ErrorCode::ResolutionError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Transfer(TransferError::Format(FormatError::JsonLine { line, .. })) => {
                Some(format!(
                    "Line {line} is not valid JSON. FreeTube database files hold one JSON document per line."
                ))
            }
            Self::Transfer(TransferError::Format(FormatError::MissingSubscriptions)) => Some(
                "NewPipe exports must contain a top-level \"subscriptions\" array. \
                 Use Settings > Content > Export database > Subscriptions in NewPipe."
                    .to_string(),
            ),
            Self::Transfer(TransferError::Format(FormatError::MissingOutlines)) => Some(
                "Expected <body><outline ...><outline xmlUrl=\"...\"/></outline></body>, \
                 as produced by the YouTube subscription export."
                    .to_string(),
            ),
            Self::Transfer(TransferError::Io { path, .. }) => Some(format!(
                "Check that {} exists and is accessible.",
                path.display()
            )),
            Self::Store(_) => Some(
                "Use `--data-dir` to point at the FreeTube user data directory, \
                 and close FreeTube while importing."
                    .to_string(),
            ),
            Self::Config(_) => Some("Check ~/.tubeport/config.json for syntax errors.".to_string()),
            Self::Resolution(_) => {
                Some("Try `--backend local` or `--instance <url>` to use another backend.".to_string())
            }
            Self::Transfer(TransferError::Format(_))
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

// ── Record Errors ─────────────────────────────────────────────

/// A problem with a single imported record.
///
/// Never fatal: the record is skipped (or, for `UnknownKey`, the key is
/// dropped) and the batch carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Unknown data key: {0}")]
    UnknownKey(String),

    #[error("{kind} object has insufficient data, skipping item")]
    InsufficientData {
        kind: &'static str,
        present: usize,
        required: usize,
    },

    #[error("{kind} object is malformed, skipping item: {message}")]
    Malformed { kind: &'static str, message: String },

    #[error("Record {index} is not a JSON object, skipping item")]
    NotAnObject { index: usize },

    #[error("Subscription {index} has no channel URL, skipping item")]
    MissingUrl { index: usize },

    #[error("Subscription {index} has an unrecognized channel URL: {url}")]
    UnrecognizedUrl { index: usize, url: String },
}
