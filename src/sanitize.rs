//! Allow-list sanitization for imported records.
//!
//! Imported database lines are untrusted. Only the keys a record kind is
//! known to carry are copied; everything else is reported and dropped. A
//! record missing any allow-listed key is rejected as a whole. Values are
//! never inspected here; type shape is checked when the sanitized map is
//! deserialized into the typed model.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::RecordError;

/// Keys of a FreeTube profile document.
pub const PROFILE_KEYS: &[&str] = &["_id", "name", "bgColor", "textColor", "subscriptions"];

/// Keys of a FreeTube history document.
pub const HISTORY_KEYS: &[&str] = &[
    "_id",
    "author",
    "authorId",
    "description",
    "isLive",
    "lengthSeconds",
    "paid",
    "published",
    "timeWatched",
    "title",
    "type",
    "videoId",
    "viewCount",
    "watchProgress",
];

/// The kind of native record being imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Profile,
    History,
}

impl RecordKind {
    /// The allow-list (and required set) for this kind.
    #[must_use]
    pub const fn required_keys(self) -> &'static [&'static str] {
        match self {
            Self::Profile => PROFILE_KEYS,
            Self::History => HISTORY_KEYS,
        }
    }

    /// Name of the database file holding this kind.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Profile => "profiles.db",
            Self::History => "history.db",
        }
    }

    /// Human label used in warnings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::History => "History",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Profile => write!(f, "profile"),
            Self::History => write!(f, "history"),
        }
    }
}

/// Result of sanitizing one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sanitized {
    /// Allow-listed fields, values untouched.
    pub fields: Map<String, Value>,
    /// Keys that were not on the allow-list.
    pub rejected: BTreeSet<String>,
    required: usize,
}

impl Sanitized {
    /// Whether every required key was present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fields.len() >= self.required
    }

    /// Warnings for this record, one per rejected key.
    #[must_use]
    pub fn unknown_key_errors(&self) -> Vec<RecordError> {
        self.rejected
            .iter()
            .map(|key| RecordError::UnknownKey(key.clone()))
            .collect()
    }

    /// Consume into the sanitized fields, or the insufficient-data error.
    pub fn into_complete(self, kind: RecordKind) -> Result<Map<String, Value>, RecordError> {
        if self.is_complete() {
            Ok(self.fields)
        } else {
            Err(RecordError::InsufficientData {
                kind: kind.label(),
                present: self.fields.len(),
                required: self.required,
            })
        }
    }
}

/// Copy the allow-listed keys of `record`, collecting the rest.
///
/// Keys are matched exactly. The order of `required` is irrelevant. Logging
/// rejected keys is left to the caller.
#[must_use]
pub fn sanitize(record: &Map<String, Value>, required: &[&str]) -> Sanitized {
    let mut sanitized = Sanitized {
        required: required.len(),
        ..Sanitized::default()
    };

    for (key, value) in record {
        if required.contains(&key.as_str()) {
            sanitized.fields.insert(key.clone(), value.clone());
        } else {
            sanitized.rejected.insert(key.clone());
        }
    }

    sanitized
}
