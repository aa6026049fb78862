//! Profile and subscription models.
//!
//! Profiles are FreeTube's unit of organization: a named, colored set of
//! channel subscriptions. Field names follow FreeTube's `profiles.db`
//! documents so records round-trip without translation.

use serde::{Deserialize, Serialize};

/// Id of the profile that always exists and holds every subscription.
pub const PRIMARY_PROFILE_ID: &str = "allChannels";

/// A FreeTube profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Background color (CSS hex, e.g. `#000000`)
    #[serde(rename = "bgColor")]
    pub bg_color: String,

    /// Text color (CSS hex)
    #[serde(rename = "textColor")]
    pub text_color: String,

    /// Channel subscriptions; order carries no meaning
    pub subscriptions: Vec<Subscription>,
}

impl Profile {
    /// The built-in "All Channels" profile with no subscriptions.
    #[must_use]
    pub fn primary() -> Self {
        Self {
            id: PRIMARY_PROFILE_ID.to_string(),
            name: "All Channels".to_string(),
            bg_color: "#000000".to_string(),
            text_color: "#FFFFFF".to_string(),
            subscriptions: Vec::new(),
        }
    }

    /// Append subscriptions, keeping the existing ones.
    pub fn append_subscriptions(&mut self, subscriptions: impl IntoIterator<Item = Subscription>) {
        self.subscriptions.extend(subscriptions);
    }
}

/// A channel subscription held by a profile.
///
/// `name` and `thumbnail` are empty when channel resolution failed and the
/// import file carried no name either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Opaque platform channel id (e.g. `UC...`)
    pub id: String,

    /// Channel display name
    #[serde(default)]
    pub name: String,

    /// Channel avatar URL
    #[serde(default)]
    pub thumbnail: String,
}

impl Subscription {
    /// Create a subscription.
    pub fn new(id: impl Into<String>, name: impl Into<String>, thumbnail: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: thumbnail.into(),
        }
    }
}
