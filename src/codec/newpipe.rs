//! NewPipe JSON subscription codec.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{DecodedEntry, FormatError, RawSubscription, SubscriptionCodec};
use crate::error::RecordError;
use crate::model::Subscription;

/// Channel URL prefix, with or without `www.`.
static CHANNEL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://(www\.)?youtube\.com/channel/").expect("channel URL pattern is valid")
});

/// Channel URL written on export.
pub const CHANNEL_URL_PREFIX: &str = "https://www.youtube.com/channel/";

/// NewPipe version the export claims to come from.
pub const APP_VERSION: &str = "0.19.8";
pub const APP_VERSION_INT: u32 = 953;

/// NewPipe's service id for YouTube.
const YOUTUBE_SERVICE_ID: u32 = 0;

#[derive(Debug, Serialize)]
struct NewPipeExport<'a> {
    app_version: &'static str,
    app_version_int: u32,
    subscriptions: Vec<NewPipeSubscription<'a>>,
}

#[derive(Debug, Serialize)]
struct NewPipeSubscription<'a> {
    service_id: u32,
    url: String,
    name: &'a str,
}

/// NewPipe codec.
pub struct NewPipe;

impl SubscriptionCodec for NewPipe {
    fn decode(bytes: &[u8]) -> Result<Vec<DecodedEntry>, FormatError> {
        let document: Value = serde_json::from_slice(bytes).map_err(FormatError::Json)?;

        let Some(entries) = document.get("subscriptions").and_then(Value::as_array) else {
            return Err(FormatError::MissingSubscriptions);
        };

        Ok(entries
            .iter()
            .enumerate()
            .map(|(index, entry)| decode_entry(index, entry))
            .collect())
    }

    fn encode(subscriptions: &[Subscription]) -> Result<Vec<u8>, FormatError> {
        let export = NewPipeExport {
            app_version: APP_VERSION,
            app_version_int: APP_VERSION_INT,
            subscriptions: subscriptions
                .iter()
                .map(|channel| NewPipeSubscription {
                    service_id: YOUTUBE_SERVICE_ID,
                    url: format!("{CHANNEL_URL_PREFIX}{}", channel.id),
                    name: &channel.name,
                })
                .collect(),
        };

        serde_json::to_vec(&export).map_err(FormatError::Json)
    }
}

fn decode_entry(index: usize, entry: &Value) -> DecodedEntry {
    let Some(url) = entry.get("url").and_then(Value::as_str) else {
        return Err(RecordError::MissingUrl { index });
    };

    let Some(found) = CHANNEL_URL.find(url) else {
        return Err(RecordError::UnrecognizedUrl {
            index,
            url: url.to_string(),
        });
    };

    // Only the first match is removed.
    let channel_id = format!("{}{}", &url[..found.start()], &url[found.end()..]);
    if channel_id.is_empty() {
        return Err(RecordError::UnrecognizedUrl {
            index,
            url: url.to_string(),
        });
    }

    Ok(RawSubscription {
        channel_id,
        name: entry
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_channel_url() {
        let input = br#"{"subscriptions":[{"url":"https://www.youtube.com/channel/UC123","name":"X"}]}"#;
        let entries = NewPipe::decode(input).unwrap();
        assert_eq!(
            entries,
            vec![Ok(RawSubscription {
                channel_id: "UC123".into(),
                name: Some("X".into())
            })]
        );
    }

    #[test]
    fn test_decode_without_www() {
        let input = br#"{"app_version":"0.21.0","subscriptions":[{"service_id":0,"url":"https://youtube.com/channel/UCabc","name":"Y"}]}"#;
        let entries = NewPipe::decode(input).unwrap();
        assert_eq!(entries[0].as_ref().unwrap().channel_id, "UCabc");
    }

    #[test]
    fn test_missing_subscriptions_is_format_error() {
        assert!(matches!(
            NewPipe::decode(br#"{"app_version":"0.19.8"}"#),
            Err(FormatError::MissingSubscriptions)
        ));
        assert!(matches!(
            NewPipe::decode(br#"{"subscriptions":{}}"#),
            Err(FormatError::MissingSubscriptions)
        ));
        assert!(matches!(
            NewPipe::decode(br#"[]"#),
            Err(FormatError::MissingSubscriptions)
        ));
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        assert!(matches!(NewPipe::decode(b"{oops"), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_bad_entries_are_per_record() {
        let input = br#"{"subscriptions":[
            {"name":"no url"},
            {"url":"https://soundcloud.com/someone","name":"other service"},
            {"url":"https://www.youtube.com/channel/UCok"}
        ]}"#;
        let entries = NewPipe::decode(input).unwrap();
        assert_eq!(entries[0], Err(RecordError::MissingUrl { index: 0 }));
        assert!(matches!(entries[1], Err(RecordError::UnrecognizedUrl { index: 1, .. })));
        let ok = entries[2].as_ref().unwrap();
        assert_eq!(ok.channel_id, "UCok");
        assert!(ok.name.is_none());
    }

    #[test]
    fn test_encode_shape() {
        let subs = vec![Subscription::new("UC1", "One", "https://t/1.jpg")];
        let value: Value = serde_json::from_slice(&NewPipe::encode(&subs).unwrap()).unwrap();
        assert_eq!(value["app_version"], "0.19.8");
        assert_eq!(value["app_version_int"], 953);
        assert_eq!(value["subscriptions"][0]["service_id"], 0);
        assert_eq!(
            value["subscriptions"][0]["url"],
            "https://www.youtube.com/channel/UC1"
        );
        assert_eq!(value["subscriptions"][0]["name"], "One");
        assert!(value["subscriptions"][0].get("thumbnail").is_none());
    }

    #[test]
    fn test_encode_then_decode_keeps_id_and_name() {
        let subs = vec![
            Subscription::new("UC1", "One", "t1"),
            Subscription::new("UC2", "Two", "t2"),
        ];
        let decoded: Vec<RawSubscription> = NewPipe::decode(&NewPipe::encode(&subs).unwrap())
            .unwrap()
            .into_iter()
            .map(Result::unwrap)
            .collect();
        assert_eq!(decoded[0].channel_id, "UC1");
        assert_eq!(decoded[1].name.as_deref(), Some("Two"));
    }
}
