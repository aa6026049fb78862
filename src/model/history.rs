//! Watch history model.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A previously watched video, as stored in FreeTube's `history.db`.
///
/// Numeric fields keep their JSON number representation so imported records
/// are written back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub author_id: String,
    pub description: String,
    pub is_live: bool,
    pub length_seconds: Number,
    pub paid: bool,
    /// Publication time (Unix milliseconds)
    pub published: Number,
    /// Last watched time (Unix milliseconds)
    pub time_watched: Number,
    pub title: String,
    /// Content type tag, usually `video`
    #[serde(rename = "type")]
    pub kind: String,
    pub video_id: String,
    pub view_count: Number,
    /// Playback position in seconds
    pub watch_progress: Number,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_round_trips_numbers_exactly() {
        let line = r#"{"_id":"abc","author":"A","authorId":"UC1","description":"d","isLive":false,"lengthSeconds":212,"paid":false,"published":1600000000000,"timeWatched":1610000000000,"title":"T","type":"video","videoId":"abc","viewCount":42,"watchProgress":12.5}"#;
        let entry: HistoryEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.kind, "video");
        assert_eq!(entry.author_id, "UC1");

        let back = serde_json::to_string(&entry).unwrap();
        assert!(back.contains(r#""published":1600000000000"#));
        assert!(back.contains(r#""watchProgress":12.5"#));
        assert!(back.contains(r#""lengthSeconds":212"#));
    }

    #[test]
    fn test_history_entry_rejects_wrong_shape() {
        let line = r#"{"_id":"abc","author":"A","authorId":"UC1","description":"d","isLive":"no","lengthSeconds":1,"paid":false,"published":1,"timeWatched":1,"title":"T","type":"video","videoId":"abc","viewCount":1,"watchProgress":0}"#;
        assert!(serde_json::from_str::<HistoryEntry>(line).is_err());
    }
}
