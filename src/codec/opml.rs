//! OPML feed-list codec.
//!
//! The YouTube subscription export is an OPML document whose body holds a
//! single wrapper outline; each child outline is one channel feed:
//!
//! ```xml
//! <opml version="1.1"><body>
//!   <outline text="YouTube Subscriptions" title="YouTube Subscriptions">
//!     <outline text="Name" title="Name" type="rss"
//!              xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UC..."/>
//!   </outline>
//! </body></opml>
//! ```

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{DecodedEntry, FormatError, RawSubscription, SubscriptionCodec};
use crate::error::RecordError;
use crate::model::Subscription;

/// Feed URL prefix; the remainder is the channel id.
pub const FEED_URL_PREFIX: &str = "https://www.youtube.com/feeds/videos.xml?channel_id=";

const WRAPPER_TITLE: &str = "YouTube Subscriptions";

/// OPML codec.
pub struct Opml;

impl SubscriptionCodec for Opml {
    fn decode(bytes: &[u8]) -> Result<Vec<DecodedEntry>, FormatError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut saw_opml = false;
        let mut in_body = false;
        let mut depth = 0usize;
        let mut wrapper: Option<bool> = None; // Some(true) while inside the first top-level outline
        let mut children = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| FormatError::Xml(format!("{e} at byte {}", reader.buffer_position())))?;

            match event {
                Event::Start(e) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"opml" => saw_opml = true,
                        b"body" if saw_opml => in_body = true,
                        b"outline" if in_body => {
                            depth += 1;
                            match (depth, wrapper) {
                                (1, None) => wrapper = Some(true),
                                (2, Some(true)) => children.push(outline_entry(&e, children.len())?),
                                _ => {}
                            }
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    if in_body && e.local_name().as_ref() == b"outline" {
                        match (depth + 1, wrapper) {
                            // An empty wrapper has no children.
                            (1, None) => wrapper = Some(false),
                            (2, Some(true)) => children.push(outline_entry(&e, children.len())?),
                            _ => {}
                        }
                    }
                }
                Event::End(e) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"outline" if in_body => {
                            if depth == 1 && wrapper == Some(true) {
                                wrapper = Some(false);
                            }
                            depth = depth.saturating_sub(1);
                        }
                        b"body" => in_body = false,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_opml {
            return Err(FormatError::NotOpml);
        }
        if children.is_empty() {
            return Err(FormatError::MissingOutlines);
        }

        Ok(children)
    }

    fn encode(subscriptions: &[Subscription]) -> Result<Vec<u8>, FormatError> {
        let mut out = format!(
            r#"<opml version="1.1"><body><outline text="{WRAPPER_TITLE}" title="{WRAPPER_TITLE}">"#
        );

        for channel in subscriptions {
            let name = escape(channel.name.as_str());
            let id = escape(channel.id.as_str());
            out.push_str(&format!(
                r#"<outline text="{name}" title="{name}" type="rss" xmlUrl="{FEED_URL_PREFIX}{id}"/>"#
            ));
        }

        out.push_str("</outline></body></opml>");
        Ok(out.into_bytes())
    }
}

/// Read one child outline into an entry. Attribute names are matched
/// case-insensitively (`xmlUrl`, `xmlurl`).
fn outline_entry(element: &BytesStart<'_>, index: usize) -> Result<DecodedEntry, FormatError> {
    let mut xml_url = None;
    let mut title = None;
    let mut text = None;

    for attr in element.attributes().with_checks(false) {
        let attr = attr.map_err(|e| FormatError::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| FormatError::Xml(e.to_string()))?
            .into_owned();
        let key = attr.key.local_name();
        let key = key.as_ref();

        if key.eq_ignore_ascii_case(b"xmlurl") {
            xml_url = Some(value);
        } else if key.eq_ignore_ascii_case(b"title") {
            title = Some(value);
        } else if key.eq_ignore_ascii_case(b"text") {
            text = Some(value);
        }
    }

    let Some(url) = xml_url else {
        return Ok(Err(RecordError::MissingUrl { index }));
    };

    let url = url.trim();
    let entry = match url.strip_prefix(FEED_URL_PREFIX) {
        Some(channel_id) if !channel_id.is_empty() => Ok(RawSubscription {
            channel_id: channel_id.to_string(),
            name: title.or(text).filter(|n| !n.is_empty()),
        }),
        _ => Err(RecordError::UnrecognizedUrl {
            index,
            url: url.to_string(),
        }),
    };

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ok(input: &str) -> Vec<RawSubscription> {
        Opml::decode(input.as_bytes())
            .unwrap()
            .into_iter()
            .map(Result::unwrap)
            .collect()
    }

    #[test]
    fn test_decode_single_outline() {
        let input = r#"<opml version="1.1"><body><outline text="YouTube Subscriptions" title="YouTube Subscriptions"><outline text="Chan" title="Chan" type="rss" xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UC123"/></outline></body></opml>"#;
        let subs = decode_ok(input);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].channel_id, "UC123");
        assert_eq!(subs[0].name.as_deref(), Some("Chan"));
    }

    #[test]
    fn test_decode_pretty_printed_with_lowercase_attribute() {
        let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="1.0">
  <head><title>Takeout</title></head>
  <body>
    <outline text="YouTube Subscriptions" title="YouTube Subscriptions">
      <outline text="A &amp; B" xmlurl="https://www.youtube.com/feeds/videos.xml?channel_id=UCab" />
      <outline title="C" xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UCc"></outline>
    </outline>
  </body>
</opml>"#;
        let subs = decode_ok(input);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].channel_id, "UCab");
        assert_eq!(subs[0].name.as_deref(), Some("A & B"));
        assert_eq!(subs[1].channel_id, "UCc");
    }

    #[test]
    fn test_only_first_top_level_outline_counts() {
        let input = r#"<opml><body>
            <outline text="first"><outline xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UC1"/></outline>
            <outline text="second"><outline xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UC2"/></outline>
        </body></opml>"#;
        let subs = decode_ok(input);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].channel_id, "UC1");
    }

    #[test]
    fn test_grandchildren_are_ignored() {
        let input = r#"<opml><body><outline text="w">
            <outline text="folder" xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UC1">
                <outline xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UC9"/>
            </outline>
        </outline></body></opml>"#;
        let subs = decode_ok(input);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].channel_id, "UC1");
    }

    #[test]
    fn test_missing_children_is_format_error() {
        let empty_wrapper = r#"<opml><body><outline text="YouTube Subscriptions"/></body></opml>"#;
        assert!(matches!(
            Opml::decode(empty_wrapper.as_bytes()),
            Err(FormatError::MissingOutlines)
        ));

        let no_outline = r"<opml><body></body></opml>";
        assert!(matches!(
            Opml::decode(no_outline.as_bytes()),
            Err(FormatError::MissingOutlines)
        ));
    }

    #[test]
    fn test_not_opml() {
        assert!(matches!(
            Opml::decode(b"<rss><channel/></rss>"),
            Err(FormatError::NotOpml)
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let err = Opml::decode(b"<opml><body><outline text=\"x\"></body></opml>").unwrap_err();
        assert!(matches!(err, FormatError::Xml(_)));
    }

    #[test]
    fn test_bad_entries_are_per_record() {
        let input = r#"<opml><body><outline text="w">
            <outline text="no url"/>
            <outline text="elsewhere" xmlUrl="https://example.com/feed.xml"/>
            <outline text="ok" xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UCok"/>
        </outline></body></opml>"#;
        let entries = Opml::decode(input.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], Err(RecordError::MissingUrl { index: 0 }));
        assert!(matches!(entries[1], Err(RecordError::UnrecognizedUrl { index: 1, .. })));
        assert_eq!(entries[2].as_ref().unwrap().channel_id, "UCok");
    }

    #[test]
    fn test_encode_layout() {
        let subs = vec![Subscription::new("UC1", "One", "https://t/1.jpg")];
        let out = String::from_utf8(Opml::encode(&subs).unwrap()).unwrap();
        assert_eq!(
            out,
            concat!(
                r#"<opml version="1.1"><body><outline text="YouTube Subscriptions" title="YouTube Subscriptions">"#,
                r#"<outline text="One" title="One" type="rss" xmlUrl="https://www.youtube.com/feeds/videos.xml?channel_id=UC1"/>"#,
                "</outline></body></opml>"
            )
        );
    }

    #[test]
    fn test_encode_empty_is_still_closed() {
        let out = String::from_utf8(Opml::encode(&[]).unwrap()).unwrap();
        assert!(out.ends_with("</outline></body></opml>"));
    }

    #[test]
    fn test_encode_escapes_names_and_round_trips() {
        let subs = vec![
            Subscription::new("UC1", r#"Tom & "Jerry" <3"#, ""),
            Subscription::new("UC2", "Plain", "thumb"),
        ];
        let bytes = Opml::encode(&subs).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("Tom &amp; &quot;Jerry&quot; &lt;3"));

        let decoded = decode_ok(&text);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].channel_id, "UC1");
        assert_eq!(decoded[0].name.as_deref(), Some(r#"Tom & "Jerry" <3"#));
        assert_eq!(decoded[1].name.as_deref(), Some("Plain"));
    }
}
