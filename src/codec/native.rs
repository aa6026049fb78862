//! FreeTube's native line-delimited JSON database format.
//!
//! `profiles.db` and `history.db` hold one JSON document per line, newline
//! terminated. The store file is itself the export artifact, so exporting is
//! a byte copy ([`encode_raw`]) rather than a re-serialization.

use serde::Serialize;
use serde_json::Value;

use super::FormatError;

/// Parse every line of a native database file.
///
/// The bytes are decoded as UTF-8 (invalid sequences are replaced, as a text
/// decoder would) and split on `\n`. A trailing `\r` is stripped from each
/// line, and blank lines at the end of the file are dropped, so a file holding
/// only newlines decodes to nothing.
///
/// # Errors
///
/// Returns [`FormatError::JsonLine`] for the first line that does not parse.
/// There is no partial recovery: one bad line rejects the whole file.
pub fn decode(bytes: &[u8]) -> Result<Vec<Value>, FormatError> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| FormatError::JsonLine {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Pass a stored database file through unchanged.
#[must_use]
pub fn encode_raw(stored: &[u8]) -> Vec<u8> {
    stored.to_vec()
}

/// Write records as compact JSON, one per line, newline terminated.
///
/// # Errors
///
/// Returns [`FormatError::Json`] if a record cannot be serialized.
pub fn encode_records<T: Serialize>(records: &[T]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    for record in records {
        serde_json::to_writer(&mut out, record).map_err(FormatError::Json)?;
        out.push(b'\n');
    }
    Ok(out)
}
