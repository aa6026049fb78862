//! FreeTube's on-disk database files.
//!
//! Each file is an append log of JSON documents, one per line. When loading:
//! - a later line with the same `_id` replaces the earlier one
//! - `{"$$deleted": true, "_id": ...}` removes the document
//! - `$$indexCreated` lines are index metadata and are skipped
//!
//! Commits rewrite the compacted file atomically. Documents a commit does not
//! replace are written back with the content they were loaded with, including
//! ones the typed model cannot read and fields it does not know.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::native;
use crate::error::{Error, Result};
use crate::model::{HistoryEntry, Profile};
use crate::sanitize::RecordKind;

use super::DataStore;

pub const PROFILES_FILE: &str = RecordKind::Profile.file_name();
pub const HISTORY_FILE: &str = RecordKind::History.file_name();

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file next to the target (`<name>~`)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push("~");
    let temp_path = path.with_file_name(temp_name);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)
}

/// One compacted database file.
///
/// The raw documents are the source of truth and are written back with the
/// content they were read with; `records` is the typed view of the documents the model can
/// read. A commit only replaces the documents it upserts.
#[derive(Debug)]
struct Collection<T> {
    path: PathBuf,
    /// Field commits are matched on.
    key: &'static str,
    documents: Vec<Value>,
    records: Vec<T>,
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    fn open(path: PathBuf, key: &'static str) -> Result<Self> {
        let documents = load(&path)?;
        let records = typed(&path, &documents);
        Ok(Self {
            path,
            key,
            documents,
            records,
        })
    }

    fn commit(&mut self, incoming: Vec<T>) -> Result<usize> {
        let mut next = self.documents.clone();
        for item in incoming {
            let document = serde_json::to_value(&item).map_err(|e| {
                Error::Store(format!("Failed to serialize {}: {e}", self.path.display()))
            })?;
            upsert_document(&mut next, document, self.key);
        }

        persist(&self.path, &next)?;
        self.records = typed(&self.path, &next);
        self.documents = next;
        Ok(self.documents.len())
    }
}

/// Store backed by a FreeTube user data directory.
#[derive(Debug)]
pub struct JsonlStore {
    dir: PathBuf,
    profiles: Collection<Profile>,
    history: Collection<HistoryEntry>,
}

impl JsonlStore {
    /// Load `profiles.db` and `history.db` from `dir`. Missing files are empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if a file exists but cannot be read or holds
    /// a line that is not JSON.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let profiles = Collection::open(dir.join(PROFILES_FILE), "_id")?;
        let history = Collection::open(dir.join(HISTORY_FILE), "videoId")?;

        tracing::debug!(
            dir = %dir.display(),
            profiles = profiles.records.len(),
            history = history.records.len(),
            "Opened data directory"
        );

        Ok(Self {
            dir,
            profiles,
            history,
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DataStore for JsonlStore {
    fn profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.profiles.records.clone())
    }

    fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.records.clone())
    }

    fn commit_profiles(&mut self, profiles: Vec<Profile>) -> Result<()> {
        let count = self.profiles.commit(profiles)?;
        tracing::info!(count, "Committed profiles");
        Ok(())
    }

    fn commit_history(&mut self, entries: Vec<HistoryEntry>) -> Result<()> {
        let count = self.history.commit(entries)?;
        tracing::info!(count, "Committed history");
        Ok(())
    }

    fn file_path(&self, kind: RecordKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

/// Live documents of a database file, in first-seen order.
fn load(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let bytes = fs::read(path)
        .map_err(|e| Error::Store(format!("Failed to read {}: {e}", path.display())))?;
    let lines = native::decode(&bytes)
        .map_err(|e| Error::Store(format!("{}: {e}", path.display())))?;

    let mut slots: Vec<Option<Value>> = Vec::with_capacity(lines.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for doc in lines {
        if doc.get("$$indexCreated").is_some() {
            continue;
        }
        let Some(id) = doc.get("_id").and_then(Value::as_str).map(String::from) else {
            tracing::warn!(path = %path.display(), "Skipping document without _id");
            continue;
        };

        if doc.get("$$deleted").and_then(Value::as_bool) == Some(true) {
            if let Some(slot) = index.remove(&id) {
                slots[slot] = None;
            }
            continue;
        }

        match index.get(&id) {
            Some(&slot) => slots[slot] = Some(doc),
            None => {
                index.insert(id, slots.len());
                slots.push(Some(doc));
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

/// The documents the typed model can read. The rest stay on disk untouched.
fn typed<T: DeserializeOwned>(path: &Path, documents: &[Value]) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| match serde_json::from_value::<T>(doc.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Document not readable, keeping it as is");
                None
            }
        })
        .collect()
}

/// Replace the document whose `key` field matches, or append.
fn upsert_document(documents: &mut Vec<Value>, document: Value, key: &str) {
    let position = document.get(key).and_then(Value::as_str).and_then(|wanted| {
        documents
            .iter()
            .position(|existing| existing.get(key).and_then(Value::as_str) == Some(wanted))
    });

    match position {
        Some(index) => documents[index] = document,
        None => documents.push(document),
    }
}

fn persist(path: &Path, documents: &[Value]) -> Result<()> {
    let content = native::encode_records(documents)
        .map_err(|e| Error::Store(format!("Failed to serialize {}: {e}", path.display())))?;
    atomic_write(path, &content)
        .map_err(|e| Error::Store(format!("Failed to write {}: {e}", path.display())))
}
