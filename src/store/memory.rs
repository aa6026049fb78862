//! In-memory store.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::{HistoryEntry, Profile};
use crate::sanitize::RecordKind;

use super::{DataStore, upsert_by};

/// Store that keeps everything in memory.
///
/// `file_path` reports paths under a nominal directory; nothing is written
/// there.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profiles: Vec<Profile>,
    history: Vec<HistoryEntry>,
    dir: PathBuf,
    commits: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    /// Set the nominal directory reported by `file_path`.
    #[must_use]
    pub fn at(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Number of successful commits so far.
    #[must_use]
    pub const fn commit_count(&self) -> usize {
        self.commits
    }
}

impl DataStore for MemoryStore {
    fn profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.profiles.clone())
    }

    fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.clone())
    }

    fn commit_profiles(&mut self, profiles: Vec<Profile>) -> Result<()> {
        upsert_by(&mut self.profiles, profiles, |p| &p.id);
        self.commits += 1;
        Ok(())
    }

    fn commit_history(&mut self, entries: Vec<HistoryEntry>) -> Result<()> {
        upsert_by(&mut self.history, entries, |h| &h.video_id);
        self.commits += 1;
        Ok(())
    }

    fn file_path(&self, kind: RecordKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}
