//! Persistence for profiles and watch history.
//!
//! Two backends:
//! - [`JsonlStore`] - FreeTube's own `profiles.db` / `history.db` files
//! - [`MemoryStore`] - in-process, for embedding and tests
//!
//! Commits upsert: profiles by `_id`, history entries by `videoId`.

mod file;
mod memory;

pub use file::{HISTORY_FILE, JsonlStore, PROFILES_FILE, atomic_write};
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::Result;
use crate::model::{HistoryEntry, PRIMARY_PROFILE_ID, Profile};
use crate::sanitize::RecordKind;

/// Profile and history persistence.
pub trait DataStore: Send + Sync {
    /// All profiles, in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn profiles(&self) -> Result<Vec<Profile>>;

    /// All history entries, in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn history(&self) -> Result<Vec<HistoryEntry>>;

    /// Insert or replace profiles by id, then persist.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; the store is left unchanged.
    fn commit_profiles(&mut self, profiles: Vec<Profile>) -> Result<()>;

    /// Insert or replace history entries by video id, then persist.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; the store is left unchanged.
    fn commit_history(&mut self, entries: Vec<HistoryEntry>) -> Result<()>;

    /// The file backing one record kind. Native exports copy it verbatim.
    fn file_path(&self, kind: RecordKind) -> PathBuf;

    /// The profile imported subscriptions merge into.
    ///
    /// `allChannels` if present, else the first profile, else a fresh
    /// "All Channels" profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profiles cannot be read.
    fn primary_profile(&self) -> Result<Profile> {
        let profiles = self.profiles()?;
        Ok(profiles
            .iter()
            .find(|p| p.id == PRIMARY_PROFILE_ID)
            .or_else(|| profiles.first())
            .cloned()
            .unwrap_or_else(Profile::primary))
    }
}

/// Replace by key or append, keeping first-seen order.
pub(crate) fn upsert_by<T>(items: &mut Vec<T>, incoming: Vec<T>, key: impl Fn(&T) -> &str) {
    for item in incoming {
        match items.iter().position(|existing| key(existing) == key(&item)) {
            Some(index) => items[index] = item,
            None => items.push(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> Profile {
        Profile {
            id: id.to_string(),
            name: name.to_string(),
            ..Profile::primary()
        }
    }

    #[test]
    fn test_primary_prefers_all_channels() {
        let store = MemoryStore::with_profiles(vec![profile("p1", "Music"), profile("allChannels", "All")]);
        assert_eq!(store.primary_profile().unwrap().id, "allChannels");
    }

    #[test]
    fn test_primary_falls_back_to_first_then_default() {
        let store = MemoryStore::with_profiles(vec![profile("p1", "Music"), profile("p2", "News")]);
        assert_eq!(store.primary_profile().unwrap().id, "p1");

        let empty = MemoryStore::new();
        let primary = empty.primary_profile().unwrap();
        assert_eq!(primary.id, PRIMARY_PROFILE_ID);
        assert!(primary.subscriptions.is_empty());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut items = vec![profile("a", "A"), profile("b", "B")];
        upsert_by(&mut items, vec![profile("b", "B2"), profile("c", "C")], |p| &p.id);
        let names: Vec<&str> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B2", "C"]);
    }
}
