//! Import batches.

use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::newpipe::NewPipe;
use crate::codec::opml::Opml;
use crate::codec::{DecodedEntry, FileFilter, FormatError, SubscriptionCodec, SubscriptionFormat, native};
use crate::error::{RecordError, Result};
use crate::model::{HistoryEntry, Profile, Subscription};
use crate::sanitize::{RecordKind, sanitize};
use crate::store::DataStore;

use super::collab::{FileIo, FilePicker, Notifier};
use super::types::{Batch, BatchKind, BatchOutcome, BatchReport, BatchState, BatchStats, ImportStats, TransferError};
use super::{Orchestrator, percentage};

const PROFILES_IMPORTED: &str = "All subscriptions and profiles have been successfully imported";
const SUBSCRIPTIONS_IMPORTED: &str = "All subscriptions have been successfully imported";
const HISTORY_IMPORTED: &str = "All watched history has been successfully imported";
const PLEASE_WAIT: &str = "This might take a while, please wait";

impl<S: DataStore, P: FilePicker, F: FileIo> Orchestrator<S, P, F> {
    /// Import subscriptions from a file in `format`.
    ///
    /// FreeTube database files replace profiles by id. Feed lists and NewPipe
    /// exports are resolved to channel metadata and appended to the primary
    /// profile in a single commit once every lookup has finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or the store
    /// rejects the commit. Nothing is committed in that case.
    pub async fn import_subscriptions(&mut self, format: SubscriptionFormat) -> Result<BatchOutcome> {
        let Some(path) = self.picker.open(format.import_filters()).await else {
            tracing::debug!(%format, "Import cancelled");
            return Ok(BatchOutcome::Cancelled);
        };
        tracing::info!(%format, path = %path.display(), "Importing subscriptions");

        let mut batch = Batch::default();
        batch.advance(BatchState::Reading);
        let bytes = self.read_file(&mut batch, &path).await?;
        batch.advance(BatchState::Decoding);

        match format {
            SubscriptionFormat::FreeTube => {
                let values = self.decoded(&mut batch, native::decode(&bytes), "subscriptions")?;
                self.import_profiles(batch, values)
            }
            SubscriptionFormat::YouTube => {
                let entries = self.decoded(&mut batch, Opml::decode(&bytes), "subscriptions")?;
                self.import_entries(batch, format, entries).await
            }
            SubscriptionFormat::NewPipe => {
                let entries = self.decoded(&mut batch, NewPipe::decode(&bytes), "subscriptions")?;
                self.import_entries(batch, format, entries).await
            }
        }
    }

    /// Import watch history from a FreeTube `history.db` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or the store
    /// rejects the commit.
    pub async fn import_history(&mut self) -> Result<BatchOutcome> {
        let Some(path) = self.picker.open(&[FileFilter::DATABASE]).await else {
            tracing::debug!("History import cancelled");
            return Ok(BatchOutcome::Cancelled);
        };
        tracing::info!(path = %path.display(), "Importing history");

        let mut batch = Batch::default();
        batch.advance(BatchState::Reading);
        let bytes = self.read_file(&mut batch, &path).await?;
        batch.advance(BatchState::Decoding);
        let values = self.decoded(&mut batch, native::decode(&bytes), "history")?;

        batch.advance(BatchState::Processing);
        let mut stats = ImportStats::default();
        let mut warnings = Vec::new();
        let entries: Vec<HistoryEntry> =
            self.sanitize_records(RecordKind::History, values, &mut stats, &mut warnings);
        stats.imported = entries.len();

        batch.advance(BatchState::Merging);
        self.commit(&mut batch, |store| store.commit_history(entries))?;
        batch.advance(BatchState::Done);
        self.notify(HISTORY_IMPORTED);

        Ok(BatchOutcome::Completed(BatchReport {
            kind: BatchKind::HistoryImport,
            format: None,
            state: batch.state(),
            stats: BatchStats::Import(stats),
            warnings,
        }))
    }

    /// Unwrap a decode result; on failure notify and fail the batch.
    fn decoded<T>(
        &self,
        batch: &mut Batch,
        result: std::result::Result<T, FormatError>,
        what: &str,
    ) -> Result<T> {
        result.map_err(|e| {
            self.notify(format!("Invalid {what} file: {e}"));
            batch.fail();
            TransferError::Format(e).into()
        })
    }

    /// Apply a store commit; on failure notify and fail the batch.
    fn commit(&mut self, batch: &mut Batch, apply: impl FnOnce(&mut S) -> Result<()>) -> Result<()> {
        apply(&mut self.store).inspect_err(|e| {
            self.notify(format!("Unable to save data: {e}"));
            batch.fail();
        })
    }

    fn import_profiles(&mut self, mut batch: Batch, values: Vec<Value>) -> Result<BatchOutcome> {
        batch.advance(BatchState::Processing);
        let mut stats = ImportStats::default();
        let mut warnings = Vec::new();
        let profiles: Vec<Profile> =
            self.sanitize_records(RecordKind::Profile, values, &mut stats, &mut warnings);
        stats.imported = profiles.len();

        batch.advance(BatchState::Merging);
        self.commit(&mut batch, |store| store.commit_profiles(profiles))?;
        batch.advance(BatchState::Done);
        self.notify(PROFILES_IMPORTED);

        Ok(BatchOutcome::Completed(BatchReport {
            kind: BatchKind::SubscriptionImport,
            format: Some(SubscriptionFormat::FreeTube),
            state: batch.state(),
            stats: BatchStats::Import(stats),
            warnings,
        }))
    }

    /// Sanitize native records and convert the complete ones to `T`.
    fn sanitize_records<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        values: Vec<Value>,
        stats: &mut ImportStats,
        warnings: &mut Vec<RecordError>,
    ) -> Vec<T> {
        let mut records = Vec::with_capacity(values.len());

        for (index, value) in values.into_iter().enumerate() {
            stats.processed += 1;

            let Value::Object(record) = value else {
                self.warn_record(RecordError::NotAnObject { index }, warnings);
                stats.skipped += 1;
                continue;
            };

            let sanitized = sanitize(&record, kind.required_keys());
            stats.rejected_keys += sanitized.rejected.len();
            for error in sanitized.unknown_key_errors() {
                self.warn_record(error, warnings);
            }

            let typed = sanitized.into_complete(kind).and_then(|fields| {
                serde_json::from_value::<T>(Value::Object(fields)).map_err(|e| RecordError::Malformed {
                    kind: kind.label(),
                    message: e.to_string(),
                })
            });

            match typed {
                Ok(record) => records.push(record),
                Err(error) => {
                    self.warn_record(error, warnings);
                    stats.skipped += 1;
                }
            }
        }

        records
    }

    /// Resolve decoded feed entries and append them to the primary profile.
    async fn import_entries(
        &mut self,
        mut batch: Batch,
        format: SubscriptionFormat,
        entries: Vec<DecodedEntry>,
    ) -> Result<BatchOutcome> {
        let mut primary = match self.store.primary_profile() {
            Ok(profile) => profile,
            Err(e) => {
                self.notify(format!("Unable to load profiles: {e}"));
                batch.fail();
                return Err(e);
            }
        };

        batch.advance(BatchState::Processing);
        let mut stats = ImportStats {
            processed: entries.len(),
            ..ImportStats::default()
        };
        let mut warnings = Vec::new();

        let mut pending = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                Ok(raw) => pending.push((index, raw)),
                Err(error) => {
                    self.warn_record(error, &mut warnings);
                    stats.skipped += 1;
                }
            }
        }

        self.notify(PLEASE_WAIT);
        self.progress.set_visible(true);
        self.progress.set_percentage(0);

        let total = pending.len();
        let mut resolved = Vec::with_capacity(total);
        {
            let resolver = &self.resolver;
            let notifier: &dyn Notifier = self.notifier.as_ref();
            let mut lookups = futures::stream::iter(pending.into_iter().map(|(index, raw)| async move {
                let info = resolver.resolve(&raw.channel_id, notifier).await;
                (index, raw, info)
            }))
            .buffer_unordered(self.options.resolve_concurrency.max(1));

            while let Some(result) = lookups.next().await {
                resolved.push(result);
                self.progress.set_percentage(percentage(resolved.len(), total));
            }
        }

        // Completion order is arbitrary; keep file order.
        resolved.sort_by_key(|(index, ..)| *index);

        let subscriptions: Vec<Subscription> = resolved
            .into_iter()
            .map(|(_, raw, info)| {
                if info.is_empty() {
                    stats.unresolved += 1;
                }
                Subscription {
                    id: raw.channel_id,
                    name: info.author_name.or(raw.name).unwrap_or_default(),
                    thumbnail: info.thumbnail_url.unwrap_or_default(),
                }
            })
            .collect();
        stats.imported = subscriptions.len();

        batch.advance(BatchState::Merging);
        primary.append_subscriptions(subscriptions);
        let committed = self.commit(&mut batch, |store| store.commit_profiles(vec![primary]));
        self.progress.set_visible(false);
        committed?;

        batch.advance(BatchState::Done);
        tracing::info!(imported = stats.imported, unresolved = stats.unresolved, "Subscriptions imported");
        self.notify(SUBSCRIPTIONS_IMPORTED);

        Ok(BatchOutcome::Completed(BatchReport {
            kind: BatchKind::SubscriptionImport,
            format: Some(format),
            state: batch.state(),
            stats: BatchStats::Import(stats),
            warnings,
        }))
    }
}
