//! Export batches.

use std::path::Path;

use crate::codec::newpipe::NewPipe;
use crate::codec::opml::Opml;
use crate::codec::{FileFilter, SubscriptionCodec, SubscriptionFormat, native};
use crate::error::Result;
use crate::sanitize::RecordKind;
use crate::store::DataStore;

use super::collab::{FileIo, FilePicker};
use super::naming::{HISTORY_EXPORT_STEM, default_export_name};
use super::types::{Batch, BatchKind, BatchOutcome, BatchReport, BatchState, BatchStats, ExportStats, TransferError};
use super::Orchestrator;

const SUBSCRIPTIONS_EXPORTED: &str = "All subscriptions have been successfully exported";
const HISTORY_EXPORTED: &str = "All watched history has been successfully exported";

impl<S: DataStore, P: FilePicker, F: FileIo> Orchestrator<S, P, F> {
    /// Export the store's subscriptions in `format`.
    ///
    /// FreeTube exports are a byte copy of the store's `profiles.db`. Feed
    /// list and NewPipe exports encode the primary profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the destination
    /// cannot be written.
    pub async fn export_subscriptions(&mut self, format: SubscriptionFormat) -> Result<BatchOutcome> {
        let default_name = default_export_name(format.export_stem(), format.extension(), self.export_date());
        let Some(path) = self.picker.save(&default_name, format.export_filters()).await else {
            tracing::debug!(%format, "Export cancelled");
            return Ok(BatchOutcome::Cancelled);
        };
        tracing::info!(%format, path = %path.display(), "Exporting subscriptions");

        let mut batch = Batch::default();
        batch.advance(BatchState::Reading);

        let (bytes, records) = match format {
            SubscriptionFormat::FreeTube => {
                let source = self.store.file_path(RecordKind::Profile);
                let stored = self.read_file(&mut batch, &source).await?;
                batch.advance(BatchState::Encoding);
                let bytes = native::encode_raw(&stored);
                let records = count_lines(&bytes);
                (bytes, records)
            }
            SubscriptionFormat::YouTube | SubscriptionFormat::NewPipe => {
                let primary = match self.store.primary_profile() {
                    Ok(profile) => profile,
                    Err(e) => {
                        self.notify(format!("Unable to load profiles: {e}"));
                        batch.fail();
                        return Err(e);
                    }
                };

                batch.advance(BatchState::Encoding);
                let encoded = if format == SubscriptionFormat::YouTube {
                    Opml::encode(&primary.subscriptions)
                } else {
                    NewPipe::encode(&primary.subscriptions)
                };
                let bytes = encoded.map_err(|e| {
                    self.notify(format!("Unable to encode subscriptions: {e}"));
                    batch.fail();
                    TransferError::Format(e)
                })?;
                (bytes, primary.subscriptions.len())
            }
        };

        let stats = self.finish_export(&mut batch, &path, &bytes, records).await?;
        self.notify(SUBSCRIPTIONS_EXPORTED);

        Ok(BatchOutcome::Completed(BatchReport {
            kind: BatchKind::SubscriptionExport,
            format: Some(format),
            state: batch.state(),
            stats: BatchStats::Export(stats),
            warnings: Vec::new(),
        }))
    }

    /// Export the store's `history.db` unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read or the
    /// destination cannot be written.
    pub async fn export_history(&mut self) -> Result<BatchOutcome> {
        let default_name = default_export_name(HISTORY_EXPORT_STEM, "db", self.export_date());
        let Some(path) = self.picker.save(&default_name, &[FileFilter::DATABASE]).await else {
            tracing::debug!("History export cancelled");
            return Ok(BatchOutcome::Cancelled);
        };
        tracing::info!(path = %path.display(), "Exporting history");

        let mut batch = Batch::default();
        batch.advance(BatchState::Reading);
        let source = self.store.file_path(RecordKind::History);
        let stored = self.read_file(&mut batch, &source).await?;

        batch.advance(BatchState::Encoding);
        let bytes = native::encode_raw(&stored);
        let records = count_lines(&bytes);

        let stats = self.finish_export(&mut batch, &path, &bytes, records).await?;
        self.notify(HISTORY_EXPORTED);

        Ok(BatchOutcome::Completed(BatchReport {
            kind: BatchKind::HistoryExport,
            format: None,
            state: batch.state(),
            stats: BatchStats::Export(stats),
            warnings: Vec::new(),
        }))
    }

    async fn finish_export(
        &self,
        batch: &mut Batch,
        path: &Path,
        bytes: &[u8],
        records: usize,
    ) -> Result<ExportStats> {
        self.write_file(batch, path, bytes).await?;
        batch.advance(BatchState::Done);
        tracing::info!(records, bytes = bytes.len(), path = %path.display(), "Export written");

        Ok(ExportStats {
            records,
            bytes: bytes.len(),
            path: path.to_path_buf(),
        })
    }
}

fn count_lines(bytes: &[u8]) -> usize {
    bytes.split(|b| *b == b'\n').filter(|line| !line.is_empty()).count()
}
