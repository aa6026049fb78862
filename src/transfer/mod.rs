//! Bulk import and export.
//!
//! The [`Orchestrator`] runs one batch at a time:
//!
//! - **Import**: pick file → read → decode → sanitize / resolve → commit once
//! - **Export**: pick destination → read store → encode → write
//!
//! Everything outside the engine is a collaborator: the file picker, file
//! access, notifications and the progress indicator ([`collab`]).
//!
//! # Example
//!
//! ```ignore
//! use tubeport::transfer::{Orchestrator, LocalFiles};
//!
//! let mut orchestrator = Orchestrator::new(store, picker, LocalFiles, resolver)
//!     .with_notifier(notifier)
//!     .with_progress(progress);
//! let outcome = orchestrator.import_subscriptions(SubscriptionFormat::YouTube).await?;
//! ```

pub mod collab;
mod export;
mod import;
pub mod naming;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use collab::{
    FileIo, FilePicker, LocalFiles, Notification, NotificationAction, Notifier, Progress, Silent,
};
pub use types::{
    BatchKind, BatchOutcome, BatchReport, BatchState, BatchStats, ExportStats, ImportStats,
    TransferError,
};

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::TubeportConfig;
use crate::error::{RecordError, Result};
use crate::resolver::Resolver;
use crate::store::DataStore;

use types::Batch;

/// Tunables for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Maximum channel lookups in flight at once.
    pub resolve_concurrency: usize,
    /// Date used in default export names; `None` means today.
    pub date: Option<NaiveDate>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            resolve_concurrency: 8,
            date: None,
        }
    }
}

impl From<&TubeportConfig> for TransferOptions {
    fn from(config: &TubeportConfig) -> Self {
        Self {
            resolve_concurrency: config.resolve_concurrency.max(1),
            date: None,
        }
    }
}

/// Drives import and export batches against a store.
pub struct Orchestrator<S, P, F> {
    store: S,
    picker: P,
    files: F,
    resolver: Resolver,
    notifier: Arc<dyn Notifier>,
    progress: Arc<dyn Progress>,
    options: TransferOptions,
}

impl<S: DataStore, P: FilePicker, F: FileIo> Orchestrator<S, P, F> {
    /// Create an orchestrator that reports nothing.
    pub fn new(store: S, picker: P, files: F, resolver: Resolver) -> Self {
        Self {
            store,
            picker,
            files,
            resolver,
            notifier: Arc::new(Silent),
            progress: Arc::new(Silent),
            options: TransferOptions::default(),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: TransferOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn notify(&self, message: impl Into<String>) {
        self.notifier.notify(Notification::message(message));
    }

    /// Report a skipped record or dropped key.
    fn warn_record(&self, error: RecordError, warnings: &mut Vec<RecordError>) {
        tracing::warn!(error = %error, "Record problem");
        self.notify(error.to_string());
        warnings.push(error);
    }

    fn export_date(&self) -> NaiveDate {
        self.options.date.unwrap_or_else(naming::today)
    }

    /// Read a whole file; on failure notify and fail the batch.
    async fn read_file(&self, batch: &mut Batch, path: &Path) -> Result<Vec<u8>> {
        match self.files.read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(source) => {
                self.notify(format!("Unable to read file: {source}"));
                batch.fail();
                Err(TransferError::Io {
                    path: path.to_path_buf(),
                    source,
                }
                .into())
            }
        }
    }

    /// Write a whole file; on failure notify and fail the batch.
    async fn write_file(&self, batch: &mut Batch, path: &Path, bytes: &[u8]) -> Result<()> {
        batch.advance(BatchState::Writing);
        match self.files.write(path, bytes).await {
            Ok(()) => Ok(()),
            Err(source) => {
                self.notify(format!("Unable to write file: {source}"));
                batch.fail();
                Err(TransferError::Io {
                    path: path.to_path_buf(),
                    source,
                }
                .into())
            }
        }
    }
}

/// Share of `done` in `total`, as a whole percentage.
fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from(done.saturating_mul(100) / total).unwrap_or(100)
}
