//! Batch state, reports and transfer errors.

use std::path::PathBuf;

use serde::Serialize;

use crate::codec::{FormatError, SubscriptionFormat};
use crate::error::RecordError;

/// Fatal batch errors.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The file could not be decoded.
    #[error("Invalid file: {0}")]
    Format(#[from] FormatError),

    /// The file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lifecycle of one import or export batch.
///
/// Import: `Idle → Reading → Decoding → Processing → Merging → Done`.
/// Export: `Idle → Reading → Encoding → Writing → Done`.
/// `Failed` is reachable from the steps that touch files or the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    #[default]
    Idle,
    Reading,
    Decoding,
    Processing,
    Merging,
    Encoding,
    Writing,
    Done,
    Failed,
}

impl BatchState {
    /// Whether `self → next` is a legal step.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Reading)
                | (Self::Reading, Self::Decoding | Self::Encoding | Self::Failed)
                | (Self::Decoding, Self::Processing | Self::Failed)
                | (Self::Processing, Self::Merging)
                | (Self::Merging, Self::Done | Self::Failed)
                | (Self::Encoding, Self::Writing | Self::Failed)
                | (Self::Writing, Self::Done | Self::Failed)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::Decoding => "decoding",
            Self::Processing => "processing",
            Self::Merging => "merging",
            Self::Encoding => "encoding",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the state of the batch in flight.
#[derive(Debug, Default)]
pub(crate) struct Batch {
    state: BatchState,
}

impl Batch {
    pub(crate) const fn state(&self) -> BatchState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: BatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal batch transition {} -> {next}",
            self.state
        );
        tracing::debug!(from = %self.state, to = %next, "Batch state");
        self.state = next;
    }

    pub(crate) fn fail(&mut self) {
        self.advance(BatchState::Failed);
    }
}

/// What a batch moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    SubscriptionImport,
    HistoryImport,
    SubscriptionExport,
    HistoryExport,
}

/// Statistics for an import batch.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Entries read from the file.
    pub processed: usize,
    /// Entries committed to the store.
    pub imported: usize,
    /// Entries dropped for a record error.
    pub skipped: usize,
    /// Subscriptions imported without resolved metadata.
    pub unresolved: usize,
    /// Unknown keys dropped by sanitization.
    pub rejected_keys: usize,
}

/// Statistics for an export batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    /// Records written.
    pub records: usize,
    /// Bytes written.
    pub bytes: usize,
    /// Destination file.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BatchStats {
    Import(ImportStats),
    Export(ExportStats),
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub kind: BatchKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SubscriptionFormat>,
    pub state: BatchState,
    pub stats: BatchStats,
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<RecordError>,
}

impl BatchReport {
    /// Import statistics, if this was an import.
    #[must_use]
    pub const fn import_stats(&self) -> Option<&ImportStats> {
        match &self.stats {
            BatchStats::Import(stats) => Some(stats),
            BatchStats::Export(_) => None,
        }
    }

    /// Export statistics, if this was an export.
    #[must_use]
    pub const fn export_stats(&self) -> Option<&ExportStats> {
        match &self.stats {
            BatchStats::Export(stats) => Some(stats),
            BatchStats::Import(_) => None,
        }
    }
}

fn serialize_warnings<S: serde::Serializer>(
    warnings: &[RecordError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(warnings.iter().map(ToString::to_string))
}

/// How a batch ended, short of a fatal error.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Completed(BatchReport),
    /// The file dialog was dismissed; nothing was read or written.
    Cancelled,
}

impl BatchOutcome {
    #[must_use]
    pub const fn report(&self) -> Option<&BatchReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Cancelled => None,
        }
    }
}
