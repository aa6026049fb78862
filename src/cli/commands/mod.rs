//! Command implementations.

pub mod completions;
pub mod export;
pub mod import;
pub mod status;
pub mod version;

use std::sync::Arc;

use colored::Colorize;

use crate::cli::console::{ConsoleNotifier, ConsoleProgress, PathPicker};
use crate::config::TubeportConfig;
use crate::error::{Error, Result};
use crate::resolver::create_resolver;
use crate::store::JsonlStore;
use crate::transfer::{BatchOutcome, BatchReport, BatchStats, LocalFiles, Orchestrator, TransferOptions};

type CliOrchestrator = Orchestrator<JsonlStore, PathPicker, LocalFiles>;

/// Open the data directory and wire the console collaborators.
fn orchestrator(config: &TubeportConfig, picker: PathPicker, quiet: bool) -> Result<CliOrchestrator> {
    let store = JsonlStore::open(config.resolve_data_dir()?)?;
    let resolver = create_resolver(config)?;

    Ok(Orchestrator::new(store, picker, LocalFiles, resolver)
        .with_notifier(Arc::new(ConsoleNotifier::new(quiet)))
        .with_progress(Arc::new(ConsoleProgress::new(quiet)))
        .with_options(TransferOptions::from(config)))
}

/// Run a batch to completion on a fresh runtime.
fn block_on<T>(future: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    rt.block_on(future)
}

/// Print a batch outcome.
fn print_outcome(outcome: &BatchOutcome, json: bool) -> Result<()> {
    let report = match outcome {
        BatchOutcome::Cancelled => {
            if json {
                println!("{}", serde_json::json!({ "success": false, "cancelled": true }));
            } else {
                println!("Cancelled.");
            }
            return Ok(());
        }
        BatchOutcome::Completed(report) => report,
    };

    if json {
        let output = serde_json::json!({
            "success": true,
            "report": report,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    print_report(report);
    Ok(())
}

fn print_report(report: &BatchReport) {
    match &report.stats {
        BatchStats::Import(stats) => {
            println!("{} Import complete", "✓".green());
            println!();
            println!("  Processed:     {}", stats.processed);
            println!("  Imported:      {}", stats.imported);
            if stats.skipped > 0 {
                println!("  Skipped:       {}", stats.skipped.to_string().yellow());
            }
            if stats.unresolved > 0 {
                println!("  Unresolved:    {}", stats.unresolved.to_string().yellow());
            }
            if stats.rejected_keys > 0 {
                println!("  Dropped keys:  {}", stats.rejected_keys);
            }
        }
        BatchStats::Export(stats) => {
            println!("{} Export complete", "✓".green());
            println!();
            println!("  Records:  {}", stats.records);
            println!("  Size:     {} bytes", stats.bytes);
            println!("  Location: {}", stats.path.display());
        }
    }
}
