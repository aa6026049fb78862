//! Export command implementations.

use std::env;
use std::path::PathBuf;

use crate::cli::ExportCommands;
use crate::cli::console::PathPicker;
use crate::codec::SubscriptionFormat;
use crate::config::TubeportConfig;
use crate::error::{Error, Result};

use super::{block_on, orchestrator, print_outcome};

/// Execute export commands.
///
/// # Errors
///
/// Returns an error if the data directory cannot be opened or the batch
/// fails.
pub fn execute(command: &ExportCommands, config: &TubeportConfig, json: bool, quiet: bool) -> Result<()> {
    let outcome = match command {
        ExportCommands::Subscriptions { format, output } => {
            let picker = PathPicker::output(output.clone(), current_dir()?);
            let mut orchestrator = orchestrator(config, picker, quiet)?;
            block_on(orchestrator.export_subscriptions(SubscriptionFormat::from(*format)))?
        }
        ExportCommands::History { output } => {
            let picker = PathPicker::output(output.clone(), current_dir()?);
            let mut orchestrator = orchestrator(config, picker, quiet)?;
            block_on(orchestrator.export_history())?
        }
    };

    print_outcome(&outcome, json)
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir().map_err(|e| Error::Other(format!("Failed to get current directory: {e}")))
}
