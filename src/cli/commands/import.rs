//! Import command implementations.

use crate::cli::ImportCommands;
use crate::cli::console::PathPicker;
use crate::codec::SubscriptionFormat;
use crate::config::TubeportConfig;
use crate::error::Result;

use super::{block_on, orchestrator, print_outcome};

/// Execute import commands.
///
/// # Errors
///
/// Returns an error if the data directory cannot be opened or the batch
/// fails.
pub fn execute(command: &ImportCommands, config: &TubeportConfig, json: bool, quiet: bool) -> Result<()> {
    let outcome = match command {
        ImportCommands::Subscriptions { format, file } => {
            let format = SubscriptionFormat::from(*format);
            let mut orchestrator = orchestrator(config, PathPicker::input(file.clone()), quiet)?;
            block_on(orchestrator.import_subscriptions(format))?
        }
        ImportCommands::History { file } => {
            let mut orchestrator = orchestrator(config, PathPicker::input(file.clone()), quiet)?;
            block_on(orchestrator.import_history())?
        }
    };

    print_outcome(&outcome, json)
}
