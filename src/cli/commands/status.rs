//! Status command implementation.

use colored::Colorize;
use serde::Serialize;

use crate::config::TubeportConfig;
use crate::error::Result;
use crate::resolver::BackendKind;
use crate::sanitize::RecordKind;
use crate::store::{DataStore, JsonlStore};

#[derive(Serialize)]
struct StatusOutput {
    data_dir: String,
    profiles: usize,
    subscriptions: usize,
    history: usize,
    profiles_file_exists: bool,
    history_file_exists: bool,
    backend_preference: BackendKind,
    backend_fallback: bool,
    invidious_instance: String,
}

/// Execute the status command.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read.
pub fn execute(config: &TubeportConfig, json: bool) -> Result<()> {
    let dir = config.resolve_data_dir()?;
    let store = JsonlStore::open(&dir)?;

    let output = StatusOutput {
        data_dir: dir.display().to_string(),
        profiles: store.profiles()?.len(),
        subscriptions: store.primary_profile()?.subscriptions.len(),
        history: store.history()?.len(),
        profiles_file_exists: store.file_path(RecordKind::Profile).exists(),
        history_file_exists: store.file_path(RecordKind::History).exists(),
        backend_preference: config.backend_preference,
        backend_fallback: config.backend_fallback,
        invidious_instance: config.invidious_instance.clone(),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Data directory".bold());
    println!("  {}", output.data_dir);
    if !output.profiles_file_exists {
        println!("  {}", "profiles.db not found".dimmed());
    }
    println!();
    println!("  Profiles:       {}", output.profiles);
    println!("  Subscriptions:  {}", output.subscriptions);
    println!("  History:        {}", output.history);
    println!();
    println!("{}", "Channel lookups".bold());
    let fallback = if output.backend_fallback {
        format!("then {}", output.backend_preference.other())
    } else {
        "no fallback".to_string()
    };
    println!("  Backend:   {} ({fallback})", output.backend_preference);
    println!("  Invidious: {}", output.invidious_instance);

    Ok(())
}
