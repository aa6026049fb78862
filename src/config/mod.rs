//! Configuration management.
//!
//! Settings are read from `~/.tubeport/config.json`. Every field is optional
//! in the file; missing fields take their defaults.
//!
//! Resolution priority, highest first:
//! 1. CLI flags ([`Overrides`])
//! 2. Environment variables
//! 3. Config file
//! 4. Defaults
//!
//! Environment variables:
//! - `TUBEPORT_BACKEND` - preferred backend (`invidious` or `local`)
//! - `TUBEPORT_BACKEND_FALLBACK` - `true`/`false`, try the other backend on failure
//! - `TUBEPORT_INVIDIOUS_INSTANCE` - Invidious base URL
//! - `TUBEPORT_DATA_DIR` - FreeTube user data directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolver::BackendKind;

/// Default Invidious instance.
pub const DEFAULT_INVIDIOUS_INSTANCE: &str = "https://invidious.snopyta.org";

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TubeportConfig {
    /// Backend tried first for channel resolution
    pub backend_preference: BackendKind,

    /// Whether a failed lookup is retried once on the other backend
    pub backend_fallback: bool,

    /// Invidious instance base URL
    pub invidious_instance: String,

    /// FreeTube user data directory holding `profiles.db` and `history.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Maximum channel lookups in flight at once
    pub resolve_concurrency: usize,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

impl Default for TubeportConfig {
    fn default() -> Self {
        Self {
            backend_preference: BackendKind::Local,
            backend_fallback: true,
            invidious_instance: DEFAULT_INVIDIOUS_INSTANCE.to_string(),
            data_dir: None,
            resolve_concurrency: 8,
            request_timeout_secs: 10,
        }
    }
}

impl TubeportConfig {
    /// The data directory to use: configured, or FreeTube's default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no directory is configured and the
    /// platform config directory cannot be determined.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

/// Command-line overrides; `None` keeps the lower-priority value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub no_fallback: bool,
    pub instance: Option<String>,
}

/// Get the config file path.
fn config_path() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().join(".tubeport").join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// FreeTube's own user data directory (e.g. `~/.config/FreeTube`).
///
/// # Errors
///
/// Returns [`Error::Config`] if the platform config directory is unknown.
pub fn default_data_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|b| b.config_dir().join("FreeTube"))
        .ok_or(Error::Config("Could not determine config directory".into()))
}

/// Load the configuration file, or defaults if it does not exist.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<TubeportConfig> {
    load_config_from(&config_path()?)
}

/// Load configuration from a specific file.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<TubeportConfig> {
    if !path.exists() {
        return Ok(TubeportConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Apply environment overrides using `lookup` (normally `std::env::var`).
///
/// Empty values are ignored.
///
/// # Errors
///
/// Returns [`Error::Config`] for an unparseable backend or boolean.
pub fn apply_env(config: &mut TubeportConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(backend) = var("TUBEPORT_BACKEND") {
        config.backend_preference = backend
            .parse()
            .map_err(|e: String| Error::Config(format!("TUBEPORT_BACKEND: {e}")))?;
    }

    if let Some(fallback) = var("TUBEPORT_BACKEND_FALLBACK") {
        config.backend_fallback = parse_bool(&fallback).ok_or_else(|| {
            Error::Config(format!(
                "TUBEPORT_BACKEND_FALLBACK: expected true or false, got {fallback}"
            ))
        })?;
    }

    if let Some(instance) = var("TUBEPORT_INVIDIOUS_INSTANCE") {
        config.invidious_instance = instance;
    }

    if let Some(dir) = var("TUBEPORT_DATA_DIR") {
        config.data_dir = Some(PathBuf::from(dir));
    }

    Ok(())
}

/// Apply command-line overrides.
pub fn apply_overrides(config: &mut TubeportConfig, overrides: &Overrides) {
    if let Some(dir) = &overrides.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(backend) = overrides.backend {
        config.backend_preference = backend;
    }
    if overrides.no_fallback {
        config.backend_fallback = false;
    }
    if let Some(instance) = &overrides.instance {
        config.invidious_instance.clone_from(instance);
    }
}

/// Load the file, then layer the environment and `overrides` on top.
///
/// # Errors
///
/// Returns [`Error::Config`] on an unreadable file or a bad environment value.
pub fn resolve_config(overrides: &Overrides) -> Result<TubeportConfig> {
    let mut config = load_config()?;
    apply_env(&mut config, |name| std::env::var(name).ok())?;
    apply_overrides(&mut config, overrides);

    if config.resolve_concurrency == 0 {
        config.resolve_concurrency = 1;
    }

    Ok(config)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, TubeportConfig::default());
        assert_eq!(config.backend_preference, BackendKind::Local);
        assert!(config.backend_fallback);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"backendPreference":"invidious","resolveConcurrency":2}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend_preference, BackendKind::Invidious);
        assert_eq!(config.resolve_concurrency, 2);
        assert_eq!(config.invidious_instance, DEFAULT_INVIDIOUS_INSTANCE);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = TubeportConfig::default();
        apply_env(
            &mut config,
            env(&[
                ("TUBEPORT_BACKEND", "Invidious"),
                ("TUBEPORT_BACKEND_FALLBACK", "false"),
                ("TUBEPORT_INVIDIOUS_INSTANCE", "https://yewtu.be"),
                ("TUBEPORT_DATA_DIR", "/tmp/ft"),
            ]),
        )
        .unwrap();

        assert_eq!(config.backend_preference, BackendKind::Invidious);
        assert!(!config.backend_fallback);
        assert_eq!(config.invidious_instance, "https://yewtu.be");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/ft")));
    }

    #[test]
    fn test_empty_env_is_ignored_and_bad_env_rejected() {
        let mut config = TubeportConfig::default();
        apply_env(&mut config, env(&[("TUBEPORT_BACKEND", "  ")])).unwrap();
        assert_eq!(config.backend_preference, BackendKind::Local);

        let err = apply_env(&mut config, env(&[("TUBEPORT_BACKEND", "piped")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = apply_env(&mut config, env(&[("TUBEPORT_BACKEND_FALLBACK", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = TubeportConfig {
            backend_preference: BackendKind::Invidious,
            ..TubeportConfig::default()
        };
        apply_overrides(
            &mut config,
            &Overrides {
                data_dir: Some(PathBuf::from("/data")),
                backend: Some(BackendKind::Local),
                no_fallback: true,
                instance: None,
            },
        );
        assert_eq!(config.backend_preference, BackendKind::Local);
        assert!(!config.backend_fallback);
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/data"));
        assert_eq!(config.invidious_instance, DEFAULT_INVIDIOUS_INSTANCE);
    }
}
