/// `load_config` module: builds a [`HarvestConfig`] from defaults, an optional
/// YAML file, CLI overrides and the environment.
///
/// The YAML file never carries the access token; it comes from `--token` or
/// `DROPBOX_ACCESS_TOKEN` so config files can be committed safely. A missing
/// token is not a config error: the run reaches the identity check and stops
/// there like any other rejected credential.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::HarvestConfig;

pub const ACCESS_TOKEN_ENV: &str = "DROPBOX_ACCESS_TOKEN";

/// Static (secret-free) part of the configuration as written in YAML.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub keywords_csv: Option<PathBuf>,
    pub search_path: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub search_delay_ms: Option<u64>,
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub keywords_csv: Option<PathBuf>,
    pub search_path: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub search_delay_ms: Option<u64>,
    pub access_token: Option<String>,
}

pub fn read_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    // An empty file is a valid "all defaults" config.
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })
}

/// Resolves the run configuration. Precedence, lowest first: defaults,
/// config file, overrides. The token comes from the overrides or, failing
/// that, the environment; when neither has one it is left empty.
pub fn load_config(config_path: Option<&Path>, overrides: Overrides) -> Result<HarvestConfig> {
    let file = match config_path {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };

    let access_token = overrides
        .access_token
        .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    if access_token.is_empty() {
        warn!("{ACCESS_TOKEN_ENV} not set; authentication will fail");
    }

    let mut config = HarvestConfig::new(access_token);
    if let Some(csv) = overrides.keywords_csv.or(file.keywords_csv) {
        config.keywords_csv = csv;
    }
    if let Some(scope) = overrides.search_path.or(file.search_path) {
        config.search_path = scope;
    }
    if let Some(dir) = overrides.download_dir.or(file.download_dir) {
        config.download_dir = dir;
    }
    if let Some(ms) = overrides.search_delay_ms.or(file.search_delay_ms) {
        config.search_delay = Duration::from_millis(ms);
    }

    config.trace_loaded();
    Ok(config)
}
