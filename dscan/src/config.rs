use libdns_sweep::{CommandPaths, ProbeConfig, ScanProfile};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

pub const CONFIG_ENV: &str = "DSCAN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {error}", .path.display())]
    Read { path: PathBuf, error: std::io::Error },
    #[error("Invalid config {}: {error}", .path.display())]
    Parse { path: PathBuf, error: toml::de::Error },
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub commands: CommandPaths,
}

#[derive(Debug, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub profile: ScanProfile,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            profile: ScanProfile::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            timeout: Duration::from_secs(self.scan.timeout_secs.max(1)),
            profile: self.scan.profile,
            commands: self.commands.clone(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|p| p.join("dscan").join("config.toml")))
}

/// Loads the config file, falling back to defaults when none exists.
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(error) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                error,
            })
        }
    };

    toml::from_str(&content).map_err(|error| ConfigError::Parse {
        path: path.to_path_buf(),
        error,
    })
}
