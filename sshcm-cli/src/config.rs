// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, IoContext, Result};

/// File name of the connection database.
pub(crate) const DB_FILE_NAME: &str = "ssh-cm.connections";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Path to the connection database
    pub(crate) db_path: Option<PathBuf>,

    /// Log filter used when neither `SSHCM_LOG` nor `--verbose` is given
    pub(crate) log_level: String,

    /// Program started when neither the connection nor the defaults name one
    pub(crate) default_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: "warn".to_string(),
            default_command: "ssh".to_string(),
        }
    }
}

impl Config {
    pub(crate) fn from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    pub(crate) fn from_toml(contents: &str) -> std::result::Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.default_command.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "default_command must not be empty".to_string(),
            });
        }
        if let Err(e) = EnvFilter::try_new(&self.log_level) {
            return Err(ConfigError::Invalid {
                reason: format!("log_level '{}': {e}", self.log_level),
            });
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sshcm").join("config.toml"))
}

/// Load the configuration named by `SSHCM_CONFIG`, else the per-user file,
/// else the built-in defaults.
pub(crate) fn load() -> Result<Config> {
    let config = match std::env::var_os("SSHCM_CONFIG") {
        Some(path) => Config::from_file(Path::new(&path))?,
        None => match default_config_path() {
            Some(path) if path.exists() => Config::from_file(&path)?,
            _ => Config::default(),
        },
    };
    Ok(config)
}

/// First configured location of the database, if any.
fn pick_db_path(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    configured: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    flag.or(env)
        .or(configured)
        .or_else(|| home.map(|home| home.join(".config").join(DB_FILE_NAME)))
}

/// Resolve the database path: `--db`, `SSHCM_DB`, the config file, the
/// user's `~/.config`, and finally the directory of the running executable.
pub(crate) fn resolve_db_path(flag: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    let env = std::env::var_os("SSHCM_DB")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    if let Some(path) = pick_db_path(flag, env, config.db_path.clone(), dirs::home_dir()) {
        return Ok(path);
    }

    let exe = std::env::current_exe()
        .io_context(|| "Failed to locate the running executable".to_string())?;
    Ok(exe
        .parent()
        .map_or_else(|| PathBuf::from(DB_FILE_NAME), |dir| dir.join(DB_FILE_NAME)))
}
