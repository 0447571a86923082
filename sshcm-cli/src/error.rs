// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub(crate) enum CliError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] sshcm_store_db::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV column '{column}' {reason}")]
    CsvColumn {
        column: String,
        reason: &'static str,
    },

    #[error("'{program}' was not found in PATH")]
    ProgramNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("Failed to start '{program}': {source}")]
    Exec {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no properties to change were given")]
    NothingToChange,
}

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

impl CliError {
    /// Errors caused by user input; reported without a cause chain.
    pub(crate) fn is_user_error(&self) -> bool {
        match self {
            CliError::Store(e) => e.is_user_error(),
            CliError::Config(_)
            | CliError::CsvColumn { .. }
            | CliError::ProgramNotFound { .. }
            | CliError::NothingToChange => true,
            CliError::Io { .. } | CliError::Json(_) | CliError::Csv(_) | CliError::Exec { .. } => {
                false
            }
        }
    }
}

/// Helper trait for adding context to IO errors
pub(crate) trait IoContext<T> {
    fn io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| CliError::Io {
            context: f(),
            source,
        })
    }
}
