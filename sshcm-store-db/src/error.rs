// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Error types for connection database operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for connection database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during connection database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Filesystem error while probing the database location
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid nickname")]
    InvalidNickname,

    #[error("nickname '{0}' does not begin with a letter")]
    NicknameMustStartWithLetter(String),

    #[error("invalid id '{0}'")]
    InvalidId(String),

    #[error("invalid connection property '{0}'")]
    InvalidProperty(String),

    #[error("invalid default setting '{0}'")]
    InvalidDefaultName(String),

    #[error("'{0}' is neither a valid id nor a valid nickname")]
    InvalidIdOrNickname(String),

    /// Connection has no host attached
    #[error("connection does not have a host attached")]
    MissingHost,

    /// Host would be read as an option by the launched command
    #[error("host '{0}' must not begin with '-'")]
    HostStartsWithDash(String),

    /// Connection has no id, so it was never persisted
    #[error("connection does not have an id attached")]
    MissingId,

    /// An already persisted connection was passed where a new one is expected
    #[error("connection already has id {0}")]
    IdAlreadyAssigned(i64),

    /// Argument string could not be split into words
    #[error("cannot split arguments '{0}': unbalanced quoting")]
    InvalidArgs(String),

    #[error("duplicate nickname '{0}'")]
    DuplicateNickname(String),

    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("connection id {0} does not exist")]
    IdNotExist(i64),

    /// A stored row does not satisfy the record invariants
    #[error("connection {id} in database is invalid: {reason}")]
    RecordInvalid { id: i64, reason: String },

    #[error("invalid schema version '{0}'")]
    SchemaVersionInvalid(String),

    #[error("schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: String, supported: String },

    #[error("schema version {found} needs an upgrade to {supported}")]
    SchemaUpgradeNeeded { found: String, supported: String },

    #[error("schema version {0} is too old and cannot be upgraded")]
    SchemaNoUpgradePath(String),
}

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input; safe to report and retry.
    Validation,
    /// Uniqueness violation.
    Conflict,
    /// Referenced record does not exist.
    NotFound,
    /// Stored data violates record invariants.
    Integrity,
    /// Schema version cannot be used by this build.
    Schema,
    /// Storage engine or filesystem failure.
    Resource,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidNickname
            | Error::NicknameMustStartWithLetter(_)
            | Error::InvalidId(_)
            | Error::InvalidProperty(_)
            | Error::InvalidDefaultName(_)
            | Error::InvalidIdOrNickname(_)
            | Error::MissingHost
            | Error::HostStartsWithDash(_)
            | Error::MissingId
            | Error::IdAlreadyAssigned(_)
            | Error::InvalidArgs(_) => ErrorKind::Validation,
            Error::DuplicateNickname(_) => ErrorKind::Conflict,
            Error::ConnectionNotFound(_) | Error::IdNotExist(_) => ErrorKind::NotFound,
            Error::RecordInvalid { .. } => ErrorKind::Integrity,
            Error::SchemaVersionInvalid(_)
            | Error::SchemaTooNew { .. }
            | Error::SchemaUpgradeNeeded { .. }
            | Error::SchemaNoUpgradePath(_) => ErrorKind::Schema,
            Error::Sqlite(_) | Error::DatabaseOpen { .. } | Error::Io { .. } => {
                ErrorKind::Resource
            }
        }
    }

    /// Whether the error was caused by user input and can be reported briefly.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Conflict | ErrorKind::NotFound
        )
    }
}

/// True if the SQLite error is a constraint violation (e.g. UNIQUE).
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
}
