// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Database row types for stored SSH connections.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate::{Property, validate_nickname};

/// A named SSH connection profile.
///
/// This represents a row from the connections table. An `id` of 0 marks a
/// record that has not been persisted yet. Optional properties use the empty
/// string for "unset"; the store writes them as NULL and reads NULL back as
/// an empty string, so the two are never distinguished.
///
/// Serialized field names are lowercase. Capitalised names (`Nickname`,
/// `Host`, ...) are accepted on input so older exports still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionRecord {
    /// Database row ID (0 if not persisted)
    #[serde(alias = "Id")]
    pub id: i64,
    /// Unique, letter-initial name
    #[serde(alias = "Nickname")]
    pub nickname: String,
    /// Host name or address
    #[serde(alias = "Host")]
    pub host: String,
    /// Login user
    #[serde(alias = "User")]
    pub user: String,
    #[serde(alias = "Description")]
    pub description: String,
    /// Extra arguments passed to the command
    #[serde(alias = "Args")]
    pub args: String,
    /// OpenSSH-style identity (path or name)
    #[serde(alias = "Identity")]
    pub identity: String,
    /// Command to run instead of `ssh` (e.g. `mosh`)
    #[serde(alias = "Command")]
    pub command: String,
}

impl ConnectionRecord {
    pub fn new(nickname: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    /// Whether the record has been written to a store.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    pub fn get(&self, property: Property) -> &str {
        match property {
            Property::Nickname => &self.nickname,
            Property::Host => &self.host,
            Property::User => &self.user,
            Property::Description => &self.description,
            Property::Args => &self.args,
            Property::Identity => &self.identity,
            Property::Command => &self.command,
        }
    }

    pub fn set(&mut self, property: Property, value: impl Into<String>) {
        let value = value.into();
        match property {
            Property::Nickname => self.nickname = value,
            Property::Host => self.host = value,
            Property::User => self.user = value,
            Property::Description => self.description = value,
            Property::Args => self.args = value,
            Property::Identity => self.identity = value,
            Property::Command => self.command = value,
        }
    }

    /// Check nickname and host, ignoring the id.
    pub fn validate_fields(&self) -> Result<()> {
        validate_nickname(&self.nickname)?;
        if self.host.is_empty() {
            return Err(Error::MissingHost);
        }
        if self.host.starts_with('-') {
            return Err(Error::HostStartsWithDash(self.host.clone()));
        }
        Ok(())
    }

    /// Full validity check for a persisted record.
    ///
    /// Whether the id exists in a store is checked by the store itself.
    pub fn validate(&self) -> Result<()> {
        self.validate_fields()?;
        match self.id {
            0 => Err(Error::MissingId),
            id if id < 0 => Err(Error::InvalidId(id.to_string())),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ConnectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.nickname, self.id)
    }
}

/// Map an empty string to SQL NULL.
pub(crate) fn nullable(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
