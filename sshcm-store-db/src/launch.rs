// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Resolve a stored connection into the command line that starts it.
//!
//! Each overridable property is resolved on its own: runtime override, then
//! the connection's value, then the stored default. Only the command has a
//! final fallback (normally `ssh`).

use crate::connection::StoreDb;
use crate::error::{Error, Result};
use crate::types::ConnectionRecord;
use crate::validate::DefaultName;

/// Runtime values that replace a connection's own properties.
///
/// `None` leaves the property alone; `Some("")` clears it so that the stored
/// default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub user: Option<String>,
    pub args: Option<String>,
    pub identity: Option<String>,
    pub command: Option<String>,
}

impl Overrides {
    /// Copy of `record` with the overrides applied.
    pub fn apply(&self, record: &ConnectionRecord) -> ConnectionRecord {
        let mut merged = record.clone();
        if let Some(user) = &self.user {
            merged.user.clone_from(user);
        }
        if let Some(args) = &self.args {
            merged.args.clone_from(args);
        }
        if let Some(identity) = &self.identity {
            merged.identity.clone_from(identity);
        }
        if let Some(command) = &self.command {
            merged.command.clone_from(command);
        }
        merged
    }
}

/// Program and argument vector for a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    /// Arguments, excluding the program name.
    pub args: Vec<String>,
}

impl LaunchPlan {
    /// The command line as a single shell-quoted string.
    pub fn to_shell_string(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|word| shlex::try_quote(word).map_or_else(|_| word.clone(), |q| q.into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl StoreDb {
    /// Build the command line for `record`.
    ///
    /// Arguments are ordered: extra args, `-i <identity>`, destination
    /// (`user@host` or `host`).
    pub fn launch_plan(
        &self,
        record: &ConnectionRecord,
        overrides: &Overrides,
        fallback_command: &str,
    ) -> Result<LaunchPlan> {
        let record = overrides.apply(record);
        record.validate_fields()?;

        let mut program = self.effective(&record.command, DefaultName::Command)?;
        if program.is_empty() {
            program = fallback_command.to_owned();
        }

        let mut args = Vec::new();

        let extra = self.effective(&record.args, DefaultName::Args)?;
        if !extra.trim().is_empty() {
            let words = shlex::split(&extra).ok_or_else(|| Error::InvalidArgs(extra.clone()))?;
            args.extend(words);
        }

        let identity = self.effective(&record.identity, DefaultName::Identity)?;
        if !identity.is_empty() {
            args.push("-i".to_owned());
            args.push(identity);
        }

        let user = self.effective(&record.user, DefaultName::User)?;
        if user.is_empty() {
            args.push(record.host.clone());
        } else {
            args.push(format!("{user}@{}", record.host));
        }

        Ok(LaunchPlan { program, args })
    }
}
