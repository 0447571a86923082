// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Global default settings and effective value resolution.

use std::collections::BTreeMap;

use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::connection::StoreDb;
use crate::error::Result;
use crate::types::nullable;
use crate::validate::DefaultName;

impl StoreDb {
    /// Get a default setting by name. Unset values are returned as `""`.
    pub fn get_default(&self, name: &str) -> Result<String> {
        self.default_value(name.parse()?)
    }

    /// Set a default setting by name. An empty value unsets it.
    pub fn set_default(&self, name: &str, value: &str) -> Result<()> {
        self.set_default_value(name.parse()?, value)
    }

    pub fn default_value(&self, name: DefaultName) -> Result<String> {
        let value = self
            .conn
            .prepare_cached("SELECT value FROM defaults WHERE setting = ?1")?
            .query_row(params![name.as_str()], |row| row.get::<_, Option<String>>(0))
            .optional()?
            .flatten()
            .unwrap_or_default();
        Ok(value)
    }

    pub fn set_default_value(&self, name: DefaultName, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO defaults (setting, value) VALUES (?1, ?2)
            ON CONFLICT (setting) DO UPDATE SET value = excluded.value
            "#,
            params![name.as_str(), nullable(value)],
        )?;
        debug!("Set default {name} to {value:?}");
        Ok(())
    }

    /// All default settings, unset ones as `""`.
    pub fn defaults(&self) -> Result<BTreeMap<DefaultName, String>> {
        DefaultName::ALL
            .into_iter()
            .map(|name| Ok((name, self.default_value(name)?)))
            .collect()
    }

    /// The value to use for a property: the connection's own value if set,
    /// else the stored default (which may itself be empty).
    pub fn effective_value(&self, value: &str, name: &str) -> Result<String> {
        self.effective(value, name.parse()?)
    }

    pub fn effective(&self, value: &str, name: DefaultName) -> Result<String> {
        if !value.is_empty() {
            return Ok(value.to_owned());
        }
        self.default_value(name)
    }
}
