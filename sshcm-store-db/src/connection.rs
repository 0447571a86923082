// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::{self, CURRENT, SchemaState, SchemaVersion};

/// SQLite database holding SSH connections and default settings.
///
/// Opened once per invocation and passed explicitly to every operation.
pub struct StoreDb {
    pub(crate) conn: Connection,
}

impl StoreDb {
    /// Open or create a database at `path`.
    ///
    /// A new (or table-less) file is initialized with the current schema. An
    /// existing database at an older schema version is upgraded in a
    /// transaction; newer or unrecognized versions are rejected without
    /// touching the file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let existed = path.try_exists().map_err(|e| Error::Io {
            path: path.to_owned(),
            source: e,
        })?;

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        let mut db = Self { conn };
        db.configure_pragmas()?;

        if !existed {
            info!("Creating connection database at {}", path.display());
        }
        db.ensure_schema()?;

        debug!("Opened database at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the current schema.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.configure_pragmas()?;
        db.bootstrap()?;
        debug!("Created in-memory database");
        Ok(db)
    }

    /// Close the database, reporting any error from the engine.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Sqlite(e))
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;
        Ok(())
    }

    /// Bring the schema to [`CURRENT`], creating or upgrading as needed.
    fn ensure_schema(&mut self) -> Result<()> {
        loop {
            match self.schema_state()? {
                SchemaState::Current => return Ok(()),
                SchemaState::Unversioned => self.bootstrap()?,
                SchemaState::UpgradeNeeded(from) => self.upgrade(&from)?,
                state => return state.check(),
            }
        }
    }

    /// Create all tables at the current version in one transaction.
    fn bootstrap(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        schema::initialize(&tx, &CURRENT)?;
        tx.commit()?;
        Ok(())
    }

    /// Apply the upgrade script for `from` in one transaction.
    fn upgrade(&mut self, from: &SchemaVersion) -> Result<()> {
        let upgrade =
            schema::upgrade_from(from).ok_or_else(|| Error::SchemaNoUpgradePath(from.to_string()))?;

        let tx = self.conn.transaction()?;
        tx.execute_batch(upgrade.sql)?;
        let reached = read_version_tag(&tx)?.and_then(|tag| tag.parse::<SchemaVersion>().ok());
        if reached.as_ref() != Some(&upgrade.to) {
            // Dropping the transaction rolls the script back.
            return Err(Error::SchemaNoUpgradePath(from.to_string()));
        }
        tx.commit()?;

        info!("Upgraded database schema from {from} to {}", upgrade.to);
        Ok(())
    }

    /// Evaluate the stored schema version against this build.
    pub fn schema_state(&self) -> Result<SchemaState> {
        if self.table_count()? == 0 {
            return Ok(SchemaState::Unversioned);
        }
        if !self.has_table("global")? {
            return Ok(SchemaState::evaluate(""));
        }
        let tag = read_version_tag(&self.conn)?.unwrap_or_default();
        Ok(SchemaState::evaluate(&tag))
    }

    /// The schema version recorded in the database.
    pub fn schema_version(&self) -> Result<SchemaVersion> {
        read_version_tag(&self.conn)?
            .unwrap_or_default()
            .parse()
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table_count(&self) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn read_version_tag(conn: &Connection) -> Result<Option<String>> {
    let tag = conn
        .query_row(
            "SELECT value FROM global WHERE setting = 'schema_version'",
            [],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?
        .flatten();
    Ok(tag)
}
