// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Read query operations for the connection database.

use rusqlite::{OptionalExtension, Row, params};
use tracing::warn;

use crate::connection::StoreDb;
use crate::error::{Error, Result};
use crate::types::ConnectionRecord;
use crate::validate::{Property, parse_id, validate_nickname};

const SELECT_CONNECTION: &str = r#"
    SELECT id, nickname, host, user, description, args, identity, command
    FROM connections
"#;

/// A connections row before validation; NOT NULL columns are still optional
/// so that a corrupted file is reported instead of failing inside rusqlite.
struct RawConnection {
    id: Option<i64>,
    nickname: Option<String>,
    host: Option<String>,
    user: Option<String>,
    description: Option<String>,
    args: Option<String>,
    identity: Option<String>,
    command: Option<String>,
}

impl RawConnection {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            nickname: row.get(1)?,
            host: row.get(2)?,
            user: row.get(3)?,
            description: row.get(4)?,
            args: row.get(5)?,
            identity: row.get(6)?,
            command: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<ConnectionRecord> {
        let id = self.id.unwrap_or_default();
        let record = ConnectionRecord {
            id,
            nickname: self.nickname.unwrap_or_default(),
            host: self.host.unwrap_or_default(),
            user: self.user.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            args: self.args.unwrap_or_default(),
            identity: self.identity.unwrap_or_default(),
            command: self.command.unwrap_or_default(),
        };
        record.validate().map_err(|e| {
            warn!("Stored connection {id} failed validation: {e}");
            Error::RecordInvalid {
                id,
                reason: e.to_string(),
            }
        })?;
        Ok(record)
    }
}

impl StoreDb {
    /// Get a connection by id.
    pub fn get(&self, id: i64) -> Result<ConnectionRecord> {
        if id < 1 {
            return Err(Error::InvalidId(id.to_string()));
        }
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_CONNECTION} WHERE id = ?1"))?;
        let raw = stmt
            .query_row(params![id], RawConnection::from_row)
            .optional()?
            .ok_or_else(|| Error::ConnectionNotFound(format!("id {id}")))?;
        raw.into_record()
    }

    /// Get the first connection (lowest id) whose `property` equals `value`.
    ///
    /// `property` must be one of the connection property names. An empty
    /// `value` matches unset properties.
    pub fn get_by_property(&self, property: &str, value: &str) -> Result<ConnectionRecord> {
        self.find_by(property.parse()?, value)
    }

    /// Resolve a command-line argument that is either an id or a nickname.
    pub fn get_by_id_or_nickname(&self, arg: &str) -> Result<ConnectionRecord> {
        if let Ok(id) = parse_id(arg) {
            self.get(id)
        } else if validate_nickname(arg).is_ok() {
            self.find_by(Property::Nickname, arg)
        } else {
            Err(Error::InvalidIdOrNickname(arg.to_owned()))
        }
    }

    pub(crate) fn find_by(&self, property: Property, value: &str) -> Result<ConnectionRecord> {
        let sql = format!(
            "{SELECT_CONNECTION} WHERE coalesce({}, '') = ?1 ORDER BY id LIMIT 1",
            property.column()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let raw = stmt
            .query_row(params![value], RawConnection::from_row)
            .optional()?
            .ok_or_else(|| Error::ConnectionNotFound(format!("{property} '{value}'")))?;
        raw.into_record()
    }

    /// Check whether a connection with this id exists.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT 1 FROM connections WHERE id = ?1 LIMIT 1")?;
        Ok(stmt.exists(params![id])?)
    }

    /// Check whether any connection has `property` equal to `value`.
    pub fn exists_by_property(&self, property: &str, value: &str) -> Result<bool> {
        let property: Property = property.parse()?;
        let sql = format!(
            "SELECT 1 FROM connections WHERE coalesce({}, '') = ?1 LIMIT 1",
            property.column()
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.exists(params![value])?)
    }

    /// Get all connections in id order.
    pub fn get_all(&self) -> Result<Vec<ConnectionRecord>> {
        let ids = {
            let mut stmt = self
                .conn
                .prepare_cached("SELECT id FROM connections ORDER BY id")?;
            stmt.query_map([], |row| row.get::<_, i64>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        ids.into_iter().map(|id| self.get(id)).collect()
    }

    /// Case-insensitive substring search over nickname, host, user and
    /// description. Results are in id order.
    pub fn search(&self, term: &str) -> Result<Vec<ConnectionRecord>> {
        let needle = term.to_lowercase();
        let fields = [
            Property::Nickname,
            Property::Host,
            Property::User,
            Property::Description,
        ];
        let mut matches = self.get_all()?;
        matches.retain(|c| {
            fields
                .iter()
                .any(|&p| c.get(p).to_lowercase().contains(&needle))
        });
        Ok(matches)
    }

    /// Count the number of stored connections.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM connections", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
