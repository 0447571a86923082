// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Write operations for the connection database.
//!
//! Every write validates the record first, so invalid data never reaches the
//! table.

use rusqlite::params;
use tracing::debug;

use crate::connection::StoreDb;
use crate::error::{Error, Result, is_constraint_violation};
use crate::types::{ConnectionRecord, nullable};
use crate::validate::Property;

impl StoreDb {
    /// Add a new connection.
    ///
    /// The record must not have an id yet. Returns the id assigned by the
    /// database.
    pub fn add(&self, record: &ConnectionRecord) -> Result<i64> {
        if record.id != 0 {
            return Err(Error::IdAlreadyAssigned(record.id));
        }
        record.validate_fields()?;

        if self.exists_by_property(Property::Nickname.column(), &record.nickname)? {
            return Err(Error::DuplicateNickname(record.nickname.clone()));
        }

        self.conn
            .execute(
                r#"
                INSERT INTO connections (nickname, host, user, description, args, identity, command)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.nickname,
                    record.host,
                    nullable(&record.user),
                    nullable(&record.description),
                    nullable(&record.args),
                    nullable(&record.identity),
                    nullable(&record.command),
                ],
            )
            .map_err(|e| duplicate_or(e, &record.nickname))?;

        let id = self.conn.last_insert_rowid();
        debug!("Added connection {} ({id})", record.nickname);
        Ok(id)
    }

    /// Overwrite all properties of an existing connection.
    ///
    /// Renaming to a nickname held by another connection fails; keeping the
    /// current nickname is fine.
    pub fn update(&self, record: &ConnectionRecord) -> Result<()> {
        record.validate()?;

        if !self.exists(record.id)? {
            return Err(Error::IdNotExist(record.id));
        }

        let taken = self
            .conn
            .prepare_cached("SELECT 1 FROM connections WHERE nickname = ?1 AND id != ?2 LIMIT 1")?
            .exists(params![record.nickname, record.id])?;
        if taken {
            return Err(Error::DuplicateNickname(record.nickname.clone()));
        }

        let rows = self
            .conn
            .execute(
                r#"
                UPDATE connections SET
                    nickname = ?2,
                    host = ?3,
                    user = ?4,
                    description = ?5,
                    args = ?6,
                    identity = ?7,
                    command = ?8
                WHERE id = ?1
                "#,
                params![
                    record.id,
                    record.nickname,
                    record.host,
                    nullable(&record.user),
                    nullable(&record.description),
                    nullable(&record.args),
                    nullable(&record.identity),
                    nullable(&record.command),
                ],
            )
            .map_err(|e| duplicate_or(e, &record.nickname))?;
        if rows == 0 {
            return Err(Error::IdNotExist(record.id));
        }

        debug!("Updated connection {record}");
        Ok(())
    }

    /// Delete a connection by its id.
    pub fn delete(&self, record: &ConnectionRecord) -> Result<()> {
        match record.id {
            0 => return Err(Error::MissingId),
            id if id < 0 => return Err(Error::InvalidId(id.to_string())),
            _ => {}
        }

        let rows = self
            .conn
            .execute("DELETE FROM connections WHERE id = ?1", params![record.id])?;
        if rows == 0 {
            return Err(Error::IdNotExist(record.id));
        }

        debug!("Deleted connection {record}");
        Ok(())
    }
}

fn duplicate_or(err: rusqlite::Error, nickname: &str) -> Error {
    if is_constraint_violation(&err) {
        Error::DuplicateNickname(nickname.to_owned())
    } else {
        err.into()
    }
}
