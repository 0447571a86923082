// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Command implementations against an open store.

use std::io::{self, Write};

use sshcm_store_db::{ConnectionRecord, LaunchPlan, StoreDb};
use tracing::debug;

use crate::cli::{AddArgs, ConnectArgs, DefArgs, ListArgs, SearchArgs, SetArgs};
use crate::error::{CliError, IoContext, Result};
use crate::format;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn emit(result: io::Result<()>) -> Result<()> {
    result.io_context(|| "Failed to write output".to_string())
}

/// Resolve the command line for `connect`.
pub(crate) fn connect_plan(
    db: &StoreDb,
    args: &ConnectArgs,
    fallback_command: &str,
) -> Result<LaunchPlan> {
    let record = db.get_by_id_or_nickname(&args.target.id_or_nickname)?;
    debug!(connection = %record, "connecting");
    Ok(db.launch_plan(&record, &args.overrides(), fallback_command)?)
}

pub(crate) fn add(db: &StoreDb, args: &AddArgs, out: &mut impl Write) -> Result<i64> {
    let mut record = ConnectionRecord::new(args.nickname.as_str(), args.host.as_str());
    for (property, value) in args.properties.changes() {
        record.set(property, value);
    }
    let id = db.add(&record)?;
    emit(writeln!(out, "Added new connection with id {id}."))?;
    Ok(id)
}

pub(crate) fn get(db: &StoreDb, target: &str, out: &mut impl Write) -> Result<()> {
    let record = db.get_by_id_or_nickname(target)?;
    emit(format::write_record(out, &record))?;
    emit(writeln!(out))
}

pub(crate) fn set(db: &StoreDb, args: &SetArgs, out: &mut impl Write) -> Result<()> {
    let changes = args.changes();
    if changes.is_empty() {
        return Err(CliError::NothingToChange);
    }

    let mut record = db.get_by_id_or_nickname(&args.target.id_or_nickname)?;
    debug!(connection = %record, ?changes, "updating");
    for (property, value) in changes {
        record.set(property, value);
    }
    db.update(&record)?;

    emit(writeln!(out, "New connection settings:"))?;
    emit(format::write_record(out, &record))?;
    emit(writeln!(out))
}

pub(crate) fn remove(db: &StoreDb, target: &str, out: &mut impl Write) -> Result<()> {
    let record = db.get_by_id_or_nickname(target)?;
    db.delete(&record)?;
    emit(writeln!(out, "Removed connection {record}."))
}

pub(crate) fn list(db: &StoreDb, args: &ListArgs, out: &mut impl Write) -> Result<()> {
    let records = db.get_all()?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &records)?;
        return emit(writeln!(out));
    }
    emit(format::write_list(out, &records, args.all))
}

pub(crate) fn search(db: &StoreDb, args: &SearchArgs, out: &mut impl Write) -> Result<()> {
    let records = db.search(&args.term)?;
    debug!(term = %args.term, matches = records.len(), "search");
    emit(format::write_list(out, &records, args.all))
}

pub(crate) fn defaults(db: &StoreDb, out: &mut impl Write) -> Result<()> {
    emit(format::write_defaults(out, &db.defaults()?))
}

pub(crate) fn def(db: &StoreDb, args: &DefArgs, out: &mut impl Write) -> Result<()> {
    let value = args.value.as_deref().unwrap_or_default();
    db.set_default_value(args.name, value)?;
    emit(writeln!(
        out,
        "Updated '{}' default setting to '{value}'.",
        args.name
    ))?;
    defaults(db, out)
}

pub(crate) fn version(out: &mut impl Write) -> Result<()> {
    emit(writeln!(out, "SSH Connection Manager {VERSION}"))
}
