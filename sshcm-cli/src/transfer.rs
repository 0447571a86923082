// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! CSV and JSON export and import of connections.
//!
//! A CSV export starts with the header
//! `id,nickname,user,host,description,args,identity,command`; a JSON export
//! is an array of connection objects. Import reads the whole input first,
//! then upserts each entry by nickname in order. A failing entry stops the
//! import and leaves earlier entries in place.

use std::io::{Read, Write};
use std::iter;

use clap::ValueEnum;
use sshcm_store_db::{ConnectionRecord, Property, StoreDb};
use tracing::debug;

use crate::error::{CliError, IoContext, Result};

/// Transfer file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    #[default]
    Csv,
    Json,
}

const ID_COLUMN: &str = "id";

/// Property columns of a CSV export, following the id column.
const CSV_COLUMNS: [Property; 7] = [
    Property::Nickname,
    Property::User,
    Property::Host,
    Property::Description,
    Property::Args,
    Property::Identity,
    Property::Command,
];

/// Columns an import cannot do without.
const REQUIRED_COLUMNS: [Property; 2] = [Property::Nickname, Property::Host];

/// Write every connection in `format`. Returns the number written.
pub(crate) fn export(db: &StoreDb, format: Format, out: &mut impl Write) -> Result<usize> {
    let records = db.get_all()?;
    match format {
        Format::Csv => write_csv(&records, out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out).io_context(|| "Failed to write export".to_string())?;
        }
    }
    Ok(records.len())
}

fn write_csv(records: &[ConnectionRecord], out: &mut impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(iter::once(ID_COLUMN).chain(CSV_COLUMNS.iter().map(|p| p.column())))?;
    for record in records {
        let id = record.id.to_string();
        writer.write_record(
            iter::once(id.as_str()).chain(CSV_COLUMNS.iter().map(|&p| record.get(p))),
        )?;
    }
    writer
        .flush()
        .io_context(|| "Failed to write export".to_string())
}

/// Map each header cell to the property it fills; `None` for the id column,
/// which is ignored on import.
fn csv_columns(header: &csv::StringRecord) -> Result<Vec<Option<Property>>> {
    let mut columns = Vec::with_capacity(header.len());
    for (index, name) in header.iter().enumerate() {
        if header.iter().take(index).any(|earlier| earlier == name) {
            return Err(CliError::CsvColumn {
                column: name.to_owned(),
                reason: "appears more than once",
            });
        }
        if name == ID_COLUMN {
            columns.push(None);
            continue;
        }
        let property = name.parse::<Property>().map_err(|_| CliError::CsvColumn {
            column: name.to_owned(),
            reason: "is not a connection property",
        })?;
        columns.push(Some(property));
    }
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|p| !columns.contains(&Some(*p)))
    {
        return Err(CliError::CsvColumn {
            column: missing.column().to_owned(),
            reason: "is missing",
        });
    }
    Ok(columns)
}

fn read_csv(input: impl Read) -> Result<Vec<ConnectionRecord>> {
    let mut reader = csv::Reader::from_reader(input);
    let columns = csv_columns(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = ConnectionRecord::default();
        for (column, value) in columns.iter().zip(row.iter()) {
            if let Some(property) = column {
                record.set(*property, value);
            }
        }
        records.push(record);
    }
    Ok(records)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ImportSummary {
    pub(crate) added: usize,
    pub(crate) updated: usize,
}

/// Read connections in `format` and upsert each one by nickname,
/// reporting progress to `out`.
pub(crate) fn import(
    db: &StoreDb,
    input: impl Read,
    format: Format,
    out: &mut impl Write,
) -> Result<ImportSummary> {
    let incoming: Vec<ConnectionRecord> = match format {
        Format::Csv => read_csv(input)?,
        Format::Json => serde_json::from_reader(input)?,
    };
    debug!(count = incoming.len(), ?format, "importing connections");

    let mut summary = ImportSummary::default();
    for entry in incoming {
        if db.exists_by_property(Property::Nickname.column(), &entry.nickname)? {
            let existing = db.get_by_property(Property::Nickname.column(), &entry.nickname)?;
            writeln!(out, "Updating existing connection '{existing}'...")
                .io_context(|| "Failed to write import progress".to_string())?;
            db.update(&ConnectionRecord {
                id: existing.id,
                ..entry
            })?;
            summary.updated += 1;
        } else {
            let nickname = entry.nickname.clone();
            writeln!(out, "Importing new connection '{nickname}'...")
                .io_context(|| "Failed to write import progress".to_string())?;
            let id = db.add(&ConnectionRecord { id: 0, ..entry })?;
            writeln!(out, "Added new connection '{nickname}' ({id}).")
                .io_context(|| "Failed to write import progress".to_string())?;
            summary.added += 1;
        }
    }
    Ok(summary)
}
