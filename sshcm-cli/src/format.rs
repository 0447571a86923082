// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Plain-text views of connections and defaults.

use std::collections::BTreeMap;
use std::io::{self, Write};

use sshcm_store_db::{ConnectionRecord, DefaultName, Property};

const ID_WIDTH: usize = 4;
const LABEL_WIDTH: usize = 12;
const DEFAULT_LABEL_WIDTH: usize = 10;

/// List columns after the id, with their widths.
const COLUMNS: [(Property, &str, usize); 7] = [
    (Property::Nickname, "Nickname", 15),
    (Property::User, "User", 10),
    (Property::Host, "Host", 15),
    (Property::Description, "Description", 20),
    (Property::Args, "Args", 10),
    (Property::Identity, "Identity", 10),
    (Property::Command, "Command", 10),
];

/// Columns shown without `--all`.
const SHORT_COLUMNS: usize = 4;

/// Pad `s` to `width` characters, cutting it if longer.
fn cell(s: &str, width: usize) -> String {
    let cut: String = s.chars().take(width).collect();
    format!("{cut:<width$}")
}

fn columns(wide: bool) -> &'static [(Property, &'static str, usize)] {
    if wide {
        &COLUMNS
    } else {
        &COLUMNS[..SHORT_COLUMNS]
    }
}

fn write_line(out: &mut impl Write, first: String, rest: Vec<String>) -> io::Result<()> {
    let line = std::iter::once(first).chain(rest).collect::<Vec<_>>().join(" ");
    writeln!(out, "{}", line.trim_end())
}

/// Table of connections, one per line, with a header.
pub(crate) fn write_list(
    out: &mut impl Write,
    records: &[ConnectionRecord],
    wide: bool,
) -> io::Result<()> {
    let columns = columns(wide);
    write_line(
        out,
        cell("ID", ID_WIDTH),
        columns.iter().map(|&(_, title, w)| cell(title, w)).collect(),
    )?;
    for record in records {
        write_line(
            out,
            format!("{:<width$}", record.id, width = ID_WIDTH),
            columns
                .iter()
                .map(|&(property, _, w)| cell(record.get(property), w))
                .collect(),
        )?;
    }
    Ok(())
}

/// Every property of one connection, one per line.
pub(crate) fn write_record(out: &mut impl Write, record: &ConnectionRecord) -> io::Result<()> {
    writeln!(out, "{:<width$}: {}", "ID", record.id, width = LABEL_WIDTH)?;
    for (property, label, _) in COLUMNS {
        writeln!(
            out,
            "{label:<width$}: {}",
            record.get(property),
            width = LABEL_WIDTH
        )?;
    }
    Ok(())
}

pub(crate) fn write_defaults(
    out: &mut impl Write,
    defaults: &BTreeMap<DefaultName, String>,
) -> io::Result<()> {
    writeln!(out, "Program default settings:")?;
    for (name, value) in defaults {
        writeln!(
            out,
            "{:<width$}: {value}",
            name.as_str(),
            width = DEFAULT_LABEL_WIDTH
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> ConnectionRecord {
        ConnectionRecord {
            id: 7,
            user: "deploy".into(),
            description: "Production web frontend server".into(),
            args: "-p 2222".into(),
            command: "mosh".into(),
            ..ConnectionRecord::new("web", "web.example.com")
        }
    }

    #[rstest]
    #[case::pads("ab", 4, "ab  ")]
    #[case::exact("abcd", 4, "abcd")]
    #[case::cuts("abcdef", 4, "abcd")]
    #[case::multibyte("grüße", 3, "grü")]
    fn test_cell(#[case] s: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(cell(s, width), expected);
    }

    #[test]
    fn test_short_list() {
        let text = render(|out| write_list(out, &[sample()], false));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ID   Nickname        User       Host            Description",
                "7    web             deploy     web.example.com Production web front",
            ]
        );
    }

    #[test]
    fn test_wide_list() {
        let text = render(|out| write_list(out, &[sample()], true));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Args       Identity   Command"));
        assert!(lines[1].ends_with("-p 2222               mosh"));
    }

    #[test]
    fn test_empty_list_has_header() {
        let text = render(|out| write_list(out, &[], false));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_record() {
        let text = render(|out| write_record(out, &sample()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "ID          : 7");
        assert_eq!(lines[1], "Nickname    : web");
        assert_eq!(lines[3], "Host        : web.example.com");
        assert_eq!(lines[6], "Identity    : ");
        assert_eq!(lines[7], "Command     : mosh");
    }

    #[test]
    fn test_defaults() {
        let defaults = BTreeMap::from([
            (DefaultName::Args, String::new()),
            (DefaultName::User, "admin".to_string()),
        ]);
        let text = render(|out| write_defaults(out, &defaults));
        assert_eq!(
            text,
            "Program default settings:\nargs      : \nuser      : admin\n"
        );
    }
}
