// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Database schema definitions and version handling.
//!
//! The schema version is stored as a tag (`v1.1`) in the `global` table.
//! Every known version has a full table definition; older versions also have
//! an upgrade script that brings them one step closer to [`CURRENT`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rusqlite::{Connection, params};
use semver::Version;
use tracing::debug;

use crate::error::{Error, Result};
use crate::validate::DefaultName;

/// Structural version of the persisted tables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(Version);

impl SchemaVersion {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self(Version::new(major, minor, 0))
    }

    fn key(&self) -> Option<(u64, u64)> {
        (self.0.patch == 0 && self.0.pre.is_empty()).then_some((self.0.major, self.0.minor))
    }
}

/// `connections` without `command`.
pub const V1_0: SchemaVersion = SchemaVersion::new(1, 0);
/// Adds `connections.command` and the `command` default.
pub const V1_1: SchemaVersion = SchemaVersion::new(1, 1);

/// Schema version written by this build.
pub const CURRENT: SchemaVersion = V1_1;

impl FromStr for SchemaVersion {
    type Err = Error;

    /// Accepts `v1.1`, `1.1`, `v1.1.0` and semver pre-release suffixes.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::SchemaVersionInvalid(s.to_owned());
        let bare = s.strip_prefix('v').unwrap_or(s);
        let split = bare.find(['-', '+']).unwrap_or(bare.len());
        let (core, suffix) = bare.split_at(split);
        let normalized = match core.split('.').count() {
            2 => format!("{core}.0{suffix}"),
            3 => bare.to_owned(),
            _ => return Err(invalid()),
        };
        Version::parse(&normalized).map(Self).map_err(|_| invalid())
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some((major, minor)) => write!(f, "v{major}.{minor}"),
            None => write!(f, "v{}", self.0),
        }
    }
}

const TABLES_V1_0: &str = r#"
create table global (
    setting text primary key not null,
    value   text
);

create table defaults (
    setting text primary key not null,
    value   text
);

create table connections (
    id          integer primary key autoincrement not null,
    nickname    text unique not null,
    host        text not null,
    user        text,
    description text,
    args        text,
    identity    text
);
"#;

const TABLES_V1_1: &str = r#"
create table global (
    setting text primary key not null,
    value   text
);

create table defaults (
    setting text primary key not null,
    value   text
);

create table connections (
    id          integer primary key autoincrement not null,
    nickname    text unique not null,
    host        text not null,
    user        text,
    description text,
    args        text,
    identity    text,
    command     text
);
"#;

const UPGRADE_V1_0_TO_V1_1: &str = r#"
alter table connections add column command text;
insert into defaults (setting, value) values ('command', null);
update global set value = 'v1.1' where setting = 'schema_version';
"#;

/// Table definitions for a known schema version.
pub fn tables_sql(version: &SchemaVersion) -> Option<&'static str> {
    match version.key()? {
        (1, 0) => Some(TABLES_V1_0),
        (1, 1) => Some(TABLES_V1_1),
        _ => None,
    }
}

/// Default settings seeded when a database is created at `version`.
pub fn default_names(version: &SchemaVersion) -> &'static [DefaultName] {
    match version.key() {
        Some((1, 0)) => &[DefaultName::Args, DefaultName::Identity, DefaultName::User],
        Some((1, 1)) => &DefaultName::ALL,
        _ => &[],
    }
}

/// A script moving the schema from one version to the next.
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub to: SchemaVersion,
    pub sql: &'static str,
}

/// Upgrade script for databases stored at `from`, if one exists.
pub fn upgrade_from(from: &SchemaVersion) -> Option<Upgrade> {
    match from.key()? {
        (1, 0) => Some(Upgrade {
            to: V1_1,
            sql: UPGRADE_V1_0_TO_V1_1,
        }),
        _ => None,
    }
}

/// Why a stored schema cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSchema {
    /// Missing or unparseable version tag.
    Unparseable,
    /// Older version without an upgrade script.
    NoUpgradePath,
}

/// Compatibility of a database with this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaState {
    /// No tables yet; needs full initialization.
    Unversioned,
    Current,
    UpgradeNeeded(SchemaVersion),
    TooNew(SchemaVersion),
    Invalid { found: String, reason: InvalidSchema },
}

impl SchemaState {
    /// Classify a stored version tag against [`CURRENT`].
    pub fn evaluate(stored: &str) -> Self {
        let Ok(version) = stored.parse::<SchemaVersion>() else {
            return SchemaState::Invalid {
                found: stored.to_owned(),
                reason: InvalidSchema::Unparseable,
            };
        };
        match version.cmp(&CURRENT) {
            Ordering::Equal => SchemaState::Current,
            Ordering::Greater => SchemaState::TooNew(version),
            Ordering::Less if upgrade_from(&version).is_some() => {
                SchemaState::UpgradeNeeded(version)
            }
            Ordering::Less => SchemaState::Invalid {
                found: stored.to_owned(),
                reason: InvalidSchema::NoUpgradePath,
            },
        }
    }

    /// Convert to the error a caller sees when the database is unusable.
    ///
    /// `Unversioned` and `Current` are not errors.
    pub fn check(self) -> Result<()> {
        match self {
            SchemaState::Unversioned | SchemaState::Current => Ok(()),
            SchemaState::UpgradeNeeded(found) => Err(Error::SchemaUpgradeNeeded {
                found: found.to_string(),
                supported: CURRENT.to_string(),
            }),
            SchemaState::TooNew(found) => Err(Error::SchemaTooNew {
                found: found.to_string(),
                supported: CURRENT.to_string(),
            }),
            SchemaState::Invalid {
                found,
                reason: InvalidSchema::Unparseable,
            } => Err(Error::SchemaVersionInvalid(found)),
            SchemaState::Invalid {
                found,
                reason: InvalidSchema::NoUpgradePath,
            } => Err(Error::SchemaNoUpgradePath(found)),
        }
    }
}

/// Create the tables of `version`, write its version tag and seed empty
/// default settings.
///
/// Callers wrap this in a transaction.
pub fn initialize(conn: &Connection, version: &SchemaVersion) -> Result<()> {
    let sql = tables_sql(version).ok_or_else(|| Error::SchemaVersionInvalid(version.to_string()))?;
    conn.execute_batch(sql)?;
    conn.execute(
        "INSERT INTO global (setting, value) VALUES ('schema_version', ?1)",
        params![version.to_string()],
    )?;
    for name in default_names(version) {
        conn.execute(
            "INSERT INTO defaults (setting, value) VALUES (?1, NULL)",
            params![name.as_str()],
        )?;
    }
    debug!("Initialized schema {version}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::current("v1.1", SchemaState::Current)]
    #[case::current_bare("1.1", SchemaState::Current)]
    #[case::current_patch("v1.1.0", SchemaState::Current)]
    #[case::old("1.0", SchemaState::UpgradeNeeded(V1_0))]
    #[case::old_tagged("v1.0", SchemaState::UpgradeNeeded(V1_0))]
    #[case::too_new("v100.99.88", SchemaState::TooNew("v100.99.88".parse().unwrap()))]
    #[case::next_minor("v1.2", SchemaState::TooNew(SchemaVersion::new(1, 2)))]
    fn test_evaluate(#[case] stored: &str, #[case] expected: SchemaState) {
        assert_eq!(SchemaState::evaluate(stored), expected);
    }

    #[rstest]
    #[case("")]
    #[case("v")]
    #[case("1")]
    #[case("one.two")]
    #[case("v1.1.1.1")]
    fn test_evaluate_unparseable(#[case] stored: &str) {
        assert_eq!(
            SchemaState::evaluate(stored),
            SchemaState::Invalid {
                found: stored.to_owned(),
                reason: InvalidSchema::Unparseable
            }
        );
    }

    #[test]
    fn test_evaluate_no_upgrade_path() {
        let state = SchemaState::evaluate("v0.9");
        assert!(matches!(
            state.clone().check(),
            Err(Error::SchemaNoUpgradePath(found)) if found == "v0.9"
        ));
        assert!(matches!(
            state,
            SchemaState::Invalid {
                reason: InvalidSchema::NoUpgradePath,
                ..
            }
        ));
    }

    #[test]
    fn test_ordering_is_semantic() {
        let v1_9: SchemaVersion = "v1.9".parse().unwrap();
        let v1_10: SchemaVersion = "v1.10".parse().unwrap();
        assert!(v1_9 < v1_10);
        assert!(V1_0 < V1_1);
        assert!("v1.1.0-beta".parse::<SchemaVersion>().unwrap() < V1_1);
        assert!("v1.1-rc.1".parse::<SchemaVersion>().unwrap() < V1_1);
    }

    #[test]
    fn test_display() {
        assert_eq!(V1_1.to_string(), "v1.1");
        assert_eq!("1.0".parse::<SchemaVersion>().unwrap().to_string(), "v1.0");
        assert_eq!(
            "v100.99.88".parse::<SchemaVersion>().unwrap().to_string(),
            "v100.99.88"
        );
    }

    #[test]
    fn test_every_upgrade_reaches_a_known_version() {
        let mut version = V1_0;
        while let Some(upgrade) = upgrade_from(&version) {
            assert!(upgrade.to > version);
            assert!(tables_sql(&upgrade.to).is_some());
            version = upgrade.to;
        }
        assert_eq!(version, CURRENT);
    }

    #[test]
    fn test_initialize_current() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn, &CURRENT).unwrap();

        let tag: String = conn
            .query_row(
                "SELECT value FROM global WHERE setting = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tag, "v1.1");

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM defaults WHERE value IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_initialize_unknown_version() {
        let conn = Connection::open_in_memory().unwrap();
        let result = initialize(&conn, &SchemaVersion::new(3, 0));
        assert!(matches!(result, Err(Error::SchemaVersionInvalid(_))));
    }
}
