// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! SQLite store for SSH connection profiles.
//!
//! This crate keeps named connection profiles (host, user, identity, extra
//! arguments, command) and global default settings in a local SQLite file,
//! and resolves a profile into the command line that starts it.
//!
//! # Key Features
//!
//! - Versioned schema with transactional upgrades (`v1.0` → `v1.1`)
//! - Validation before every write (nickname shape, host, id)
//! - Per-property fallback from connection value to global default
//! - In-memory database for testing
//!
//! # Example
//!
//! ```ignore
//! use sshcm_store_db::{ConnectionRecord, Overrides, StoreDb};
//!
//! let db = StoreDb::open("/home/me/.config/ssh-cm.connections")?;
//! let id = db.add(&ConnectionRecord::new("web", "web.example.com"))?;
//!
//! let conn = db.get_by_id_or_nickname("web")?;
//! let plan = db.launch_plan(&conn, &Overrides::default(), "ssh")?;
//! println!("{}", plan.to_shell_string());
//! db.close()?;
//! ```

mod connection;
mod defaults;
mod error;
mod launch;
mod query;
pub mod schema;
mod types;
pub mod validate;
mod write;

pub use connection::StoreDb;
pub use error::{Error, ErrorKind, Result};
pub use launch::{LaunchPlan, Overrides};
pub use schema::{CURRENT as SCHEMA_VERSION, SchemaState, SchemaVersion};
pub use types::ConnectionRecord;
pub use validate::{
    DefaultName, Property, is_valid_connection_property, is_valid_default_name,
    is_valid_id_or_nickname, validate_id, validate_nickname,
};
