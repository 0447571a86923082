// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Command line definition.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use sshcm_store_db::{DefaultName, Overrides, Property, is_valid_id_or_nickname};

use crate::transfer::Format;

/// A simple SSH connection manager backed by a SQLite file.
#[derive(Parser, Debug)]
#[command(name = "sshcm", disable_version_flag = true)]
pub(crate) struct Cli {
    /// Path to the connection database (ssh-cm.connections).
    #[arg(long, value_name = "PATH", global = true)]
    pub(crate) db: Option<PathBuf>,
    /// Verbose (debug) output.
    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Start a connection.
    #[command(visible_alias = "c")]
    Connect(ConnectArgs),
    /// Add a connection.
    #[command(visible_alias = "a")]
    Add(AddArgs),
    /// Print a connection's settings.
    #[command(visible_alias = "g")]
    Get(TargetArgs),
    /// Alter an existing connection.
    #[command(visible_alias = "s")]
    Set(SetArgs),
    /// Remove a connection.
    #[command(visible_aliases = ["remove", "delete", "del"])]
    Rm(TargetArgs),
    /// List all connections.
    #[command(visible_alias = "l")]
    List(ListArgs),
    /// Search nickname, host, user and description (case-insensitive).
    #[command(visible_alias = "f")]
    Search(SearchArgs),
    /// List program default settings.
    Defaults,
    /// Set a program default setting; omit the value to clear it.
    Def(DefArgs),
    /// Export all connections as CSV or JSON.
    Export(TransferArgs),
    /// Import connections from CSV or JSON, updating those whose nickname exists.
    Import(TransferArgs),
    /// Print program version.
    Version,
}

fn parse_target(s: &str) -> Result<String, String> {
    if is_valid_id_or_nickname(s) {
        Ok(s.to_string())
    } else {
        Err("expected a connection id or nickname".to_string())
    }
}

fn parse_default_name(s: &str) -> Result<DefaultName, String> {
    s.parse().map_err(|e: sshcm_store_db::Error| e.to_string())
}

#[derive(Args, Debug)]
pub(crate) struct TargetArgs {
    /// Connection id or nickname.
    #[arg(value_name = "ID|NICKNAME", value_parser = parse_target)]
    pub(crate) id_or_nickname: String,
}

/// Properties that may be left unset.
#[derive(Args, Debug, Default)]
pub(crate) struct OptionalProperties {
    /// User name for the connection.
    #[arg(short, long)]
    pub(crate) user: Option<String>,
    /// Short description of the connection.
    #[arg(short, long)]
    pub(crate) description: Option<String>,
    /// Arguments passed to the SSH command.
    #[arg(short, long, allow_hyphen_values = true)]
    pub(crate) args: Option<String>,
    /// SSH identity to use (as with `-i`).
    #[arg(long)]
    pub(crate) identity: Option<String>,
    /// Command to run instead of ssh.
    #[arg(short, long)]
    pub(crate) command: Option<String>,
}

impl OptionalProperties {
    pub(crate) fn changes(&self) -> Vec<(Property, &str)> {
        [
            (Property::User, &self.user),
            (Property::Description, &self.description),
            (Property::Args, &self.args),
            (Property::Identity, &self.identity),
            (Property::Command, &self.command),
        ]
        .into_iter()
        .filter_map(|(property, value)| value.as_deref().map(|v| (property, v)))
        .collect()
    }
}

#[derive(Args, Debug)]
pub(crate) struct AddArgs {
    /// Nickname for the connection.
    #[arg(short, long)]
    pub(crate) nickname: String,
    /// Host name or IP address.
    #[arg(long)]
    pub(crate) host: String,
    #[command(flatten)]
    pub(crate) properties: OptionalProperties,
}

#[derive(Args, Debug)]
pub(crate) struct SetArgs {
    #[command(flatten)]
    pub(crate) target: TargetArgs,
    /// New nickname.
    #[arg(short, long)]
    pub(crate) nickname: Option<String>,
    /// New host name or IP address.
    #[arg(long)]
    pub(crate) host: Option<String>,
    #[command(flatten)]
    pub(crate) properties: OptionalProperties,
}

impl SetArgs {
    /// Properties named on the command line, in column order.
    pub(crate) fn changes(&self) -> Vec<(Property, &str)> {
        let mut changes: Vec<(Property, &str)> = [
            (Property::Nickname, &self.nickname),
            (Property::Host, &self.host),
        ]
        .into_iter()
        .filter_map(|(property, value)| value.as_deref().map(|v| (property, v)))
        .collect();
        changes.extend(self.properties.changes());
        changes
    }
}

#[derive(Args, Debug)]
pub(crate) struct ConnectArgs {
    #[command(flatten)]
    pub(crate) target: TargetArgs,
    /// Override the user name.
    #[arg(short, long)]
    pub(crate) user: Option<String>,
    /// Override the SSH arguments.
    #[arg(short, long, allow_hyphen_values = true)]
    pub(crate) args: Option<String>,
    /// Override the SSH identity.
    #[arg(long)]
    pub(crate) identity: Option<String>,
    /// Override the command.
    #[arg(short, long)]
    pub(crate) command: Option<String>,
    /// Print the command line instead of running it.
    #[arg(long)]
    pub(crate) dry_run: bool,
}

impl ConnectArgs {
    pub(crate) fn overrides(&self) -> Overrides {
        Overrides {
            user: self.user.clone(),
            args: self.args.clone(),
            identity: self.identity.clone(),
            command: self.command.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// List all connection details (wide output).
    #[arg(short, long)]
    pub(crate) all: bool,
    /// Print connections as JSON.
    #[arg(long, conflicts_with = "all")]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Text to look for.
    pub(crate) term: String,
    /// List all connection details (wide output).
    #[arg(short, long)]
    pub(crate) all: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DefArgs {
    /// Setting name: args, command, identity or user.
    #[arg(value_parser = parse_default_name)]
    pub(crate) name: DefaultName,
    /// New value; the setting is cleared when omitted.
    pub(crate) value: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct TransferArgs {
    /// File to use instead of standard input/output.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub(crate) path: Option<PathBuf>,
    /// File format.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub(crate) format: Format,
}
