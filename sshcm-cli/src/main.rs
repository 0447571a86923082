// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

#![warn(clippy::dbg_macro)]

use std::error::Error as _;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use sshcm_store_db::StoreDb;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{CliError, IoContext, Result};

mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod format;
mod transfer;

fn init_logging(verbose: bool, config: &Config) {
    let fallback = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_env("SSHCM_LOG")
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_store(cli: &Cli, config: &Config) -> Result<StoreDb> {
    let path = config::resolve_db_path(cli.db.clone(), config)?;
    debug!(path = %path.display(), "connection file");
    if !path.exists() {
        eprintln!(
            "Connection file '{}' does not exist and will be created.",
            path.display()
        );
    }
    Ok(StoreDb::open(&path)?)
}

fn run(cli: Cli, config: &Config) -> Result<ExitCode> {
    if let Commands::Version = cli.command {
        commands::version(&mut io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    }

    let db = open_store(&cli, config)?;
    let mut out = io::stdout().lock();

    match &cli.command {
        Commands::Connect(args) => {
            let plan = commands::connect_plan(&db, args, &config.default_command)?;
            db.close()?;
            if args.dry_run {
                writeln!(out, "{}", plan.to_shell_string())
                    .io_context(|| "Failed to write output".to_string())?;
                return Ok(ExitCode::SUCCESS);
            }
            let binary = exec::resolve_program(&plan.program)?;
            drop(out);
            return exec::run(&binary, &plan);
        }
        Commands::Add(args) => {
            commands::add(&db, args, &mut out)?;
        }
        Commands::Get(args) => commands::get(&db, &args.id_or_nickname, &mut out)?,
        Commands::Set(args) => commands::set(&db, args, &mut out)?,
        Commands::Rm(args) => commands::remove(&db, &args.id_or_nickname, &mut out)?,
        Commands::List(args) => commands::list(&db, args, &mut out)?,
        Commands::Search(args) => commands::search(&db, args, &mut out)?,
        Commands::Defaults => commands::defaults(&db, &mut out)?,
        Commands::Def(args) => commands::def(&db, args, &mut out)?,
        Commands::Export(args) => match &args.path {
            Some(path) => {
                if path.exists() {
                    warn!(path = %path.display(), "export file exists and will be overwritten");
                }
                let file = File::create(path)
                    .io_context(|| format!("Failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                transfer::export(&db, args.format, &mut writer)?;
                writer
                    .flush()
                    .io_context(|| format!("Failed to write {}", path.display()))?;
            }
            None => {
                transfer::export(&db, args.format, &mut out)?;
            }
        },
        Commands::Import(args) => {
            let summary = match &args.path {
                Some(path) => {
                    let file = File::open(path)
                        .io_context(|| format!("Failed to open {}", path.display()))?;
                    transfer::import(&db, BufReader::new(file), args.format, &mut out)?
                }
                None => transfer::import(&db, io::stdin().lock(), args.format, &mut out)?,
            };
            debug!(added = summary.added, updated = summary.updated, "import finished");
        }
        Commands::Version => {}
    }

    db.close()?;
    Ok(ExitCode::SUCCESS)
}

/// Print `err` and choose the exit status: 1 for mistakes in the
/// invocation or data, 2 for everything else.
fn report(err: &CliError) -> ExitCode {
    eprintln!("Error: {err}");
    if err.is_user_error() {
        return ExitCode::from(1);
    }
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => return report(&e),
    };
    init_logging(cli.verbose, &config);

    run(cli, &config).unwrap_or_else(|e| report(&e))
}
