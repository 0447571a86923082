// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Start the program of a launch plan.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use sshcm_store_db::LaunchPlan;
use tracing::debug;

use crate::error::{CliError, Result};

/// Locate `program` on `PATH`.
pub(crate) fn resolve_program(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|source| CliError::ProgramNotFound {
        program: program.to_string(),
        source,
    })
}

/// Replace the current process with `binary`. Returns only on failure.
#[cfg(unix)]
pub(crate) fn run(binary: &Path, plan: &LaunchPlan) -> Result<ExitCode> {
    use std::os::unix::process::CommandExt;

    debug!(binary = %binary.display(), args = ?plan.args, "exec");
    let source = Command::new(binary)
        .arg0(&plan.program)
        .args(&plan.args)
        .exec();
    Err(CliError::Exec {
        program: plan.program.clone(),
        source,
    })
}

/// Run `binary` as a child and forward its exit status.
#[cfg(not(unix))]
pub(crate) fn run(binary: &Path, plan: &LaunchPlan) -> Result<ExitCode> {
    debug!(binary = %binary.display(), args = ?plan.args, "spawn");
    let status = Command::new(binary)
        .args(&plan.args)
        .status()
        .map_err(|source| CliError::Exec {
            program: plan.program.clone(),
            source,
        })?;
    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_program_on_path() {
        let path = resolve_program("sh").unwrap();
        assert!(path.is_absolute());
    }

    #[test]
    fn test_resolve_missing_program() {
        let err = resolve_program("sshcm-no-such-program").unwrap_err();
        assert!(matches!(
            err,
            CliError::ProgramNotFound { ref program, .. } if program == "sshcm-no-such-program"
        ));
        assert!(err.is_user_error());
    }
}
