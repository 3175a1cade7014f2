//! Hand-off to the target command.
//!
//! On Unix the current process image is replaced, so the command inherits
//! the augmented environment and our PID. Elsewhere the command is spawned
//! and its exit code becomes ours.

use std::convert::Infallible;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::{CommandError, Result};

/// Locate `command[0]` on PATH.
///
/// # Errors
///
/// `CommandError::Missing` for an empty command, `NotFound` if the program
/// cannot be located.
pub fn locate(command: &[String]) -> Result<PathBuf> {
    let program = command.first().ok_or(CommandError::Missing)?;
    let path =
        which::which(program).map_err(|_| CommandError::NotFound(program.to_string()))?;
    Ok(path)
}

/// Replace the current process with `command`.
///
/// # Errors
///
/// Fails if the command cannot be found or started.
#[cfg(unix)]
pub fn replace(command: &[String]) -> Result<Infallible> {
    use std::os::unix::process::CommandExt;

    let path = locate(command)?;
    debug!(program = %path.display(), "exec");

    let source = Command::new(&path)
        .arg0(&command[0])
        .args(&command[1..])
        .exec();

    Err(CommandError::Exec {
        command: command[0].clone(),
        source,
    }
    .into())
}

/// Run `command` to completion and exit with its status.
///
/// # Errors
///
/// Fails if the command cannot be found or started.
#[cfg(not(unix))]
pub fn replace(command: &[String]) -> Result<Infallible> {
    let path = locate(command)?;
    debug!(program = %path.display(), "spawn");

    let status = Command::new(&path)
        .args(&command[1..])
        .status()
        .map_err(|source| CommandError::Exec {
            command: command[0].clone(),
            source,
        })?;

    std::process::exit(status.code().unwrap_or(1));
}
