//! Command-line interface.

pub mod exec;

use std::convert::Infallible;
use std::time::Duration;

use clap::Parser;
use tracing::debug;

use crate::core::config::parse_timeout;
use crate::core::constants::{LOG_LEVEL_VAR, TIMEOUT_VAR};
use crate::core::context::Context;
use crate::error::Result;

/// secretfrom - resolve secretfrom: placeholders, then run a command.
#[derive(Parser, Debug)]
#[command(
    name = "secretfrom",
    about = "Resolve secretfrom:<type>:<args> environment values, then exec a command",
    version,
    after_help = "Example:\n  DB_PASSWORD=secretfrom:aws_ssm:/app/db.password secretfrom ./server"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, env = LOG_LEVEL_VAR, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Give up resolving secrets after this many seconds
    #[arg(long, env = TIMEOUT_VAR, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Command and arguments to run
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Resolve secrets into the process environment, then become `command`.
///
/// Only returns on failure. Nothing is executed if loading fails.
pub fn execute(cli: Cli) -> Result<Infallible> {
    let ctx = Context::from_timeout(cli.timeout);
    let summary = crate::core::load(&ctx)?;
    debug!(
        resolved = summary.resolved.len(),
        unresolved = summary.unresolved.len(),
        "secrets loaded"
    );

    exec::replace(&cli.command)
}
