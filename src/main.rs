//! secretfrom - resolve secret placeholders in the environment, then exec.

use std::io::IsTerminal;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use secretfrom::cli::{execute, Cli};
use secretfrom::core::config::{LogFormat, LogLevel, UnknownLogLevel};
use secretfrom::core::constants::{LOG_FILTER_VAR, LOG_FORMAT_VAR};

fn main() {
    let cli = Cli::parse();

    if let Some(unknown) = init_tracing(&cli) {
        warn!(log_level = %unknown.0, "unknown log level, defaulting to info");
    }

    match execute(cli) {
        Ok(never) => match never {},
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Install the stderr subscriber. Returns an unrecognized `LOG_LEVEL`, if any.
fn init_tracing(cli: &Cli) -> Option<UnknownLogLevel> {
    let (level, unknown) = LogLevel::resolve(cli.log_level.as_deref());

    // Full filter override, then --verbose, then LOG_LEVEL for our own logs
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("warn,secretfrom=debug")
        } else {
            let deps = if level == LogLevel::Error { "error" } else { "warn" };
            EnvFilter::new(format!("{},secretfrom={}", deps, level))
        }
    });

    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_VAR).ok().as_deref());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    unknown
}
