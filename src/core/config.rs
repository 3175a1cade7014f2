//! Runtime configuration.
//!
//! secretfrom has no config file: everything comes from flags and
//! environment variables read once at startup.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::error::ConfigError;

/// Log verbosity accepted in `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Raised when `LOG_LEVEL` holds something other than a known level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level {0:?}")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "" | "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Parse an optional `LOG_LEVEL` value, falling back to info.
    ///
    /// The fallback is reported so the caller can warn once logging is up.
    pub fn resolve(value: Option<&str>) -> (Self, Option<UnknownLogLevel>) {
        match value.map(str::parse::<Self>) {
            None => (Self::Info, None),
            Some(Ok(level)) => (level, None),
            Some(Err(unknown)) => (Self::Info, Some(unknown)),
        }
    }

    /// `EnvFilter` directive for this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON lines, anything else plain text.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Parse a load timeout given in whole seconds.
///
/// # Errors
///
/// `ConfigError::InvalidTimeout` for anything but a non-negative integer.
pub fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidTimeout(value.to_string()))
}
