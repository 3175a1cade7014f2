//! Error types.
//!
//! One crate-level [`Error`] with nested domain enums, converted via `#[from]`.
//! Orchestration wrappers (`DirectiveSource`, `Push`, `Resolve`, `Commit`)
//! name the loader phase that failed and box the underlying cause.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("{backend}: {source}")]
    BackendFetch {
        backend: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("failed to load envs: {0}")]
    DirectiveSource(Box<Error>),

    #[error("failed to push env: {0}")]
    Push(Box<Error>),

    #[error("failed to resolve envs: {0}")]
    Resolve(Box<Error>),

    #[error("failed to set env: {0}")]
    Commit(Box<Error>),
}

impl Error {
    /// Wrap a backend adapter failure with the backend type tag.
    pub fn fetch(backend: impl Into<String>, source: FetchError) -> Self {
        Self::BackendFetch {
            backend: backend.into(),
            source,
        }
    }
}

/// Environment entries that cannot be turned into directives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("invalid env format: {0:?} has no '='")]
    MalformedEnvEntry(String),

    #[error("invalid secret directive in {key}: expected secretfrom:<type>:<args>")]
    MalformedSecretDirective { key: String },
}

/// Failures talking to a secret backend.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid locator {locator:?}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Process environment write failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("invalid env key {0:?}")]
    InvalidKey(String),

    #[error("invalid value for env {0}: contains a NUL byte")]
    InvalidValue(String),
}

/// Process boundary failures.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("no command specified")]
    Missing,

    #[error("command not found: {0}")]
    NotFound(String),

    #[error("failed to exec {command}: {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runtime configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid timeout {0:?}: expected whole seconds")]
    InvalidTimeout(String),
}
