//! Google Cloud Secret Manager backend.
//!
//! Reads secret versions via the gcloud CLI. Enable with `--features gcp`.
//!
//! ## Requirements
//!
//! - `gcloud` CLI must be installed and authenticated
//! - User must have secretmanager.versions.access on the secret
//!
//! ## Usage
//!
//! ```bash
//! export DB_PASSWORD=secretfrom:google_secretmanager:projects/my-project/secrets/db/versions/3
//! export API_TOKEN=secretfrom:google_secretmanager:projects/my-project/secrets/api.token
//! ```
//!
//! The version segment is optional and defaults to `latest`.

use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace};

use super::ItemFetch;
use crate::core::constants::GOOGLE_SECRET_MANAGER;
use crate::core::context::Context;
use crate::core::resolver::ItemResolver;
use crate::error::FetchError;

/// Resolver for `google_secretmanager` directives.
pub fn secret_manager() -> ItemResolver<SecretManager> {
    ItemResolver::new(GOOGLE_SECRET_MANAGER, SecretManager::connect)
}

/// Secret Manager access through the gcloud CLI.
#[derive(Debug, Clone)]
pub struct SecretManager {
    program: String,
}

impl SecretManager {
    /// Check that gcloud is available.
    pub fn connect(ctx: &Context) -> Result<Self, FetchError> {
        ctx.check()?;
        Self::with_program("gcloud")
    }

    /// Use a specific gcloud binary.
    pub fn with_program(program: impl Into<String>) -> Result<Self, FetchError> {
        let program = program.into();
        Command::new(&program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|_| {
                FetchError::Connect(
                    "gcloud CLI not found. Install it from https://cloud.google.com/sdk/docs/install"
                        .to_string(),
                )
            })?;
        Ok(Self { program })
    }
}

impl ItemFetch for SecretManager {
    fn fetch(&self, ctx: &Context, identifier: &str) -> Result<Option<String>, FetchError> {
        ctx.check()?;
        let version = SecretVersion::parse(identifier)?;
        trace!(
            project = %version.project,
            secret = %version.secret,
            version = %version.version,
            "accessing secret version"
        );

        let mut command = Command::new(&self.program);
        command.args([
            "secrets",
            "versions",
            "access",
            version.version.as_str(),
            "--secret",
            version.secret.as_str(),
            "--project",
            version.project.as_str(),
        ]);
        let output = run_within(ctx, command)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("NOT_FOUND") {
                debug!(secret = identifier, "secret not found");
                return Ok(None);
            }
            return Err(FetchError::Transport(format!(
                "gcloud secrets versions access failed for {}: {}",
                identifier,
                stderr.trim()
            )));
        }

        let payload = String::from_utf8(output.stdout)
            .map_err(|e| FetchError::Transport(format!("UTF-8 error: {}", e)))?;

        debug!(secret = identifier, "secret received");
        Ok(Some(payload))
    }
}

/// How often a running gcloud is checked against the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run `command` to completion, killing it if the context deadline passes.
fn run_within(ctx: &Context, mut command: Command) -> Result<Output, FetchError> {
    let io_error =
        |e: std::io::Error| FetchError::Transport(format!("failed to run gcloud: {}", e));

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if ctx.remaining()?.is_none() {
        return command.output().map_err(io_error);
    }

    let mut child = command.spawn().map_err(io_error)?;
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = loop {
        if let Some(status) = child.try_wait().map_err(io_error)? {
            break status;
        }
        if let Err(e) = ctx.check() {
            debug!(pid = child.id(), "deadline passed, killing gcloud");
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Output {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

/// Read a child pipe to the end on its own thread so the child never blocks.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Components of `projects/<p>/secrets/<s>[/versions/<v>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersion {
    pub project: String,
    pub secret: String,
    pub version: String,
}

impl SecretVersion {
    /// Parse a secret or secret-version resource name.
    ///
    /// # Errors
    ///
    /// `InvalidLocator` if the name does not follow the resource format.
    pub fn parse(resource_name: &str) -> Result<Self, FetchError> {
        let parts: Vec<&str> = resource_name.split('/').collect();

        let version = match parts.as_slice() {
            ["projects", _, "secrets", _] => "latest",
            ["projects", _, "secrets", _, "versions", v] => *v,
            _ => {
                return Err(FetchError::InvalidLocator {
                    locator: resource_name.to_string(),
                    reason: "expected projects/<project>/secrets/<secret>[/versions/<version>]"
                        .to_string(),
                })
            }
        };

        if parts.iter().any(|p| p.is_empty()) {
            return Err(FetchError::InvalidLocator {
                locator: resource_name.to_string(),
                reason: "empty path segment".to_string(),
            });
        }

        Ok(Self {
            project: parts[1].to_string(),
            secret: parts[3].to_string(),
            version: version.to_string(),
        })
    }
}
