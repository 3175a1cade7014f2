//! AWS secret backends.
//!
//! Enable with `--features aws`.
//!
//! | type tag             | service                 | fetch shape            |
//! |----------------------|-------------------------|------------------------|
//! | `aws_secretsmanager` | Secrets Manager         | `BatchGetSecretValue`  |
//! | `aws_ssm`            | SSM Parameter Store     | `GetParameters`        |
//! | `aws_s3`             | S3                      | `GetObject` per object |
//!
//! Credentials and region come from the default provider chain
//! (AWS_ACCESS_KEY_ID, AWS_PROFILE, instance metadata, ...).
//!
//! The SDK is async; each client owns a current-thread tokio runtime and
//! blocks on it, bounded by the context deadline.

use std::collections::HashMap;
use std::future::Future;

use aws_config::BehaviorVersion;
use tokio::runtime::Runtime;
use tracing::{debug, error, trace};
use url::Url;

use super::{BatchFetch, ItemFetch};
use crate::core::constants::{AWS_S3, AWS_SECRETS_MANAGER, AWS_SSM};
use crate::core::context::Context;
use crate::core::resolver::{BatchResolver, ItemResolver};
use crate::error::FetchError;

/// `BatchGetSecretValue` accepts at most 20 secret ids per call.
const SECRETS_MANAGER_BATCH: usize = 20;

/// `GetParameters` accepts at most 10 names per call.
const SSM_BATCH: usize = 10;

/// Resolver for `aws_secretsmanager` directives.
pub fn secrets_manager() -> BatchResolver<SecretsManager> {
    BatchResolver::new(AWS_SECRETS_MANAGER, SecretsManager::connect)
}

/// Resolver for `aws_ssm` directives.
pub fn ssm() -> BatchResolver<Ssm> {
    BatchResolver::new(AWS_SSM, Ssm::connect)
}

/// Resolver for `aws_s3` directives.
pub fn s3() -> ItemResolver<S3> {
    ItemResolver::new(AWS_S3, S3::connect)
}

/// Runtime plus loaded SDK config, shared shape of every AWS client.
struct Session {
    runtime: Runtime,
    config: aws_config::SdkConfig,
}

impl Session {
    fn connect(ctx: &Context) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FetchError::Connect(format!("failed to create runtime: {}", e)))?;

        let config = block_within(&runtime, ctx, async {
            Ok(aws_config::load_defaults(BehaviorVersion::latest()).await)
        })?;

        Ok(Self { runtime, config })
    }

    fn block_on<T, F>(&self, ctx: &Context, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        block_within(&self.runtime, ctx, fut)
    }
}

/// Drive `fut` to completion, giving up at the context deadline.
fn block_within<T, F>(runtime: &Runtime, ctx: &Context, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    let remaining = ctx.remaining()?;
    runtime.block_on(async {
        match remaining {
            Some(left) => tokio::time::timeout(left, fut)
                .await
                .map_err(|_| FetchError::DeadlineExceeded)?,
            None => fut.await,
        }
    })
}

/// AWS Secrets Manager client.
pub struct SecretsManager {
    session: Session,
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManager {
    pub fn connect(ctx: &Context) -> Result<Self, FetchError> {
        let session = Session::connect(ctx)?;
        let client = aws_sdk_secretsmanager::Client::new(&session.config);
        Ok(Self { session, client })
    }
}

impl BatchFetch for SecretsManager {
    fn fetch_batch(
        &self,
        ctx: &Context,
        identifiers: &[String],
    ) -> Result<HashMap<String, String>, FetchError> {
        use aws_sdk_secretsmanager::error::DisplayErrorContext;

        self.session.block_on(ctx, async {
            let mut values = HashMap::with_capacity(identifiers.len());

            for chunk in identifiers.chunks(SECRETS_MANAGER_BATCH) {
                let mut next_token: Option<String> = None;
                loop {
                    let resp = self
                        .client
                        .batch_get_secret_value()
                        .set_secret_id_list(Some(chunk.to_vec()))
                        .set_next_token(next_token.take())
                        .send()
                        .await
                        .map_err(|e| {
                            FetchError::Transport(format!(
                                "failed to batch get secret value: {}",
                                DisplayErrorContext(&e)
                            ))
                        })?;

                    for secret in resp.secret_values() {
                        let Some(value) = secret.secret_string() else {
                            debug!(name = ?secret.name(), "secret has no string value");
                            continue;
                        };
                        // Callers may address a secret by name or by ARN.
                        let requested = chunk.iter().find(|id| {
                            Some(id.as_str()) == secret.name() || Some(id.as_str()) == secret.arn()
                        });
                        let Some(key) = requested.map(String::as_str).or(secret.name()) else {
                            continue;
                        };
                        trace!(key, "secret value received");
                        values.insert(key.to_string(), value.to_string());
                    }

                    for missing in resp.errors() {
                        debug!(
                            secret_id = ?missing.secret_id(),
                            code = ?missing.error_code(),
                            "secret not returned"
                        );
                    }

                    match resp.next_token() {
                        Some(token) => next_token = Some(token.to_string()),
                        None => break,
                    }
                }
            }

            Ok(values)
        })
    }
}

/// AWS Systems Manager Parameter Store client.
pub struct Ssm {
    session: Session,
    client: aws_sdk_ssm::Client,
}

impl Ssm {
    pub fn connect(ctx: &Context) -> Result<Self, FetchError> {
        let session = Session::connect(ctx)?;
        let client = aws_sdk_ssm::Client::new(&session.config);
        Ok(Self { session, client })
    }
}

impl BatchFetch for Ssm {
    fn fetch_batch(
        &self,
        ctx: &Context,
        identifiers: &[String],
    ) -> Result<HashMap<String, String>, FetchError> {
        use aws_sdk_ssm::error::DisplayErrorContext;

        self.session.block_on(ctx, async {
            let mut values = HashMap::with_capacity(identifiers.len());

            for chunk in identifiers.chunks(SSM_BATCH) {
                let resp = self
                    .client
                    .get_parameters()
                    .set_names(Some(chunk.to_vec()))
                    .with_decryption(true)
                    .send()
                    .await
                    .map_err(|e| {
                        FetchError::Transport(format!(
                            "failed to get parameters: {}",
                            DisplayErrorContext(&e)
                        ))
                    })?;

                for parameter in resp.parameters() {
                    let (Some(name), Some(value)) = (parameter.name(), parameter.value()) else {
                        continue;
                    };
                    trace!(name, "parameter received");
                    values.insert(name.to_string(), value.to_string());
                }

                for invalid in resp.invalid_parameters() {
                    debug!(name = %invalid, "parameter not found");
                }
            }

            Ok(values)
        })
    }
}

/// AWS S3 client. Locators are `s3://bucket/key` URLs.
pub struct S3 {
    session: Session,
    client: aws_sdk_s3::Client,
}

impl S3 {
    pub fn connect(ctx: &Context) -> Result<Self, FetchError> {
        let session = Session::connect(ctx)?;
        let client = aws_sdk_s3::Client::new(&session.config);
        Ok(Self { session, client })
    }
}

impl ItemFetch for S3 {
    fn fetch(&self, ctx: &Context, identifier: &str) -> Result<Option<String>, FetchError> {
        use aws_sdk_s3::error::DisplayErrorContext;

        let Some(location) = S3Location::parse(identifier)? else {
            return Ok(None);
        };

        self.session.block_on(ctx, async {
            let resp = match self
                .client
                .get_object()
                .bucket(&location.bucket)
                .key(&location.key)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    if e.as_service_error().is_some_and(|svc| svc.is_no_such_key()) {
                        debug!(object = identifier, "object not found");
                        return Ok(None);
                    }
                    return Err(FetchError::Transport(format!(
                        "failed to get object {}: {}",
                        identifier,
                        DisplayErrorContext(&e)
                    )));
                }
            };

            let body = resp.body.collect().await.map_err(|e| {
                FetchError::Transport(format!("failed to read body of {}: {}", identifier, e))
            })?;
            let text = String::from_utf8(body.into_bytes().to_vec()).map_err(|e| {
                FetchError::Transport(format!("object {} is not UTF-8: {}", identifier, e))
            })?;

            debug!(object = identifier, "object received");
            Ok(Some(text))
        })
    }
}

/// Bucket and key parsed from an `s3://` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    /// Parse `s3://bucket/key`.
    ///
    /// Returns `Ok(None)` (after logging) for other schemes so the directive
    /// is left unresolved rather than failing the load.
    ///
    /// # Errors
    ///
    /// `InvalidLocator` if the locator is not a URL or lacks a bucket or key.
    pub fn parse(locator: &str) -> Result<Option<Self>, FetchError> {
        let invalid = |reason: &str| FetchError::InvalidLocator {
            locator: locator.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(locator).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "s3" {
            error!(scheme = url.scheme(), args = locator, "unsupported scheme");
            return Ok(None);
        }

        let bucket = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing bucket"))?;
        let key = url.path().trim_start_matches('/');
        if key.is_empty() {
            return Err(invalid("missing object key"));
        }

        Ok(Some(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }))
    }
}
