//! Secret backends.
//!
//! Thin adapters over each store's client API. The resolver layer only needs
//! one of two fetch shapes:
//!
//! - [`BatchFetch`]: one request for many identifiers (Secrets Manager, SSM)
//! - [`ItemFetch`]: one request per identifier (S3, Google Secret Manager)
//!
//! ## Backends
//!
//! - **aws_secretsmanager**, **aws_ssm**, **aws_s3**: feature-gated (`aws`,
//!   on by default). Credentials come from the default AWS provider chain.
//! - **google_secretmanager**: feature-gated (`gcp`). Uses the gcloud CLI.

use std::collections::HashMap;

use crate::core::context::Context;
use crate::core::resolver::Resolver;
use crate::error::FetchError;

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(feature = "gcp")]
pub mod gcp;

/// Multi-identifier fetch.
pub trait BatchFetch {
    /// Fetch raw values for `identifiers`.
    ///
    /// Identifiers the backend has no data for are absent from the result.
    ///
    /// # Errors
    ///
    /// Transport, auth, or deadline failures. Per-item not-found is not an
    /// error.
    fn fetch_batch(
        &self,
        ctx: &Context,
        identifiers: &[String],
    ) -> Result<HashMap<String, String>, FetchError>;
}

/// Single-identifier fetch.
pub trait ItemFetch {
    /// Fetch the raw value for `identifier`, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Transport, auth, locator, or deadline failures.
    fn fetch(&self, ctx: &Context, identifier: &str) -> Result<Option<String>, FetchError>;
}

/// Resolvers for every compiled-in backend, in registration order.
///
/// The AWS resolvers are present in a default build. With
/// `--no-default-features` and no `gcp` this is empty and every directive
/// ends up unresolved.
pub fn default_resolvers() -> Vec<Box<dyn Resolver>> {
    #[allow(unused_mut)]
    let mut resolvers: Vec<Box<dyn Resolver>> = Vec::new();

    #[cfg(feature = "aws")]
    {
        resolvers.push(Box::new(aws::secrets_manager()));
        resolvers.push(Box::new(aws::ssm()));
        resolvers.push(Box::new(aws::s3()));
    }

    #[cfg(feature = "gcp")]
    resolvers.push(Box::new(gcp::secret_manager()));

    resolvers
}
