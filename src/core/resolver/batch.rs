//! Resolver for backends with a multi-get API.

use tracing::debug;

use super::{Claim, Connect, Pending, Resolver, SecretMap};
use crate::core::backend::BatchFetch;
use crate::core::context::Context;
use crate::core::directive::Directive;
use crate::error::{Error, FetchError, Result};

/// Issues exactly one [`BatchFetch::fetch_batch`] per resolve call, covering
/// every distinct base identifier claimed.
pub struct BatchResolver<C> {
    backend: String,
    connect: Connect<C>,
    pending: Pending,
}

impl<C: BatchFetch> BatchResolver<C> {
    /// Create a resolver for `backend` that connects lazily via `connect`.
    pub fn new<F>(backend: impl Into<String>, connect: F) -> Self
    where
        F: Fn(&Context) -> std::result::Result<C, FetchError> + 'static,
    {
        Self {
            backend: backend.into(),
            connect: Box::new(connect),
            pending: Pending::new(),
        }
    }

    fn fail(&self, source: FetchError) -> Error {
        Error::fetch(&self.backend, source)
    }
}

impl<C: BatchFetch> Resolver for BatchResolver<C> {
    fn backend(&self) -> &str {
        &self.backend
    }

    fn push(&mut self, index: usize, directive: &Directive) -> Result<Claim> {
        Ok(self.pending.offer(&self.backend, index, directive))
    }

    fn resolve(&mut self, ctx: &Context, directives: &mut [Directive]) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        debug!(backend = %self.backend, claimed = self.pending.len(), "resolving batch");

        let client = (self.connect)(ctx).map_err(|e| self.fail(e))?;
        let identifiers = self.pending.identifiers(directives);
        let fetched = client
            .fetch_batch(ctx, &identifiers)
            .map_err(|e| self.fail(e))?;

        let mut secrets = SecretMap::new();
        for (identifier, raw) in fetched {
            secrets.record(&identifier, raw);
        }

        let resolved = self.pending.apply(&secrets, directives);
        debug!(backend = %self.backend, resolved, "batch resolved");
        Ok(())
    }
}
