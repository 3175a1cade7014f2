//! Resolver for backends that only fetch one entry at a time.

use tracing::debug;

use super::{Claim, Connect, Pending, Resolver, SecretMap};
use crate::core::backend::ItemFetch;
use crate::core::context::Context;
use crate::core::directive::Directive;
use crate::error::{Error, FetchError, Result};

/// Issues one [`ItemFetch::fetch`] per distinct base identifier claimed.
///
/// Every fetch must succeed before any directive is assigned.
pub struct ItemResolver<C> {
    backend: String,
    connect: Connect<C>,
    pending: Pending,
}

impl<C: ItemFetch> ItemResolver<C> {
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

impl<C: ItemFetch> Resolver for ItemResolver<C> {
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
        debug!(backend = %self.backend, claimed = self.pending.len(), "resolving items");

        let client = (self.connect)(ctx).map_err(|e| self.fail(e))?;
        let mut secrets = SecretMap::new();

        for identifier in self.pending.identifiers(directives) {
            ctx.check().map_err(|e| self.fail(e))?;
            match client.fetch(ctx, &identifier).map_err(|e| self.fail(e))? {
                Some(raw) => secrets.record(&identifier, raw),
                None => debug!(backend = %self.backend, identifier = %identifier, "not found"),
            }
        }

        let resolved = self.pending.apply(&secrets, directives);
        debug!(backend = %self.backend, resolved, "items resolved");
        Ok(())
    }
}
