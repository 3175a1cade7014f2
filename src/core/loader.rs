//! Load pass orchestration.
//!
//! A [`Loader`] runs one forward pass:
//!
//! ```text
//! Init → DirectivesLoaded → PushedToResolvers → Resolved → Committed
//! ```
//!
//! Nothing is written to the environment until every resolver succeeded, so
//! a failure in any phase leaves the environment exactly as it was.

use std::fmt;

use tracing::{debug, warn};

use crate::core::backend::default_resolvers;
use crate::core::context::Context;
use crate::core::directive::{parse_envs, Directive};
use crate::core::environment::{Environment, ProcessEnv};
use crate::core::resolver::{Claim, Resolver};
use crate::core::types::EnvKey;
use crate::error::{Error, Result};

/// Substitute directive source, used instead of parsing the environment.
pub type DirectiveSource = Box<dyn FnOnce() -> Result<Vec<Directive>>>;

/// Phases of a load pass, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    DirectivesLoaded,
    PushedToResolvers,
    Resolved,
    Committed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::DirectivesLoaded => "directives-loaded",
            Self::PushedToResolvers => "pushed-to-resolvers",
            Self::Resolved => "resolved",
            Self::Committed => "committed",
        };
        f.write_str(name)
    }
}

/// Keys written by a completed load pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Keys set to a fetched secret value.
    pub resolved: Vec<EnvKey>,
    /// Keys set to an empty value because no resolver produced one.
    pub unresolved: Vec<EnvKey>,
}

impl Summary {
    /// Total directives committed.
    pub fn len(&self) -> usize {
        self.resolved.len() + self.unresolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drives directives through the registered resolvers and commits results.
///
/// Single use: [`Loader::load`] consumes the loader, since resolvers keep
/// their claimed directives.
pub struct Loader<E> {
    env: E,
    resolvers: Vec<Box<dyn Resolver>>,
    source: Option<DirectiveSource>,
}

impl<E: Environment> Loader<E> {
    /// Loader over `env` with no resolvers.
    pub fn new(env: E) -> Self {
        Self {
            env,
            resolvers: Vec::new(),
            source: None,
        }
    }

    /// Register a resolver after those already registered.
    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Register several resolvers, keeping their order.
    pub fn with_resolvers(mut self, resolvers: impl IntoIterator<Item = Box<dyn Resolver>>) -> Self {
        self.resolvers.extend(resolvers);
        self
    }

    /// Take directives from `source` instead of parsing the environment.
    pub fn with_source<F>(mut self, source: F) -> Self
    where
        F: FnOnce() -> Result<Vec<Directive>> + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Run the load pass.
    ///
    /// Unresolved directives are not an error: they are logged and their key
    /// is set to an empty value.
    ///
    /// # Errors
    ///
    /// - `DirectiveSource` if directives cannot be obtained
    /// - `Push` if a resolver rejects a directive with an error
    /// - `Resolve` if a resolver fails to fetch; later resolvers do not run
    /// - `Commit` if the environment refuses a key or value; every entry is
    ///   checked before the first write
    pub fn load(self, ctx: &Context) -> Result<Summary> {
        let Self {
            mut env,
            mut resolvers,
            source,
        } = self;
        debug!(stage = %Stage::Init, resolvers = resolvers.len(), "loading");

        let mut directives = match source {
            Some(source) => source(),
            None => parse_envs(&env.vars()).map_err(Error::from),
        }
        .map_err(|e| Error::DirectiveSource(Box::new(e)))?;
        debug!(stage = %Stage::DirectivesLoaded, directives = directives.len());

        for (index, directive) in directives.iter().enumerate() {
            for resolver in resolvers.iter_mut() {
                match resolver.push(index, directive) {
                    Ok(Claim::Claimed) | Ok(Claim::NotInterested) => {}
                    Err(e) => return Err(Error::Push(Box::new(e))),
                }
            }
        }
        debug!(stage = %Stage::PushedToResolvers);

        for resolver in resolvers.iter_mut() {
            resolver
                .resolve(ctx, &mut directives)
                .map_err(|e| Error::Resolve(Box::new(e)))?;
        }
        debug!(stage = %Stage::Resolved);

        for directive in &directives {
            env.check(directive.key(), directive.value())
                .map_err(|e| Error::Commit(Box::new(e)))?;
        }

        let mut summary = Summary::default();
        for directive in &directives {
            if directive.is_resolved() {
                summary.resolved.push(directive.key().to_string());
            } else {
                warn!(
                    key = %directive.key(),
                    backend = %directive.backend(),
                    "env not resolved"
                );
                summary.unresolved.push(directive.key().to_string());
            }
            env.set(directive.key(), directive.value())
                .map_err(|e| Error::Commit(Box::new(e)))?;
        }
        debug!(
            stage = %Stage::Committed,
            resolved = summary.resolved.len(),
            unresolved = summary.unresolved.len()
        );

        Ok(summary)
    }
}

/// Resolve `secretfrom:` entries of the live process environment with every
/// compiled-in backend.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load(ctx: &Context) -> Result<Summary> {
    Loader::new(ProcessEnv)
        .with_resolvers(default_resolvers())
        .load(ctx)
}
