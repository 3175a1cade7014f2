//! Resolver protocol.
//!
//! A load pass drives every resolver through two phases:
//!
//! 1. **push**: each directive is offered to each resolver. A resolver whose
//!    backend tag matches records the directive and answers
//!    [`Claim::Claimed`]; every other resolver answers
//!    [`Claim::NotInterested`].
//! 2. **resolve**: each resolver fetches everything it claimed in one pass and
//!    writes the values into the claimed directives.
//!
//! Claimed locators are grouped by base identifier (the part before the first
//! `.`) so nested-key references to the same backend entry cost one fetch.
//! A fetched value that parses as a flat JSON string map additionally exposes
//! each inner key as `base.innerKey`.
//!
//! ## Adding a New Backend
//!
//! 1. Implement [`BatchFetch`](crate::core::backend::BatchFetch) if the backend
//!    has a multi-get API, otherwise [`ItemFetch`](crate::core::backend::ItemFetch)
//! 2. Wrap it in [`BatchResolver`] or [`ItemResolver`] with its type tag
//! 3. Register it in [`default_resolvers`](crate::core::backend::default_resolvers)

mod batch;
mod item;

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::debug;
use zeroize::Zeroize;

use crate::core::constants::NESTED_SEPARATOR;
use crate::core::context::Context;
use crate::core::directive::Directive;
use crate::error::{FetchError, Result};

pub use batch::BatchResolver;
pub use item::ItemResolver;

/// Lazily builds a backend client. Only called when something was claimed.
pub type Connect<C> = Box<dyn Fn(&Context) -> std::result::Result<C, FetchError>>;

/// Outcome of offering a directive to a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The resolver will fetch this directive.
    Claimed,
    /// The directive targets another backend.
    NotInterested,
}

/// Secret backend resolver.
///
/// Instances live for a single load pass: claimed directives accumulate and
/// are never reset.
pub trait Resolver {
    /// Backend type tag this resolver claims.
    fn backend(&self) -> &str;

    /// Offer the directive at `index` of the load pass.
    ///
    /// # Errors
    ///
    /// Any error aborts the load. Routing mismatches are not errors, they
    /// return `Claim::NotInterested`.
    fn push(&mut self, index: usize, directive: &Directive) -> Result<Claim>;

    /// Fetch every claimed directive and assign values in place.
    ///
    /// Directives with no match in the fetched data stay unresolved. A no-op
    /// when nothing was claimed.
    ///
    /// # Errors
    ///
    /// `Error::BackendFetch` if connecting or fetching fails. No directive
    /// is modified in that case.
    fn resolve(&mut self, ctx: &Context, directives: &mut [Directive]) -> Result<()>;
}

/// Directives claimed during the push phase, by load-pass index.
#[derive(Debug, Default, Clone)]
pub struct Pending {
    indices: Vec<usize>,
}

impl Pending {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the directive if its backend tag equals `backend`.
    pub fn offer(&mut self, backend: &str, index: usize, directive: &Directive) -> Claim {
        if directive.backend() != backend {
            return Claim::NotInterested;
        }
        debug!(backend, key = %directive.key(), "claimed");
        self.indices.push(index);
        Claim::Claimed
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Distinct base identifiers across the claimed directives, sorted.
    pub fn identifiers(&self, directives: &[Directive]) -> Vec<String> {
        self.claimed(directives)
            .map(Directive::base_identifier)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Assign every claimed directive whose full locator is in `secrets`.
    ///
    /// Returns the number of directives resolved.
    pub fn apply(&self, secrets: &SecretMap, directives: &mut [Directive]) -> usize {
        let mut resolved = 0;
        for &index in &self.indices {
            let Some(directive) = directives.get_mut(index) else {
                continue;
            };
            if let Some(value) = secrets.get(directive.args()) {
                directive.resolve(value);
                resolved += 1;
            }
        }
        resolved
    }

    fn claimed<'a>(&'a self, directives: &'a [Directive]) -> impl Iterator<Item = &'a Directive> {
        self.indices.iter().filter_map(|&i| directives.get(i))
    }
}

/// Fetched values keyed by identifier, with nested entries flattened in.
///
/// Values are zeroized on drop.
#[derive(Default)]
pub struct SecretMap {
    values: HashMap<String, String>,
}

impl SecretMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw backend value under `identifier`.
    ///
    /// If the value is a JSON object whose values are all strings, each pair
    /// is also recorded as `identifier.innerKey`. Anything else is a scalar.
    pub fn record(&mut self, identifier: &str, raw: String) {
        if let Some(nested) = flatten(&raw) {
            for (inner, value) in nested {
                let key = format!("{}{}{}", identifier, NESTED_SEPARATOR, inner);
                debug!(key = %key, "nested secret");
                self.values.insert(key, value);
            }
        }
        debug!(key = %identifier, "secret");
        self.values.insert(identifier.to_string(), raw);
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.values.get(identifier).map(String::as_str)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.values.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Drop for SecretMap {
    fn drop(&mut self) {
        for value in self.values.values_mut() {
            value.zeroize();
        }
    }
}

/// Parse a flat string-to-string JSON object.
fn flatten(raw: &str) -> Option<Vec<(String, String)>> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };
    map.into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect()
}
