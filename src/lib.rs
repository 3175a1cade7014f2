//! secretfrom - resolve secret placeholders in the environment, then exec.
//!
//! Environment values of the form `secretfrom:<type>:<args>` are replaced by
//! secrets fetched from the backend selected by `<type>`. Everything else is
//! passed through untouched.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   └── exec          # Hand off to the target command
//! └── core/             # Core library components
//!     ├── directive     # secretfrom:<type>:<args> parsing
//!     ├── environment   # Process / in-memory environment
//!     ├── resolver/     # Resolver trait, grouping, flattening
//!     │   ├── batch     # One multi-get per resolve
//!     │   └── item      # One get per base identifier
//!     ├── backend/      # Secret store adapters
//!     │   ├── aws       # Secrets Manager, SSM, S3
//!     │   └── gcp       # Google Secret Manager (gcloud)
//!     ├── loader        # push → resolve → commit
//!     └── config        # Log level, timeout
//! ```
//!
//! # Example
//!
//! ```
//! use secretfrom::{Context, Loader, MemoryEnv};
//!
//! let mut env = MemoryEnv::from_pairs([("PLAIN", "value")]);
//! let summary = Loader::new(&mut env).load(&Context::background()).unwrap();
//! assert!(summary.is_empty());
//! assert_eq!(env.get("PLAIN"), Some("value"));
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::backend::{default_resolvers, BatchFetch, ItemFetch};
pub use crate::core::context::Context;
pub use crate::core::directive::{parse_envs, Directive};
pub use crate::core::environment::{Environment, MemoryEnv, ProcessEnv};
pub use crate::core::loader::{load, Loader, Summary};
pub use crate::core::resolver::{BatchResolver, Claim, ItemResolver, Resolver, SecretMap};
pub use crate::error::{Error, Result};
