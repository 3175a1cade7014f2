//! Core library components.
//!
//! Directive parsing, the resolver protocol, backend adapters, and the
//! loader that ties them together.

pub mod backend;
pub mod config;
pub mod constants;
pub mod context;
pub mod directive;
pub mod environment;
pub mod loader;
pub mod resolver;
pub mod types;

pub use loader::load;
