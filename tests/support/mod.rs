//! Test support utilities for secretfrom integration tests.
//!
//! Provides an isolated environment builder and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

/// Environment handed to the secretfrom binary.
///
/// The child starts from an empty environment plus PATH, so ambient
/// variables from the test runner never leak into a load pass.
#[derive(Default)]
pub struct Test {
    pub vars: Vec<(String, String)>,
}

impl Test {
    /// Create a test with only PATH set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable for the child.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.vars.push((key.to_string(), value.to_string()));
        self
    }
}
