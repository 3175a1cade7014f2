//! Process environment access.
//!
//! The loader never touches `std::env` directly: it reads and writes through
//! an [`Environment`] so tests can substitute [`MemoryEnv`].

use crate::error::{EnvError, Result};

/// Environment read/write contract.
pub trait Environment {
    /// Full environment as `KEY=VALUE` strings.
    fn vars(&self) -> Vec<String>;

    /// Whether `set(key, value)` would be accepted, without writing.
    ///
    /// # Errors
    ///
    /// `EnvError::InvalidKey` or `EnvError::InvalidValue`.
    fn check(&self, key: &str, value: &str) -> Result<()> {
        validate(key, value)
    }

    /// Set a single variable, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Whatever [`Environment::check`] rejects.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<E: Environment + ?Sized> Environment for &mut E {
    fn vars(&self) -> Vec<String> {
        (**self).vars()
    }

    fn check(&self, key: &str, value: &str) -> Result<()> {
        (**self).check(key, value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Entries the OS refuses (and `std::env::set_var` panics on).
fn validate(key: &str, value: &str) -> Result<()> {
    if key.is_empty() || key.contains('=') || key.contains('\0') {
        return Err(EnvError::InvalidKey(key.to_string()).into());
    }
    if value.contains('\0') {
        return Err(EnvError::InvalidValue(key.to_string()).into());
    }
    Ok(())
}

/// The live process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn vars(&self) -> Vec<String> {
        std::env::vars_os()
            .map(|(k, v)| format!("{}={}", k.to_string_lossy(), v.to_string_lossy()))
            .collect()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check(key, value)?;
        std::env::set_var(key, value);
        Ok(())
    }
}

/// In-memory environment, insertion ordered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnv {
    entries: Vec<(String, String)>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut env = Self::new();
        for (k, v) in pairs {
            env.insert(k.into(), v.into());
        }
        env
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl Environment for MemoryEnv {
    fn vars(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check(key, value)?;
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
