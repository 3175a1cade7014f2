//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An environment variable name (e.g., DATABASE_URL).
pub type EnvKey = String;

/// A backend type tag (e.g., `aws_ssm`).
///
/// Selects which resolver claims a directive.
pub type BackendType = String;

/// A backend locator, optionally suffixed with `.innerKey`.
///
/// The part before the first `.` is the base identifier sent to the backend.
pub type Identifier = String;
