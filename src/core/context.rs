//! Deadline propagation into backend calls.

use std::time::{Duration, Instant};

use crate::error::FetchError;

/// Cancellation context for a load pass.
///
/// Carries an optional deadline. Backends check it before each round-trip
/// and bound async calls and child processes with [`Context::remaining`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// Context without a deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Build from an optional timeout.
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::background, Self::with_timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when unbounded.
    ///
    /// # Errors
    ///
    /// `DeadlineExceeded` once the deadline has passed.
    pub fn remaining(&self) -> Result<Option<Duration>, FetchError> {
        match self.deadline {
            None => Ok(None),
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    Err(FetchError::DeadlineExceeded)
                } else {
                    Ok(Some(left))
                }
            }
        }
    }

    /// Fail fast if the deadline has passed.
    pub fn check(&self) -> Result<(), FetchError> {
        self.remaining().map(|_| ())
    }
}
