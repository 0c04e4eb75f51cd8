//! Error types for evictkit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (zero capacity, out-of-range workload fractions).
//! - [`InvariantError`]: Returned by `check_invariants` methods when the
//!   cross-referenced engine structures disagree.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::{EvictionEngine, EvictionPolicy};
//!
//! let err = EvictionEngine::<u64, u64>::new(0, EvictionPolicy::Lru).unwrap_err();
//! assert_eq!(err.message(), "Cache capacity must be greater than 0.");
//! ```

use thiserror::Error;

/// Message carried by [`ConfigError`] when a cache is built with capacity 0.
pub const ZERO_CAPACITY_MESSAGE: &str = "Cache capacity must be greater than 0.";

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache or workload configuration is invalid.
///
/// Construction fails as a whole; no partially built engine is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The error raised for a zero capacity.
    #[inline]
    pub fn zero_capacity() -> Self {
        Self::new(ZERO_CAPACITY_MESSAGE)
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}
