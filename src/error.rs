//! Error types for the LRU cache
//!
//! Provides unified error handling using thiserror.

use std::collections::TryReserveError;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and insertion.
///
/// A lookup miss is not an error; `get` reports it as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be at least one entry
    #[error("Invalid capacity: must be greater than zero")]
    InvalidCapacity,

    /// Bucket count must be at least one chain
    #[error("Invalid bucket count: must be greater than zero")]
    InvalidBucketCount,

    /// Storage for an entry, key copy or bucket array could not be reserved
    #[error("Allocation failure: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
