//! Snapshot models for cache diagnostics
//!
//! This module defines the DTOs used to render a cache's contents,
//! either as text or serialized to JSON.

pub mod snapshot;

// Re-export commonly used types
pub use snapshot::{CacheSnapshot, EntryView};
