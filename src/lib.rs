//! LRU Index - A fixed-capacity least-recently-used cache
//!
//! Combines a chained hash index with an intrusive recency list over one
//! arena of entries, giving O(1) amortized get, put and eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{LruCache, Value};
pub use config::Config;
pub use error::{CacheError, Result};
