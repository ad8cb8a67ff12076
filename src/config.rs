//! Configuration Module
//!
//! Handles loading cache and demo settings from environment variables.

use std::env;
use std::str::FromStr;

/// Output format used when printing cache snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    /// `MRU -> ['key': value] -> ... -> LRU`
    #[default]
    Text,
    /// Pretty-printed JSON snapshot
    Json,
}

impl FromStr for DumpFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(DumpFormat::Text),
            "json" => Ok(DumpFormat::Json),
            other => Err(format!("unknown dump format: {}", other)),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Number of hash chains in the index
    pub bucket_count: usize,
    /// Snapshot output format for the demo binary
    pub dump_format: DumpFormat,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 4)
    /// - `CACHE_BUCKETS` - Hash index bucket count (default: 16)
    /// - `DUMP_FORMAT` - `text` or `json` (default: text)
    ///
    /// Unparseable values fall back to their defaults. Zero is passed through
    /// so that cache construction can reject it.
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            bucket_count: env::var("CACHE_BUCKETS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16),
            dump_format: env::var("DUMP_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 4,
            bucket_count: 16,
            dump_format: DumpFormat::Text,
        }
    }
}
