//! LRU Index demo driver
//!
//! Builds a cache from environment configuration and walks it through
//! filling, promotion on read, in-place update, eviction and misses,
//! printing the MRU-to-LRU order after each phase.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_index::config::{Config, DumpFormat};
use lru_index::LruCache;

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache
/// 4. Replay the demo phases, printing a snapshot after each
/// 5. Destroy the cache
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, bucket_count={}, dump_format={:?}",
        config.capacity, config.bucket_count, config.dump_format
    );

    let mut cache = LruCache::from_config(&config).with_context(|| {
        format!(
            "failed to create LRU cache (capacity={}, bucket_count={})",
            config.capacity, config.bucket_count
        )
    })?;
    info!("LRU cache created (capacity: {})", cache.capacity());

    info!("Phase 1: filling the cache");
    for (key, value) in [("A", 10), ("B", 20), ("C", 30), ("D", 40)] {
        cache.put(key, value).context("put failed")?;
    }
    print_snapshot(&cache, config.dump_format)?;

    info!("Phase 2: accessing data (cache hit)");
    report_lookup(&mut cache, "B");
    print_snapshot(&cache, config.dump_format)?;

    info!("Phase 3: updating 'A' to 15");
    cache.put("A", 15).context("put failed")?;
    print_snapshot(&cache, config.dump_format)?;

    info!("Phase 4: eviction");
    for (key, value) in [("E", 50), ("F", 60)] {
        let victim = cache.dump().last().map(|(k, _)| k.clone());
        info!("Inserting '{}' (LRU item {:?} is the eviction candidate)", key, victim);
        cache.put(key, value).context("put failed")?;
        print_snapshot(&cache, config.dump_format)?;
    }

    info!("Phase 5: accessing evicted data (cache miss)");
    report_lookup(&mut cache, "C");
    report_lookup(&mut cache, "Z");

    let stats = cache.stats();
    info!(
        "Stats: hits={}, misses={}, evictions={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.hit_rate()
    );

    let released = cache.destroy();
    info!("Cache destroyed, released {} entries", released);
    Ok(())
}

/// Looks a key up and logs the outcome.
fn report_lookup(cache: &mut LruCache, key: &str) {
    match cache.get(key) {
        Some(value) => info!("Accessed '{}': {}. '{}' moves to MRU.", key, value, key),
        None => warn!("Cache miss for '{}'", key),
    }
}

/// Prints the cache contents in the configured format.
fn print_snapshot(cache: &LruCache, format: DumpFormat) -> Result<()> {
    let snapshot = cache.snapshot();
    match format {
        DumpFormat::Text => println!("{}", snapshot),
        DumpFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?
        ),
    }
    Ok(())
}
