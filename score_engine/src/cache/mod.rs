//! [`ResultCache`](crate::traits::ResultCache) implementations.
//!
//! [`MemoryCache`] keeps match snapshots in process with a fixed time-to-live. [`NoCache`] is installed when caching is
//! switched off, so that the lifecycle API never has to special-case a missing cache.
mod memory_cache;
mod no_cache;

pub use memory_cache::MemoryCache;
pub use no_cache::NoCache;

/// Prefix for cache keys. Entries are addressed as `match:data:<id>`.
pub const CACHE_KEY_PREFIX: &str = "match:data:";

/// Default time-to-live for cached snapshots, in seconds.
pub const DEFAULT_CACHE_TTL: u64 = 3600;

pub fn cache_key(id: i64) -> String {
    format!("{CACHE_KEY_PREFIX}{id}")
}
