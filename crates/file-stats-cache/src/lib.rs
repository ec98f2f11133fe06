//! File-based TTL cache for aggregated stats records
//!
//! Stores per-user JSON records (wrapped with a `last_updated` timestamp)
//! and rendered SVG documents on disk. Reads are read-through: a record
//! that is missing, expired, or unreadable is reported as a miss so the
//! caller refetches. There is no eviction beyond the TTL comparison.

mod cache;
mod error;
mod types;

pub use cache::StatsCache;
pub use error::{CacheError, Result};
pub use types::{CacheStats, CachedStats};
