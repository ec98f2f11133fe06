//! Cache types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk wrapper for a cached stats record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedStats<T> {
    pub last_updated: DateTime<Utc>,
    pub stats: T,
}

impl<T> CachedStats<T> {
    pub fn new(stats: T) -> Self {
        Self {
            last_updated: Utc::now(),
            stats,
        }
    }

    /// Whether the record is still within the TTL window
    pub fn is_fresh(&self, ttl: std::time::Duration) -> bool {
        let age = Utc::now()
            .signed_duration_since(self.last_updated)
            .to_std()
            .unwrap_or(std::time::Duration::MAX);
        age < ttl
    }
}

/// Statistics about the cache, exposed via the health endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_fresh_record_within_ttl() {
        let record = CachedStats::new("payload");
        assert!(record.is_fresh(Duration::from_secs(60)));
    }

    #[test]
    fn test_stale_record_past_ttl() {
        let mut record = CachedStats::new("payload");
        record.last_updated = Utc::now() - chrono::Duration::hours(13);
        assert!(!record.is_fresh(Duration::from_secs(12 * 60 * 60)));
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = CachedStats::new(vec![1, 2, 3]);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("last_updated"));

        let back: CachedStats<Vec<i32>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats, vec![1, 2, 3]);
    }
}
