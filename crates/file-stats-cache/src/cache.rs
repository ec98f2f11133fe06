//! Cache implementation

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::types::{CacheStats, CachedStats};

/// File-based TTL cache for per-user stats records and rendered SVGs
///
/// JSON records live at `{dir}/{username}_github_stats.json`, rendered SVGs
/// at `{dir}/svg/{username}.svg`. Usernames are sanitized before being used
/// as path components.
pub struct StatsCache {
    dir: PathBuf,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StatsCache {
    pub fn new(dir: PathBuf, ttl: Duration) -> Self {
        Self {
            dir,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create the cache directories if they do not exist
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(self.svg_dir()).await?;
        info!(dir = %self.dir.display(), "Initialized stats cache");
        Ok(())
    }

    /// TTL applied to JSON records
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn svg_dir(&self) -> PathBuf {
        self.dir.join("svg")
    }

    fn json_path(&self, username: &str) -> PathBuf {
        self.dir
            .join(format!("{}_github_stats.json", sanitize_name(username)))
    }

    fn svg_path(&self, username: &str) -> PathBuf {
        self.svg_dir()
            .join(format!("{}.svg", sanitize_name(username)))
    }

    /// Load a user's stats record if present, fresh, and well-formed
    ///
    /// Any failure mode (missing file, expired record, unreadable JSON)
    /// counts as a miss; the caller is expected to refetch.
    pub async fn load_json<T: DeserializeOwned>(&self, username: &str) -> Option<T> {
        let path = self.json_path(username);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(_) => {
                debug!(username, "No cache record");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let record: CachedStats<T> = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                warn!(username, error = %e, "Cache record does not match schema, refetching");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if !record.is_fresh(self.ttl) {
            info!(username, "Cache record expired");
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(record.stats)
    }

    /// Persist a user's stats record, stamping it with the current time
    pub async fn store_json<T: Serialize>(&self, username: &str, stats: &T) -> Result<()> {
        let record = CachedStats::new(stats);
        let json = serde_json::to_string_pretty(&record)?;
        let path = self.json_path(username);
        write_atomic(&path, json.as_bytes()).await?;
        info!(username, path = %path.display(), "Stored stats record");
        Ok(())
    }

    /// Load a rendered SVG if one exists
    ///
    /// Freshness is not checked here: the SVG is derived from the JSON
    /// record, so the caller gates on the JSON record's freshness.
    pub async fn load_svg(&self, username: &str) -> Option<String> {
        fs::read_to_string(self.svg_path(username)).await.ok()
    }

    /// Persist a rendered SVG
    pub async fn store_svg(&self, username: &str, svg: &str) -> Result<()> {
        let path = self.svg_path(username);
        write_atomic(&path, svg.as_bytes()).await?;
        debug!(username, path = %path.display(), "Stored rendered SVG");
        Ok(())
    }

    /// Snapshot of cache counters and the number of stored JSON records
    pub async fn stats(&self) -> CacheStats {
        let mut entries = 0;
        if let Ok(mut dir) = fs::read_dir(&self.dir).await {
            while let Ok(Some(entry)) = dir.next_entry().await {
                if entry.path().extension().is_some_and(|ext| ext == "json") {
                    entries += 1;
                }
            }
        }

        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Write via a temp file, fsync, and rename so readers never see partial
/// contents and a crash cannot publish a truncated record under the final name
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Replace path-hostile characters so usernames map to safe filenames
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestStats {
        stars: u64,
        commits: u64,
    }

    fn test_stats() -> TestStats {
        TestStats {
            stars: 42,
            commits: 1700,
        }
    }

    #[tokio::test]
    async fn test_store_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();

        cache.store_json("octocat", &test_stats()).await.unwrap();
        let loaded: Option<TestStats> = cache.load_json("octocat").await;

        assert_eq!(loaded, Some(test_stats()));
    }

    #[tokio::test]
    async fn test_missing_record_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();

        let loaded: Option<TestStats> = cache.load_json("nobody").await;
        assert!(loaded.is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_expired_record_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::ZERO);
        cache.init().await.unwrap();

        cache.store_json("octocat", &test_stats()).await.unwrap();
        let loaded: Option<TestStats> = cache.load_json("octocat").await;

        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();

        fs::write(dir.path().join("octocat_github_stats.json"), "not json")
            .await
            .unwrap();

        let loaded: Option<TestStats> = cache.load_json("octocat").await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();

        // Valid wrapper, wrong inner shape
        cache
            .store_json("octocat", &serde_json::json!({ "unexpected": true }))
            .await
            .unwrap();

        let loaded: Option<TestStats> = cache.load_json("octocat").await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_svg_round_trip() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();

        assert!(cache.load_svg("octocat").await.is_none());

        cache.store_svg("octocat", "<svg></svg>").await.unwrap();
        assert_eq!(cache.load_svg("octocat").await.as_deref(), Some("<svg></svg>"));
    }

    #[tokio::test]
    async fn test_hit_and_entry_counters() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();

        cache.store_json("octocat", &test_stats()).await.unwrap();
        let _: Option<TestStats> = cache.load_json("octocat").await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_write_atomic_syncs_and_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("octocat_github_stats.json");

        write_atomic(&path, b"{\"stars\":42}").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "{\"stars\":42}");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_sanitize_name_strips_path_separators() {
        assert_eq!(sanitize_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_name("octo-cat_99"), "octo-cat_99");
    }

    #[tokio::test]
    async fn test_hostile_username_stays_inside_cache_dir() {
        let dir = tempdir().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        cache.init().await.unwrap();

        cache.store_json("../escape", &test_stats()).await.unwrap();

        // The record landed inside the cache dir, not the parent
        let loaded: Option<TestStats> = cache.load_json("../escape").await;
        assert_eq!(loaded, Some(test_stats()));
        assert!(dir.path().join(".._escape_github_stats.json").exists());
    }
}
