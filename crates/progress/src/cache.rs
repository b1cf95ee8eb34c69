//! Memoization of computed progress.
//!
//! Entries are keyed by `(key result, latest check-in timestamp)`, so a new
//! check-in naturally misses. A hit also requires the exact `as_of` the
//! result was computed for, since expected progress and pace move with it.
//! Callers that record check-ins still invalidate explicitly, which also
//! covers check-ins that do not move the latest timestamp.

use std::collections::HashMap;
use okr_core::{KeyResultId, ProgressResult, Time};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::config::CacheConfig;

type CacheKey = (KeyResultId, Option<Time>);

#[derive(Debug, Clone)]
struct Entry {
    result: ProgressResult,
    inserted_at: Instant,
}

/// Time-bounded memo of [`ProgressResult`]s.
#[derive(Debug, Default)]
pub struct ProgressCache {
    config: CacheConfig,
    entries: RwLock<HashMap<CacheKey, Entry>>,
}

impl ProgressCache {
    /// Create a cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached result for the key, if it was computed for exactly `as_of`
    /// and has not expired.
    pub async fn get(
        &self,
        key_result_id: KeyResultId,
        latest_check_in: Option<Time>,
        as_of: Time,
    ) -> Option<ProgressResult> {
        if !self.config.enabled {
            return None;
        }
        let entries = self.entries.read().await;
        let entry = entries.get(&(key_result_id, latest_check_in))?;
        if entry.result.as_of != as_of || entry.inserted_at.elapsed() >= self.config.ttl {
            return None;
        }
        debug!(key_result_id = %key_result_id, "Progress cache hit");
        Some(entry.result.clone())
    }

    /// Store a result, replacing anything older for the same key result.
    pub async fn insert(&self, latest_check_in: Option<Time>, result: ProgressResult) {
        if !self.config.enabled {
            return;
        }
        let key_result_id = result.key_result_id;
        let mut entries = self.entries.write().await;
        entries.retain(|(id, _), _| *id != key_result_id);
        entries.insert(
            (key_result_id, latest_check_in),
            Entry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry for a key result.
    pub async fn invalidate(&self, key_result_id: KeyResultId) {
        let mut entries = self.entries.write().await;
        entries.retain(|(id, _), _| *id != key_result_id);
        debug!(key_result_id = %key_result_id, "Progress cache invalidated");
    }

    /// Drop expired entries.
    pub async fn purge_expired(&self) -> usize {
        let ttl = self.config.ttl;
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        before - entries.len()
    }

    /// Drop everything.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use chrono::{TimeZone, Utc};
    use okr_core::{CheckIn, KeyResult, ObjectiveId};
    use crate::engine::compute_kr_progress;

    fn at(m: u32, d: u32) -> Time {
        Utc.with_ymd_and_hms(2025, m, d, 8, 0, 0).unwrap()
    }

    fn sample(as_of: Time) -> (KeyResult, ProgressResult) {
        let kr = KeyResult::new(ObjectiveId::new(), "Cached", 0.0, 10.0, 2025);
        let check_ins = [CheckIn::new(kr.id, 4.0, at(2, 1))];
        let result = compute_kr_progress(&kr, &check_ins, &[], 2025, as_of).unwrap();
        (kr, result)
    }

    #[tokio::test]
    async fn test_hit_requires_same_key_and_as_of() {
        let cache = ProgressCache::new(CacheConfig::default());
        let (kr, result) = sample(at(3, 1));
        let latest = Some(at(2, 1));
        cache.insert(latest, result.clone()).await;

        assert_eq!(cache.get(kr.id, latest, at(3, 1)).await, Some(result));
        assert!(cache.get(kr.id, Some(at(2, 2)), at(3, 1)).await.is_none());
        assert!(cache.get(kr.id, latest, at(3, 2)).await.is_none());
        // same day, later in it
        let later = at(3, 1) + chrono::Duration::hours(15);
        assert!(cache.get(kr.id, latest, later).await.is_none());
        assert!(cache.get(KeyResultId::new(), latest, at(3, 1)).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_older_entries() {
        let cache = ProgressCache::new(CacheConfig::default());
        let (_, result) = sample(at(3, 1));
        cache.insert(Some(at(2, 1)), result.clone()).await;
        cache.insert(Some(at(2, 20)), result).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = ProgressCache::new(CacheConfig::default());
        let (kr, result) = sample(at(3, 1));
        cache.insert(None, result).await;
        cache.invalidate(kr.id).await;
        assert!(cache.is_empty().await);
        assert!(cache.get(kr.id, None, at(3, 1)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = ProgressCache::new(CacheConfig {
            ttl: Duration::from_secs(60),
            enabled: true,
        });
        let (kr, result) = sample(at(3, 1));
        cache.insert(None, result).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(cache.get(kr.id, None, at(3, 1)).await.is_some());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.get(kr.id, None, at(3, 1)).await.is_none());
        assert_eq!(cache.purge_expired().await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_disabled_cache_stores_nothing() {
        let cache = ProgressCache::new(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });
        let (kr, result) = sample(at(3, 1));
        cache.insert(None, result).await;
        assert!(cache.is_empty().await);
        assert!(cache.get(kr.id, None, at(3, 1)).await.is_none());
    }
}
