//! Time-windowed store of recent match results.

mod types;

pub use types::{CacheEntry, MatchResult};

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Observation time -> result. Entries older than the attention span are
/// dropped by [`ResultCache::evict`]; nothing else removes them except a purge.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: BTreeMap<DateTime<Utc>, MatchResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, overwriting any entry with the same timestamp.
    pub fn put(&mut self, observed_at: DateTime<Utc>, result: MatchResult) {
        self.entries.insert(observed_at, result);
    }

    /// Drop every entry with `now - observed_at > attention_span`.
    /// An entry exactly `attention_span` old is kept. Returns how many were removed.
    ///
    /// A span reaching past the earliest representable time keeps everything.
    pub fn evict(&mut self, now: DateTime<Utc>, attention_span: Duration) -> usize {
        let Some(oldest_alive) = now.checked_sub_signed(attention_span) else {
            return 0;
        };
        let before = self.entries.len();
        self.entries = self.entries.split_off(&oldest_alive);
        before - self.entries.len()
    }

    pub fn purge_all(&mut self) {
        self.entries.clear();
    }

    /// Entry with the newest observation time. Does not evict.
    pub fn latest(&self) -> Option<CacheEntry> {
        self.entries
            .last_key_value()
            .map(|(observed_at, result)| CacheEntry {
                observed_at: *observed_at,
                result: result.clone(),
            })
    }

    pub fn get(&self, observed_at: &DateTime<Utc>) -> Option<&MatchResult> {
        self.entries.get(observed_at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle to the cache. The scheduling side writes, the renderer reads.
///
/// Eviction and insertion of one prediction happen under a single write lock
/// (see [`CacheHandle::evict_then_put`]) so a fresh entry can't be lost between them.
#[derive(Debug, Clone, Default)]
pub struct CacheHandle {
    inner: Arc<RwLock<ResultCache>>,
}

impl CacheHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evict_then_put(
        &self,
        now: DateTime<Utc>,
        attention_span: Duration,
        result: MatchResult,
    ) -> usize {
        let mut cache = self.write();
        let evicted = cache.evict(now, attention_span);
        cache.put(now, result);
        evicted
    }

    pub fn evict(&self, now: DateTime<Utc>, attention_span: Duration) -> usize {
        self.write().evict(now, attention_span)
    }

    pub fn purge_all(&self) {
        self.write().purge_all();
    }

    pub fn latest(&self) -> Option<CacheEntry> {
        self.read().latest()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, ResultCache> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, ResultCache> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn result(symbol: &str) -> MatchResult {
        MatchResult::new(format!("label {symbol}"), symbol)
    }

    #[test]
    fn test_latest_is_newest_regardless_of_insert_order() {
        let mut cache = ResultCache::new();
        cache.put(at(3), result("c"));
        cache.put(at(1), result("a"));
        cache.put(at(2), result("b"));

        let latest = cache.latest().unwrap();
        assert_eq!(latest.observed_at, at(3));
        assert_eq!(latest.result.symbol, "c");
    }

    #[test]
    fn test_put_overwrites_same_timestamp() {
        let mut cache = ResultCache::new();
        cache.put(at(1), result("a"));
        cache.put(at(1), result("b"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&at(1)).unwrap().symbol, "b");
    }

    #[test]
    fn test_evict_keeps_boundary_and_is_idempotent() {
        let mut cache = ResultCache::new();
        for secs in 0..=10 {
            cache.put(at(secs), result(&secs.to_string()));
        }

        let span = Duration::seconds(5);
        let removed = cache.evict(at(10), span);
        assert_eq!(removed, 5);
        assert_eq!(cache.len(), 6);
        assert!(cache.get(&at(5)).is_some(), "entry exactly at the span is kept");
        assert!(cache.get(&at(4)).is_none());

        assert_eq!(cache.evict(at(10), span), 0);
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn test_evict_subsecond_boundary() {
        let mut cache = ResultCache::new();
        let base = at(0);
        cache.put(base, result("old"));
        cache.put(base + Duration::milliseconds(1), result("young"));

        cache.evict(base + Duration::milliseconds(1001), Duration::seconds(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.latest().unwrap().result.symbol, "young");
    }

    #[test]
    fn test_evict_with_out_of_range_span_keeps_everything() {
        let mut cache = ResultCache::new();
        cache.put(at(0), result("a"));
        cache.put(at(1), result("b"));

        assert_eq!(cache.evict(at(2), Duration::days(1_000_000_000)), 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_latest_does_not_evict_and_purge_empties() {
        let mut cache = ResultCache::new();
        cache.put(at(0), result("a"));
        assert!(cache.latest().is_some());
        assert_eq!(cache.len(), 1);

        cache.purge_all();
        assert!(cache.is_empty());
        assert!(cache.latest().is_none());
    }

    #[test]
    fn test_handle_evicts_before_put() {
        let handle = CacheHandle::new();
        handle.evict_then_put(at(0), Duration::seconds(1), result("a"));
        let evicted = handle.evict_then_put(at(5), Duration::seconds(1), result("b"));

        assert_eq!(evicted, 1);
        assert_eq!(handle.len(), 1);
        assert_eq!(handle.latest().unwrap().result.symbol, "b");

        let reader = handle.clone();
        handle.purge_all();
        assert!(reader.is_empty());
    }
}
