//! Memoization of derived results with LRU eviction and single-flight
//! coalescing.
//!
//! Every key owns a `tokio::sync::OnceCell`. The map lock is held only to
//! find or create that cell; the computation itself runs outside the lock,
//! and concurrent callers for the same key await the same cell instead of
//! computing again. A failed computation leaves the cell empty, so the next
//! caller retries. If the caller driving a computation is dropped, one of the
//! waiters takes over.

use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

type Slot<V> = Arc<OnceCell<Arc<V>>>;

/// Counters exposed on the health and cache endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    /// Lookups answered from a finished entry.
    pub hits: u64,
    /// Lookups that had to compute or wait for an in-flight computation.
    pub misses: u64,
    /// Computations actually started.
    pub computations: u64,
}

pub struct DerivedMetricsCache<K, V> {
    entries: Mutex<LruCache<K, Slot<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    computations: AtomicU64,
}

impl<K, V> DerivedMetricsCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            computations: AtomicU64::new(0),
        }
    }

    /// Find or create the cell for `key`, marking it most recently used.
    fn slot(&self, key: &K) -> Slot<V> {
        let mut entries = self.entries.lock();
        if let Some(slot) = entries.get(key) {
            return Arc::clone(slot);
        }
        let slot: Slot<V> = Arc::new(OnceCell::new());
        if entries.push(key.clone(), Arc::clone(&slot)).is_some() {
            debug!("derived cache full; evicted least recently used entry");
        }
        slot
    }

    /// Return the cached value for `key`, computing it with `compute` if no
    /// finished or in-flight value exists.
    pub async fn get_or_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(&key);
        if let Some(value) = slot.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(value));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let value = slot
            .get_or_try_init(|| async {
                self.computations.fetch_add(1, Ordering::Relaxed);
                compute().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(value))
    }

    /// Finished value for `key`, if resident. Does not start a computation.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.entries.lock();
        entries.peek(key).and_then(|slot| slot.get().cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        let (entries, capacity) = {
            let guard = self.entries.lock();
            (guard.len(), guard.cap().get())
        };
        CacheStats {
            entries,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            computations: self.computations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    type TestCache = DerivedMetricsCache<String, u64>;

    async fn slow_value(value: u64) -> Result<u64, String> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn test_second_call_is_a_hit() {
        let cache = TestCache::new(4);
        let first = cache
            .get_or_compute("daily".to_string(), || slow_value(7))
            .await
            .unwrap();
        let second = cache
            .get_or_compute("daily".to_string(), || slow_value(99))
            .await
            .unwrap();

        assert_eq!(*first, 7);
        assert_eq!(*second, 7);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.computations(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.capacity, 4);
    }

    #[tokio::test]
    async fn test_concurrent_same_key_computes_once() {
        let cache = Arc::new(TestCache::new(4));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("hourly".to_string(), || slow_value(24))
                    .await
            }));
        }
        for handle in handles {
            assert_eq!(*handle.await.unwrap().unwrap(), 24);
        }
        assert_eq!(cache.computations(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_compute_independently() {
        let cache = TestCache::new(4);
        let (a, b) = tokio::join!(
            cache.get_or_compute("a".to_string(), || slow_value(1)),
            cache.get_or_compute("b".to_string(), || slow_value(2)),
        );
        assert_eq!(*a.unwrap(), 1);
        assert_eq!(*b.unwrap(), 2);
        assert_eq!(cache.computations(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = TestCache::new(4);
        let failed = cache
            .get_or_compute("k".to_string(), || async { Err::<u64, _>("boom".to_string()) })
            .await;
        assert_eq!(failed.unwrap_err(), "boom");

        let ok = cache.get_or_compute("k".to_string(), || slow_value(3)).await;
        assert_eq!(*ok.unwrap(), 3);
        assert_eq!(cache.computations(), 2);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = TestCache::new(2);
        for key in ["a", "b"] {
            cache.get_or_compute(key.to_string(), || slow_value(1)).await.unwrap();
        }
        // touch "a" so "b" is the least recently used
        cache.get_or_compute("a".to_string(), || slow_value(1)).await.unwrap();
        cache.get_or_compute("c".to_string(), || slow_value(1)).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.peek(&"a".to_string()).is_some());
        assert!(cache.peek(&"b".to_string()).is_none());

        cache.get_or_compute("b".to_string(), || slow_value(1)).await.unwrap();
        assert_eq!(cache.computations(), 4);
    }

    #[tokio::test]
    async fn test_abandoned_computation_is_taken_over() {
        let cache = Arc::new(TestCache::new(4));

        let abandoned = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_compute("slow".to_string(), || async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok::<u64, String>(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        abandoned.abort();
        let _ = abandoned.await;

        let value = tokio::time::timeout(
            Duration::from_secs(5),
            cache.get_or_compute("slow".to_string(), || slow_value(2)),
        )
        .await
        .expect("takeover should not hang")
        .unwrap();
        assert_eq!(*value, 2);
        assert_eq!(cache.computations(), 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = TestCache::new(0);
        assert_eq!(cache.stats().capacity, 1);
        assert!(cache.is_empty());
    }
}
