//! Bounded engine cache with single-flight loading
//!
//! Resolves a model identifier to a loaded engine, caching handles for the
//! process lifetime. Capacity is bounded with LRU eviction, and a per-key
//! lock guarantees at most one concurrent load per model identifier:
//! concurrent `acquire` calls for the same missing model never download or
//! construct twice.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::core::device::Device;
use crate::core::error::Result;
use crate::core::progress::ProgressReporter;
use crate::engine::loader::EngineLoader;
use crate::engine::EngineHandle;

/// Default number of engines kept loaded
pub const DEFAULT_CAPACITY: usize = 4;

struct CacheEntry {
    handle: Arc<EngineHandle>,
    last_accessed: Instant,
}

/// Cache of loaded engines keyed by model identifier
pub struct EngineCache {
    entries: DashMap<String, CacheEntry>,
    /// Per-key locks serializing loads for the same identifier
    inflight: DashMap<String, Arc<Mutex<()>>>,
    loader: Box<dyn EngineLoader>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl EngineCache {
    /// Create a cache over the given loader
    pub fn new(loader: Box<dyn EngineLoader>, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            inflight: DashMap::new(),
            loader,
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Resolve a model identifier to a loaded engine.
    ///
    /// A cache hit returns immediately and reports no progress. A miss
    /// downloads and constructs under the per-key lock, reporting
    /// acquisition progress on the 0-90 scale, then caches the handle.
    pub fn acquire(&self, model_id: &str, reporter: &ProgressReporter) -> Result<Arc<EngineHandle>> {
        if let Some(handle) = self.lookup(model_id) {
            return Ok(handle);
        }

        let lock = self
            .inflight
            .entry(model_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // A concurrent load may have finished while we waited
        if let Some(handle) = self.lookup(model_id) {
            return Ok(handle);
        }

        let device = Device::detect();
        info!(model = model_id, %device, "loading engine");
        let handle = match self.loader.load(model_id, device, reporter) {
            Ok(handle) => Arc::new(handle),
            Err(e) => {
                // The lock entry must not outlive a failed load
                self.inflight.remove(model_id);
                return Err(e);
            }
        };

        self.evict_if_full();
        self.entries.insert(
            model_id.to_string(),
            CacheEntry {
                handle: handle.clone(),
                last_accessed: Instant::now(),
            },
        );
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.inflight.remove(model_id);

        Ok(handle)
    }

    fn lookup(&self, model_id: &str) -> Option<Arc<EngineHandle>> {
        let mut entry = self.entries.get_mut(model_id)?;
        entry.last_accessed = Instant::now();
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.handle.clone())
    }

    fn evict_if_full(&self) {
        while self.entries.len() >= self.capacity {
            let lru = self
                .entries
                .iter()
                .min_by_key(|e| e.value().last_accessed)
                .map(|e| e.key().clone());
            match lru {
                Some(key) => {
                    self.entries.remove(&key);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                    debug!(model = %key, "evicted engine from cache");
                }
                None => break,
            }
        }
    }

    /// Whether a handle is currently cached
    pub fn contains(&self, model_id: &str) -> bool {
        self.entries.contains_key(model_id)
    }

    #[cfg(test)]
    fn inflight_len(&self) -> usize {
        self.inflight.len()
    }

    /// Number of cached engines
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss/eviction counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Currently cached engines
    pub entries: usize,
    /// Maximum engines kept loaded
    pub capacity: usize,
    /// Lookups answered from cache
    pub hits: u64,
    /// Loads performed
    pub misses: u64,
    /// Handles evicted to stay within capacity
    pub evictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::kind::EngineKind;
    use crate::engine::{RawAudio, SpeechEngine};

    struct SilentEngine;

    impl SpeechEngine for SilentEngine {
        fn name(&self) -> &str {
            "silent"
        }

        fn synthesize(&self, _text: &str, _language: &str) -> Result<RawAudio> {
            Ok(RawAudio { samples: vec![0.0; 8], sample_rate: 16000 })
        }
    }

    struct CountingLoader {
        calls: Arc<AtomicU64>,
    }

    impl EngineLoader for CountingLoader {
        fn load(
            &self,
            model_id: &str,
            _device: Device,
            _reporter: &ProgressReporter,
        ) -> Result<EngineHandle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(EngineHandle {
                model_id: model_id.to_string(),
                kind: EngineKind::Standard,
                engine: Box::new(SilentEngine),
            })
        }
    }

    fn counting_cache(capacity: usize) -> (EngineCache, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        let cache = EngineCache::new(Box::new(CountingLoader { calls: calls.clone() }), capacity);
        (cache, calls)
    }

    #[test]
    fn test_second_acquire_is_a_hit() {
        let (cache, calls) = counting_cache(4);
        let reporter = ProgressReporter::noop();

        cache.acquire("vendor/model", &reporter).unwrap();
        cache.acquire("vendor/model", &reporter).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_hit_reports_no_progress() {
        let (cache, _) = counting_cache(4);
        cache.acquire("vendor/model", &ProgressReporter::noop()).unwrap();

        let events = Arc::new(AtomicU64::new(0));
        let sink = events.clone();
        let reporter = ProgressReporter::new(move |_, _| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        cache.acquire("vendor/model", &reporter).unwrap();

        assert_eq!(events.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_capacity_evicts_lru() {
        let (cache, calls) = counting_cache(2);
        let reporter = ProgressReporter::noop();

        cache.acquire("a", &reporter).unwrap();
        cache.acquire("b", &reporter).unwrap();
        // Touch "a" so "b" becomes the LRU
        cache.acquire("a", &reporter).unwrap();
        cache.acquire("c", &reporter).unwrap();

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    struct FailingLoader;

    impl EngineLoader for FailingLoader {
        fn load(
            &self,
            model_id: &str,
            _device: Device,
            _reporter: &ProgressReporter,
        ) -> Result<EngineHandle> {
            Err(crate::core::error::TtsError::EngineUnavailable {
                model_id: model_id.to_string(),
                reason: "backend offline".to_string(),
            })
        }
    }

    #[test]
    fn test_failed_load_releases_the_key_lock() {
        let cache = EngineCache::new(Box::new(FailingLoader), 4);
        let reporter = ProgressReporter::noop();

        assert!(cache.acquire("vendor/model", &reporter).is_err());
        assert!(cache.acquire("vendor/other", &reporter).is_err());

        assert_eq!(cache.inflight_len(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_acquires_load_once() {
        let (cache, calls) = counting_cache(4);
        let cache = Arc::new(cache);

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    cache.acquire("vendor/model", &ProgressReporter::noop()).unwrap();
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
