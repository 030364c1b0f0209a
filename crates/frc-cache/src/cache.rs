//! Partitioned TTL cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use frc_core::listing::{ProductListing, ProductRecord};
use frc_core::AppConfig;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::clock::{Clock, SystemClock};
use crate::entry::{CacheEntry, Partition, PartitionMap};
use crate::store::{CacheStore, JsonFileStore, MemoryStore};

/// Hex SHA-256 of the pipe-joined parts. Callers lead with the partition tag
/// so equal arguments in different partitions never collide.
#[must_use]
pub fn cache_key(parts: &[&str]) -> String {
    format!("{:x}", Sha256::digest(parts.join("|").as_bytes()))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct UrlStatus {
    alive: bool,
}

/// Valid-entry counts per partition, as reported by the admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub url_cache_entries: usize,
    pub search_cache_entries: usize,
    pub product_cache_entries: usize,
    pub total_entries: usize,
    pub cache_dir: String,
    pub default_ttl_hours: f64,
}

/// Copy of one partition taken under its lock, saved after the lock is gone.
struct Snapshot {
    partition: Partition,
    generation: u64,
    entries: PartitionMap,
}

/// Three independently locked partitions over an injected store and clock.
///
/// A write holds the partition lock across purge, insert and eviction, then
/// snapshots the map and saves it with the lock released. Saves of one
/// partition are serialized and a snapshot older than the last one saved is
/// skipped, so the store never goes backwards. Store failures are logged and
/// otherwise ignored: a cache that cannot persist still serves from memory.
///
/// Saving is blocking I/O. Async callers should write through
/// `tokio::task::spawn_blocking`.
pub struct Cache {
    store: Box<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    default_ttl: u64,
    max_entries: usize,
    partitions: [Mutex<PartitionMap>; 3],
    generations: [AtomicU64; 3],
    saved: [Mutex<u64>; 3],
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("location", &self.store.location())
            .field("default_ttl", &self.default_ttl)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Loads every partition from `store`. A partition that fails to load
    /// starts empty.
    #[must_use]
    pub fn new(
        store: impl CacheStore + 'static,
        clock: Arc<dyn Clock>,
        default_ttl: Duration,
        max_entries: usize,
    ) -> Self {
        let load = |partition: Partition| {
            store.load(partition).unwrap_or_else(|e| {
                tracing::warn!(partition = partition.tag(), error = %e, "cache load failed, starting empty");
                PartitionMap::new()
            })
        };
        let partitions = Partition::ALL.map(|p| Mutex::new(load(p)));
        Self {
            store: Box::new(store),
            clock,
            default_ttl: default_ttl.as_secs(),
            max_entries: max_entries.max(1),
            partitions,
            generations: Partition::ALL.map(|_| AtomicU64::new(0)),
            saved: Partition::ALL.map(|_| Mutex::new(0)),
        }
    }

    /// File-backed cache under `config.cache_dir`, on the system clock.
    #[must_use]
    pub fn open(config: &AppConfig) -> Self {
        Self::new(
            JsonFileStore::new(&config.cache_dir),
            Arc::new(SystemClock),
            Duration::from_secs(config.cache_default_ttl_secs),
            config.cache_max_entries,
        )
    }

    /// Non-persistent cache on the system clock.
    #[must_use]
    pub fn in_memory(default_ttl: Duration, max_entries: usize) -> Self {
        Self::new(MemoryStore::new(), Arc::new(SystemClock), default_ttl, max_entries)
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    fn lock(&self, partition: Partition) -> MutexGuard<'_, PartitionMap> {
        self.partitions[partition.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Call with the partition lock held so generations follow write order.
    fn snapshot(&self, partition: Partition, entries: &PartitionMap) -> Snapshot {
        let generation = self.generations[partition.index()].fetch_add(1, Ordering::Relaxed) + 1;
        Snapshot {
            partition,
            generation,
            entries: entries.clone(),
        }
    }

    /// Call with the partition lock released.
    fn persist(&self, snapshot: Snapshot) {
        let Snapshot {
            partition,
            generation,
            entries,
        } = snapshot;
        let mut saved = self.saved[partition.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if generation <= *saved {
            tracing::trace!(partition = partition.tag(), generation, "skipping stale cache snapshot");
            return;
        }
        if let Err(e) = self.store.save(partition, &entries) {
            tracing::warn!(partition = partition.tag(), error = %e, "cache save failed");
        }
        *saved = generation;
    }

    /// Raw data of an unexpired entry.
    #[must_use]
    pub fn get_value(&self, partition: Partition, key: &str) -> Option<serde_json::Value> {
        let now = self.clock.now();
        let entries = self.lock(partition);
        entries
            .get(key)
            .filter(|e| e.is_valid(now, self.default_ttl))
            .map(|e| e.data.clone())
    }

    /// Unexpired entry decoded as `T`. Data of another shape reads as a miss.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, partition: Partition, key: &str) -> Option<T> {
        let value = self.get_value(partition, key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(partition = partition.tag(), key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    /// Writes a fresh entry, purges expired entries in the partition, evicts
    /// the oldest down to the size cap, then persists the partition.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        partition: Partition,
        key: String,
        value: &T,
        ttl: Option<Duration>,
    ) {
        let data = match serde_json::to_value(value) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(partition = partition.tag(), error = %e, "cache value not serializable");
                return;
            }
        };
        let now = self.clock.now();
        let snapshot = {
            let mut entries = self.lock(partition);
            entries.insert(
                key,
                CacheEntry {
                    data,
                    timestamp: Some(now),
                    ttl: Some(ttl.map_or(self.default_ttl, |t| t.as_secs())),
                },
            );
            entries.retain(|_, e| e.is_valid(now, self.default_ttl));
            self.evict_oldest(&mut entries);
            self.snapshot(partition, &entries)
        };
        self.persist(snapshot);
    }

    fn evict_oldest(&self, entries: &mut PartitionMap) {
        if entries.len() <= self.max_entries {
            return;
        }
        let mut by_age: Vec<(f64, String)> = entries
            .iter()
            .map(|(k, e)| (e.timestamp.unwrap_or(f64::NEG_INFINITY), k.clone()))
            .collect();
        by_age.sort_by(|a, b| a.0.total_cmp(&b.0));
        let excess = entries.len() - self.max_entries;
        for (_, key) in by_age.into_iter().take(excess) {
            entries.remove(&key);
        }
        tracing::debug!(evicted = excess, "cache partition over capacity");
    }

    /// Removes one entry. Returns whether it existed.
    pub fn remove(&self, partition: Partition, key: &str) -> bool {
        let snapshot = {
            let mut entries = self.lock(partition);
            if entries.remove(key).is_none() {
                return false;
            }
            self.snapshot(partition, &entries)
        };
        self.persist(snapshot);
        true
    }

    // --- URL liveness ---------------------------------------------------

    fn url_key(url: &str) -> String {
        cache_key(&[Partition::Url.tag(), url])
    }

    #[must_use]
    pub fn url_status(&self, url: &str) -> Option<bool> {
        self.get::<UrlStatus>(Partition::Url, &Self::url_key(url))
            .map(|s| s.alive)
    }

    pub fn set_url_status(&self, url: &str, alive: bool, ttl: Option<Duration>) {
        self.set(Partition::Url, Self::url_key(url), &UrlStatus { alive }, ttl);
    }

    pub fn invalidate_url(&self, url: &str) -> bool {
        self.remove(Partition::Url, &Self::url_key(url))
    }

    // --- search results -------------------------------------------------

    fn search_key(query: &str, scope: Option<&str>) -> String {
        cache_key(&[Partition::Search.tag(), query, scope.unwrap_or("all")])
    }

    /// Cached results for `query` within `scope` (a vendor or family tag).
    #[must_use]
    pub fn search_results(&self, query: &str, scope: Option<&str>) -> Option<Vec<ProductListing>> {
        self.get(Partition::Search, &Self::search_key(query, scope))
    }

    pub fn set_search_results(
        &self,
        query: &str,
        scope: Option<&str>,
        results: &[ProductListing],
        ttl: Option<Duration>,
    ) {
        self.set(Partition::Search, Self::search_key(query, scope), results, ttl);
    }

    pub fn invalidate_search(&self, query: &str, scope: Option<&str>) -> bool {
        self.remove(Partition::Search, &Self::search_key(query, scope))
    }

    // --- product records ------------------------------------------------

    fn product_key(url: &str) -> String {
        cache_key(&[Partition::Product.tag(), url])
    }

    #[must_use]
    pub fn product_info(&self, url: &str) -> Option<ProductRecord> {
        self.get(Partition::Product, &Self::product_key(url))
    }

    pub fn set_product_info(&self, url: &str, record: &ProductRecord, ttl: Option<Duration>) {
        self.set(Partition::Product, Self::product_key(url), record, ttl);
    }

    pub fn invalidate_product(&self, url: &str) -> bool {
        self.remove(Partition::Product, &Self::product_key(url))
    }

    #[must_use]
    pub fn cached_price(&self, url: &str) -> Option<Decimal> {
        self.product_info(url)?.price
    }

    #[must_use]
    pub fn cached_stock(&self, url: &str) -> Option<bool> {
        self.product_info(url).map(|r| r.in_stock)
    }

    #[must_use]
    pub fn cached_image(&self, url: &str) -> Option<String> {
        self.product_info(url)?.image
    }

    // --- administration -------------------------------------------------

    /// Changes the lifetime of the URL and product entries for `url`.
    /// Entries keep their original write time.
    pub fn set_custom_ttl(&self, url: &str, ttl_hours: u64) {
        let ttl = ttl_hours.saturating_mul(3600);
        for (partition, key) in [
            (Partition::Url, Self::url_key(url)),
            (Partition::Product, Self::product_key(url)),
        ] {
            let snapshot = {
                let mut entries = self.lock(partition);
                let Some(entry) = entries.get_mut(&key) else {
                    continue;
                };
                entry.ttl = Some(ttl);
                self.snapshot(partition, &entries)
            };
            self.persist(snapshot);
        }
    }

    pub fn clear_all(&self) {
        for partition in Partition::ALL {
            let snapshot = {
                let mut entries = self.lock(partition);
                entries.clear();
                self.snapshot(partition, &entries)
            };
            self.persist(snapshot);
        }
        tracing::info!("cache cleared");
    }

    /// Drops expired entries from every partition. Returns how many went.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        for partition in Partition::ALL {
            let snapshot = {
                let mut entries = self.lock(partition);
                let before = entries.len();
                entries.retain(|_, e| e.is_valid(now, self.default_ttl));
                removed += before - entries.len();
                self.snapshot(partition, &entries)
            };
            self.persist(snapshot);
        }
        tracing::info!(removed, "expired cache entries purged");
        removed
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let valid = |p: Partition| {
            self.lock(p)
                .values()
                .filter(|e| e.is_valid(now, self.default_ttl))
                .count()
        };
        let url = valid(Partition::Url);
        let search = valid(Partition::Search);
        let product = valid(Partition::Product);
        CacheStats {
            url_cache_entries: url,
            search_cache_entries: search,
            product_cache_entries: product,
            total_entries: url + search + product,
            cache_dir: self.store.location(),
            default_ttl_hours: self.default_ttl as f64 / 3600.0,
        }
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
