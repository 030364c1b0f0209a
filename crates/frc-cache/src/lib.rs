//! TTL cache for URL liveness, vendor search results and product records.
//!
//! Three independent partitions, each a map from a hashed key to a
//! [`CacheEntry`]. Persistence and the clock are injected so the cache can be
//! exercised in memory with simulated time.

pub mod cache;
pub mod clock;
pub mod entry;
pub mod error;
pub mod store;

pub use cache::{cache_key, Cache, CacheStats};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, Partition};
pub use error::CacheError;
pub use store::{CacheStore, JsonFileStore, MemoryStore};
