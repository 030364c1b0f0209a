//! Persistence backends for cache partitions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::entry::{Partition, PartitionMap};
use crate::error::CacheError;

/// Whole-partition load and save. The cache holds the working copy in memory
/// and writes the full map back after every change.
pub trait CacheStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CacheError`] when the persisted partition cannot be read or
    /// decoded. A partition that was never written loads as empty.
    fn load(&self, partition: Partition) -> Result<PartitionMap, CacheError>;

    /// # Errors
    ///
    /// Returns [`CacheError`] when the partition cannot be written.
    fn save(&self, partition: Partition, entries: &PartitionMap) -> Result<(), CacheError>;

    /// Human-readable location, reported in cache stats.
    fn location(&self) -> String;
}

/// One pretty-printed JSON file per partition under `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, partition: Partition) -> PathBuf {
        self.dir.join(partition.file_name())
    }
}

impl CacheStore for JsonFileStore {
    fn load(&self, partition: Partition) -> Result<PartitionMap, CacheError> {
        let path = self.path(partition);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| CacheError::Corrupt { path, source })
    }

    fn save(&self, partition: Partition, entries: &PartitionMap) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(partition);
        let body = serde_json::to_string_pretty(entries)?;
        std::fs::write(&path, body).map_err(|source| CacheError::Io { path, source })
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Keeps "persisted" partitions in memory. Used by tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: Mutex<HashMap<Partition, PartitionMap>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, partition: Partition) -> Result<PartitionMap, CacheError> {
        let partitions = self.partitions.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(partitions.get(&partition).cloned().unwrap_or_default())
    }

    fn save(&self, partition: Partition, entries: &PartitionMap) -> Result<(), CacheError> {
        let mut partitions = self.partitions.lock().unwrap_or_else(PoisonError::into_inner);
        partitions.insert(partition, entries.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
