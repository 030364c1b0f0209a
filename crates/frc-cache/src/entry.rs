use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The three cache partitions. Each persists independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Url,
    Search,
    Product,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Url, Partition::Search, Partition::Product];

    /// Leading element of every key in this partition.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Partition::Url => "url",
            Partition::Search => "search",
            Partition::Product => "product",
        }
    }

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Partition::Url => "url_cache.json",
            Partition::Search => "search_cache.json",
            Partition::Product => "product_cache.json",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Partition::Url => 0,
            Partition::Search => 1,
            Partition::Product => 2,
        }
    }
}

/// One cached value with its write time (epoch seconds) and lifetime.
///
/// Entries written by older versions may lack `timestamp`; those never expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

pub type PartitionMap = HashMap<String, CacheEntry>;

impl CacheEntry {
    /// `now - timestamp <= ttl`, using `default_ttl` when the entry has none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_valid(&self, now: f64, default_ttl: u64) -> bool {
        match self.timestamp {
            None => true,
            Some(ts) => now - ts <= self.ttl.unwrap_or(default_ttl) as f64,
        }
    }
}
