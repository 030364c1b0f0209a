use frc_core::{ProductListing, ResponseSource};
use serde::{Deserialize, Serialize};

/// Body of every search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ProductListing>,
    pub count: usize,
    pub source: ResponseSource,
    /// Vendors a family search covered, when the family reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendors: Option<Vec<String>>,
}

impl SearchResponse {
    #[must_use]
    pub fn new(query: &str, results: Vec<ProductListing>, source: ResponseSource) -> Self {
        Self {
            query: query.to_string(),
            count: results.len(),
            results,
            source,
            vendors: None,
        }
    }

    #[must_use]
    pub fn with_vendors(mut self, vendors: Vec<String>) -> Self {
        self.vendors = Some(vendors);
        self
    }
}
