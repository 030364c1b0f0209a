//! The reconciler: one long-lived engine per process, shared by `Arc`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use frc_cache::Cache;
use frc_core::specs::CanonicalSpec;
use frc_core::{
    canonical_spec_for_query, default_vendors, AppConfig, Catalog, ProductListing,
    ResponseSource, VendorDescriptor, VendorFamily,
};
use frc_scraper::{search_vendor, FetchClient};
use futures::future::join_all;
use tokio::time::Instant;

use crate::error::SearchError;
use crate::fallback::fallback_links;
use crate::response::SearchResponse;

/// How long a liveness probe result is trusted.
pub(crate) const URL_STATUS_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Budget for discovery plus validation of one query.
    pub deadline: Duration,
    /// Candidate listings validated at once.
    pub validation_concurrency: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(30),
            validation_concurrency: 4,
        }
    }
}

impl From<&AppConfig> for EngineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            deadline: config.search_deadline(),
            validation_concurrency: config.validation_concurrency,
        }
    }
}

/// Owns the catalog, the vendor registry, the rate-limited client and a
/// handle on the shared cache. Rate-limit state lives as long as the engine.
pub struct SearchEngine {
    catalog: Catalog,
    vendors: Vec<VendorDescriptor>,
    pub(crate) client: FetchClient,
    pub(crate) cache: Arc<Cache>,
    pub(crate) settings: EngineSettings,
}

impl SearchEngine {
    #[must_use]
    pub fn new(
        catalog: Catalog,
        vendors: Vec<VendorDescriptor>,
        client: FetchClient,
        cache: Arc<Cache>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog,
            vendors,
            client,
            cache,
            settings,
        }
    }

    /// Production engine: configured catalog, the default vendor set and a
    /// client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Catalog`] when the catalog cannot be loaded and
    /// [`SearchError::Client`] when the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, cache: Arc<Cache>) -> Result<Self, SearchError> {
        let catalog = Catalog::load_or_embedded(config.catalog_path.as_deref())?;
        let client = FetchClient::from_config(config)?;
        tracing::info!(
            parts = catalog.canonical_count(),
            keys = catalog.len(),
            "catalog loaded"
        );
        Ok(Self::new(
            catalog,
            default_vendors(),
            client,
            cache,
            EngineSettings::from(config),
        ))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    pub fn vendors_in(&self, family: VendorFamily) -> impl Iterator<Item = &VendorDescriptor> {
        self.vendors.iter().filter(move |v| v.family == family)
    }

    /// Full resolution. Never fails: the worst case is one search link per
    /// fallback vendor.
    pub async fn search(&self, query: &str) -> SearchResponse {
        let query = query.trim();

        if let Some(listings) = self.catalog_hit(query).await {
            tracing::info!(query, count = listings.len(), "catalog hit");
            return SearchResponse::new(query, listings, ResponseSource::Database);
        }

        let deadline = Instant::now() + self.settings.deadline;
        let spec = canonical_spec_for_query(query);
        let candidates = self.discover(query, spec, deadline).await;

        if !candidates.is_empty() {
            let validated = self.validate_all(candidates, deadline).await;
            if !validated.is_empty() {
                tracing::info!(query, count = validated.len(), "returning validated vendor results");
                return SearchResponse::new(query, validated, ResponseSource::EnhancedSearch);
            }
        }

        let links = fallback_links(query, self.catalog.fallback_vendors());
        tracing::info!(query, count = links.len(), "no usable results, returning search links");
        SearchResponse::new(query, links, ResponseSource::Fallback)
    }

    /// Search restricted to one vendor family, without validation.
    pub async fn search_family(&self, query: &str, family: VendorFamily) -> SearchResponse {
        let query = query.trim();
        let spec = canonical_spec_for_query(query);
        let results = self.family_results(query, family, spec).await;
        let response = SearchResponse::new(query, results, family.response_source());
        match family {
            VendorFamily::RealVendor => {
                response.with_vendors(self.vendors_in(family).map(|v| v.name.clone()).collect())
            }
            VendorFamily::Shopify | VendorFamily::WooCommerce => response,
        }
    }

    /// Catalog listings whose URLs are still live. `None` when the query does
    /// not resolve or nothing survives the liveness check.
    async fn catalog_hit(&self, query: &str) -> Option<Vec<ProductListing>> {
        let listings = self.catalog.resolve(query)?;
        let alive = join_all(listings.iter().map(|l| self.is_alive(&l.url))).await;
        let live: Vec<ProductListing> = listings
            .iter()
            .zip(alive)
            .filter(|(_, ok)| *ok)
            .map(|(l, _)| l.clone())
            .collect();
        if live.is_empty() {
            tracing::info!(query, "catalog match has no live urls");
            return None;
        }
        Some(live)
    }

    /// Every family in search order, real vendors first. Stops at the deadline
    /// and keeps what earlier families returned. A URL found by several
    /// vendors is kept once, from the first vendor that found it.
    async fn discover(
        &self,
        query: &str,
        spec: Option<&'static CanonicalSpec>,
        deadline: Instant,
    ) -> Vec<ProductListing> {
        let mut all = Vec::new();
        let mut seen = HashSet::new();
        for family in VendorFamily::ALL {
            match tokio::time::timeout_at(deadline, self.family_results(query, family, spec)).await
            {
                Ok(results) => {
                    for listing in results {
                        if seen.insert(listing.url.clone()) {
                            all.push(listing);
                        }
                    }
                }
                Err(_) => {
                    tracing::warn!(query, %family, "search deadline reached during discovery");
                    break;
                }
            }
        }
        all
    }

    /// Family results, from the search cache when it holds a non-empty list.
    async fn family_results(
        &self,
        query: &str,
        family: VendorFamily,
        spec: Option<&'static CanonicalSpec>,
    ) -> Vec<ProductListing> {
        let tag = family.cache_tag();
        if let Some(cached) = self
            .cache
            .search_results(query, Some(tag))
            .filter(|r| !r.is_empty())
        {
            tracing::debug!(query, %family, count = cached.len(), "search cache hit");
            return cached;
        }

        let mut results = Vec::new();
        for vendor in self.vendors_in(family) {
            results.extend(search_vendor(&self.client, vendor, query, spec).await);
        }
        if !results.is_empty() {
            let (query, stored) = (query.to_string(), results.clone());
            self.write_cache(move |cache| {
                cache.set_search_results(&query, Some(tag), &stored, Some(family.search_ttl()));
            })
            .await;
        }
        results
    }

    /// Liveness through the URL cache.
    pub(crate) async fn is_alive(&self, url: &str) -> bool {
        if let Some(alive) = self.cache.url_status(url) {
            return alive;
        }
        let alive = self.client.is_alive(url).await;
        let url = url.to_string();
        self.write_cache(move |cache| cache.set_url_status(&url, alive, Some(URL_STATUS_TTL)))
            .await;
        alive
    }

    /// Cache writes save to disk, so they run on the blocking pool.
    pub(crate) async fn write_cache(&self, write: impl FnOnce(&Cache) + Send + 'static) {
        let cache = Arc::clone(&self.cache);
        if let Err(e) = tokio::task::spawn_blocking(move || write(&cache)).await {
            tracing::warn!(error = %e, "cache write task failed");
        }
    }
}
