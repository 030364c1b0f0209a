//! Per-vendor search: discovery, then fetch and extract every candidate.

use frc_core::listing::ProductListing;
use frc_core::matching::{match_text, matches_canonical};
use frc_core::specs::CanonicalSpec;
use frc_core::vendors::VendorDescriptor;

use crate::client::FetchClient;
use crate::discovery::discover_candidates;
use crate::extract::{extract_product, ExtractedPage};

/// An extracted product together with the page it came from.
#[derive(Debug, Clone)]
pub struct FetchedProduct {
    pub page: ExtractedPage,
    pub html: String,
}

impl FetchedProduct {
    /// Lowercase haystack for the match engine: record fields plus page text.
    #[must_use]
    pub fn match_text(&self) -> String {
        let r = &self.page.record;
        match_text(&[
            Some(r.name.as_str()),
            r.description.as_deref(),
            r.sku.as_deref(),
            r.mpn.as_deref(),
            Some(self.html.as_str()),
        ])
    }
}

/// Fetches `url` and extracts a product. Fetch or extraction failure is `None`.
pub async fn fetch_product(client: &FetchClient, url: &str) -> Option<FetchedProduct> {
    let html = client.fetch_page(url).await?;
    let Some(page) = extract_product(&html, url) else {
        tracing::debug!(url, "no product found on page");
        return None;
    };
    Some(FetchedProduct { page, html })
}

/// One candidate page as a listing for `vendor`. `None` when the fetch or
/// extraction fails, or when `spec` is given and the page does not match it.
pub async fn fetch_listing(
    client: &FetchClient,
    vendor: &VendorDescriptor,
    url: &str,
    spec: Option<&CanonicalSpec>,
) -> Option<ProductListing> {
    let fetched = fetch_product(client, url).await?;
    if let Some(spec) = spec {
        let m = matches_canonical(spec, &fetched.match_text());
        if !m.is_match {
            tracing::debug!(url, part = spec.name, score = m.score, "rejected by part match");
            return None;
        }
    }
    Some(ProductListing::from_record(
        fetched.page.record,
        &vendor.name,
        vendor.family.source(),
    ))
}

/// Searches one vendor for `query`.
///
/// When the vendor's family validates against a named part and `spec` is
/// given, products that do not match it are dropped.
pub async fn search_vendor(
    client: &FetchClient,
    vendor: &VendorDescriptor,
    query: &str,
    spec: Option<&CanonicalSpec>,
) -> Vec<ProductListing> {
    let candidates = discover_candidates(client, vendor, query).await;
    let spec = spec.filter(|_| vendor.family.checks_canonical());

    let mut listings = Vec::new();
    for url in &candidates {
        if let Some(listing) = fetch_listing(client, vendor, url, spec).await {
            listings.push(listing);
        }
    }

    tracing::info!(
        vendor = %vendor.name,
        domain = vendor.domain(),
        family = %vendor.family,
        query,
        candidates = candidates.len(),
        found = listings.len(),
        "vendor search complete"
    );
    listings
}
