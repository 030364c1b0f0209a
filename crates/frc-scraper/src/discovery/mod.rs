//! Candidate discovery: turns a query into product page URLs for one vendor.
//!
//! Every strategy degrades to an empty list on failure. Results are
//! deduplicated in discovery order and capped at the vendor's
//! `max_candidates`.

mod html_search;
mod known_urls;
mod sitemap;
mod store_api;
mod suggest;

use std::collections::HashSet;
use std::sync::LazyLock;

use frc_core::vendors::{Discovery, VendorDescriptor};
use regex::Regex;
use reqwest::Url;

use crate::client::FetchClient;

pub use known_urls::known_candidates;
pub use sitemap::{filter_by_tokens, parse_sitemap_locs};

static PRODUCT_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"(?i)href\s*=\s*"([^"]*/products?/[^"#]*)[^"]*""##).expect("valid regex")
});

/// Candidate product URLs for `query` on `vendor`, in discovery order.
pub async fn discover_candidates(
    client: &FetchClient,
    vendor: &VendorDescriptor,
    query: &str,
) -> Vec<String> {
    let found = match &vendor.discovery {
        Discovery::SuggestApi => suggest::discover(client, &vendor.base_url, query).await,
        Discovery::StoreApi => store_api::discover(client, &vendor.base_url, query).await,
        Discovery::Sitemap {
            sitemap_url,
            product_path,
        } => {
            let prefix = format!("{}{product_path}", vendor.base_url);
            sitemap::discover(client, sitemap_url, &prefix, query).await
        }
        Discovery::KnownUrls(table) => known_candidates(table, query),
        Discovery::HtmlSearch { search_url } => {
            html_search::discover(client, &vendor.base_url, search_url, query).await
        }
    };

    let candidates = dedupe_capped(found, vendor.max_candidates);
    tracing::debug!(
        vendor = %vendor.name,
        family = %vendor.family,
        query,
        count = candidates.len(),
        "discovered candidates"
    );
    candidates
}

fn dedupe_capped(urls: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|u| !u.is_empty() && seen.insert(u.clone()))
        .take(cap)
        .collect()
}

/// Product links found in `html`, resolved against `base`.
pub(crate) fn product_links(html: &str, base: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base) else {
        return Vec::new();
    };
    PRODUCT_HREF_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .filter_map(|href| base.join(href.as_str()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(String::from)
        .collect()
}

/// Resolves a possibly relative `href` against `base`.
pub(crate) fn absolutize(base: &str, href: &str) -> Option<String> {
    Url::parse(base).ok()?.join(href).ok().map(String::from)
}
