//! "Search this vendor" links, the answer of last resort.

use frc_core::catalog::FallbackVendor;
use frc_core::{ProductListing, Source};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use rust_decimal::Decimal;

/// Trimmed query with each word percent-encoded and words joined by `+`.
#[must_use]
pub fn encode_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|word| utf8_percent_encode(word, NON_ALPHANUMERIC).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// One search link per vendor, in vendor order.
#[must_use]
pub fn fallback_links(query: &str, vendors: &[FallbackVendor]) -> Vec<ProductListing> {
    let query = query.trim();
    let encoded = encode_query(query);
    vendors
        .iter()
        .map(|v| ProductListing {
            name: format!("Search {} for \"{query}\"", v.name),
            vendor: v.name.clone(),
            price: Some(Decimal::ZERO),
            currency: "USD".to_string(),
            in_stock: true,
            url: format!("{}{encoded}", v.search_url),
            image: None,
            sku: None,
            description: None,
            source: Source::Fallback,
            is_search_link: true,
            frc_category: None,
            match_score: None,
        })
        .collect()
}
