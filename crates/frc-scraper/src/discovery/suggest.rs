//! Shopify-style storefronts: the predictive search JSON, then the first page
//! of the public product listing.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::Value;

use super::absolutize;
use crate::client::FetchClient;

const SUGGEST_LIMIT: usize = 10;
const LISTING_LIMIT: usize = 20;

pub(super) async fn discover(client: &FetchClient, base: &str, query: &str) -> Vec<String> {
    let encoded = utf8_percent_encode(query.trim(), NON_ALPHANUMERIC);
    let suggest_url = format!(
        "{base}/search/suggest.json?q={encoded}&resources%5Btype%5D=product&resources%5Blimit%5D={SUGGEST_LIMIT}"
    );
    let suggested = client
        .fetch_json(&suggest_url)
        .await
        .map(|body| suggested_urls(&body, base))
        .unwrap_or_default();
    if !suggested.is_empty() {
        return suggested;
    }

    let listing_url = format!("{base}/products.json?page=1&limit={LISTING_LIMIT}");
    client
        .fetch_json(&listing_url)
        .await
        .map(|body| listing_urls(&body, base))
        .unwrap_or_default()
}

/// `resources.results.products[].url`, resolved against the storefront.
pub(crate) fn suggested_urls(body: &Value, base: &str) -> Vec<String> {
    body.pointer("/resources/results/products")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|p| p.get("url").and_then(Value::as_str))
        .filter(|u| !u.is_empty())
        .filter_map(|u| absolutize(base, u))
        .collect()
}

/// `products[].handle` turned into product page URLs.
pub(crate) fn listing_urls(body: &Value, base: &str) -> Vec<String> {
    body.get("products")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|p| p.get("handle").and_then(Value::as_str))
        .filter(|h| !h.is_empty())
        .map(|h| format!("{base}/products/{h}"))
        .collect()
}
