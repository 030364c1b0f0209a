//! WooCommerce storefronts: Store API, then the v3 REST API, then the HTML
//! product search page. Each step only runs when the previous found nothing.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::Value;

use super::product_links;
use crate::client::FetchClient;

const PER_PAGE: usize = 10;

pub(super) async fn discover(client: &FetchClient, base: &str, query: &str) -> Vec<String> {
    let encoded = utf8_percent_encode(query.trim(), NON_ALPHANUMERIC).to_string();

    for api in ["wp-json/wc/store/products", "wp-json/wc/v3/products"] {
        let url = format!("{base}/{api}?search={encoded}&per_page={PER_PAGE}");
        if let Some(body) = client.fetch_json(&url).await {
            let urls = permalinks(&body);
            if !urls.is_empty() {
                return urls;
            }
        }
    }

    let search_url = format!("{base}/products/?s={encoded}");
    match client.fetch_page(&search_url).await {
        Some(html) => product_links(&html, &search_url),
        None => Vec::new(),
    }
}

/// `permalink` of each product in an API response array.
pub(crate) fn permalinks(body: &Value) -> Vec<String> {
    body.as_array()
        .into_iter()
        .flatten()
        .filter_map(|p| p.get("permalink").and_then(Value::as_str))
        .filter(|u| u.starts_with("http"))
        .map(str::to_owned)
        .collect()
}
