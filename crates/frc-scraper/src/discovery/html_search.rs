use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::product_links;
use crate::client::FetchClient;

/// Fetches the vendor's search page and collects product links from it.
/// Relative links resolve against the vendor base URL.
pub(super) async fn discover(
    client: &FetchClient,
    base: &str,
    search_url: &str,
    query: &str,
) -> Vec<String> {
    let url = format!(
        "{search_url}{}",
        utf8_percent_encode(query.trim(), NON_ALPHANUMERIC)
    );
    match client.fetch_page(&url).await {
        Some(html) => product_links(&html, base),
        None => Vec::new(),
    }
}
