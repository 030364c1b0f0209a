use quick_xml::events::Event;
use quick_xml::Reader;

use crate::client::FetchClient;
use crate::error::ScraperError;

pub(super) async fn discover(
    client: &FetchClient,
    sitemap_url: &str,
    product_prefix: &str,
    query: &str,
) -> Vec<String> {
    let Some(body) = client.fetch_page(sitemap_url).await else {
        return Vec::new();
    };
    match parse_sitemap_locs(&body, sitemap_url) {
        Ok(locs) => {
            let products = locs.into_iter().filter(|u| u.starts_with(product_prefix));
            filter_by_tokens(products, query)
        }
        Err(e) => {
            tracing::warn!(sitemap_url, error = %e, "sitemap parse failed");
            Vec::new()
        }
    }
}

/// Text of every `<loc>` element, in document order.
///
/// # Errors
///
/// Returns [`ScraperError::Sitemap`] when the document is not well-formed XML.
pub fn parse_sitemap_locs(xml: &str, url: &str) -> Result<Vec<String>, ScraperError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_loc = false;
    let mut locs = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(e)) if in_loc => {
                let text = e.unescape().map_err(|err| ScraperError::Sitemap {
                    url: url.to_owned(),
                    reason: err.to_string(),
                })?;
                locs.push(text.trim().to_owned());
            }
            Ok(Event::CData(e)) if in_loc => {
                locs.push(String::from_utf8_lossy(&e).trim().to_owned());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ScraperError::Sitemap {
                    url: url.to_owned(),
                    reason: e.to_string(),
                })
            }
            _ => {}
        }
    }

    Ok(locs)
}

/// Keeps URLs that contain every whitespace-separated query token,
/// case-insensitively. An empty query keeps nothing.
pub fn filter_by_tokens(urls: impl IntoIterator<Item = String>, query: &str) -> Vec<String> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    urls.into_iter()
        .filter(|url| {
            let url = url.to_lowercase();
            tokens.iter().all(|t| url.contains(t.as_str()))
        })
        .collect()
}
