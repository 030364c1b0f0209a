//! schema.org `Product` extraction from `<script type="application/ld+json">`.

use std::str::FromStr;
use std::sync::LazyLock;

use frc_core::listing::{truncate_chars, ProductRecord, MAX_DESCRIPTION_CHARS};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

/// The first offer of a product, whatever shape `offers` had on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Offer {
    pub price: Option<Decimal>,
    pub availability: Option<String>,
    pub currency: Option<String>,
}

impl Offer {
    /// Reads `offers`, which may be one object or a list of them.
    #[must_use]
    pub fn from_offers(offers: Option<&Value>) -> Option<Self> {
        let offer = match offers? {
            Value::Array(items) => items.first()?,
            obj @ Value::Object(_) => obj,
            _ => return None,
        };
        if !offer.is_object() {
            return None;
        }
        Some(Self {
            price: offer.get("price").and_then(normalize_price),
            availability: offer
                .get("availability")
                .and_then(Value::as_str)
                .map(str::to_owned),
            currency: offer
                .get("priceCurrency")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }

    /// In stock only when availability names it; an offer without an
    /// availability string is out of stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.availability.as_deref().is_some_and(|a| {
            let a = a.to_lowercase();
            a.contains("instock") || a.contains("available")
        })
    }
}

/// Parses a price that may be a JSON number or display text like `"$1,299.00"`.
#[must_use]
pub fn normalize_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
                .filter(|d| !d.is_sign_negative())
        }
        Value::String(s) => normalize_price_text(s),
        _ => None,
    }
}

/// Keeps digits and separators, drops commas, then parses. Anything that
/// still fails to parse is absent rather than zero.
#[must_use]
pub fn normalize_price_text(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn is_product(item: &Value) -> bool {
    item.get("@type").and_then(Value::as_str) == Some("Product")
}

/// All JSON-LD items on the page, with top-level arrays and `@graph`
/// containers flattened. Blocks that fail to parse are skipped.
fn jsonld_items(html: &str) -> Vec<Value> {
    let mut items = Vec::new();
    for cap in SCRIPT_RE.captures_iter(html) {
        let Some(body) = cap.get(1) else { continue };
        let value: Value = match serde_json::from_str(body.as_str().trim()) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparsable JSON-LD block");
                continue;
            }
        };
        let top = match value {
            Value::Array(arr) => arr,
            other => vec![other],
        };
        for item in top {
            if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
                items.extend(graph.iter().cloned());
            }
            items.push(item);
        }
    }
    items
}

/// The first item on the page whose `@type` is exactly `"Product"`.
#[must_use]
pub fn find_product_block(html: &str) -> Option<Value> {
    jsonld_items(html).into_iter().find(is_product)
}

fn text_of(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn image_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => image_of(items.first()),
        obj @ Value::Object(_) => text_of(obj.get("url")),
        _ => None,
    }
}

fn brand_of(value: Option<&Value>) -> Option<String> {
    match value? {
        obj @ Value::Object(_) => text_of(obj.get("name")),
        other => text_of(Some(other)),
    }
}

/// Builds a record from a `Product` block. Blocks without a name are rejected
/// so the caller can fall back to HTML scraping.
#[must_use]
pub fn record_from_block(block: &Value, url: &str) -> Option<ProductRecord> {
    let name = text_of(block.get("name"))?;
    let offer = Offer::from_offers(block.get("offers"));

    let gtin = ["gtin", "gtin13", "gtin12", "gtin14", "gtin8"]
        .iter()
        .find_map(|k| text_of(block.get(*k)));

    Some(ProductRecord {
        name,
        url: url.to_owned(),
        price: offer.as_ref().and_then(|o| o.price),
        currency: offer
            .as_ref()
            .and_then(|o| o.currency.clone())
            .unwrap_or_else(|| "USD".to_string()),
        // No offer at all says nothing about stock.
        in_stock: offer.as_ref().is_none_or(Offer::in_stock),
        sku: text_of(block.get("sku")),
        image: image_of(block.get("image")),
        brand: brand_of(block.get("brand")),
        description: text_of(block.get("description"))
            .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS)),
        category: text_of(block.get("category")),
        gtin,
        mpn: text_of(block.get("mpn")),
    })
}
