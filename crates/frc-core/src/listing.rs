use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Longest description carried on a listing or record, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "database")]
    Database,
    #[serde(rename = "real_vendor")]
    RealVendor,
    #[serde(rename = "shopify")]
    Shopify,
    #[serde(rename = "woocommerce")]
    WooCommerce,
    #[serde(rename = "fallback")]
    Fallback,
}

/// Tag attached to a whole search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Database,
    EnhancedSearch,
    Fallback,
    Shopify,
    #[serde(rename = "woocommerce")]
    WooCommerce,
    RealVendors,
}

/// A purchasable offer for a part at one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub name: String,
    pub vendor: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub in_stock: bool,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: Source,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_search_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frc_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

/// Normalized product data pulled out of a vendor page.
///
/// This is also the shape stored in the product-info cache partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    pub url: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpn: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_in_stock() -> bool {
    true
}

impl ProductListing {
    /// Builds a listing for `vendor` from an extracted record.
    #[must_use]
    pub fn from_record(record: ProductRecord, vendor: &str, source: Source) -> Self {
        Self {
            name: record.name,
            vendor: vendor.to_string(),
            price: record.price,
            currency: record.currency,
            in_stock: record.in_stock,
            url: record.url,
            image: record.image,
            sku: record.sku.or(record.mpn),
            description: record.description.map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS)),
            source,
            is_search_link: false,
            frc_category: None,
            match_score: None,
        }
    }

    /// Overlays fresher fields from `record`. Absent record fields leave the
    /// listing untouched; vendor, url and source never change.
    pub fn overlay(&mut self, record: &ProductRecord) {
        if !record.name.trim().is_empty() {
            self.name.clone_from(&record.name);
        }
        if record.price.is_some() {
            self.price = record.price;
        }
        if !record.currency.is_empty() {
            self.currency.clone_from(&record.currency);
        }
        self.in_stock = record.in_stock;
        if record.image.is_some() {
            self.image.clone_from(&record.image);
        }
        if let Some(sku) = record.sku.as_ref().or(record.mpn.as_ref()) {
            self.sku = Some(sku.clone());
        }
        if let Some(description) = &record.description {
            self.description = Some(truncate_chars(description, MAX_DESCRIPTION_CHARS));
        }
    }

    /// A listing is well formed when it has a url, or is a fallback search link.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.url.is_empty() || (self.source == Source::Fallback && self.is_search_link)
    }
}

/// Truncates to at most `max` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
