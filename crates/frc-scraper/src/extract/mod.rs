//! Product extraction from a fetched page.

pub mod html;
pub mod jsonld;
mod structure;

use frc_core::listing::ProductRecord;

pub use structure::validate_product_structure;

/// A product pulled out of a page, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    pub record: ProductRecord,
    /// `true` when the record came from a JSON-LD `Product` block.
    pub structured: bool,
}

/// Record from the page's JSON-LD `Product` block, if it has a usable one.
#[must_use]
pub fn structured_product(html: &str, url: &str) -> Option<ProductRecord> {
    let block = jsonld::find_product_block(html)?;
    let problems = validate_product_structure(&block);
    if !problems.is_empty() {
        tracing::debug!(url, ?problems, "product block has structural problems");
    }
    jsonld::record_from_block(&block, url)
}

/// JSON-LD first, then the HTML rule tables. `None` when neither yields a name.
#[must_use]
pub fn extract_product(html: &str, url: &str) -> Option<ExtractedPage> {
    if let Some(record) = structured_product(html, url) {
        return Some(ExtractedPage {
            record,
            structured: true,
        });
    }
    html::record_from_html(html, url).map(|record| ExtractedPage {
        record,
        structured: false,
    })
}
