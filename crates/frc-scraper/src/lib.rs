//! Vendor storefront access: a per-domain rate-limited fetch client, product
//! extraction from JSON-LD or raw HTML, and the discovery strategies that turn
//! a query into candidate product pages.

pub mod client;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod rate_limit;
pub mod search;

pub use client::FetchClient;
pub use discovery::discover_candidates;
pub use error::ScraperError;
pub use extract::{extract_product, validate_product_structure, ExtractedPage};
pub use rate_limit::DomainRateLimiter;
pub use search::{fetch_listing, fetch_product, search_vendor, FetchedProduct};
