//! Domain model for the FRC parts finder.
//!
//! Everything in this crate is pure: listing types, the static parts catalog
//! and its resolver, the canonical part signatures, the match/score engine,
//! the vendor registry and environment configuration. Network and cache code
//! lives in `frc-scraper`, `frc-cache` and `frc-search`.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod error;
pub mod listing;
pub mod matching;
pub mod specs;
pub mod vendors;

pub use app_config::{AppConfig, Environment};
pub use catalog::{Catalog, CatalogEntry, FallbackVendor};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use listing::{ProductListing, ResponseSource, Source};
pub use matching::{classify, matches_canonical, CanonicalMatch, Classification};
pub use specs::{canonical_spec_for_query, CanonicalSpec, CategorySignature};
pub use vendors::{default_vendors, Discovery, VendorDescriptor, VendorFamily};
