use std::collections::{HashMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::listing::{ProductListing, Source};
use crate::ConfigError;

const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.yaml");

/// A vendor whose generic search page is offered when nothing else resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackVendor {
    pub name: String,
    /// Search URL prefix; the encoded query is appended verbatim.
    pub search_url: String,
}

/// Value stored under a catalog key.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Canonical(Vec<ProductListing>),
    /// Points at a key holding a `Canonical` entry. Never at another alias.
    Alias(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    vendors: Vec<FallbackVendor>,
    parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
struct PartEntry {
    key: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    listings: Vec<CatalogListing>,
}

#[derive(Debug, Deserialize)]
struct CatalogListing {
    name: String,
    vendor: String,
    price: Decimal,
    url: String,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl From<CatalogListing> for ProductListing {
    fn from(raw: CatalogListing) -> Self {
        ProductListing {
            name: raw.name,
            vendor: raw.vendor,
            price: Some(raw.price),
            currency: "USD".to_string(),
            in_stock: raw.in_stock,
            url: raw.url,
            image: None,
            sku: None,
            description: None,
            source: Source::Database,
            is_search_link: false,
            frc_category: None,
            match_score: None,
        }
    }
}

/// Static mapping from known part names and aliases to vendor listings.
///
/// Keys keep their file order; partial matching walks that order.
#[derive(Debug, Clone)]
pub struct Catalog {
    order: Vec<String>,
    entries: HashMap<String, CatalogEntry>,
    vendors: Vec<FallbackVendor>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded document fails to parse or validate.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml_str(EMBEDDED_CATALOG)
    }

    /// Load and validate a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Loads from `path` when given, else the embedded catalog.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`] and [`Catalog::embedded`].
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::embedded(),
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the document fails to parse or validate.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Self::from_file(file)
    }

    fn from_file(file: CatalogFile) -> Result<Self, ConfigError> {
        let mut order = Vec::with_capacity(file.parts.len());
        let mut entries = HashMap::with_capacity(file.parts.len());

        for part in file.parts {
            let key = normalize_key(&part.key);
            if key.is_empty() {
                return Err(ConfigError::Validation(
                    "catalog key must be non-empty".to_string(),
                ));
            }
            if entries.contains_key(&key) {
                return Err(ConfigError::Validation(format!(
                    "duplicate catalog key: '{key}'"
                )));
            }

            let entry = match (part.alias, part.listings.is_empty()) {
                (Some(_), false) => {
                    return Err(ConfigError::Validation(format!(
                        "catalog key '{key}' has both an alias and listings"
                    )));
                }
                (Some(target), true) => CatalogEntry::Alias(normalize_key(&target)),
                (None, true) => {
                    return Err(ConfigError::Validation(format!(
                        "catalog key '{key}' has no listings"
                    )));
                }
                (None, false) => {
                    if let Some(bad) = part.listings.iter().find(|l| l.url.trim().is_empty()) {
                        return Err(ConfigError::Validation(format!(
                            "listing '{}' under '{key}' has an empty url",
                            bad.name
                        )));
                    }
                    CatalogEntry::Canonical(part.listings.into_iter().map(Into::into).collect())
                }
            };

            order.push(key.clone());
            entries.insert(key, entry);
        }

        validate_aliases(&entries)?;
        validate_vendors(&file.vendors)?;

        Ok(Self {
            order,
            entries,
            vendors: file.vendors,
        })
    }

    /// Resolve a free-text query to catalog listings.
    ///
    /// Exact key match first (following one alias hop), then a partial match:
    /// a canonical key matches when every query token is contained in some key
    /// token or contains one. The first matching key in file order wins; ties
    /// are not ranked.
    #[must_use]
    pub fn resolve(&self, query: &str) -> Option<&[ProductListing]> {
        let query = normalize_key(query);
        if query.is_empty() {
            return None;
        }

        if let Some(entry) = self.entries.get(&query) {
            return self.listings_of(entry);
        }

        let query_tokens: Vec<&str> = query.split_whitespace().collect();
        self.order.iter().find_map(|key| {
            let CatalogEntry::Canonical(listings) = self.entries.get(key)? else {
                return None;
            };
            let key_tokens: Vec<&str> = key.split_whitespace().collect();
            let matched = query_tokens.iter().all(|qt| {
                key_tokens
                    .iter()
                    .any(|kt| kt.contains(qt) || qt.contains(kt))
            });
            matched.then_some(listings.as_slice())
        })
    }

    fn listings_of<'a>(&'a self, entry: &'a CatalogEntry) -> Option<&'a [ProductListing]> {
        match entry {
            CatalogEntry::Canonical(listings) => Some(listings),
            CatalogEntry::Alias(target) => match self.entries.get(target)? {
                CatalogEntry::Canonical(listings) => Some(listings),
                CatalogEntry::Alias(_) => None,
            },
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(&normalize_key(key))
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of keys holding listings rather than aliases.
    #[must_use]
    pub fn canonical_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, CatalogEntry::Canonical(_)))
            .count()
    }

    #[must_use]
    pub fn fallback_vendors(&self) -> &[FallbackVendor] {
        &self.vendors
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

fn validate_aliases(entries: &HashMap<String, CatalogEntry>) -> Result<(), ConfigError> {
    for (key, entry) in entries {
        let CatalogEntry::Alias(target) = entry else {
            continue;
        };
        match entries.get(target) {
            Some(CatalogEntry::Canonical(_)) => {}
            Some(CatalogEntry::Alias(_)) => {
                return Err(ConfigError::Validation(format!(
                    "alias '{key}' points at another alias '{target}'"
                )));
            }
            None => {
                return Err(ConfigError::Validation(format!(
                    "alias '{key}' points at unknown key '{target}'"
                )));
            }
        }
    }
    Ok(())
}

fn validate_vendors(vendors: &[FallbackVendor]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for vendor in vendors {
        if vendor.name.trim().is_empty() || vendor.search_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fallback vendor needs a name and a search_url".to_string(),
            ));
        }
        if !seen.insert(vendor.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate fallback vendor: '{}'",
                vendor.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
