use std::str::FromStr;
use std::time::Duration;

use crate::listing::{ResponseSource, Source};

/// Storefront family: the group of vendors searched and cached together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorFamily {
    RealVendor,
    Shopify,
    WooCommerce,
}

impl VendorFamily {
    /// Search order inside the reconciler.
    pub const ALL: [VendorFamily; 3] = [
        VendorFamily::RealVendor,
        VendorFamily::Shopify,
        VendorFamily::WooCommerce,
    ];

    /// Tag used in search-cache keys.
    #[must_use]
    pub fn cache_tag(self) -> &'static str {
        match self {
            VendorFamily::RealVendor => "real_vendors",
            VendorFamily::Shopify => "shopify",
            VendorFamily::WooCommerce => "woocommerce",
        }
    }

    #[must_use]
    pub fn source(self) -> Source {
        match self {
            VendorFamily::RealVendor => Source::RealVendor,
            VendorFamily::Shopify => Source::Shopify,
            VendorFamily::WooCommerce => Source::WooCommerce,
        }
    }

    #[must_use]
    pub fn response_source(self) -> ResponseSource {
        match self {
            VendorFamily::RealVendor => ResponseSource::RealVendors,
            VendorFamily::Shopify => ResponseSource::Shopify,
            VendorFamily::WooCommerce => ResponseSource::WooCommerce,
        }
    }

    /// How long a family's search results stay cached.
    #[must_use]
    pub fn search_ttl(self) -> Duration {
        match self {
            VendorFamily::RealVendor => Duration::from_secs(3600),
            VendorFamily::Shopify | VendorFamily::WooCommerce => Duration::from_secs(7200),
        }
    }

    /// Whether discovered products are checked against the query's named part.
    #[must_use]
    pub fn checks_canonical(self) -> bool {
        !matches!(self, VendorFamily::RealVendor)
    }
}

impl std::fmt::Display for VendorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VendorFamily::RealVendor => write!(f, "real-vendors"),
            VendorFamily::Shopify => write!(f, "shopify"),
            VendorFamily::WooCommerce => write!(f, "woocommerce"),
        }
    }
}

impl FromStr for VendorFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "real-vendors" | "real_vendors" | "real" => Ok(VendorFamily::RealVendor),
            "shopify" => Ok(VendorFamily::Shopify),
            "woocommerce" => Ok(VendorFamily::WooCommerce),
            other => Err(format!("unknown vendor family '{other}'")),
        }
    }
}

/// How a vendor turns a query into candidate product URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Storefront suggest JSON, then the first page of the product listing JSON.
    SuggestApi,
    /// Store API, then the v3 REST API, then the HTML product search page.
    StoreApi,
    /// XML sitemap; keeps product URLs containing every query token.
    Sitemap {
        sitemap_url: String,
        /// Path prefix (after the base URL) that marks a product page.
        product_path: String,
    },
    /// Hand-verified URLs keyed by a keyword that must occur in the query.
    KnownUrls(Vec<(String, Vec<String>)>),
    /// Vendor search page; the encoded query is appended to `search_url`.
    HtmlSearch { search_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorDescriptor {
    pub name: String,
    /// Scheme and host, no trailing slash.
    pub base_url: String,
    pub family: VendorFamily,
    pub discovery: Discovery,
    /// Upper bound on product pages fetched per query.
    pub max_candidates: usize,
}

impl VendorDescriptor {
    /// Host part of `base_url`.
    #[must_use]
    pub fn domain(&self) -> &str {
        let rest = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, r)| r);
        rest.split('/').next().unwrap_or(rest)
    }
}

fn known(keyword: &str, base: &str, paths: &[&str]) -> (String, Vec<String>) {
    (
        keyword.to_string(),
        paths.iter().map(|p| format!("{base}{p}")).collect(),
    )
}

/// The production vendor set, grouped by family in search order.
#[must_use]
pub fn default_vendors() -> Vec<VendorDescriptor> {
    const REV: &str = "https://www.revrobotics.com";
    const CTRE_PRODUCTS: &str = "https://store.ctr-electronics.com/products";

    vec![
        VendorDescriptor {
            name: "WCP (West Coast Products)".to_string(),
            base_url: "https://wcproducts.com".to_string(),
            family: VendorFamily::RealVendor,
            discovery: Discovery::Sitemap {
                sitemap_url: "https://wcproducts.com/sitemap.xml".to_string(),
                product_path: "/products/".to_string(),
            },
            max_candidates: 10,
        },
        VendorDescriptor {
            name: "REV Robotics".to_string(),
            base_url: REV.to_string(),
            family: VendorFamily::RealVendor,
            discovery: Discovery::KnownUrls(vec![
                known("neo", REV, &["/rev-21-1650/", "/rev-21-1651/"]),
                known("spark", REV, &["/rev-11-2158/", "/rev-11-2159/"]),
                known(
                    "motor",
                    REV,
                    &["/rev-21-1650/", "/rev-21-1651/", "/rev-21-1652/"],
                ),
                known("controller", REV, &["/rev-11-2158/", "/rev-11-2159/"]),
            ]),
            max_candidates: 8,
        },
        VendorDescriptor {
            name: "AndyMark".to_string(),
            base_url: "https://andymark.com".to_string(),
            family: VendorFamily::RealVendor,
            discovery: Discovery::HtmlSearch {
                search_url: "https://andymark.com/search?q=".to_string(),
            },
            max_candidates: 10,
        },
        VendorDescriptor {
            name: "CTRE".to_string(),
            base_url: "https://store.ctr-electronics.com".to_string(),
            family: VendorFamily::RealVendor,
            discovery: Discovery::KnownUrls(vec![
                known("talon", CTRE_PRODUCTS, &["/talon-srx", "/talon-fx"]),
                known("victor", CTRE_PRODUCTS, &["/victor-spx", "/victor-sp"]),
                known("cancoder", CTRE_PRODUCTS, &["/cancoder"]),
                known("pigeon", CTRE_PRODUCTS, &["/pigeon-2-0"]),
            ]),
            max_candidates: 8,
        },
        VendorDescriptor {
            name: "REV Robotics".to_string(),
            base_url: REV.to_string(),
            family: VendorFamily::Shopify,
            discovery: Discovery::SuggestApi,
            max_candidates: 15,
        },
        VendorDescriptor {
            name: "WCP (West Coast Products)".to_string(),
            base_url: "https://wcproducts.com".to_string(),
            family: VendorFamily::Shopify,
            discovery: Discovery::SuggestApi,
            max_candidates: 15,
        },
        VendorDescriptor {
            name: "AndyMark".to_string(),
            base_url: "https://andymark.com".to_string(),
            family: VendorFamily::WooCommerce,
            discovery: Discovery::StoreApi,
            max_candidates: 10,
        },
        VendorDescriptor {
            name: "CTRE (Cross The Road Electronics)".to_string(),
            base_url: "https://store.ctr-electronics.com".to_string(),
            family: VendorFamily::WooCommerce,
            discovery: Discovery::StoreApi,
            max_candidates: 10,
        },
    ]
}
