//! Vendor search against local storefront doubles.
//!
//! Every test stands up a `wiremock` server playing one storefront and points
//! a vendor descriptor at it, so discovery, fetch and extraction run end to
//! end without real network traffic.

use std::time::Duration;

use frc_core::specs::CANONICAL_PARTS;
use frc_core::vendors::{Discovery, VendorDescriptor, VendorFamily};
use frc_core::Source;
use rust_decimal::Decimal;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use frc_scraper::{fetch_listing, search_vendor, FetchClient, ScraperError};

fn test_client() -> FetchClient {
    FetchClient::new(Duration::from_secs(5), "frc-test/0.1", Duration::ZERO)
        .expect("failed to build test FetchClient")
}

fn vendor(server: &MockServer, family: VendorFamily, discovery: Discovery) -> VendorDescriptor {
    VendorDescriptor {
        name: "Test Vendor".to_string(),
        base_url: server.uri(),
        family,
        discovery,
        max_candidates: 10,
    }
}

fn product_page(name: &str, price: &str, availability: &str) -> String {
    format!(
        r#"<html><head><title>{name} | Shop</title>
<script type="application/ld+json">
{{"@context": "https://schema.org", "@type": "Product", "name": "{name}",
  "brand": {{"@type": "Brand", "name": "REV Robotics"}},
  "offers": {{"@type": "Offer", "price": "{price}", "priceCurrency": "USD",
              "availability": "https://schema.org/{availability}"}}}}
</script></head><body><h1>{name}</h1></body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn spec(name: &str) -> &'static frc_core::CanonicalSpec {
    CANONICAL_PARTS.iter().find(|s| s.name == name).unwrap()
}

// ---------------------------------------------------------------------------
// Stock status from embedded product data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn availability_drives_stock_status() {
    let server = MockServer::start().await;
    mount_page(&server, "/in", product_page("Talon SRX", "89.99", "InStock")).await;
    mount_page(&server, "/out", product_page("Victor SPX", "49.99", "OutOfStock")).await;

    let client = test_client();
    let v = vendor(&server, VendorFamily::RealVendor, Discovery::KnownUrls(vec![]));

    let in_stock = fetch_listing(&client, &v, &format!("{}/in", server.uri()), None)
        .await
        .expect("listing for in-stock page");
    assert!(in_stock.in_stock);
    assert_eq!(in_stock.price, Some(Decimal::new(8999, 2)));
    assert_eq!(in_stock.vendor, "Test Vendor");
    assert_eq!(in_stock.source, Source::RealVendor);

    let out = fetch_listing(&client, &v, &format!("{}/out", server.uri()), None)
        .await
        .expect("listing for out-of-stock page");
    assert!(!out.in_stock);
}

#[tokio::test]
async fn failed_fetch_yields_no_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client();
    let v = vendor(&server, VendorFamily::RealVendor, Discovery::KnownUrls(vec![]));
    let gone = fetch_listing(&client, &v, &format!("{}/gone", server.uri()), None).await;
    assert!(gone.is_none());
}

#[tokio::test]
async fn listing_must_match_the_expected_part() {
    let server = MockServer::start().await;
    mount_page(&server, "/spx", product_page("Victor SPX", "49.99", "InStock")).await;

    let client = test_client();
    let v = vendor(&server, VendorFamily::RealVendor, Discovery::KnownUrls(vec![]));
    let url = format!("{}/spx", server.uri());

    assert!(fetch_listing(&client, &v, &url, Some(spec("talon_srx"))).await.is_none());
    let listing = fetch_listing(&client, &v, &url, None)
        .await
        .expect("unfiltered listing");
    assert_eq!(listing.name, "Victor SPX");
}

// ---------------------------------------------------------------------------
// Sitemap discovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sitemap_keeps_product_urls_with_every_query_token() {
    let server = MockServer::start().await;
    let base = server.uri();
    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/products/kraken-x60</loc></url>
  <url><loc>{base}/products/kraken-x44</loc></url>
  <url><loc>{base}/collections/kraken-x60</loc></url>
</urlset>"#
    );
    mount_page(&server, "/sitemap.xml", sitemap).await;
    mount_page(&server, "/products/kraken-x60", product_page("Kraken X60", "217.99", "InStock")).await;

    let v = vendor(
        &server,
        VendorFamily::RealVendor,
        Discovery::Sitemap {
            sitemap_url: format!("{base}/sitemap.xml"),
            product_path: "/products/".to_string(),
        },
    );
    let listings = search_vendor(&test_client(), &v, "Kraken X60", None).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].name, "Kraken X60");
    assert_eq!(listings[0].url, format!("{base}/products/kraken-x60"));
}

#[tokio::test]
async fn missing_sitemap_finds_nothing() {
    let server = MockServer::start().await;
    let v = vendor(
        &server,
        VendorFamily::RealVendor,
        Discovery::Sitemap {
            sitemap_url: format!("{}/sitemap.xml", server.uri()),
            product_path: "/products/".to_string(),
        },
    );
    assert!(search_vendor(&test_client(), &v, "kraken", None).await.is_empty());
}

// ---------------------------------------------------------------------------
// Known URL lists and HTML search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn known_urls_skip_pages_without_products() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/rev-21-1650/", product_page("NEO Brushless Motor V1.1", "50.00", "InStock")).await;
    mount_page(&server, "/rev-21-1651/", "<html><body>moved</body></html>".to_string()).await;

    let v = vendor(
        &server,
        VendorFamily::RealVendor,
        Discovery::KnownUrls(vec![(
            "neo".to_string(),
            vec![format!("{base}/rev-21-1650/"), format!("{base}/rev-21-1651/")],
        )]),
    );
    let listings = search_vendor(&test_client(), &v, "NEO motor", None).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].price, Some(Decimal::new(5000, 2)));
}

#[tokio::test]
async fn html_search_resolves_relative_product_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "climber kit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/products/climber-kit">Climber</a>
               <a href="/products/climber-kit">Climber again</a>
               <a href="/pages/about">About</a>"#,
        ))
        .mount(&server)
        .await;
    mount_page(&server, "/products/climber-kit", product_page("Climber in a Box", "300.00", "InStock")).await;

    let v = vendor(
        &server,
        VendorFamily::RealVendor,
        Discovery::HtmlSearch {
            search_url: format!("{base}/search?q="),
        },
    );
    let listings = search_vendor(&test_client(), &v, "climber kit", None).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].url, format!("{base}/products/climber-kit"));
}

// ---------------------------------------------------------------------------
// Shopify suggest API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn suggest_results_are_checked_against_the_named_part() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/suggest.json"))
        .and(query_param("q", "spark max"))
        .and(query_param("resources[type]", "product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resources": {"results": {"products": [
                {"url": "/products/spark-max?_pos=1"},
                {"url": "/products/spark-plug?_pos=2"}
            ]}}
        })))
        .mount(&server)
        .await;
    mount_page(&server, "/products/spark-max", product_page("SPARK MAX Motor Controller", "90.00", "InStock")).await;
    mount_page(&server, "/products/spark-plug", product_page("Spark Plug", "3.00", "InStock")).await;

    let v = vendor(&server, VendorFamily::Shopify, Discovery::SuggestApi);
    let listings = search_vendor(&test_client(), &v, "spark max", Some(spec("spark_max"))).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].name, "SPARK MAX Motor Controller");
    assert_eq!(listings[0].source, Source::Shopify);
}

#[tokio::test]
async fn empty_suggest_falls_back_to_product_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/suggest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"resources": {"results": {"products": []}}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"products": [{"handle": "hex-bearing"}]}),
        ))
        .mount(&server)
        .await;
    mount_page(&server, "/products/hex-bearing", product_page("1/2in Hex Bearing", "4.99", "InStock")).await;

    let v = vendor(&server, VendorFamily::Shopify, Discovery::SuggestApi);
    let listings = search_vendor(&test_client(), &v, "bearing", None).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].name, "1/2in Hex Bearing");
}

// ---------------------------------------------------------------------------
// WooCommerce APIs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_api_permalinks_are_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/store/products"))
        .and(query_param("search", "talon srx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 7, "permalink": format!("{base}/product/talon-srx/")}
        ])))
        .mount(&server)
        .await;
    mount_page(&server, "/product/talon-srx/", product_page("Talon SRX CTRE controller", "89.99", "InStock")).await;

    let v = vendor(&server, VendorFamily::WooCommerce, Discovery::StoreApi);
    let listings = search_vendor(&test_client(), &v, "talon srx", Some(spec("talon_srx"))).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].source, Source::WooCommerce);
}

#[tokio::test]
async fn store_api_failures_fall_through_to_search_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/store/products"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            serde_json::json!({"code": "woocommerce_rest_cannot_view"}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/"))
        .and(query_param("s", "gusset"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/products/gusset-plate">Gusset</a>"#),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/products/gusset-plate", product_page("Gusset Plate", "12.00", "InStock")).await;

    let v = vendor(&server, VendorFamily::WooCommerce, Discovery::StoreApi);
    let listings = search_vendor(&test_client(), &v, "gusset", None).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].name, "Gusset Plate");
}

// ---------------------------------------------------------------------------
// Fetch client error surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client()
        .get_text(&format!("{}/boom", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn liveness_follows_head_status() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/alive"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/dead"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client();
    assert!(client.is_alive(&format!("{}/alive", server.uri())).await);
    assert!(!client.is_alive(&format!("{}/dead", server.uri())).await);
}
