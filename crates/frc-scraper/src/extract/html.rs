//! Pattern-based fallback for pages without a JSON-LD product block.
//!
//! Each field has an ordered rule table. Rules are independent; the first
//! one that yields a usable value wins and later rules are not tried.

use std::sync::LazyLock;

use frc_core::listing::ProductRecord;
use regex::Regex;
use rust_decimal::Decimal;

use super::jsonld::normalize_price_text;

fn rules(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

static TITLE_RULES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| rules(&[r"(?i)<title[^>]*>([^<]+)</title>"]));

static PRICE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    rules(&[
        r#"(?i)<span[^>]*class="[^"]*price[^"]*"[^>]*>([^<]+)</span>"#,
        r#"(?i)<span[^>]*class="[^"]*amount[^"]*"[^>]*>([^<]+)</span>"#,
        r#"(?i)<div[^>]*class="[^"]*price[^"]*"[^>]*>([^<]+)</div>"#,
        r#"(?i)<span[^>]*class="[^"]*money[^"]*"[^>]*>([^<]+)</span>"#,
        r"(\$\s*[\d,]+\.?\d*)",
        r"(USD\s*[\d,]+\.?\d*)",
    ])
});

static OUT_OF_STOCK_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    rules(&[
        r#"(?i)class="[^"]*out-of-stock[^"]*""#,
        r#"(?i)class="[^"]*unavailable[^"]*""#,
        r"(?i)out of stock",
        r"(?i)unavailable",
        r"(?i)sold out",
        r"(?i)not available",
    ])
});

static IMAGE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    rules(&[
        r#"(?i)<img[^>]*class="[^"]*wp-post-image[^"]*"[^>]*src="([^"]*)""#,
        r#"(?i)<img[^>]*class="[^"]*product-image[^"]*"[^>]*src="([^"]*)""#,
        r#"(?i)<img[^>]*class="[^"]*attachment-[^"]*"[^>]*src="([^"]*)""#,
        r#"(?i)<img[^>]*class="[^"]*product-photo[^"]*"[^>]*src="([^"]*)""#,
        r#"(?i)<img[^>]*src="([^"]*)"[^>]*class="[^"]*product[^"]*""#,
    ])
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+\.?\d*").expect("valid regex"));

/// First rule whose capture passes `accept`.
fn first_match<T>(
    rules: &[Regex],
    html: &str,
    accept: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    rules.iter().find_map(|re| {
        let cap = re.captures(html)?;
        let text = cap.get(1).or_else(|| cap.get(0))?.as_str().trim();
        accept(text)
    })
}

#[must_use]
pub fn title(html: &str) -> Option<String> {
    first_match(&TITLE_RULES, html, |t| {
        (!t.is_empty()).then(|| decode_entities(t))
    })
}

/// First rule whose match contains a parsable number.
#[must_use]
pub fn price(html: &str) -> Option<Decimal> {
    first_match(&PRICE_RULES, html, |t| {
        NUMBER_RE
            .find(t)
            .and_then(|m| normalize_price_text(m.as_str()))
    })
}

#[must_use]
pub fn in_stock(html: &str) -> bool {
    !OUT_OF_STOCK_RULES.iter().any(|re| re.is_match(html))
}

#[must_use]
pub fn image(html: &str) -> Option<String> {
    first_match(&IMAGE_RULES, html, |src| {
        (!src.is_empty()).then(|| src.to_owned())
    })
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Builds a record from raw markup. Pages without a title yield nothing.
#[must_use]
pub fn record_from_html(html: &str, url: &str) -> Option<ProductRecord> {
    Some(ProductRecord {
        name: title(html)?,
        url: url.to_owned(),
        price: price(html),
        currency: "USD".to_string(),
        in_stock: in_stock(html),
        image: image(html),
        ..ProductRecord::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_decoded() {
        let html = "<html><title>\n  Toughbox Mini &amp; CIM  </title></html>";
        assert_eq!(title(html).as_deref(), Some("Toughbox Mini & CIM"));
    }

    #[test]
    fn price_prefers_earlier_rule() {
        let html = r#"<div class="product-price">$89.99</div>
                      <span class="price sale">$79.99</span>"#;
        assert_eq!(price(html), Some(Decimal::new(7999, 2)));
    }

    #[test]
    fn price_skips_rule_without_number() {
        let html = r#"<span class="price-label">Price:</span>
                      <span class="woocommerce-Price-amount amount">1,249.50</span>"#;
        assert_eq!(price(html), Some(Decimal::new(124_950, 2)));
    }

    #[test]
    fn price_falls_back_to_bare_dollar_amount() {
        let html = "<p>Only $12.99 today</p>";
        assert_eq!(price(html), Some(Decimal::new(1299, 2)));
    }

    #[test]
    fn price_absent_when_nothing_matches() {
        assert_eq!(price("<p>Contact us</p>"), None);
    }

    #[test]
    fn stock_phrases_mark_out_of_stock() {
        assert!(in_stock("<button>Add to cart</button>"));
        assert!(!in_stock(r#"<p class="stock out-of-stock">Gone</p>"#));
        assert!(!in_stock("<p>This item is SOLD OUT</p>"));
        assert!(!in_stock("<p>Currently not available</p>"));
    }

    #[test]
    fn image_rules_accept_either_attribute_order() {
        let html = r#"<img class="attachment-shop_single" src="https://cdn/a.jpg">"#;
        assert_eq!(image(html).as_deref(), Some("https://cdn/a.jpg"));

        let html = r#"<img src="https://cdn/b.jpg" class="main product-hero">"#;
        assert_eq!(image(html).as_deref(), Some("https://cdn/b.jpg"));
    }

    #[test]
    fn record_needs_a_title() {
        assert!(record_from_html("<p>$5.00</p>", "https://x").is_none());

        let rec = record_from_html(
            r#"<title>Hex Bearing</title><span class="price">$4.99</span>"#,
            "https://x/hex",
        )
        .unwrap();
        assert_eq!(rec.name, "Hex Bearing");
        assert_eq!(rec.price, Some(Decimal::new(499, 2)));
        assert!(rec.in_stock);
        assert!(rec.sku.is_none());
    }
}
