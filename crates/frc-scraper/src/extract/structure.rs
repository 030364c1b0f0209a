use serde_json::Value;

use super::jsonld::normalize_price_text;

/// Problems with an embedded product block, empty when it looks sound.
///
/// Only used for diagnostics; extraction is lenient and does not require a
/// clean block.
#[must_use]
pub fn validate_product_structure(block: &Value) -> Vec<String> {
    let mut problems = Vec::new();

    for field in ["@type", "name"] {
        if block.get(field).is_none() {
            problems.push(format!("missing required field: {field}"));
        }
    }

    if block.get("@type").and_then(Value::as_str) != Some("Product") {
        problems.push("invalid @type, expected 'Product'".to_string());
    }

    let name = block.get("name").and_then(Value::as_str).unwrap_or_default();
    if name.trim().chars().count() < 3 {
        problems.push("product name too short or empty".to_string());
    }

    match block.get("offers") {
        Some(offer @ Value::Object(_)) => {
            if !price_is_valid(offer.get("price")) {
                problems.push("invalid price format".to_string());
            }
        }
        Some(Value::Array(offers)) => {
            for (i, offer) in offers.iter().enumerate() {
                if !offer.is_object() {
                    problems.push(format!("invalid offer structure at index {i}"));
                } else if !price_is_valid(offer.get("price")) {
                    problems.push(format!("invalid price format in offer {i}"));
                }
            }
        }
        _ => {}
    }

    problems
}

/// Absent and null prices are fine; present ones must be non-negative numbers
/// or text that normalizes to one.
fn price_is_valid(price: Option<&Value>) -> bool {
    match price {
        None | Some(Value::Null) => true,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|p| p >= 0.0),
        Some(Value::String(s)) => normalize_price_text(s).is_some(),
        Some(_) => false,
    }
}
