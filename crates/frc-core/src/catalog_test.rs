use std::io::Write as _;

use rust_decimal::Decimal;

use super::*;

fn embedded() -> Catalog {
    Catalog::embedded().expect("embedded catalog is valid")
}

fn price(listing: &ProductListing) -> Decimal {
    listing.price.expect("catalog listings carry a price")
}

// ---- exact and alias resolution ----

#[test]
fn every_canonical_key_resolves_to_its_own_listings() {
    let catalog = embedded();
    for key in catalog.keys() {
        if let Some(CatalogEntry::Canonical(listings)) = catalog.get(key) {
            assert_eq!(
                catalog.resolve(key),
                Some(listings.as_slice()),
                "key {key}"
            );
        }
    }
}

#[test]
fn every_alias_resolves_like_its_target() {
    let catalog = embedded();
    let mut aliases = 0;
    for key in catalog.keys() {
        if let Some(CatalogEntry::Alias(target)) = catalog.get(key) {
            aliases += 1;
            assert_eq!(catalog.resolve(key), catalog.resolve(target), "alias {key}");
            assert!(catalog.resolve(key).is_some());
        }
    }
    assert!(aliases > 20);
}

#[test]
fn resolve_is_case_and_whitespace_insensitive() {
    let catalog = embedded();
    assert_eq!(catalog.resolve("  NEO  "), catalog.resolve("neo"));
    assert_eq!(catalog.resolve("Spark MAX"), catalog.resolve("spark max"));
}

#[test]
fn neo_resolves_to_rev_and_andymark() {
    let catalog = embedded();
    let listings = catalog.resolve("neo").unwrap();

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].vendor, "REV Robotics");
    assert_eq!(price(&listings[0]), Decimal::new(5000, 2));
    assert_eq!(listings[1].vendor, "AndyMark");
    assert_eq!(price(&listings[1]), Decimal::new(5600, 2));
    assert!(listings.iter().all(|l| l.in_stock));
    assert!(listings.iter().all(|l| l.source == Source::Database));
}

#[test]
fn sparkmax_alias_resolves_to_spark_max() {
    let catalog = embedded();
    let listings = catalog.resolve("sparkmax").unwrap();
    assert_eq!(listings.len(), 2);
    assert!(listings[0].name.contains("SPARK MAX"));
}

#[test]
fn falcon_is_its_own_part() {
    let catalog = embedded();
    assert!(matches!(
        catalog.get("falcon"),
        Some(CatalogEntry::Canonical(listings)) if listings.len() == 1
    ));

    let listings = catalog.resolve("Falcon").expect("falcon resolves");
    assert_eq!(listings[0].name, "Falcon Motor");
    assert_eq!(listings[0].vendor, "CTRE");
    assert_eq!(listings[0].price, Some(Decimal::new(21999, 2)));
    let falcon_500 = catalog.resolve("falcon 500").expect("falcon 500 resolves");
    assert_eq!(falcon_500[0].name, "Falcon 500 Brushless Motor");
}

// ---- partial matching ----

#[test]
fn partial_match_is_token_order_independent() {
    let catalog = embedded();
    let forward = catalog.resolve("neo 550").unwrap();
    let reversed = catalog.resolve("550 neo").unwrap();
    assert_eq!(forward, reversed);
    assert!(forward[0].name.contains("550"));
}

#[test]
fn partial_match_uses_symmetric_containment() {
    let catalog = embedded();
    // "krak" is contained in key token "kraken".
    let listings = catalog.resolve("krak").unwrap();
    assert!(listings[0].name.contains("Kraken"));
    // query token "navxmxp" contains key token "navx".
    let listings = catalog.resolve("navxmxp").unwrap();
    assert!(listings[0].name.contains("navX2"));
}

#[test]
fn partial_match_takes_first_key_in_file_order() {
    let yaml = r"
parts:
  - key: red wheel
    listings:
      - { name: Red, vendor: A, price: 1.00, url: 'https://a/red' }
  - key: wheel
    listings:
      - { name: Plain, vendor: A, price: 2.00, url: 'https://a/plain' }
";
    let catalog = Catalog::from_yaml_str(yaml).unwrap();
    assert_eq!(catalog.resolve("whe").unwrap()[0].name, "Red");
    assert_eq!(catalog.resolve("wheel").unwrap()[0].name, "Plain");
}

#[test]
fn partial_match_skips_alias_keys() {
    let yaml = r"
parts:
  - key: gizmo
    listings:
      - { name: Gizmo, vendor: A, price: 1.00, url: 'https://a/g' }
  - key: widget thing
    alias: gizmo
";
    let catalog = Catalog::from_yaml_str(yaml).unwrap();
    assert!(catalog.resolve("widget").is_none());
}

#[test]
fn unmatched_and_empty_queries_resolve_to_none() {
    let catalog = embedded();
    assert!(catalog.resolve("flux capacitor").is_none());
    assert!(catalog.resolve("").is_none());
    assert!(catalog.resolve("   ").is_none());
}

// ---- validation ----

#[test]
fn rejects_alias_chains() {
    let yaml = r"
parts:
  - key: a
    listings:
      - { name: A, vendor: V, price: 1.00, url: 'https://a' }
  - key: b
    alias: a
  - key: c
    alias: b
";
    let err = Catalog::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("another alias"), "{err}");
}

#[test]
fn rejects_dangling_alias() {
    let yaml = "parts:\n  - key: b\n    alias: missing\n";
    let err = Catalog::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("unknown key"), "{err}");
}

#[test]
fn rejects_duplicate_keys_after_normalization() {
    let yaml = r"
parts:
  - key: Neo
    listings:
      - { name: A, vendor: V, price: 1.00, url: 'https://a' }
  - key: ' neo '
    listings:
      - { name: B, vendor: V, price: 1.00, url: 'https://b' }
";
    let err = Catalog::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate catalog key"), "{err}");
}

#[test]
fn rejects_empty_listings_and_urls() {
    let err = Catalog::from_yaml_str("parts:\n  - key: lonely\n").unwrap_err();
    assert!(err.to_string().contains("no listings"), "{err}");

    let yaml = r"
parts:
  - key: a
    listings:
      - { name: A, vendor: V, price: 1.00, url: '' }
";
    let err = Catalog::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("empty url"), "{err}");
}

#[test]
fn rejects_unparsable_document() {
    let err = Catalog::from_yaml_str("parts: [oops").unwrap_err();
    assert!(matches!(err, ConfigError::CatalogParse(_)));
}

#[test]
fn embedded_catalog_ships_five_fallback_vendors() {
    let catalog = embedded();
    let names: Vec<&str> = catalog
        .fallback_vendors()
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "AndyMark",
            "REV Robotics",
            "CTRE",
            "WCP (West Coast Products)",
            "Deküp Robotics"
        ]
    );
    assert_eq!(catalog.canonical_count(), 49);
    assert_eq!(catalog.len(), 86);
}

#[test]
fn load_reads_file_and_reports_missing_path() {
    let dir = std::env::temp_dir().join(format!("frc-catalog-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("catalog.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "parts:\n  - key: gizmo\n    listings:\n      - {{ name: G, vendor: V, price: 3.50, url: 'https://g' }}"
    )
    .unwrap();

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.fallback_vendors().is_empty());

    let err = Catalog::load(&dir.join("nope.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::CatalogFileIo { .. }));

    std::fs::remove_dir_all(&dir).ok();
}
