//! Static keyword signatures for named parts and broad part categories.

/// Keyword and brand signature of one specific, named part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalSpec {
    pub name: &'static str,
    /// Every one of these must appear for the part to score at all.
    pub must_keywords: &'static [&'static str],
    pub optional_keywords: &'static [&'static str],
    /// Brands checked by [`crate::matches_canonical`].
    pub brands: &'static [&'static str],
    /// Brands checked by [`crate::classify`]. Narrower than `brands` for REV parts.
    pub classifier_brands: &'static [&'static str],
}

/// Keyword, brand and spec-term signature of a part category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySignature {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub brands: &'static [&'static str],
    pub specs: &'static [&'static str],
}

/// Named parts, in lookup order. Query lookup takes the first hit.
pub const CANONICAL_PARTS: &[CanonicalSpec] = &[
    CanonicalSpec {
        name: "neo",
        must_keywords: &["NEO", "brushless"],
        optional_keywords: &["motor", "550"],
        brands: &["REV", "REV Robotics"],
        classifier_brands: &["REV"],
    },
    CanonicalSpec {
        name: "kraken",
        must_keywords: &["Kraken", "X60"],
        optional_keywords: &["brushless", "motor"],
        brands: &["WCP", "West Coast Products"],
        classifier_brands: &["WCP", "West Coast Products"],
    },
    CanonicalSpec {
        name: "spark_max",
        must_keywords: &["SPARK", "MAX"],
        optional_keywords: &["controller", "esc"],
        brands: &["REV", "REV Robotics"],
        classifier_brands: &["REV"],
    },
    CanonicalSpec {
        name: "talon_srx",
        must_keywords: &["Talon", "SRX"],
        optional_keywords: &["controller", "esc"],
        brands: &["CTRE"],
        classifier_brands: &["CTRE"],
    },
    CanonicalSpec {
        name: "victor_spx",
        must_keywords: &["Victor", "SPX"],
        optional_keywords: &["controller", "esc"],
        brands: &["CTRE"],
        classifier_brands: &["CTRE"],
    },
    CanonicalSpec {
        name: "cancoder",
        must_keywords: &["CANcoder"],
        optional_keywords: &["encoder", "magnetic"],
        brands: &["CTRE"],
        classifier_brands: &["CTRE"],
    },
];

pub const CATEGORIES: &[CategorySignature] = &[
    CategorySignature {
        name: "motors",
        keywords: &["motor", "brushless", "brushed", "servo", "actuator"],
        brands: &["REV", "CTRE", "VEX", "AndyMark", "Kraken", "Falcon", "NEO"],
        specs: &["rpm", "torque", "voltage", "current", "encoder"],
    },
    CategorySignature {
        name: "controllers",
        keywords: &["controller", "esc", "pwm", "can", "spark", "talon", "victor"],
        brands: &["REV", "CTRE", "VEX", "AndyMark"],
        specs: &["voltage", "current", "pwm", "can", "encoder"],
    },
    CategorySignature {
        name: "sensors",
        keywords: &["sensor", "encoder", "gyro", "accelerometer", "ultrasonic", "lidar"],
        brands: &["REV", "CTRE", "VEX", "AndyMark", "NavX", "Pigeon"],
        specs: &["resolution", "accuracy", "range", "frequency"],
    },
    CategorySignature {
        name: "mechanical",
        keywords: &["gear", "belt", "chain", "wheel", "bearing", "bracket", "mount"],
        brands: &["REV", "VEX", "AndyMark", "West Coast Products"],
        specs: &["size", "pitch", "width", "length", "diameter"],
    },
];

/// Generic competition-robotics terms, lowercase.
pub const FRC_KEYWORDS: &[&str] = &[
    "frc",
    "first robotics",
    "robotics competition",
    "vex",
    "rev",
    "ctre",
];

/// The first named part any of whose must keywords occurs in `query`.
#[must_use]
pub fn canonical_spec_for_query(query: &str) -> Option<&'static CanonicalSpec> {
    let query = query.to_lowercase();
    CANONICAL_PARTS.iter().find(|spec| {
        spec.must_keywords
            .iter()
            .any(|kw| query.contains(&kw.to_lowercase()))
    })
}
