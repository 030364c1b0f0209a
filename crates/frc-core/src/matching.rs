//! Scores product text against part and category signatures.
//!
//! All scorers take text that is already lowercased (see [`match_text`]) and
//! compare keywords by plain substring containment.

use crate::specs::{CanonicalSpec, CategorySignature, CANONICAL_PARTS, CATEGORIES, FRC_KEYWORDS};

/// Minimum overall confidence for [`classify`] to accept a product.
pub const FRC_PART_THRESHOLD: f64 = 0.3;
/// Minimum score for [`matches_canonical`] to accept a product.
pub const CANONICAL_MATCH_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub is_frc_part: bool,
    /// Best part name when it outscores the best category, else the category.
    pub category: &'static str,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalMatch {
    pub is_match: bool,
    pub score: f64,
}

/// Joins the searchable fields of a product into one lowercase haystack.
#[must_use]
pub fn match_text(fields: &[Option<&str>]) -> String {
    fields
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[allow(clippy::cast_precision_loss)]
fn fraction(text: &str, needles: &[&str]) -> Option<f64> {
    if needles.is_empty() {
        return None;
    }
    let hits = needles
        .iter()
        .filter(|n| text.contains(&n.to_lowercase()))
        .count();
    Some(hits as f64 / needles.len() as f64)
}

/// `0.4·keywords + 0.3·brands + 0.3·spec terms`, clamped to `[0, 1]`.
#[must_use]
pub fn category_score(text: &str, category: &CategorySignature) -> f64 {
    let score = fraction(text, category.keywords).unwrap_or(0.0) * 0.4
        + fraction(text, category.brands).unwrap_or(0.0) * 0.3
        + fraction(text, category.specs).unwrap_or(0.0) * 0.3;
    score.clamp(0.0, 1.0)
}

/// Zero unless every must keyword is present; then
/// `0.6 + 0.2·optional + 0.2·brands`, clamped to `[0, 1]`.
#[must_use]
pub fn part_score(text: &str, spec: &CanonicalSpec) -> f64 {
    let must = match fraction(text, spec.must_keywords) {
        Some(f) if f < 1.0 => return 0.0,
        Some(_) => 0.6,
        None => 0.0,
    };
    let score = must
        + fraction(text, spec.optional_keywords).unwrap_or(0.0) * 0.2
        + fraction(text, spec.classifier_brands).unwrap_or(0.0) * 0.2;
    score.clamp(0.0, 1.0)
}

/// Share of the generic competition-robotics terms present in `text`.
#[must_use]
pub fn general_score(text: &str) -> f64 {
    fraction(text, FRC_KEYWORDS).unwrap_or(0.0).min(1.0)
}

/// Highest-scoring item; ties go to the earliest.
fn best<'a, T>(items: &'a [T], score: impl Fn(&T) -> f64) -> (Option<&'a T>, f64) {
    items.iter().fold((None, 0.0), |(best, best_score), item| {
        let s = score(item);
        if best.is_none() || s > best_score {
            (Some(item), s)
        } else {
            (best, best_score)
        }
    })
}

/// Decides whether `text` describes a competition-robotics part and which
/// category or named part it most resembles.
#[must_use]
pub fn classify(text: &str) -> Classification {
    let text = text.to_lowercase();

    let (best_category, category_best) = best(CATEGORIES, |c| category_score(&text, c));
    let (best_part, part_best) = best(CANONICAL_PARTS, |p| part_score(&text, p));
    let general = general_score(&text);

    let score = (category_best * 0.4)
        .max(part_best * 0.6)
        .max(general * 0.3);

    let category = if part_best > category_best {
        best_part.map_or("unknown", |p| p.name)
    } else {
        best_category.map_or("unknown", |c| c.name)
    };

    Classification {
        is_frc_part: score >= FRC_PART_THRESHOLD,
        category,
        score,
    }
}

/// Checks `text` against one expected part. Stricter than [`classify`]:
/// a missing must keyword rejects outright, otherwise
/// `0.5·must + 0.3·optional + 0.2·brands` must reach 0.6.
#[must_use]
pub fn matches_canonical(spec: &CanonicalSpec, text: &str) -> CanonicalMatch {
    let text = text.to_lowercase();

    let must = fraction(&text, spec.must_keywords).unwrap_or(1.0);
    if must < 1.0 {
        return CanonicalMatch {
            is_match: false,
            score: 0.0,
        };
    }

    let score = must * 0.5
        + fraction(&text, spec.optional_keywords).unwrap_or(0.0) * 0.3
        + fraction(&text, spec.brands).unwrap_or(0.0) * 0.2;

    CanonicalMatch {
        is_match: score >= CANONICAL_MATCH_THRESHOLD,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> &'static CanonicalSpec {
        CANONICAL_PARTS
            .iter()
            .find(|s| s.name == name)
            .expect("known part")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn match_text_skips_missing_fields_and_lowercases() {
        let text = match_text(&[Some("NEO Motor"), None, Some("REV-21-1650")]);
        assert_eq!(text, "neo motor rev-21-1650");
    }

    #[test]
    fn part_score_is_zero_when_a_must_keyword_is_missing() {
        let text = "kraken brushless motor by west coast products wcp";
        assert_eq!(part_score(text, spec("kraken")), 0.0);
    }

    #[test]
    fn part_score_weights_optional_and_brand() {
        // must: 0.6, optional 1/2 -> 0.1, brand 1/1 -> 0.2
        let text = "rev robotics neo brushless motor";
        assert!(approx(part_score(text, spec("neo")), 0.9));
    }

    #[test]
    fn classifier_and_store_matcher_use_their_own_rev_brands() {
        // classifier brands are just REV: 0.6 + 0.2
        assert!(approx(part_score("rev neo brushless", spec("neo")), 0.8));

        // store matcher also wants "REV Robotics": 0.5 + 1/2 * 0.2
        let m = matches_canonical(spec("neo"), "REV NEO brushless");
        assert!(m.is_match);
        assert!(approx(m.score, 0.6));
    }

    #[test]
    fn category_score_is_weighted_fraction() {
        let motors = &CATEGORIES[0];
        // keywords: motor, brushless -> 2/5 * 0.4; brands: neo -> 1/7 * 0.3
        let s = category_score("neo brushless motor", motors);
        assert!(approx(s, 2.0 / 5.0 * 0.4 + 1.0 / 7.0 * 0.3));
    }

    #[test]
    fn general_score_counts_frc_terms() {
        assert!(approx(general_score("an frc part from ctre"), 2.0 / 6.0));
        assert_eq!(general_score("garden hose"), 0.0);
    }

    #[test]
    fn kraken_without_x60_is_not_a_part() {
        let c = classify("Kraken");
        assert!(!c.is_frc_part);
        assert!(c.score < FRC_PART_THRESHOLD);
        assert_eq!(part_score("kraken", spec("kraken")), 0.0);
    }

    #[test]
    fn full_kraken_listing_reports_the_part_name() {
        let c = classify("Kraken X60 Brushless Motor - WCP West Coast Products");
        assert!(c.is_frc_part);
        assert_eq!(c.category, "kraken");
        assert!(approx(c.score, 0.6));
    }

    #[test]
    fn category_wins_when_no_part_matches() {
        let c = classify("6 in hi-grip wheel, hex bearing bore, AndyMark, diameter 6 width 1.5");
        assert_eq!(c.category, "mechanical");
    }

    #[test]
    fn unrelated_text_is_rejected() {
        let c = classify("stainless steel kitchen sink");
        assert!(!c.is_frc_part);
    }

    #[test]
    fn ties_resolve_to_first_entry() {
        let c = classify("");
        assert_eq!(c.category, "motors");
        assert_eq!(c.score, 0.0);
    }

    #[test]
    fn canonical_match_rejects_missing_must_keyword() {
        let m = matches_canonical(spec("spark_max"), "SPARK Flex motor controller by REV");
        assert!(!m.is_match);
        assert_eq!(m.score, 0.0);
    }

    #[test]
    fn canonical_match_needs_more_than_must_keywords() {
        // must only: 0.5 < 0.6
        let m = matches_canonical(spec("talon_srx"), "talon srx");
        assert!(!m.is_match);
        assert!(approx(m.score, 0.5));

        // + brand: 0.5 + 0.2 = 0.7
        let m = matches_canonical(spec("talon_srx"), "CTRE Talon SRX");
        assert!(m.is_match);
        assert!(approx(m.score, 0.7));
    }
}
