//! Multi-criteria similarity scoring for transaction pairs
//!
//! Each criterion produces an independent score in [0, 1]; the overall
//! confidence is the weighted average over the criteria that are enabled
//! and applicable to the pair. Criteria that cannot be computed (a missing
//! location, an empty description) drop out of both the numerator and the
//! denominator, so absence never reads as disagreement.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::NaiveDate;

use crate::settings::DeduplicationSettings;
use crate::types::{Criterion, Transaction};

/// Relative weight of the date criterion in the confidence average
pub const DATE_WEIGHT: f64 = 0.25;
/// Relative weight of the amount criterion
pub const AMOUNT_WEIGHT: f64 = 0.30;
/// Relative weight of the description criterion
pub const DESCRIPTION_WEIGHT: f64 = 0.25;
/// Relative weight of the location criterion
pub const LOCATION_WEIGHT: f64 = 0.10;
/// Relative weight of the account criterion
pub const ACCOUNT_WEIGHT: f64 = 0.10;

// Individual score a criterion must exceed to be listed as matching.
// Description uses the per-run similarity threshold instead; account must
// score exactly 1.0.
const DATE_MATCH_BAR: f64 = 0.8;
const AMOUNT_MATCH_BAR: f64 = 0.9;
const LOCATION_MATCH_BAR: f64 = 0.8;

/// Result of scoring one transaction pair
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityScore {
    /// Weighted average over the applicable criteria, in [0, 1]
    pub confidence: f64,
    /// Criteria whose individual score cleared their matching bar, in
    /// declaration order
    pub matching_criteria: Vec<Criterion>,
}

/// Score how likely two transactions describe the same real-world event
///
/// Symmetric: `score_pair(a, b, s)` equals `score_pair(b, a, s)`. Never
/// fails; with no applicable criteria the confidence is 0.0.
pub fn score_pair(
    a: &Transaction,
    b: &Transaction,
    settings: &DeduplicationSettings,
) -> SimilarityScore {
    let enabled = &settings.enabled_criteria;
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut matching_criteria = Vec::new();

    if enabled.is_enabled(Criterion::Date) {
        let score = date_similarity(a.date, b.date, settings.date_tolerance_days);
        weighted_sum += score * DATE_WEIGHT;
        weight_total += DATE_WEIGHT;
        if score > DATE_MATCH_BAR {
            matching_criteria.push(Criterion::Date);
        }
    }

    if enabled.is_enabled(Criterion::Amount) {
        let score = amount_similarity(&a.amount, &b.amount, settings.amount_tolerance_percent);
        weighted_sum += score * AMOUNT_WEIGHT;
        weight_total += AMOUNT_WEIGHT;
        if score > AMOUNT_MATCH_BAR {
            matching_criteria.push(Criterion::Amount);
        }
    }

    if enabled.is_enabled(Criterion::Description)
        && !a.description.is_empty()
        && !b.description.is_empty()
    {
        let similarity = normalized_similarity(&a.description, &b.description);
        // below the threshold the criterion scores zero but keeps its weight
        let score = if similarity < settings.description_similarity_threshold {
            0.0
        } else {
            similarity
        };
        weighted_sum += score * DESCRIPTION_WEIGHT;
        weight_total += DESCRIPTION_WEIGHT;
        if similarity > settings.description_similarity_threshold {
            matching_criteria.push(Criterion::Description);
        }
    }

    if enabled.is_enabled(Criterion::Location) {
        if let (Some(a_location), Some(b_location)) = (non_empty(&a.location), non_empty(&b.location))
        {
            let score = normalized_similarity(a_location, b_location);
            weighted_sum += score * LOCATION_WEIGHT;
            weight_total += LOCATION_WEIGHT;
            if score > LOCATION_MATCH_BAR {
                matching_criteria.push(Criterion::Location);
            }
        }
    }

    if enabled.is_enabled(Criterion::Account) {
        let score = if a.account_id == b.account_id { 1.0 } else { 0.0 };
        weighted_sum += score * ACCOUNT_WEIGHT;
        weight_total += ACCOUNT_WEIGHT;
        if score == 1.0 {
            matching_criteria.push(Criterion::Account);
        }
    }

    let confidence = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    };

    SimilarityScore {
        confidence,
        matching_criteria,
    }
}

/// Date closeness: 1.0 on the same day, 0.0 beyond the tolerance, linear
/// in between
pub fn date_similarity(a: NaiveDate, b: NaiveDate, tolerance_days: u32) -> f64 {
    let diff_days = (a - b).num_days().abs();
    if diff_days == 0 {
        return 1.0;
    }
    if diff_days > i64::from(tolerance_days) {
        return 0.0;
    }
    1.0 - diff_days as f64 / f64::from(tolerance_days)
}

/// Amount closeness: 1.0 when equal, 0.0 once the relative difference
/// `|a − b| / max(a, b) × 100` exceeds the tolerance, linear in between
pub fn amount_similarity(a: &BigDecimal, b: &BigDecimal, tolerance_percent: f64) -> f64 {
    if a == b {
        return 1.0;
    }
    // amounts are non-negative and unequal here, so the larger one is > 0
    let larger = if a > b { a } else { b };
    let difference = (a - b).abs();
    let relative_percent = (difference * BigDecimal::from(100) / larger)
        .to_f64()
        .unwrap_or(f64::INFINITY);
    if relative_percent > tolerance_percent {
        return 0.0;
    }
    1.0 - relative_percent / tolerance_percent
}

/// Normalized edit-distance similarity between two strings
///
/// Both sides are trimmed and lowercased first; the result is
/// `1 − distance / max(len_a, len_b)` over character counts, and 1.0 when
/// the normalized strings are equal (including both empty).
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return 1.0;
    }
    let distance = levenshtein_distance(&a, &b);
    let longest = a.chars().count().max(b.chars().count());
    1.0 - distance as f64 / longest as f64
}

/// Classic dynamic-programming Levenshtein distance over characters
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // two rolling rows instead of the full matrix
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution_cost = if a_char == b_char { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1) // deletion
                .min(current[j] + 1) // insertion
                .min(previous[j] + substitution_cost); // substitution
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
