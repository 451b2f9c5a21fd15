//! Pairwise duplicate detection for single transactions and date ranges

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::engine::candidates::CandidateSelector;
use crate::engine::scorer::score_pair;
use crate::settings::DeduplicationSettings;
use crate::traits::TransactionStore;
use crate::types::{DedupResult, DuplicateMatch, Transaction};

/// Confidence a pair must exceed to be reported at all; weaker pairs are
/// discarded, not surfaced
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Range detection compares transactions in groups of this size to bound
/// memory on long histories
const BATCH_SIZE: usize = 100;

/// Finds duplicate candidates by scoring date-windowed transaction pairs
pub struct MatchDetector<S: TransactionStore> {
    storage: S,
    selector: CandidateSelector<S>,
}

impl<S: TransactionStore + Clone> MatchDetector<S> {
    /// Create a detector over the given store
    pub fn new(storage: S) -> Self {
        Self {
            selector: CandidateSelector::new(storage.clone()),
            storage,
        }
    }

    /// Score one transaction against its candidate window
    ///
    /// Returns matches with confidence above [`MIN_CONFIDENCE`], sorted by
    /// descending confidence; equal confidences keep candidate order.
    pub async fn detect_for_transaction(
        &self,
        target: &Transaction,
        settings: &DeduplicationSettings,
    ) -> DedupResult<Vec<DuplicateMatch>> {
        let candidates = self.selector.candidates_for(target, settings).await?;
        Ok(matches_for_target(target, &candidates, settings))
    }

    /// Score every pair of the user's transactions in `[start_date, end_date]`
    ///
    /// The range is loaded once and compared in memory; no per-transaction
    /// store queries. Symmetric pairs (A↔B seen from either side) collapse
    /// into the first accepted match. Callers bound the range; the
    /// resolution engine rejects spans over a year before getting here.
    pub async fn detect_in_range(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        settings: &DeduplicationSettings,
    ) -> DedupResult<Vec<DuplicateMatch>> {
        let transactions = self
            .storage
            .find_many_by_user_and_date_range(user_id, start_date, end_date)
            .await?;
        debug!(
            user_id,
            loaded = transactions.len(),
            "loaded date range for duplicate detection"
        );

        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        let mut matches = Vec::new();

        for batch in transactions.chunks(BATCH_SIZE) {
            for target in batch {
                for found in matches_for_target(target, &transactions, settings) {
                    let key = unordered_pair(&found.id.original_id, &found.id.duplicate_id);
                    if seen_pairs.insert(key) {
                        matches.push(found);
                    }
                }
            }
        }

        Ok(matches)
    }
}

/// Single-transaction detection against an in-memory pool
///
/// Applies the same candidate-window rule as the store query, so range
/// detection and single-transaction detection accept identical pairs.
fn matches_for_target(
    target: &Transaction,
    pool: &[Transaction],
    settings: &DeduplicationSettings,
) -> Vec<DuplicateMatch> {
    let mut matches = Vec::new();

    for candidate in pool {
        if candidate.id == target.id || !within_window(target, candidate, settings) {
            continue;
        }

        let score = score_pair(target, candidate, settings);
        if score.confidence > MIN_CONFIDENCE {
            debug!(
                original = %target.id,
                duplicate = %candidate.id,
                confidence = score.confidence,
                "accepted duplicate candidate"
            );
            matches.push(DuplicateMatch::new(
                target.clone(),
                candidate.clone(),
                score.confidence,
                score.matching_criteria,
            ));
        }
    }

    // stable: ties keep candidate order
    matches.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}

fn within_window(a: &Transaction, b: &Transaction, settings: &DeduplicationSettings) -> bool {
    (a.date - b.date).num_days().abs() <= i64::from(settings.date_tolerance_days)
}

fn unordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use crate::utils::memory_storage::MemoryTransactionStore;
    use bigdecimal::BigDecimal;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn transaction(id: &str, amount: u32, description: &str, day: u32) -> Transaction {
        Transaction::new(
            "user1".to_string(),
            TransactionType::Expense,
            BigDecimal::from(amount),
            description.to_string(),
            date(2024, 3, day),
        )
        .with_id(id.to_string())
        .with_account("acct1".to_string())
    }

    #[tokio::test]
    async fn test_detection_sorts_by_descending_confidence() {
        let store = MemoryTransactionStore::new();
        let target = transaction("target", 100, "Electric Bill", 15);
        store.insert(target.clone());
        // same day, identical: strongest
        store.insert(transaction("exact", 100, "Electric Bill", 15));
        // two days off: weaker
        store.insert(transaction("shifted", 100, "Electric Bill", 17));

        let detector = MatchDetector::new(store);
        let settings = DeduplicationSettings::default();
        let matches = detector
            .detect_for_transaction(&target, &settings)
            .await
            .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].duplicate.id, "exact");
        assert_eq!(matches[1].duplicate.id, "shifted");
        assert!(matches[0].confidence > matches[1].confidence);
        assert!(matches.iter().all(|m| m.confidence > MIN_CONFIDENCE));
    }

    #[tokio::test]
    async fn test_weak_pairs_discarded() {
        let store = MemoryTransactionStore::new();
        let target = transaction("target", 100, "Grocery Shopping", 15);
        store.insert(target.clone());
        // amount outside tolerance, unrelated description: only the shared
        // date/account survive, confidence falls at or below the floor
        store.insert(transaction("noise", 110, "Car Payment", 15));

        let detector = MatchDetector::new(store);
        let settings = DeduplicationSettings::default();
        let matches = detector
            .detect_for_transaction(&target, &settings)
            .await
            .unwrap();

        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_range_detection_collapses_symmetric_pairs() {
        let store = MemoryTransactionStore::new();
        store.insert(transaction("a", 100, "Rent", 10));
        store.insert(transaction("b", 100, "Rent", 10));
        store.insert(transaction("c", 100, "Rent", 11));

        let detector = MatchDetector::new(store);
        let settings = DeduplicationSettings::default();
        let matches = detector
            .detect_in_range("user1", date(2024, 3, 1), date(2024, 3, 31), &settings)
            .await
            .unwrap();

        // three transactions pair three ways, each way exactly once
        assert_eq!(matches.len(), 3);
        let mut pairs: Vec<(String, String)> = matches
            .iter()
            .map(|m| unordered_pair(&m.id.original_id, &m.id.duplicate_id))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 3);
    }

    #[tokio::test]
    async fn test_range_detection_respects_window() {
        let store = MemoryTransactionStore::new();
        // identical except dates ten days apart: inside the loaded range but
        // outside the three-day candidate window
        store.insert(transaction("a", 100, "Rent", 1));
        store.insert(transaction("b", 100, "Rent", 11));

        let detector = MatchDetector::new(store);
        let settings = DeduplicationSettings::default();
        let matches = detector
            .detect_in_range("user1", date(2024, 3, 1), date(2024, 3, 31), &settings)
            .await
            .unwrap();

        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_range_detection_across_batches() {
        let store = MemoryTransactionStore::new();
        // 120 copies of the same day-10 transaction exceed one batch of 100
        for i in 0..120 {
            store.insert(transaction(&format!("tx{i:03}"), 100, "Rent", 10));
        }

        let detector = MatchDetector::new(store);
        let settings = DeduplicationSettings::default();
        let matches = detector
            .detect_in_range("user1", date(2024, 3, 1), date(2024, 3, 31), &settings)
            .await
            .unwrap();

        // n choose 2 unordered pairs, none duplicated across batches
        assert_eq!(matches.len(), 120 * 119 / 2);
        let unique: HashSet<(String, String)> = matches
            .iter()
            .map(|m| unordered_pair(&m.id.original_id, &m.id.duplicate_id))
            .collect();
        assert_eq!(unique.len(), matches.len());
    }
}
