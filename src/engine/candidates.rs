//! Candidate selection: which transactions are worth comparing at all

use chrono::{Duration, NaiveDate};

use crate::settings::DeduplicationSettings;
use crate::traits::TransactionStore;
use crate::types::{DedupResult, Transaction};

/// Selects the date-bounded comparison window for a transaction
///
/// Only transactions of the same user whose economic date lies within the
/// configured tolerance are candidates. This window is what keeps
/// single-transaction detection proportional to a few days of history
/// instead of the full account history.
pub struct CandidateSelector<S: TransactionStore> {
    storage: S,
}

impl<S: TransactionStore> CandidateSelector<S> {
    /// Create a selector over the given store
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// All transactions of the same user within
    /// `[target.date − tolerance, target.date + tolerance]`, excluding the
    /// target itself
    ///
    /// Window endpoints saturate at the calendar bounds, so an oversized
    /// tolerance matches everything the store holds for the user.
    pub async fn candidates_for(
        &self,
        target: &Transaction,
        settings: &DeduplicationSettings,
    ) -> DedupResult<Vec<Transaction>> {
        let tolerance = Duration::days(i64::from(settings.date_tolerance_days));
        let window_start = target
            .date
            .checked_sub_signed(tolerance)
            .unwrap_or(NaiveDate::MIN);
        let window_end = target
            .date
            .checked_add_signed(tolerance)
            .unwrap_or(NaiveDate::MAX);

        let mut candidates = self
            .storage
            .find_many_by_user_and_date_range(&target.user_id, window_start, window_end)
            .await?;
        candidates.retain(|candidate| candidate.id != target.id);

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use crate::utils::memory_storage::MemoryTransactionStore;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn transaction(user_id: &str, id: &str, date: NaiveDate) -> Transaction {
        Transaction::new(
            user_id.to_string(),
            TransactionType::Expense,
            BigDecimal::from(50),
            "Lunch".to_string(),
            date,
        )
        .with_id(id.to_string())
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_window_inclusive_and_excludes_target() {
        let store = MemoryTransactionStore::new();
        let target = transaction("user1", "target", date(2024, 3, 15));
        store.insert(target.clone());
        store.insert(transaction("user1", "edge_low", date(2024, 3, 12)));
        store.insert(transaction("user1", "edge_high", date(2024, 3, 18)));
        store.insert(transaction("user1", "outside", date(2024, 3, 11)));

        let selector = CandidateSelector::new(store);
        let settings = DeduplicationSettings::default();
        let candidates = selector.candidates_for(&target, &settings).await.unwrap();

        let ids: Vec<&str> = candidates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["edge_low", "edge_high"]);
    }

    #[tokio::test]
    async fn test_other_users_excluded() {
        let store = MemoryTransactionStore::new();
        let target = transaction("user1", "target", date(2024, 3, 15));
        store.insert(target.clone());
        store.insert(transaction("user2", "foreign", date(2024, 3, 15)));

        let selector = CandidateSelector::new(store);
        let settings = DeduplicationSettings::default();
        let candidates = selector.candidates_for(&target, &settings).await.unwrap();

        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_tolerance_saturates() {
        let store = MemoryTransactionStore::new();
        let target = transaction("user1", "target", date(2024, 3, 15));
        store.insert(target.clone());
        store.insert(transaction("user1", "decades_away", date(1980, 1, 1)));

        let selector = CandidateSelector::new(store);
        // wider than the calendar itself: the window clamps to its bounds
        let settings = DeduplicationSettings {
            date_tolerance_days: u32::MAX,
            ..Default::default()
        };
        let candidates = selector.candidates_for(&target, &settings).await.unwrap();

        let ids: Vec<&str> = candidates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["decades_away"]);
    }

    #[tokio::test]
    async fn test_zero_tolerance_same_day_only() {
        let store = MemoryTransactionStore::new();
        let target = transaction("user1", "target", date(2024, 3, 15));
        store.insert(target.clone());
        store.insert(transaction("user1", "same_day", date(2024, 3, 15)));
        store.insert(transaction("user1", "next_day", date(2024, 3, 16)));

        let selector = CandidateSelector::new(store);
        let settings = DeduplicationSettings {
            date_tolerance_days: 0,
            ..Default::default()
        };
        let candidates = selector.candidates_for(&target, &settings).await.unwrap();

        let ids: Vec<&str> = candidates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["same_day"]);
    }
}
