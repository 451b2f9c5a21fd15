//! Traits for storage abstraction and decision observation

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::types::*;

/// Storage abstraction over the transaction store
///
/// The engine consumes exactly this surface: a point lookup, a user-scoped
/// date-range query, and hard deletion. Any backend (PostgreSQL, MySQL,
/// SQLite, in-memory, etc.) can participate by implementing these three
/// methods. Transactions are owned by the store; the engine never inserts
/// or updates them.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Fetch a transaction by id
    async fn find_by_id(&self, transaction_id: &str) -> DedupResult<Option<Transaction>>;

    /// Fetch all transactions of one user whose economic date lies within
    /// `[start_date, end_date]`, both ends inclusive
    async fn find_many_by_user_and_date_range(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DedupResult<Vec<Transaction>>;

    /// Hard-delete a transaction
    ///
    /// Returns `TransactionNotFound` for an unknown id; merge code treats
    /// that as an already-satisfied deletion when racing a concurrent run.
    async fn delete_by_id(&mut self, transaction_id: &str) -> DedupResult<()>;
}

/// Observer notified of every resolution decision
///
/// The engine does not persist decisions; it reports each auto-merge,
/// approval, and rejection here so a review UI, audit log, or future
/// learning component can attach without touching the scorer.
pub trait DecisionSink: Send + Sync {
    /// Called once per resolved match
    fn record(&self, decision: &MatchDecision);
}

/// Default sink: one structured log line per decision
pub struct LoggingDecisionSink;

impl DecisionSink for LoggingDecisionSink {
    fn record(&self, decision: &MatchDecision) {
        info!(
            match_id = %decision.match_id,
            user_id = %decision.user_id,
            action = ?decision.action,
            kept = decision.kept_transaction_id.as_deref(),
            removed = decision.removed_transaction_id.as_deref(),
            confidence = decision.confidence,
            "duplicate match resolved"
        );
    }
}
