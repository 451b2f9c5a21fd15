//! Core types and data structures for the deduplication engine

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of financial transactions considered by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, refunds, interest, etc.)
    Income,
    /// Money going out (purchases, bills, fees, etc.)
    Expense,
    /// Movement between the user's own accounts
    Transfer,
}

/// One independently scored matching signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Economic dates close to each other
    Date,
    /// Monetary amounts close to each other
    Amount,
    /// Free-text descriptions with low edit distance
    Description,
    /// Free-text locations with low edit distance
    Location,
    /// Same originating account
    Account,
}

impl Criterion {
    /// Lowercase name as it appears in serialized match data
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Date => "date",
            Criterion::Amount => "amount",
            Criterion::Description => "description",
            Criterion::Location => "location",
            Criterion::Account => "account",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a duplicate match
///
/// A match starts as `Pending` and is resolved at most once; there is no
/// transition back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Detected but awaiting a decision
    Pending,
    /// A human chose which transaction to keep; the other was deleted
    Approved,
    /// A human marked the pair as not duplicates; both records kept
    Rejected,
    /// Confidence cleared the auto-merge threshold; merged without review
    AutoMerged,
}

impl MatchStatus {
    /// Whether this match has reached a terminal decision
    pub fn is_resolved(&self) -> bool {
        !matches!(self, MatchStatus::Pending)
    }
}

/// A financial transaction as read from the transaction store
///
/// The deduplication engine never creates or updates transactions in the
/// store; it only reads them and deletes merge losers. The constructor here
/// exists for seeding stores in tests, examples, and import tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier. Generated ids use the UUID simple form (no
    /// hyphens) so composite match ids remain parseable.
    pub id: String,
    /// Owning user; matching never crosses users
    pub user_id: String,
    /// Originating account, when known
    pub account_id: Option<String>,
    /// Income, expense, or transfer
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Non-negative monetary value
    pub amount: BigDecimal,
    /// Free-text label
    pub description: String,
    /// Economic date of the transaction (not the record timestamp)
    pub date: NaiveDate,
    /// Free-text location, when known
    pub location: Option<String>,
    /// Record-creation timestamp; merge survivorship tie-break
    pub created_at: NaiveDateTime,
}

impl Transaction {
    /// Create a new transaction with a generated id and the current
    /// timestamp
    pub fn new(
        user_id: String,
        kind: TransactionType,
        amount: BigDecimal,
        description: String,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            account_id: None,
            kind,
            amount,
            description,
            date,
            location: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Replace the generated id with a caller-supplied one
    pub fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    /// Attach the originating account
    pub fn with_account(mut self, account_id: String) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Attach a location
    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    /// Override the record-creation timestamp
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Identifier of a duplicate match: the ids of the two compared transactions
///
/// Stored as an explicit pair rather than a concatenated string so the two
/// ids stay unambiguous in code. The wire form is `original-duplicate`,
/// which requires that transaction ids themselves do not contain the `-`
/// separator (generated ids never do).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId {
    /// Id of the transaction the detection started from
    pub original_id: String,
    /// Id of the candidate it was compared against
    pub duplicate_id: String,
}

impl MatchId {
    /// Pair two transaction ids
    pub fn new(original_id: String, duplicate_id: String) -> Self {
        Self {
            original_id,
            duplicate_id,
        }
    }

    /// Parse the `original-duplicate` wire form
    ///
    /// Both ids must be non-empty and distinct; a transaction is never a
    /// duplicate of itself.
    pub fn parse(raw: &str) -> DedupResult<Self> {
        match raw.split_once('-') {
            Some((original, duplicate))
                if !original.is_empty() && !duplicate.is_empty() && original != duplicate =>
            {
                Ok(Self::new(original.to_string(), duplicate.to_string()))
            }
            _ => Err(DedupError::InvalidMatchId(raw.to_string())),
        }
    }

    /// Whether one of the two ids equals `transaction_id`
    pub fn contains(&self, transaction_id: &str) -> bool {
        self.original_id == transaction_id || self.duplicate_id == transaction_id
    }

    /// The id paired with `transaction_id`, if `transaction_id` is part of
    /// this match
    pub fn counterpart(&self, transaction_id: &str) -> Option<&str> {
        if self.original_id == transaction_id {
            Some(&self.duplicate_id)
        } else if self.duplicate_id == transaction_id {
            Some(&self.original_id)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.original_id, self.duplicate_id)
    }
}

impl std::str::FromStr for MatchId {
    type Err = DedupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A detected pair of potentially duplicate transactions
///
/// Matches are ephemeral: they are built during detection and handed to the
/// caller, never persisted. The original/duplicate labels record comparison
/// order only; merge survivorship is decided by `created_at`, not by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// The two transaction ids forming this match
    pub id: MatchId,
    /// The transaction the detection started from
    pub original: Transaction,
    /// The candidate it was compared against
    pub duplicate: Transaction,
    /// Weighted similarity score in [0, 1]
    pub confidence: f64,
    /// Criteria whose individual score cleared their own matching bar
    pub matching_criteria: Vec<Criterion>,
    /// Current lifecycle state
    pub status: MatchStatus,
}

impl DuplicateMatch {
    /// Create a pending match from a scored pair
    pub fn new(
        original: Transaction,
        duplicate: Transaction,
        confidence: f64,
        matching_criteria: Vec<Criterion>,
    ) -> Self {
        Self {
            id: MatchId::new(original.id.clone(), duplicate.id.clone()),
            original,
            duplicate,
            confidence,
            matching_criteria,
            status: MatchStatus::Pending,
        }
    }
}

/// Outcome of a range detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationReport {
    /// Number of matches found (equals `matches.len()`)
    pub duplicates_found: usize,
    /// Every accepted match, including the auto-merged ones
    pub matches: Vec<DuplicateMatch>,
    /// Matches merged without review
    pub auto_merged: usize,
    /// Matches awaiting a human decision
    pub pending_review: usize,
}

impl DeduplicationReport {
    /// Check the report bookkeeping: every match is either auto-merged or
    /// pending review, and the counters agree with the per-match statuses
    pub fn is_consistent(&self) -> bool {
        let resolved = self
            .matches
            .iter()
            .filter(|m| m.status.is_resolved())
            .count();
        self.auto_merged + self.pending_review == self.matches.len()
            && self.duplicates_found == self.matches.len()
            && resolved == self.auto_merged
    }
}

/// How a duplicate match was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    /// Merged automatically during range detection
    AutoMerged,
    /// Merge approved by a human reviewer
    Approved,
    /// Pair rejected by a human reviewer; both records kept
    Rejected,
}

/// Record of one resolution decision, handed to the decision sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    /// The match the decision applies to
    pub match_id: MatchId,
    /// User on whose behalf the decision was made
    pub user_id: String,
    /// What happened
    pub action: DecisionAction,
    /// Surviving transaction, when the decision deleted one
    pub kept_transaction_id: Option<String>,
    /// Deleted transaction, when the decision deleted one
    pub removed_transaction_id: Option<String>,
    /// Match confidence, when the decision came out of a detection run
    pub confidence: Option<f64>,
    /// When the decision was made
    pub decided_at: NaiveDateTime,
}

/// Errors that can occur in the deduplication engine
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Transaction {transaction_id} does not belong to user {user_id}")]
    NotOwned {
        transaction_id: String,
        user_id: String,
    },
    #[error("Invalid match id: {0}")]
    InvalidMatchId(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for deduplication operations
pub type DedupResult<T> = Result<T, DedupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_id_wire_format() {
        let id = MatchId::new("tx1".to_string(), "tx2".to_string());
        assert_eq!(id.to_string(), "tx1-tx2");

        let parsed = MatchId::parse("tx1-tx2").unwrap();
        assert_eq!(parsed, id);

        let from_str: MatchId = "tx1-tx2".parse().unwrap();
        assert_eq!(from_str, id);
    }

    #[test]
    fn test_match_id_rejects_malformed_input() {
        assert!(MatchId::parse("no_separator").is_err());
        assert!(MatchId::parse("-trailing").is_err());
        assert!(MatchId::parse("leading-").is_err());
        assert!(MatchId::parse("").is_err());
        // a transaction is never a duplicate of itself
        assert!(MatchId::parse("tx1-tx1").is_err());
    }

    #[test]
    fn test_match_id_counterpart() {
        let id = MatchId::new("a".to_string(), "b".to_string());
        assert_eq!(id.counterpart("a"), Some("b"));
        assert_eq!(id.counterpart("b"), Some("a"));
        assert_eq!(id.counterpart("c"), None);
        assert!(id.contains("a") && id.contains("b") && !id.contains("c"));
    }

    #[test]
    fn test_only_pending_is_unresolved() {
        assert!(!MatchStatus::Pending.is_resolved());
        assert!(MatchStatus::Approved.is_resolved());
        assert!(MatchStatus::Rejected.is_resolved());
        assert!(MatchStatus::AutoMerged.is_resolved());
    }

    #[test]
    fn test_generated_ids_have_no_separator() {
        let tx = Transaction::new(
            "user1".to_string(),
            TransactionType::Expense,
            BigDecimal::from(10),
            "Coffee".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        assert!(!tx.id.contains('-'));
    }
}
