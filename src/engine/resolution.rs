//! Resolution engine coordinating detection, auto-merge, and review
//! decisions

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::engine::detector::MatchDetector;
use crate::engine::merge;
use crate::settings::{SettingsOverrides, SettingsResolver};
use crate::traits::{DecisionSink, LoggingDecisionSink, TransactionStore};
use crate::types::*;
use crate::utils::validation::validate_date_range;

/// Entry point for the surrounding application
///
/// Owns a store handle, the match detector, the settings resolver, and the
/// decision sink; everything is supplied at construction, nothing is read
/// from ambient state.
pub struct DeduplicationEngine<S: TransactionStore> {
    storage: S,
    detector: MatchDetector<S>,
    resolver: SettingsResolver,
    decision_sink: Box<dyn DecisionSink>,
}

impl<S: TransactionStore + Clone> DeduplicationEngine<S> {
    /// Create an engine with built-in defaults and the logging decision sink
    pub fn new(storage: S) -> Self {
        Self::with_components(
            storage,
            SettingsResolver::new(),
            Box::new(LoggingDecisionSink),
        )
    }

    /// Create an engine that reports decisions to a custom sink
    pub fn with_decision_sink(storage: S, decision_sink: Box<dyn DecisionSink>) -> Self {
        Self::with_components(storage, SettingsResolver::new(), decision_sink)
    }

    /// Create an engine with an explicit settings resolver and decision sink
    pub fn with_components(
        storage: S,
        resolver: SettingsResolver,
        decision_sink: Box<dyn DecisionSink>,
    ) -> Self {
        Self {
            detector: MatchDetector::new(storage.clone()),
            storage,
            resolver,
            decision_sink,
        }
    }

    /// Detect duplicates across a date range and auto-merge the
    /// near-certain ones
    ///
    /// The range must run forward in time and span at most 365 days; both
    /// checks happen before any store access. Matches at or above the
    /// auto-merge threshold are merged immediately and still appear in the
    /// report. A store failure while merging one match leaves that match
    /// pending and the run continues.
    pub async fn detect_duplicates_in_range(
        &mut self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        overrides: Option<SettingsOverrides>,
    ) -> DedupResult<DeduplicationReport> {
        validate_date_range(start_date, end_date)?;
        let settings = self.resolver.resolve(overrides);
        settings.validate()?;

        let mut matches = self
            .detector
            .detect_in_range(user_id, start_date, end_date, &settings)
            .await?;

        let mut auto_merged = 0;
        let mut pending_review = 0;
        let mut merge_failures = 0;

        for duplicate_match in &mut matches {
            if duplicate_match.confidence >= settings.auto_merge_threshold {
                match self.auto_merge(duplicate_match, user_id).await {
                    Ok(decision) => {
                        duplicate_match.status = MatchStatus::AutoMerged;
                        auto_merged += 1;
                        self.decision_sink.record(&decision);
                    }
                    Err(error) => {
                        // one bad merge must not abort the rest of the run
                        warn!(
                            match_id = %duplicate_match.id,
                            %error,
                            "auto-merge failed; leaving match pending"
                        );
                        merge_failures += 1;
                        pending_review += 1;
                    }
                }
            } else {
                pending_review += 1;
            }
        }

        info!(
            user_id,
            duplicates_found = matches.len(),
            auto_merged,
            pending_review,
            merge_failures,
            "range duplicate detection finished"
        );

        Ok(DeduplicationReport {
            duplicates_found: matches.len(),
            matches,
            auto_merged,
            pending_review,
        })
    }

    /// Detect duplicates for one transaction without resolving anything
    ///
    /// Read-only: suited to create-with-duplicate-check flows where the
    /// caller decides what to do with the matches.
    pub async fn detect_duplicates_for_transaction(
        &self,
        transaction_id: &str,
        user_id: &str,
        overrides: Option<SettingsOverrides>,
    ) -> DedupResult<Vec<DuplicateMatch>> {
        let settings = self.resolver.resolve(overrides);
        settings.validate()?;

        let target = self.owned_transaction(transaction_id, user_id).await?;
        self.detector
            .detect_for_transaction(&target, &settings)
            .await
    }

    /// Approve a merge: keep one transaction of the pair, delete the other
    ///
    /// `match_id` is the `original-duplicate` wire form. The keep id must
    /// be one of the pair and both transactions must belong to `user_id`;
    /// all of that is checked before the deletion.
    pub async fn approve_duplicate_merge(
        &mut self,
        match_id: &str,
        user_id: &str,
        keep_transaction_id: &str,
    ) -> DedupResult<()> {
        let match_id = MatchId::parse(match_id)?;
        let removed_id = match match_id.counterpart(keep_transaction_id) {
            Some(other) => other.to_string(),
            None => {
                return Err(DedupError::Validation(format!(
                    "Keep transaction '{}' is not part of match '{}'",
                    keep_transaction_id, match_id
                )))
            }
        };

        self.owned_transaction(&match_id.original_id, user_id)
            .await?;
        self.owned_transaction(&match_id.duplicate_id, user_id)
            .await?;

        self.delete_merged(&removed_id).await?;
        info!(
            match_id = %match_id,
            user_id,
            kept = keep_transaction_id,
            removed = %removed_id,
            "duplicate merge approved"
        );
        self.decision_sink.record(&MatchDecision {
            match_id,
            user_id: user_id.to_string(),
            action: DecisionAction::Approved,
            kept_transaction_id: Some(keep_transaction_id.to_string()),
            removed_transaction_id: Some(removed_id),
            confidence: None,
            decided_at: chrono::Utc::now().naive_utc(),
        });
        Ok(())
    }

    /// Reject a match: both transactions stay, the decision is logged
    ///
    /// Rejections are not persisted anywhere, so a later detection run can
    /// surface the same pair again.
    pub async fn reject_duplicate_match(&self, match_id: &str, user_id: &str) -> DedupResult<()> {
        let match_id = MatchId::parse(match_id)?;
        self.owned_transaction(&match_id.original_id, user_id)
            .await?;
        self.owned_transaction(&match_id.duplicate_id, user_id)
            .await?;

        info!(
            match_id = %match_id,
            user_id,
            "duplicate match rejected; keeping both transactions"
        );
        self.decision_sink.record(&MatchDecision {
            match_id,
            user_id: user_id.to_string(),
            action: DecisionAction::Rejected,
            kept_transaction_id: None,
            removed_transaction_id: None,
            confidence: None,
            decided_at: chrono::Utc::now().naive_utc(),
        });
        Ok(())
    }

    /// Merge one detected match by survivorship policy
    async fn auto_merge(
        &mut self,
        duplicate_match: &DuplicateMatch,
        user_id: &str,
    ) -> DedupResult<MatchDecision> {
        let (kept, removed) =
            merge::survivor(&duplicate_match.original, &duplicate_match.duplicate);
        self.delete_merged(&removed.id).await?;
        info!(
            match_id = %duplicate_match.id,
            confidence = duplicate_match.confidence,
            kept = %kept.id,
            removed = %removed.id,
            "auto-merged duplicate transactions"
        );
        Ok(MatchDecision {
            match_id: duplicate_match.id.clone(),
            user_id: user_id.to_string(),
            action: DecisionAction::AutoMerged,
            kept_transaction_id: Some(kept.id.clone()),
            removed_transaction_id: Some(removed.id.clone()),
            confidence: Some(duplicate_match.confidence),
            decided_at: chrono::Utc::now().naive_utc(),
        })
    }

    /// Delete a merge loser, tolerating a concurrent run having deleted it
    /// first
    async fn delete_merged(&mut self, transaction_id: &str) -> DedupResult<()> {
        match self.storage.delete_by_id(transaction_id).await {
            Err(DedupError::TransactionNotFound(_)) => {
                // the duplicate is already gone, which is the end state a
                // merge wants
                warn!(transaction_id, "merge target already deleted; continuing");
                Ok(())
            }
            other => other,
        }
    }

    /// Fetch a transaction and require it to belong to the calling user
    async fn owned_transaction(
        &self,
        transaction_id: &str,
        user_id: &str,
    ) -> DedupResult<Transaction> {
        let transaction = self
            .storage
            .find_by_id(transaction_id)
            .await?
            .ok_or_else(|| DedupError::TransactionNotFound(transaction_id.to_string()))?;
        if transaction.user_id != user_id {
            return Err(DedupError::NotOwned {
                transaction_id: transaction_id.to_string(),
                user_id: user_id.to_string(),
            });
        }
        Ok(transaction)
    }
}
