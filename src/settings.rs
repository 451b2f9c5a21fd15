//! Matching tolerances, their defaults, and per-call resolution

use serde::{Deserialize, Serialize};

use crate::types::{Criterion, DedupResult};
use crate::utils::validation::{validate_tolerance_percent, validate_unit_interval};

/// Which matching criteria participate in scoring
///
/// A disabled criterion is omitted from both the weighted numerator and the
/// weight denominator; it never contributes a zero score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledCriteria {
    pub date: bool,
    pub amount: bool,
    pub description: bool,
    pub location: bool,
    pub account: bool,
}

impl EnabledCriteria {
    /// Every criterion enabled
    pub fn all() -> Self {
        Self {
            date: true,
            amount: true,
            description: true,
            location: true,
            account: true,
        }
    }

    /// Whether the given criterion participates in scoring
    pub fn is_enabled(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Date => self.date,
            Criterion::Amount => self.amount,
            Criterion::Description => self.description,
            Criterion::Location => self.location,
            Criterion::Account => self.account,
        }
    }
}

impl Default for EnabledCriteria {
    fn default() -> Self {
        Self::all()
    }
}

/// Tolerances and thresholds controlling one detection run
///
/// Settings are a per-call value object. Nothing in the engine holds
/// mutable configuration between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationSettings {
    /// Maximum date distance, in days, still considered a possible match
    pub date_tolerance_days: u32,
    /// Maximum relative amount difference, in percent
    pub amount_tolerance_percent: f64,
    /// Minimum normalized description similarity for the criterion to
    /// count as matching; lower similarities contribute nothing
    pub description_similarity_threshold: f64,
    /// Confidence at or above which a match merges without human review
    pub auto_merge_threshold: f64,
    /// Criteria participating in scoring
    pub enabled_criteria: EnabledCriteria,
}

impl Default for DeduplicationSettings {
    fn default() -> Self {
        Self {
            date_tolerance_days: 3,
            amount_tolerance_percent: 1.0,
            description_similarity_threshold: 0.8,
            auto_merge_threshold: 0.95,
            enabled_criteria: EnabledCriteria::all(),
        }
    }
}

impl DeduplicationSettings {
    /// Check that every numeric setting is inside its allowed range
    pub fn validate(&self) -> DedupResult<()> {
        validate_tolerance_percent("amount_tolerance_percent", self.amount_tolerance_percent)?;
        validate_unit_interval(
            "description_similarity_threshold",
            self.description_similarity_threshold,
        )?;
        validate_unit_interval("auto_merge_threshold", self.auto_merge_threshold)?;
        Ok(())
    }
}

/// Caller-supplied partial settings
///
/// Unset fields fall back to the resolver's defaults, so an API request can
/// tweak a single tolerance without restating the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverrides {
    pub date_tolerance_days: Option<u32>,
    pub amount_tolerance_percent: Option<f64>,
    pub description_similarity_threshold: Option<f64>,
    pub auto_merge_threshold: Option<f64>,
    pub enabled_criteria: Option<EnabledCriteria>,
}

/// Supplies per-run settings by layering caller overrides over base defaults
#[derive(Debug, Clone, Default)]
pub struct SettingsResolver {
    defaults: DeduplicationSettings,
}

impl SettingsResolver {
    /// Resolver backed by the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver backed by custom base defaults (e.g. per-deployment tuning)
    pub fn with_defaults(defaults: DeduplicationSettings) -> Self {
        Self { defaults }
    }

    /// Merge overrides over the base defaults into concrete settings
    pub fn resolve(&self, overrides: Option<SettingsOverrides>) -> DeduplicationSettings {
        let mut settings = self.defaults.clone();
        if let Some(overrides) = overrides {
            if let Some(days) = overrides.date_tolerance_days {
                settings.date_tolerance_days = days;
            }
            if let Some(percent) = overrides.amount_tolerance_percent {
                settings.amount_tolerance_percent = percent;
            }
            if let Some(threshold) = overrides.description_similarity_threshold {
                settings.description_similarity_threshold = threshold;
            }
            if let Some(threshold) = overrides.auto_merge_threshold {
                settings.auto_merge_threshold = threshold;
            }
            if let Some(criteria) = overrides.enabled_criteria {
                settings.enabled_criteria = criteria;
            }
        }
        settings
    }
}
