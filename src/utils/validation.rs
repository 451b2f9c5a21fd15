//! Validation utilities

use chrono::NaiveDate;

use crate::types::{DedupError, DedupResult};

/// Longest date range a detection run will accept, in days
pub const MAX_RANGE_DAYS: i64 = 365;

/// Validate that a detection range runs forward and stays within the cap
pub fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> DedupResult<()> {
    if start_date >= end_date {
        return Err(DedupError::Validation(
            "Start date must be before end date".to_string(),
        ));
    }

    if (end_date - start_date).num_days() > MAX_RANGE_DAYS {
        return Err(DedupError::Validation(format!(
            "Date range cannot exceed {} days",
            MAX_RANGE_DAYS
        )));
    }

    Ok(())
}

/// Validate that a threshold lies in `[0, 1]`
///
/// NaN fails the range check, so it is rejected too.
pub fn validate_unit_interval(name: &str, value: f64) -> DedupResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DedupError::Validation(format!(
            "{} must be between 0 and 1",
            name
        )));
    }

    Ok(())
}

/// Validate that a percentage tolerance is a finite, non-negative number
pub fn validate_tolerance_percent(name: &str, value: f64) -> DedupResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DedupError::Validation(format!(
            "{} must be a finite non-negative percentage",
            name
        )));
    }

    Ok(())
}
