//! Merge survivorship policy

use crate::types::Transaction;

/// Decide which of two matched transactions survives an automatic merge
///
/// The record created first wins: duplicate imports arrive after the entry
/// they copy, so the earlier `created_at` marks the first-recorded version.
/// The original/duplicate labels from detection play no part in this; equal
/// timestamps keep the record labeled original. Returns
/// `(survivor, removed)`.
pub fn survivor<'a>(
    original: &'a Transaction,
    duplicate: &'a Transaction,
) -> (&'a Transaction, &'a Transaction) {
    if duplicate.created_at < original.created_at {
        (duplicate, original)
    } else {
        (original, duplicate)
    }
}
