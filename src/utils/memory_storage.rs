//! In-memory storage implementation for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::TransactionStore;
use crate::types::{DedupError, DedupResult, Transaction};

/// In-memory transaction store for testing and development
///
/// Clones share the same underlying map, so a handle kept by a test keeps
/// observing what the engine does to its own clone.
#[derive(Debug, Clone)]
pub struct MemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
}

impl MemoryTransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            transactions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a transaction
    pub fn insert(&self, transaction: Transaction) {
        self.transactions
            .write()
            .unwrap()
            .insert(transaction.id.clone(), transaction);
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.transactions.write().unwrap().clear();
    }

    /// Number of stored transactions
    pub fn len(&self) -> usize {
        self.transactions.read().unwrap().len()
    }

    /// Whether the store holds no transactions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn find_by_id(&self, transaction_id: &str) -> DedupResult<Option<Transaction>> {
        Ok(self
            .transactions
            .read()
            .unwrap()
            .get(transaction_id)
            .cloned())
    }

    async fn find_many_by_user_and_date_range(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DedupResult<Vec<Transaction>> {
        let transactions = self.transactions.read().unwrap();
        let mut matching: Vec<Transaction> = transactions
            .values()
            .filter(|txn| {
                txn.user_id == user_id && txn.date >= start_date && txn.date <= end_date
            })
            .cloned()
            .collect();
        // hash map iteration order is arbitrary; callers get (date, id) order
        matching.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));
        Ok(matching)
    }

    async fn delete_by_id(&mut self, transaction_id: &str) -> DedupResult<()> {
        if self
            .transactions
            .write()
            .unwrap()
            .remove(transaction_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(DedupError::TransactionNotFound(transaction_id.to_string()))
        }
    }
}
