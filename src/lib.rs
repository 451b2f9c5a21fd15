//! # Dedup Core
//!
//! A transaction deduplication library providing fuzzy duplicate detection,
//! confidence scoring, and merge resolution for personal finance data.
//!
//! ## Features
//!
//! - **Fuzzy matching**: Weighted scoring across date, amount, description,
//!   location, and account criteria
//! - **Confidence scoring**: Weights renormalize over the criteria that
//!   actually apply, so missing data never counts against a pair
//! - **Auto-merge**: Near-certain matches are merged during range scans,
//!   keeping the earlier-created transaction
//! - **Review workflow**: Lower-confidence matches wait for an approve or
//!   reject decision
//! - **Tunable settings**: Per-call overrides on top of validated defaults
//! - **Storage abstraction**: Database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use dedup_core::utils::MemoryTransactionStore;
//! use dedup_core::{DeduplicationEngine, Transaction, TransactionType};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # #[tokio::main]
//! # async fn main() -> dedup_core::DedupResult<()> {
//! let store = MemoryTransactionStore::new();
//! store.insert(Transaction::new(
//!     "user1".to_string(),
//!     TransactionType::Expense,
//!     BigDecimal::from(1200),
//!     "Monthly Rent".to_string(),
//!     NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
//! ));
//!
//! let mut engine = DeduplicationEngine::new(store);
//! let report = engine
//!     .detect_duplicates_in_range(
//!         "user1",
//!         NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//!         None,
//!     )
//!     .await?;
//! assert_eq!(report.duplicates_found, 0);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod settings;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use engine::*;
pub use settings::*;
pub use traits::*;
pub use types::*;
