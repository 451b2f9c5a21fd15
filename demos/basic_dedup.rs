//! Basic duplicate detection example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use dedup_core::utils::MemoryTransactionStore;
use dedup_core::{DeduplicationEngine, Transaction, TransactionType};

fn expense(id: &str, amount: i64, description: &str, day: u32, hour: u32) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
    Transaction::new(
        "user1".to_string(),
        TransactionType::Expense,
        BigDecimal::from(amount),
        description.to_string(),
        date,
    )
    .with_id(id.to_string())
    .with_account("checking".to_string())
    .with_created_at(date.and_hms_opt(hour, 0, 0).unwrap())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Interleave the engine's own log output with the narration below
    tracing_subscriber::fmt().with_target(false).init();

    println!("🔍 Dedup Core - Basic Detection Example\n");

    // 1. Seed a month of transactions, including a double import
    println!("💳 Seeding March transactions...");
    let store = MemoryTransactionStore::new();

    let seed = [
        expense("rent_original", 1200, "Monthly Rent", 5, 8),
        expense("rent_reimport", 1200, "Monthly Rent", 5, 9),
        expense("utility_a", 89, "Electric Utility", 12, 8),
        expense("utility_b", 89, "Electric Utility", 13, 8),
        expense("coffee", 4, "Coffee Shop", 6, 10),
        expense("groceries", 154, "Grocery Store", 20, 17),
    ];
    for transaction in seed {
        println!(
            "  ✓ {} | {} | ₹{} on {}",
            transaction.id, transaction.description, transaction.amount, transaction.date
        );
        store.insert(transaction);
    }
    println!();

    // 2. Run range detection with the default settings
    println!("🔎 Scanning March 2024 for duplicates...\n");
    let mut engine = DeduplicationEngine::new(store.clone());
    let report = engine
        .detect_duplicates_in_range(
            "user1",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            None,
        )
        .await?;

    println!("\n📋 Detection Report:");
    println!("  Duplicates found: {}", report.duplicates_found);
    println!("  Auto-merged:      {}", report.auto_merged);
    println!("  Pending review:   {}", report.pending_review);
    println!();

    // 3. Inspect each match
    for duplicate_match in &report.matches {
        println!(
            "  {} ↔ {}  confidence {:.1}%  [{:?}]",
            duplicate_match.id.original_id,
            duplicate_match.id.duplicate_id,
            duplicate_match.confidence * 100.0,
            duplicate_match.status
        );
        let criteria: Vec<String> = duplicate_match
            .matching_criteria
            .iter()
            .map(|c| c.to_string())
            .collect();
        println!("    matched on: {}", criteria.join(", "));
    }
    println!();

    // 4. Show what survived
    println!("💾 Transactions remaining in the store: {}", store.len());

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
