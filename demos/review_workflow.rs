//! Review workflow example: approving and rejecting detected matches

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use dedup_core::utils::MemoryTransactionStore;
use dedup_core::{DeduplicationEngine, MatchStatus, Transaction, TransactionType};

fn expense(id: &str, amount: i64, description: &str, day: u32, hour: u32) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
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
    tracing_subscriber::fmt().with_target(false).init();

    println!("⚖️  Dedup Core - Review Workflow Example\n");

    // 1. Seed two plausible duplicate pairs that need a human decision
    println!("💳 Seeding April transactions...");
    let store = MemoryTransactionStore::new();

    // the same gym charge posted a day apart: a real duplicate
    store.insert(expense("gym_a", 55, "Gym Membership", 8, 9));
    store.insert(expense("gym_b", 55, "Gym Membership", 9, 9));

    // two genuinely distinct pharmacy runs two days apart
    store.insert(expense("pharmacy_a", 23, "Pharmacy", 15, 11));
    store.insert(expense("pharmacy_b", 23, "Pharmacy", 17, 16));

    println!("  ✓ 4 transactions inserted\n");

    // 2. Detect: both pairs land below the auto-merge threshold
    let mut engine = DeduplicationEngine::new(store.clone());
    let report = engine
        .detect_duplicates_in_range(
            "user1",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            None,
        )
        .await?;

    println!("📋 Matches awaiting review: {}", report.pending_review);
    for duplicate_match in &report.matches {
        println!(
            "  {}  confidence {:.1}%",
            duplicate_match.id,
            duplicate_match.confidence * 100.0
        );
    }
    println!();

    let pending: Vec<String> = report
        .matches
        .iter()
        .filter(|m| m.status == MatchStatus::Pending)
        .map(|m| m.id.to_string())
        .collect();

    // 3. Approve the gym pair, keeping the first posting
    println!("✅ Approving merge of the gym pair (keeping gym_a)...");
    engine
        .approve_duplicate_merge(&pending[0], "user1", "gym_a")
        .await?;
    println!("  store now holds {} transactions\n", store.len());

    // 4. Reject the pharmacy pair: both purchases were real
    println!("❌ Rejecting the pharmacy match...");
    engine.reject_duplicate_match(&pending[1], "user1").await?;
    println!("  store still holds {} transactions\n", store.len());

    // 5. Rejections are not remembered, so a fresh scan reports the pair again
    let rescan = engine
        .detect_duplicates_in_range(
            "user1",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            None,
        )
        .await?;
    println!(
        "🔁 A rescan still reports {} match(es) for the rejected pair",
        rescan.duplicates_found
    );

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
