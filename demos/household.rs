//! Household settlement example

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use settlement_core::utils::MemoryStorage;
use settlement_core::{
    Category, ExpenseBuilder, ExpenseFilter, Frequency, Household, MemberProfile, Partner,
    SplitRule, TemplateBuilder,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("🏠 Settlement Core - Household Example\n");

    let mut household = Household::new(MemoryStorage::new());

    // 1. Set up both members
    household
        .set_profile(
            Partner::A,
            MemberProfile::new(
                "Alex".to_string(),
                "dicebear:bottts:alex".to_string(),
                BigDecimal::from(6000),
            )?,
        )
        .await?;
    household
        .set_profile(
            Partner::B,
            MemberProfile::new(
                "Blair".to_string(),
                "dicebear:bottts:blair".to_string(),
                BigDecimal::from(4000),
            )?,
        )
        .await?;
    println!("👥 Alex earns 6000, Blair earns 4000\n");

    // 2. Log a few expenses with different split rules
    let expenses = [
        ExpenseBuilder::new("Weekly shop".to_string(), BigDecimal::from(120), Partner::A)
            .category(Category::Groceries)
            .build()?,
        ExpenseBuilder::new("Electricity".to_string(), BigDecimal::from(90), Partner::B)
            .split(SplitRule::Income)
            .category(Category::Utilities)
            .build()?,
        ExpenseBuilder::new("Concert tickets".to_string(), BigDecimal::from(150), Partner::A)
            .custom_split(30)
            .category(Category::Fun)
            .build()?,
    ];
    for expense in expenses {
        println!(
            "  ✓ {} paid {} for {} ({})",
            expense.paid_by,
            expense.amount,
            expense.description,
            expense.split.tag()
        );
        household.add_expense(expense).await?;
    }
    println!();

    // 3. Set up rent as a monthly template that is already due
    let rent = TemplateBuilder::new(
        "Rent".to_string(),
        BigDecimal::from(1800),
        Partner::A,
        Frequency::Monthly,
    )
    .split(SplitRule::Income)
    .next_due(Utc::now() - Duration::days(2))
    .build()?;
    household.add_template(rent).await?;

    let batch = household.process_recurring(Utc::now()).await?;
    if let Some(notification) = batch.notification() {
        println!("🔁 {}\n", notification);
    }

    // 4. Settle up
    let settlement = household.settlement().await?;
    println!("⚖️  {}: {}", settlement.owed_text, settlement.rounded_amount());
    for (name, contribution) in [
        ("Alex", &settlement.contributions.a),
        ("Blair", &settlement.contributions.b),
    ] {
        println!(
            "  {} paid {}, owes {}, net {}",
            name,
            contribution.paid.round(2),
            contribution.owed.round(2),
            contribution.net.round(2)
        );
    }

    let fun = household
        .expenses(&ExpenseFilter::new().category(Category::Fun))
        .await?;
    println!("\n🎉 {} expense(s) in Fun", fun.len());

    Ok(())
}
