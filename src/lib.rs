//! # Settlement Core
//!
//! Settlement engine for two-person households sharing expenses.
//!
//! ## Features
//!
//! - **Split rules**: even, income-ratio and custom-percentage splits
//! - **Settlement**: a signed balance between the two members plus paid/owed/net breakdowns
//! - **Recurring expenses**: weekly and monthly templates materialized into concrete expenses
//! - **Reports**: filtering, category totals and budget tracking
//! - **Storage abstraction**: the engine is pure; persistence sits behind [`LedgerStorage`]
//!
//! ## Quick Start
//!
//! ```rust
//! use settlement_core::{
//!     compute_settlement, ExpenseBuilder, MemberProfile, Partner, Profiles, SplitRule,
//! };
//! use bigdecimal::BigDecimal;
//!
//! let profiles = Profiles::new(
//!     MemberProfile::new("Alex".to_string(), String::new(), BigDecimal::from(6000)).unwrap(),
//!     MemberProfile::new("Blair".to_string(), String::new(), BigDecimal::from(4000)).unwrap(),
//! );
//! let rent = ExpenseBuilder::new("Rent".to_string(), BigDecimal::from(100), Partner::A)
//!     .split(SplitRule::Income)
//!     .build()
//!     .unwrap();
//!
//! let settlement = compute_settlement(&[rent], &profiles);
//! assert_eq!(settlement.balance, BigDecimal::from(40));
//! assert_eq!(settlement.owed_text, "Blair owes Alex");
//! ```

pub mod ledger;
pub mod records;
pub mod recurring;
pub mod reports;
pub mod settlement;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use recurring::*;
pub use reports::*;
pub use settlement::*;
pub use traits::*;
pub use types::*;
