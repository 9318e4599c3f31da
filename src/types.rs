//! Core types and data structures for the settlement system

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One of the two fixed member slots in a household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partner {
    A,
    B,
}

impl Partner {
    /// Returns the opposite member slot
    pub fn other(&self) -> Partner {
        match self {
            Partner::A => Partner::B,
            Partner::B => Partner::A,
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partner::A => write!(f, "A"),
            Partner::B => write!(f, "B"),
        }
    }
}

/// Partner A's share of a custom split, as a whole percentage in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SplitPercent(u8);

impl SplitPercent {
    /// Create a validated percentage
    pub fn new(percent: u8) -> LedgerResult<Self> {
        if percent > 100 {
            return Err(LedgerError::Validation(format!(
                "Custom split percentage must be between 0 and 100, got {}",
                percent
            )));
        }
        Ok(Self(percent))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Falls back to an even split, matching what malformed custom records resolve to
impl Default for SplitPercent {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<u8> for SplitPercent {
    type Error = LedgerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SplitPercent> for u8 {
    fn from(percent: SplitPercent) -> Self {
        percent.0
    }
}

/// Policy that decides each member's share of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplitRule {
    /// Each member carries half
    #[serde(rename = "50/50")]
    Even,
    /// Shares follow the ratio of the members' monthly incomes
    Income,
    /// Partner A carries the given percentage, partner B the rest
    Custom(SplitPercent),
}

impl SplitRule {
    /// Wire tag used by the persisted representation
    pub fn tag(&self) -> &'static str {
        match self {
            SplitRule::Even => "50/50",
            SplitRule::Income => "income",
            SplitRule::Custom(_) => "custom",
        }
    }
}

/// Expense categories; opaque to the settlement math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Rent,
    Utilities,
    Fun,
    Gas,
    Pet,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Groceries,
        Category::Rent,
        Category::Utilities,
        Category::Fun,
        Category::Gas,
        Category::Pet,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Rent => "Rent",
            Category::Utilities => "Utilities",
            Category::Fun => "Fun",
            Category::Gas => "Gas",
            Category::Pet => "Pet",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a recurring template comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    Monthly,
}

impl Frequency {
    /// Compute the due date one period after `from`
    ///
    /// Monthly steps keep the day of month and clamp to the last day of a
    /// shorter month, so Jan 31 advances to Feb 28 (or 29).
    /// Day-overflow date arithmetic would roll the same date over to Mar 2
    /// (or 3) instead; stored due dates written that way are read as-is.
    pub fn advance(&self, from: DateTime<Utc>) -> LedgerResult<DateTime<Utc>> {
        let next = match self {
            Frequency::Weekly => from.checked_add_signed(Duration::days(7)),
            Frequency::Monthly => from.checked_add_months(Months::new(1)),
        };

        next.ok_or_else(|| {
            LedgerError::Schedule(format!("Cannot advance {:?} schedule past {}", self, from))
        })
    }
}

/// Member profile for one partner slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Display name used in settlement statements
    pub name: String,
    /// Avatar reference, not interpreted here
    pub avatar: String,
    /// Monthly income, used by income-ratio splits
    pub income: BigDecimal,
}

impl MemberProfile {
    /// Create a profile, rejecting negative incomes
    pub fn new(name: String, avatar: String, income: BigDecimal) -> LedgerResult<Self> {
        crate::utils::validation::validate_income(&income)?;
        Ok(Self {
            name,
            avatar,
            income,
        })
    }
}

/// The pair of member profiles in a household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profiles {
    #[serde(rename = "A")]
    pub a: MemberProfile,
    #[serde(rename = "B")]
    pub b: MemberProfile,
}

impl Profiles {
    pub fn new(a: MemberProfile, b: MemberProfile) -> Self {
        Self { a, b }
    }

    /// Get the profile in the given slot
    pub fn get(&self, partner: Partner) -> &MemberProfile {
        match partner {
            Partner::A => &self.a,
            Partner::B => &self.b,
        }
    }

    /// Replace the profile in the given slot
    pub fn set(&mut self, partner: Partner, profile: MemberProfile) {
        match partner {
            Partner::A => self.a = profile,
            Partner::B => self.b = profile,
        }
    }

    /// Combined monthly income of both members
    pub fn total_income(&self) -> BigDecimal {
        &self.a.income + &self.b.income
    }
}

impl Default for Profiles {
    fn default() -> Self {
        let blank = |name: &str| MemberProfile {
            name: name.to_string(),
            avatar: String::new(),
            income: BigDecimal::from(0),
        };
        Self {
            a: blank("Partner A"),
            b: blank("Partner B"),
        }
    }
}

/// A shared expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for the expense
    pub id: String,
    pub description: String,
    /// Always positive
    pub amount: BigDecimal,
    /// Member who paid up front
    pub paid_by: Partner,
    pub split: SplitRule,
    pub category: Category,
    /// When the expense happened
    pub date: DateTime<Utc>,
}

/// Blueprint that periodically turns into a concrete expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: String,
    pub description: String,
    pub amount: BigDecimal,
    pub paid_by: Partner,
    pub split: SplitRule,
    pub category: Category,
    pub frequency: Frequency,
    /// Next time the template materializes; the only field the materializer changes
    pub next_due_date: DateTime<Utc>,
    /// Paused templates are never materialized
    pub is_active: bool,
}

impl RecurringTemplate {
    /// Whether the template should materialize at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.next_due_date <= now
    }

    /// Build the concrete expense this template produces at `now`
    pub fn instantiate(&self, id: String, now: DateTime<Utc>) -> Expense {
        Expense {
            id,
            description: self.description.clone(),
            amount: self.amount.clone(),
            paid_by: self.paid_by,
            split: self.split,
            category: self.category,
            date: now,
        }
    }
}

/// Everything the storage collaborator keeps for one household
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub profiles: Profiles,
    /// Newest first
    pub expenses: Vec<Expense>,
    pub templates: Vec<RecurringTemplate>,
    /// Monthly spending limit per category
    pub budgets: HashMap<Category, BigDecimal>,
}

/// Errors that can occur in the settlement system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("Recurring template not found: {0}")]
    TemplateNotFound(String),
    #[error("Schedule error: {0}")]
    Schedule(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
