//! Persisted record shapes and their conversion into validated domain types
//!
//! Records mirror what the storage collaborator keeps: a `splitType` tag with
//! an optional `customSplitA` beside it, amounts as decimal strings or numbers.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::validation::{validate_description, validate_id, validate_positive_amount};

/// Split rule tag as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitType {
    #[serde(rename = "50/50")]
    Even,
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "custom")]
    Custom,
}

/// Stored form of an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: String,
    pub description: String,
    pub amount: BigDecimal,
    pub paid_by: Partner,
    pub split_type: SplitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_split_a: Option<i64>,
    pub category: Category,
    pub date: DateTime<Utc>,
}

/// Stored form of a recurring template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplateRecord {
    pub id: String,
    pub description: String,
    pub amount: BigDecimal,
    pub paid_by: Partner,
    pub split_type: SplitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_split_a: Option<i64>,
    pub category: Category,
    pub frequency: Frequency,
    pub next_due_date: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Combine a stored tag and percentage into a split rule
///
/// A custom split stored without a percentage resolves to an even split.
pub fn split_rule_from_parts(
    split_type: SplitType,
    custom_split_a: Option<i64>,
) -> LedgerResult<SplitRule> {
    match split_type {
        SplitType::Even => Ok(SplitRule::Even),
        SplitType::Income => Ok(SplitRule::Income),
        SplitType::Custom => match custom_split_a {
            Some(raw) => {
                let percent = u8::try_from(raw).map_err(|_| {
                    LedgerError::Validation(format!(
                        "Custom split percentage must be between 0 and 100, got {}",
                        raw
                    ))
                })?;
                Ok(SplitRule::Custom(SplitPercent::new(percent)?))
            }
            None => {
                tracing::warn!("custom split stored without a percentage; using an even split");
                Ok(SplitRule::Custom(SplitPercent::default()))
            }
        },
    }
}

/// Split a rule back into its stored tag and percentage
pub fn split_rule_into_parts(rule: &SplitRule) -> (SplitType, Option<i64>) {
    match rule {
        SplitRule::Even => (SplitType::Even, None),
        SplitRule::Income => (SplitType::Income, None),
        SplitRule::Custom(percent) => (SplitType::Custom, Some(i64::from(percent.value()))),
    }
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = LedgerError;

    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        validate_id(&record.id)?;
        validate_description(&record.description)?;
        validate_positive_amount(&record.amount)?;

        Ok(Expense {
            split: split_rule_from_parts(record.split_type, record.custom_split_a)?,
            id: record.id,
            description: record.description,
            amount: record.amount,
            paid_by: record.paid_by,
            category: record.category,
            date: record.date,
        })
    }
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        let (split_type, custom_split_a) = split_rule_into_parts(&expense.split);
        Self {
            id: expense.id.clone(),
            description: expense.description.clone(),
            amount: expense.amount.clone(),
            paid_by: expense.paid_by,
            split_type,
            custom_split_a,
            category: expense.category,
            date: expense.date,
        }
    }
}

impl TryFrom<RecurringTemplateRecord> for RecurringTemplate {
    type Error = LedgerError;

    fn try_from(record: RecurringTemplateRecord) -> Result<Self, Self::Error> {
        validate_id(&record.id)?;
        validate_description(&record.description)?;
        validate_positive_amount(&record.amount)?;

        Ok(RecurringTemplate {
            split: split_rule_from_parts(record.split_type, record.custom_split_a)?,
            id: record.id,
            description: record.description,
            amount: record.amount,
            paid_by: record.paid_by,
            category: record.category,
            frequency: record.frequency,
            next_due_date: record.next_due_date,
            is_active: record.is_active,
        })
    }
}

impl From<&RecurringTemplate> for RecurringTemplateRecord {
    fn from(template: &RecurringTemplate) -> Self {
        let (split_type, custom_split_a) = split_rule_into_parts(&template.split);
        Self {
            id: template.id.clone(),
            description: template.description.clone(),
            amount: template.amount.clone(),
            paid_by: template.paid_by,
            split_type,
            custom_split_a,
            category: template.category,
            frequency: template.frequency,
            next_due_date: template.next_due_date,
            is_active: template.is_active,
        }
    }
}

/// Convert a batch of stored expenses, failing on the first invalid record
pub fn expenses_from_records(records: Vec<ExpenseRecord>) -> LedgerResult<Vec<Expense>> {
    records.into_iter().map(Expense::try_from).collect()
}
