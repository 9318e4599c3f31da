//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Longest description the storage layer accepts
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(LedgerError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a monthly income is not negative
pub fn validate_income(income: &BigDecimal) -> LedgerResult<()> {
    if *income < BigDecimal::from(0) {
        return Err(LedgerError::Validation(
            "Income cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a budget limit is not negative
pub fn validate_budget_limit(limit: &BigDecimal) -> LedgerResult<()> {
    if *limit < BigDecimal::from(0) {
        return Err(LedgerError::Validation(
            "Budget limit cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// Validate an expense or template description
pub fn validate_description(description: &str) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Description cannot be empty".to_string(),
        ));
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(LedgerError::Validation(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }

    Ok(())
}

/// Validate a record identifier
pub fn validate_id(id: &str) -> LedgerResult<()> {
    if id.trim().is_empty() {
        return Err(LedgerError::Validation("ID cannot be empty".to_string()));
    }

    Ok(())
}

/// Validator enforcing the construction-time invariants of expenses and templates
pub struct DefaultEntryValidator;

impl EntryValidator for DefaultEntryValidator {
    fn validate_expense(&self, expense: &Expense) -> LedgerResult<()> {
        validate_id(&expense.id)?;
        validate_description(&expense.description)?;
        validate_positive_amount(&expense.amount)
    }

    fn validate_template(&self, template: &RecurringTemplate) -> LedgerResult<()> {
        validate_id(&template.id)?;
        validate_description(&template.description)?;
        validate_positive_amount(&template.amount)
    }
}
