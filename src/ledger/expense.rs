//! Expense management and construction

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::reports::ExpenseFilter;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::DefaultEntryValidator;

/// Expense manager for handling expense operations
pub struct ExpenseManager<S: LedgerStorage> {
    storage: S,
    validator: Arc<dyn EntryValidator>,
}

impl<S: LedgerStorage> ExpenseManager<S> {
    /// Create a new expense manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Arc::new(DefaultEntryValidator),
        }
    }

    /// Create a new expense manager with custom validator
    pub fn with_validator(storage: S, validator: Arc<dyn EntryValidator>) -> Self {
        Self { storage, validator }
    }

    /// Run the configured validator against an expense
    pub fn validate(&self, expense: &Expense) -> LedgerResult<()> {
        self.validator.validate_expense(expense)
    }

    /// Record a new expense at the front of the list
    pub async fn record_expense(&mut self, expense: Expense) -> LedgerResult<Expense> {
        self.validator.validate_expense(&expense)?;

        if self.storage.get_expense(&expense.id).await?.is_some() {
            return Err(LedgerError::Validation(format!(
                "Expense with ID '{}' already exists",
                expense.id
            )));
        }

        self.storage.save_expense(&expense).await?;
        Ok(expense)
    }

    /// Get an expense by ID
    pub async fn get_expense(&self, expense_id: &str) -> LedgerResult<Option<Expense>> {
        self.storage.get_expense(expense_id).await
    }

    /// Get an expense by ID, returning an error if not found
    pub async fn get_expense_required(&self, expense_id: &str) -> LedgerResult<Expense> {
        self.storage
            .get_expense(expense_id)
            .await?
            .ok_or_else(|| LedgerError::ExpenseNotFound(expense_id.to_string()))
    }

    /// List all expenses, newest first
    pub async fn list_expenses(&self) -> LedgerResult<Vec<Expense>> {
        self.storage.list_expenses().await
    }

    /// List the expenses matching a filter, newest first
    pub async fn find_expenses(&self, filter: &ExpenseFilter) -> LedgerResult<Vec<Expense>> {
        let expenses = self.storage.list_expenses().await?;
        Ok(filter.apply(&expenses))
    }

    /// Replace every mutable field of an existing expense
    pub async fn update_expense(&mut self, expense: &Expense) -> LedgerResult<()> {
        self.get_expense_required(&expense.id).await?;
        self.validator.validate_expense(expense)?;
        self.storage.update_expense(expense).await
    }

    /// Delete an expense, handing it back so the caller can offer undo
    pub async fn delete_expense(&mut self, expense_id: &str) -> LedgerResult<Expense> {
        let expense = self.get_expense_required(expense_id).await?;
        self.storage.delete_expense(expense_id).await?;
        Ok(expense)
    }

    /// Put a previously deleted expense back at the front of the list
    pub async fn restore_expense(&mut self, expense: Expense) -> LedgerResult<Expense> {
        self.record_expense(expense).await
    }
}

/// Builder for validated expenses
#[derive(Debug)]
pub struct ExpenseBuilder {
    expense: Expense,
    custom_percent: Option<u8>,
}

impl ExpenseBuilder {
    /// Start an even-split expense dated now with a fresh ID
    pub fn new(description: String, amount: BigDecimal, paid_by: Partner) -> Self {
        Self {
            expense: Expense {
                id: Uuid::new_v4().to_string(),
                description,
                amount,
                paid_by,
                split: SplitRule::Even,
                category: Category::Other,
                date: Utc::now(),
            },
            custom_percent: None,
        }
    }

    /// Use a specific ID instead of a generated one
    pub fn id(mut self, id: String) -> Self {
        self.expense.id = id;
        self
    }

    pub fn split(mut self, split: SplitRule) -> Self {
        self.expense.split = split;
        self.custom_percent = None;
        self
    }

    /// Split with partner A carrying `percent`; checked on build
    pub fn custom_split(mut self, percent: u8) -> Self {
        self.custom_percent = Some(percent);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.expense.category = category;
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.expense.date = date;
        self
    }

    /// Build the expense
    pub fn build(mut self) -> LedgerResult<Expense> {
        if let Some(percent) = self.custom_percent {
            self.expense.split = SplitRule::Custom(SplitPercent::new(percent)?);
        }
        DefaultEntryValidator.validate_expense(&self.expense)?;
        Ok(self.expense)
    }
}
