//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::HashMap;

use crate::types::*;

/// Storage abstraction for a household ledger
///
/// The settlement engine itself never touches storage. Implement this trait
/// to back a [`Household`](crate::ledger::Household) with a database, a
/// key-value store or plain memory.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Load the whole household state in one read
    async fn load_ledger(&self) -> LedgerResult<LedgerSnapshot>;

    /// Replace the whole household state
    async fn save_ledger(&mut self, snapshot: &LedgerSnapshot) -> LedgerResult<()>;

    /// Get both member profiles
    async fn get_profiles(&self) -> LedgerResult<Profiles>;

    /// Replace the profile in one member slot
    async fn save_profile(&mut self, partner: Partner, profile: &MemberProfile)
        -> LedgerResult<()>;

    /// Insert an expense at the front of the list
    async fn save_expense(&mut self, expense: &Expense) -> LedgerResult<()>;

    /// Get an expense by ID
    async fn get_expense(&self, expense_id: &str) -> LedgerResult<Option<Expense>>;

    /// List all expenses, newest first
    async fn list_expenses(&self) -> LedgerResult<Vec<Expense>>;

    /// Replace an existing expense in place
    async fn update_expense(&mut self, expense: &Expense) -> LedgerResult<()>;

    /// Remove an expense
    async fn delete_expense(&mut self, expense_id: &str) -> LedgerResult<()>;

    /// Save a recurring template
    async fn save_template(&mut self, template: &RecurringTemplate) -> LedgerResult<()>;

    /// Get a recurring template by ID
    async fn get_template(&self, template_id: &str) -> LedgerResult<Option<RecurringTemplate>>;

    /// List all recurring templates in creation order
    async fn list_templates(&self) -> LedgerResult<Vec<RecurringTemplate>>;

    /// Replace an existing recurring template
    async fn update_template(&mut self, template: &RecurringTemplate) -> LedgerResult<()>;

    /// Remove a recurring template
    async fn delete_template(&mut self, template_id: &str) -> LedgerResult<()>;

    /// Insert or replace the budget limit for a category
    async fn set_budget(&mut self, category: Category, limit: &BigDecimal) -> LedgerResult<()>;

    /// Get all category budgets
    async fn get_budgets(&self) -> LedgerResult<HashMap<Category, BigDecimal>>;
}

/// Trait for implementing custom validation of ledger entries
pub trait EntryValidator: Send + Sync {
    /// Validate an expense before it is saved or replaced
    fn validate_expense(&self, expense: &Expense) -> LedgerResult<()>;

    /// Validate a recurring template before it is saved or replaced
    fn validate_template(&self, template: &RecurringTemplate) -> LedgerResult<()>;
}
