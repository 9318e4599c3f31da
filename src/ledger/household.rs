//! Household orchestrator that coordinates expenses, templates and settlement

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::ledger::{ExpenseManager, TemplateManager};
use crate::recurring::{MaterializationBatch, Materializer, MaterializerConfig};
use crate::reports::{budget_status, BudgetStatus, ExpenseFilter};
use crate::settlement::{Settlement, SettlementConfig, SettlementEngine};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{validate_budget_limit, validate_income};

/// A two-member household sharing one expense ledger
///
/// Callers are expected to serialize writes; reads such as [`settlement`]
/// see whatever snapshot storage returns.
///
/// [`settlement`]: Household::settlement
pub struct Household<S: LedgerStorage> {
    storage: S,
    expense_manager: ExpenseManager<S>,
    template_manager: TemplateManager<S>,
    settlement_engine: SettlementEngine,
    materializer: Materializer,
}

impl<S: LedgerStorage + Clone> Household<S> {
    /// Create a household with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            expense_manager: ExpenseManager::new(storage.clone()),
            template_manager: TemplateManager::new(storage.clone()),
            storage,
            settlement_engine: SettlementEngine::default(),
            materializer: Materializer::default(),
        }
    }

    /// Create a household with a custom entry validator
    pub fn with_validator(storage: S, validator: Arc<dyn EntryValidator>) -> Self {
        Self {
            expense_manager: ExpenseManager::with_validator(storage.clone(), validator.clone()),
            template_manager: TemplateManager::with_validator(storage.clone(), validator),
            storage,
            settlement_engine: SettlementEngine::default(),
            materializer: Materializer::default(),
        }
    }

    /// Use a custom settlement configuration
    pub fn with_settlement_config(mut self, config: SettlementConfig) -> Self {
        self.settlement_engine = SettlementEngine::new(config);
        self
    }

    /// Use a custom recurring materializer configuration
    pub fn with_materializer_config(mut self, config: MaterializerConfig) -> Self {
        self.materializer = Materializer::new(config);
        self
    }

    // Profile operations
    /// Get both member profiles
    pub async fn profiles(&self) -> LedgerResult<Profiles> {
        self.storage.get_profiles().await
    }

    /// Replace the profile in one member slot
    pub async fn set_profile(
        &mut self,
        partner: Partner,
        profile: MemberProfile,
    ) -> LedgerResult<()> {
        validate_income(&profile.income)?;
        self.storage.save_profile(partner, &profile).await
    }

    /// Change one member's monthly income
    pub async fn set_income(&mut self, partner: Partner, income: BigDecimal) -> LedgerResult<()> {
        validate_income(&income)?;
        let mut profile = self.storage.get_profiles().await?.get(partner).clone();
        profile.income = income;
        self.storage.save_profile(partner, &profile).await
    }

    // Expense operations
    /// Record a new expense
    pub async fn add_expense(&mut self, expense: Expense) -> LedgerResult<Expense> {
        self.expense_manager.record_expense(expense).await
    }

    /// Get an expense by ID
    pub async fn get_expense(&self, expense_id: &str) -> LedgerResult<Option<Expense>> {
        self.expense_manager.get_expense(expense_id).await
    }

    /// List expenses matching a filter, newest first
    pub async fn expenses(&self, filter: &ExpenseFilter) -> LedgerResult<Vec<Expense>> {
        self.expense_manager.find_expenses(filter).await
    }

    /// Replace an existing expense
    pub async fn update_expense(&mut self, expense: &Expense) -> LedgerResult<()> {
        self.expense_manager.update_expense(expense).await
    }

    /// Delete an expense and return it for a possible undo
    pub async fn delete_expense(&mut self, expense_id: &str) -> LedgerResult<Expense> {
        self.expense_manager.delete_expense(expense_id).await
    }

    /// Undo a deletion
    pub async fn restore_expense(&mut self, expense: Expense) -> LedgerResult<Expense> {
        self.expense_manager.restore_expense(expense).await
    }

    // Recurring template operations
    /// Add a recurring template
    pub async fn add_template(
        &mut self,
        template: RecurringTemplate,
    ) -> LedgerResult<RecurringTemplate> {
        self.template_manager.add_template(template).await
    }

    /// List recurring templates
    pub async fn templates(&self) -> LedgerResult<Vec<RecurringTemplate>> {
        self.template_manager.list_templates().await
    }

    /// Replace a recurring template
    pub async fn update_template(&mut self, template: &RecurringTemplate) -> LedgerResult<()> {
        self.template_manager.update_template(template).await
    }

    /// Pause or resume a recurring template
    pub async fn set_template_active(
        &mut self,
        template_id: &str,
        is_active: bool,
    ) -> LedgerResult<RecurringTemplate> {
        self.template_manager.set_active(template_id, is_active).await
    }

    /// Delete a recurring template
    pub async fn delete_template(&mut self, template_id: &str) -> LedgerResult<()> {
        self.template_manager.delete_template(template_id).await
    }

    // Budget operations
    /// Set the spending limit for a category
    pub async fn set_budget(&mut self, category: Category, limit: BigDecimal) -> LedgerResult<()> {
        validate_budget_limit(&limit)?;
        self.storage.set_budget(category, &limit).await
    }

    /// Get all category budgets
    pub async fn budgets(&self) -> LedgerResult<HashMap<Category, BigDecimal>> {
        self.storage.get_budgets().await
    }

    /// Spending against each budgeted category for the expenses matching `filter`
    pub async fn budget_report(&self, filter: &ExpenseFilter) -> LedgerResult<Vec<BudgetStatus>> {
        let expenses = self.expenses(filter).await?;
        let budgets = self.storage.get_budgets().await?;
        Ok(budget_status(&expenses, &budgets))
    }

    // Settlement and materialization
    /// Compute the current settlement from the live expense list
    pub async fn settlement(&self) -> LedgerResult<Settlement> {
        let snapshot = self.storage.load_ledger().await?;
        Ok(self
            .settlement_engine
            .compute(&snapshot.expenses, &snapshot.profiles))
    }

    /// Materialize every recurring template due at `now`
    ///
    /// The batch lands at the front of the expense list in template order,
    /// and the advanced templates are written back. Every new expense is
    /// validated before anything is stored; the batch and the template
    /// updates are then written together, so a failed run changes nothing.
    pub async fn process_recurring(
        &mut self,
        now: DateTime<Utc>,
    ) -> LedgerResult<MaterializationBatch> {
        let mut snapshot = self.storage.load_ledger().await?;
        let batch = self.materializer.materialize(&snapshot.templates, now)?;
        if batch.is_empty() {
            return Ok(batch);
        }

        for expense in &batch.new_expenses {
            self.expense_manager.validate(expense)?;
            if snapshot.expenses.iter().any(|e| e.id == expense.id) {
                return Err(LedgerError::Validation(format!(
                    "Expense with ID '{}' already exists",
                    expense.id
                )));
            }
        }

        let mut expenses = batch.new_expenses.clone();
        expenses.append(&mut snapshot.expenses);
        snapshot.expenses = expenses;
        for updated in &batch.updated_templates {
            if let Some(stored) = snapshot.templates.iter_mut().find(|t| t.id == updated.id) {
                *stored = updated.clone();
            }
        }
        self.storage.save_ledger(&snapshot).await?;

        if let Some(notification) = batch.notification() {
            tracing::info!(
                expenses = batch.new_expenses.len(),
                templates = batch.updated_templates.len(),
                "{}",
                notification
            );
        }

        Ok(batch)
    }

    /// Full copy of the stored household state
    pub async fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        self.storage.load_ledger().await
    }

    /// Replace the stored household state wholesale
    pub async fn import(&mut self, snapshot: &LedgerSnapshot) -> LedgerResult<()> {
        validate_income(&snapshot.profiles.a.income)?;
        validate_income(&snapshot.profiles.b.income)?;
        for expense in &snapshot.expenses {
            self.expense_manager.validate(expense)?;
        }
        for template in &snapshot.templates {
            self.template_manager.validate(template)?;
        }
        self.storage.save_ledger(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ExpenseBuilder, TemplateBuilder};
    use crate::utils::memory_storage::MemoryStorage;
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_household_basic_operations() {
        let mut household = Household::new(MemoryStorage::new());
        household
            .set_profile(
                Partner::A,
                MemberProfile::new("Alex".to_string(), String::new(), BigDecimal::from(6000))
                    .unwrap(),
            )
            .await
            .unwrap();
        household
            .set_profile(
                Partner::B,
                MemberProfile::new("Blair".to_string(), String::new(), BigDecimal::from(4000))
                    .unwrap(),
            )
            .await
            .unwrap();

        let groceries =
            ExpenseBuilder::new("Groceries".to_string(), BigDecimal::from(100), Partner::A)
                .split(SplitRule::Income)
                .category(Category::Groceries)
                .build()
                .unwrap();
        household.add_expense(groceries).await.unwrap();

        let settlement = household.settlement().await.unwrap();
        assert_eq!(settlement.balance, BigDecimal::from(40));
        assert_eq!(settlement.owed_text, "Blair owes Alex");

        household.set_income(Partner::B, BigDecimal::from(0)).await.unwrap();
        let settlement = household.settlement().await.unwrap();
        assert_eq!(settlement.balance, BigDecimal::from(0));
        assert!(settlement.is_settled());
    }

    #[tokio::test]
    async fn test_process_recurring_persists_batch() {
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 7, 0, 0).unwrap();
        let mut household = Household::new(MemoryStorage::new());

        for (id, due) in [("rent", now - Duration::days(1)), ("netflix", now)] {
            let template = TemplateBuilder::new(
                id.to_string(),
                BigDecimal::from(20),
                Partner::B,
                Frequency::Monthly,
            )
            .id(id.to_string())
            .next_due(due)
            .build()
            .unwrap();
            household.add_template(template).await.unwrap();
        }

        let batch = household.process_recurring(now).await.unwrap();
        assert_eq!(batch.new_expenses.len(), 2);

        let stored = household.expenses(&ExpenseFilter::new()).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].description, "rent");
        assert_eq!(stored[1].description, "netflix");

        let templates = household.templates().await.unwrap();
        assert!(templates.iter().all(|t| t.next_due_date > now));

        let again = household.process_recurring(now).await.unwrap();
        assert!(again.is_empty());
        assert_eq!(
            household.expenses(&ExpenseFilter::new()).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_failed_recurring_run_stores_nothing() {
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 7, 0, 0).unwrap();
        let template = |id: &str, description: &str| RecurringTemplate {
            id: id.to_string(),
            description: description.to_string(),
            amount: BigDecimal::from(100),
            paid_by: Partner::A,
            split: SplitRule::Even,
            category: Category::Rent,
            frequency: Frequency::Monthly,
            next_due_date: now - Duration::days(1),
            is_active: true,
        };
        let storage = MemoryStorage::with_snapshot(LedgerSnapshot {
            templates: vec![template("blank", "   "), template("rent", "Rent")],
            ..LedgerSnapshot::default()
        });
        let mut household = Household::new(storage);

        for _ in 0..3 {
            assert!(household.process_recurring(now).await.is_err());
        }

        assert!(household
            .expenses(&ExpenseFilter::new())
            .await
            .unwrap()
            .is_empty());
        let templates = household.templates().await.unwrap();
        assert!(templates.iter().all(|t| t.next_due_date == now - Duration::days(1)));
        assert!(household.settlement().await.unwrap().is_settled());
    }

    #[tokio::test]
    async fn test_negative_budget_is_rejected() {
        let mut household = Household::new(MemoryStorage::new());
        assert!(household
            .set_budget(Category::Fun, BigDecimal::from(-1))
            .await
            .is_err());
        household
            .set_budget(Category::Fun, BigDecimal::from(200))
            .await
            .unwrap();
        assert_eq!(
            household.budgets().await.unwrap()[&Category::Fun],
            BigDecimal::from(200)
        );
    }
}
