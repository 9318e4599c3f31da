//! In-memory storage implementation for testing

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
///
/// Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    state: Arc<RwLock<LedgerSnapshot>>,
}

impl MemoryStorage {
    /// Create an empty storage instance with default profiles
    pub fn new() -> Self {
        Self::with_snapshot(LedgerSnapshot::default())
    }

    /// Create a storage instance seeded with existing state
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Clear all expenses, templates and budgets (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        let mut state = self.write()?;
        state.expenses.clear();
        state.templates.clear();
        state.budgets.clear();
        Ok(())
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerSnapshot>> {
        self.state
            .read()
            .map_err(|_| LedgerError::Storage("ledger state lock poisoned".to_string()))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerSnapshot>> {
        self.state
            .write()
            .map_err(|_| LedgerError::Storage("ledger state lock poisoned".to_string()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStorage for MemoryStorage {
    async fn load_ledger(&self) -> LedgerResult<LedgerSnapshot> {
        Ok(self.read()?.clone())
    }

    async fn save_ledger(&mut self, snapshot: &LedgerSnapshot) -> LedgerResult<()> {
        *self.write()? = snapshot.clone();
        Ok(())
    }

    async fn get_profiles(&self) -> LedgerResult<Profiles> {
        Ok(self.read()?.profiles.clone())
    }

    async fn save_profile(
        &mut self,
        partner: Partner,
        profile: &MemberProfile,
    ) -> LedgerResult<()> {
        self.write()?.profiles.set(partner, profile.clone());
        Ok(())
    }

    async fn save_expense(&mut self, expense: &Expense) -> LedgerResult<()> {
        let mut state = self.write()?;
        if state.expenses.iter().any(|e| e.id == expense.id) {
            return Err(LedgerError::Storage(format!(
                "Expense '{}' already exists",
                expense.id
            )));
        }
        state.expenses.insert(0, expense.clone());
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> LedgerResult<Option<Expense>> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .find(|e| e.id == expense_id)
            .cloned())
    }

    async fn list_expenses(&self) -> LedgerResult<Vec<Expense>> {
        Ok(self.read()?.expenses.clone())
    }

    async fn update_expense(&mut self, expense: &Expense) -> LedgerResult<()> {
        let mut state = self.write()?;
        match state.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense.clone();
                Ok(())
            }
            None => Err(LedgerError::ExpenseNotFound(expense.id.clone())),
        }
    }

    async fn delete_expense(&mut self, expense_id: &str) -> LedgerResult<()> {
        let mut state = self.write()?;
        let before = state.expenses.len();
        state.expenses.retain(|e| e.id != expense_id);
        if state.expenses.len() == before {
            return Err(LedgerError::ExpenseNotFound(expense_id.to_string()));
        }
        Ok(())
    }

    async fn save_template(&mut self, template: &RecurringTemplate) -> LedgerResult<()> {
        let mut state = self.write()?;
        if state.templates.iter().any(|t| t.id == template.id) {
            return Err(LedgerError::Storage(format!(
                "Recurring template '{}' already exists",
                template.id
            )));
        }
        state.templates.push(template.clone());
        Ok(())
    }

    async fn get_template(&self, template_id: &str) -> LedgerResult<Option<RecurringTemplate>> {
        Ok(self
            .read()?
            .templates
            .iter()
            .find(|t| t.id == template_id)
            .cloned())
    }

    async fn list_templates(&self) -> LedgerResult<Vec<RecurringTemplate>> {
        Ok(self.read()?.templates.clone())
    }

    async fn update_template(&mut self, template: &RecurringTemplate) -> LedgerResult<()> {
        let mut state = self.write()?;
        match state.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => {
                *existing = template.clone();
                Ok(())
            }
            None => Err(LedgerError::TemplateNotFound(template.id.clone())),
        }
    }

    async fn delete_template(&mut self, template_id: &str) -> LedgerResult<()> {
        let mut state = self.write()?;
        let before = state.templates.len();
        state.templates.retain(|t| t.id != template_id);
        if state.templates.len() == before {
            return Err(LedgerError::TemplateNotFound(template_id.to_string()));
        }
        Ok(())
    }

    async fn set_budget(&mut self, category: Category, limit: &BigDecimal) -> LedgerResult<()> {
        self.write()?.budgets.insert(category, limit.clone());
        Ok(())
    }

    async fn get_budgets(&self) -> LedgerResult<HashMap<Category, BigDecimal>> {
        Ok(self.read()?.budgets.clone())
    }
}
