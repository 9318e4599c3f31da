//! Expense filtering, category totals and budget tracking

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::*;

/// Criteria for narrowing an expense list; empty criteria match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Inclusive lower bound on the expense date
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the expense date
    pub end: Option<DateTime<Utc>>,
    pub category: Option<Category>,
    /// Case-insensitive text matched against description, category and amount
    pub query: Option<String>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(start) = self.start {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if expense.date > end {
                return false;
            }
        }
        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }

        match self.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                expense.description.to_lowercase().contains(&query)
                    || expense.category.as_str().to_lowercase().contains(&query)
                    || expense.amount.to_string().contains(&query)
            }
            _ => true,
        }
    }

    /// Keep matching expenses, preserving order
    pub fn apply<'a, I>(&self, expenses: I) -> Vec<Expense>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        expenses
            .into_iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

/// Sum of expense amounts per category; categories without expenses are zero
pub fn totals_by_category(expenses: &[Expense]) -> BTreeMap<Category, BigDecimal> {
    let mut totals: BTreeMap<Category, BigDecimal> = Category::ALL
        .iter()
        .map(|c| (*c, BigDecimal::from(0)))
        .collect();

    for expense in expenses {
        if let Some(total) = totals.get_mut(&expense.category) {
            *total += &expense.amount;
        }
    }

    totals
}

/// Spending against one category's budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: BigDecimal,
    pub spent: BigDecimal,
    /// Negative once the budget is exceeded
    pub remaining: BigDecimal,
    pub over_budget: bool,
}

/// Compare category spending with the configured budgets
///
/// Only categories with a budget appear in the result.
pub fn budget_status(
    expenses: &[Expense],
    budgets: &HashMap<Category, BigDecimal>,
) -> Vec<BudgetStatus> {
    let totals = totals_by_category(expenses);

    let mut statuses: Vec<BudgetStatus> = budgets
        .iter()
        .map(|(category, limit)| {
            let spent = totals
                .get(category)
                .cloned()
                .unwrap_or_else(|| BigDecimal::from(0));
            let remaining = limit - &spent;
            BudgetStatus {
                category: *category,
                limit: limit.clone(),
                over_budget: spent > *limit,
                spent,
                remaining,
            }
        })
        .collect();

    statuses.sort_by_key(|s| s.category);
    statuses
}
