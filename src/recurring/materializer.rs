//! Turns due recurring templates into concrete expenses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::*;

/// How far an overdue template is advanced in a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchUpPolicy {
    /// One expense and one period per run, however overdue the template is.
    /// A template still overdue afterwards is picked up again next run.
    #[default]
    SingleStep,
    /// Keep materializing until the due date is in the future
    Full,
}

/// Recurring materializer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializerConfig {
    pub catch_up: CatchUpPolicy,
    /// Upper bound on periods a single template may advance in one run
    /// under [`CatchUpPolicy::Full`]
    pub max_periods_per_run: u32,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            catch_up: CatchUpPolicy::SingleStep,
            max_periods_per_run: 366,
        }
    }
}

/// Output of one materialization run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterializationBatch {
    /// Freshly created expenses, in template order
    pub new_expenses: Vec<Expense>,
    /// Templates whose due date moved
    pub updated_templates: Vec<RecurringTemplate>,
}

impl MaterializationBatch {
    pub fn is_empty(&self) -> bool {
        self.new_expenses.is_empty()
    }

    /// Aggregate notice for the whole batch, if anything was added
    pub fn notification(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(format!(
                "Added {} recurring expense(s)",
                self.new_expenses.len()
            ))
        }
    }
}

/// Recurring expense materializer
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    config: MaterializerConfig,
}

impl Materializer {
    pub fn new(config: MaterializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaterializerConfig {
        &self.config
    }

    /// Materialize every template due at `now`
    ///
    /// New expenses are stamped with `now`, not with the due date they
    /// cover. Templates that are paused or not yet due are left untouched.
    pub fn materialize(
        &self,
        templates: &[RecurringTemplate],
        now: DateTime<Utc>,
    ) -> LedgerResult<MaterializationBatch> {
        let mut batch = MaterializationBatch::default();
        let max_periods = self.config.max_periods_per_run.max(1);

        for template in templates.iter().filter(|t| t.is_due(now)) {
            let mut advanced = template.clone();
            let mut periods = 0u32;

            loop {
                batch
                    .new_expenses
                    .push(advanced.instantiate(Uuid::new_v4().to_string(), now));
                advanced.next_due_date = advanced.frequency.advance(advanced.next_due_date)?;
                periods += 1;

                if self.config.catch_up == CatchUpPolicy::SingleStep || !advanced.is_due(now) {
                    break;
                }
                if periods >= max_periods {
                    tracing::warn!(
                        template_id = %advanced.id,
                        periods,
                        next_due_date = %advanced.next_due_date,
                        "recurring template still overdue after catch-up limit"
                    );
                    break;
                }
            }

            tracing::debug!(
                template_id = %advanced.id,
                periods,
                next_due_date = %advanced.next_due_date,
                "materialized recurring template"
            );
            batch.updated_templates.push(advanced);
        }

        Ok(batch)
    }
}

/// Materialize due templates with the default single-step policy
pub fn materialize_due(
    templates: &[RecurringTemplate],
    now: DateTime<Utc>,
) -> LedgerResult<MaterializationBatch> {
    Materializer::default().materialize(templates, now)
}
