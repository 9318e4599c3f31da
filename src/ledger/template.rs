//! Recurring template management

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::DefaultEntryValidator;

/// Template manager for handling recurring template operations
pub struct TemplateManager<S: LedgerStorage> {
    storage: S,
    validator: Arc<dyn EntryValidator>,
}

impl<S: LedgerStorage> TemplateManager<S> {
    /// Create a new template manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Arc::new(DefaultEntryValidator),
        }
    }

    /// Create a new template manager with custom validator
    pub fn with_validator(storage: S, validator: Arc<dyn EntryValidator>) -> Self {
        Self { storage, validator }
    }

    /// Run the configured validator against a template
    pub fn validate(&self, template: &RecurringTemplate) -> LedgerResult<()> {
        self.validator.validate_template(template)
    }

    /// Add a new recurring template
    pub async fn add_template(
        &mut self,
        template: RecurringTemplate,
    ) -> LedgerResult<RecurringTemplate> {
        self.validator.validate_template(&template)?;

        if self.storage.get_template(&template.id).await?.is_some() {
            return Err(LedgerError::Validation(format!(
                "Recurring template with ID '{}' already exists",
                template.id
            )));
        }

        self.storage.save_template(&template).await?;
        Ok(template)
    }

    /// Get a template by ID
    pub async fn get_template(&self, template_id: &str) -> LedgerResult<Option<RecurringTemplate>> {
        self.storage.get_template(template_id).await
    }

    /// Get a template by ID, returning an error if not found
    pub async fn get_template_required(
        &self,
        template_id: &str,
    ) -> LedgerResult<RecurringTemplate> {
        self.storage
            .get_template(template_id)
            .await?
            .ok_or_else(|| LedgerError::TemplateNotFound(template_id.to_string()))
    }

    /// List all templates
    pub async fn list_templates(&self) -> LedgerResult<Vec<RecurringTemplate>> {
        self.storage.list_templates().await
    }

    /// Replace an existing template
    pub async fn update_template(&mut self, template: &RecurringTemplate) -> LedgerResult<()> {
        self.get_template_required(&template.id).await?;
        self.validator.validate_template(template)?;
        self.storage.update_template(template).await
    }

    /// Pause or resume a template
    pub async fn set_active(
        &mut self,
        template_id: &str,
        is_active: bool,
    ) -> LedgerResult<RecurringTemplate> {
        let mut template = self.get_template_required(template_id).await?;
        template.is_active = is_active;
        self.storage.update_template(&template).await?;
        Ok(template)
    }

    /// Delete a template; expenses it already produced stay
    pub async fn delete_template(&mut self, template_id: &str) -> LedgerResult<()> {
        self.get_template_required(template_id).await?;
        self.storage.delete_template(template_id).await
    }
}

/// Builder for validated recurring templates
#[derive(Debug)]
pub struct TemplateBuilder {
    template: RecurringTemplate,
    custom_percent: Option<u8>,
}

impl TemplateBuilder {
    /// Start an even-split template that is due immediately
    pub fn new(
        description: String,
        amount: BigDecimal,
        paid_by: Partner,
        frequency: Frequency,
    ) -> Self {
        Self {
            template: RecurringTemplate {
                id: Uuid::new_v4().to_string(),
                description,
                amount,
                paid_by,
                split: SplitRule::Even,
                category: Category::Rent,
                frequency,
                next_due_date: Utc::now(),
                is_active: true,
            },
            custom_percent: None,
        }
    }

    pub fn id(mut self, id: String) -> Self {
        self.template.id = id;
        self
    }

    pub fn split(mut self, split: SplitRule) -> Self {
        self.template.split = split;
        self.custom_percent = None;
        self
    }

    pub fn custom_split(mut self, percent: u8) -> Self {
        self.custom_percent = Some(percent);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.template.category = category;
        self
    }

    pub fn next_due(mut self, next_due_date: DateTime<Utc>) -> Self {
        self.template.next_due_date = next_due_date;
        self
    }

    /// Create the template paused
    pub fn paused(mut self) -> Self {
        self.template.is_active = false;
        self
    }

    pub fn build(mut self) -> LedgerResult<RecurringTemplate> {
        if let Some(percent) = self.custom_percent {
            self.template.split = SplitRule::Custom(SplitPercent::new(percent)?);
        }
        DefaultEntryValidator.validate_template(&self.template)?;
        Ok(self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    fn rent() -> RecurringTemplate {
        TemplateBuilder::new(
            "Rent".to_string(),
            BigDecimal::from(1400),
            Partner::A,
            Frequency::Monthly,
        )
        .id("rent".to_string())
        .split(SplitRule::Income)
        .build()
        .unwrap()
    }

    #[test]
    fn test_builder_rejects_empty_description() {
        let result = TemplateBuilder::new(
            String::new(),
            BigDecimal::from(10),
            Partner::A,
            Frequency::Weekly,
        )
        .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_template_lifecycle() {
        let mut manager = TemplateManager::new(MemoryStorage::new());
        manager.add_template(rent()).await.unwrap();
        assert!(manager.add_template(rent()).await.is_err());

        let paused = manager.set_active("rent", false).await.unwrap();
        assert!(!paused.is_active);

        let mut edited = manager.get_template_required("rent").await.unwrap();
        edited.amount = BigDecimal::from(1450);
        manager.update_template(&edited).await.unwrap();
        assert_eq!(
            manager.get_template_required("rent").await.unwrap().amount,
            BigDecimal::from(1450)
        );

        manager.delete_template("rent").await.unwrap();
        assert!(manager.list_templates().await.unwrap().is_empty());
        assert!(matches!(
            manager.delete_template("rent").await,
            Err(LedgerError::TemplateNotFound(_))
        ));
    }
}
