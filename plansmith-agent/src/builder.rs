//! Builder for the orchestrator.

use std::sync::Arc;

use plansmith_core::ModelSettings;
use plansmith_models::ChatModel;
use plansmith_retries::ExponentialBackoff;
use plansmith_tools::CapabilityRegistry;
use thiserror::Error;

use crate::orchestrator::{Orchestrator, DEFAULT_INSTRUCTIONS};

/// Errors from building an orchestrator.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required field was not set.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Builder for [`Orchestrator`].
#[derive(Default)]
pub struct OrchestratorBuilder {
    model: Option<Arc<dyn ChatModel>>,
    instructions: Option<String>,
    registry: Option<CapabilityRegistry>,
    settings: ModelSettings,
    max_capability_rounds: Option<u32>,
    retry: Option<ExponentialBackoff>,
}

impl OrchestratorBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model (required).
    #[must_use]
    pub fn model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the default system instructions.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Set the capability registry.
    #[must_use]
    pub fn registry(mut self, registry: CapabilityRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set model generation settings.
    #[must_use]
    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the capability round cap (default 8).
    #[must_use]
    pub fn max_capability_rounds(mut self, rounds: u32) -> Self {
        self.max_capability_rounds = Some(rounds);
        self
    }

    /// Set the transport retry policy.
    #[must_use]
    pub fn retry(mut self, retry: ExponentialBackoff) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingField`] when no model was set.
    pub fn build(self) -> Result<Orchestrator, BuildError> {
        let model = self.model.ok_or(BuildError::MissingField("model"))?;
        let registry = self.registry.unwrap_or_default();
        let catalog = Arc::new(registry.descriptors());

        Ok(Orchestrator {
            model,
            instructions: self
                .instructions
                .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string()),
            registry,
            settings: self.settings,
            max_capability_rounds: self.max_capability_rounds.unwrap_or(8),
            retry: self.retry.unwrap_or_default(),
            catalog,
        })
    }
}

impl std::fmt::Debug for OrchestratorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorBuilder")
            .field("has_model", &self.model.is_some())
            .field("max_capability_rounds", &self.max_capability_rounds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plansmith_models::MockModel;
    use plansmith_tools::{from_fn, CapabilityDescriptor};

    #[test]
    fn test_missing_model() {
        let err = OrchestratorBuilder::new().build().unwrap_err();
        assert!(matches!(err, BuildError::MissingField("model")));
    }

    #[test]
    fn test_catalog_built_from_registry() {
        let mut registry = CapabilityRegistry::new();
        registry.register(
            CapabilityDescriptor::new("search_plan_docs", "Searches documents"),
            from_fn(|_| async move { Ok("".into()) }),
        );

        let orchestrator = OrchestratorBuilder::new()
            .model(Arc::new(MockModel::new("test")))
            .registry(registry)
            .max_capability_rounds(3)
            .build()
            .unwrap();

        assert_eq!(orchestrator.catalog().len(), 1);
        assert_eq!(orchestrator.catalog()[0].name, "search_plan_docs");
        assert_eq!(orchestrator.max_capability_rounds(), 3);
    }
}
