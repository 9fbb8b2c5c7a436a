//! The chat model trait.

use std::sync::Arc;

use async_trait::async_trait;
use plansmith_core::{ConversationHistory, ModelResponse, ModelSettings};
use plansmith_tools::CapabilityDescriptor;

use crate::error::ModelError;

/// How the model may use the capability catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolChoice {
    /// Model decides whether to invoke capabilities.
    #[default]
    Auto,
    /// Model must invoke at least one capability.
    Required,
    /// Model must not invoke any capability.
    None,
}

/// Per-request parameters beyond generation settings.
#[derive(Debug, Clone, Default)]
pub struct RequestParameters {
    /// Capability catalog for this request. Arc'd because the same catalog
    /// is resubmitted every round of a turn.
    pub capabilities: Arc<Vec<CapabilityDescriptor>>,
    /// Tool choice strategy.
    pub tool_choice: ToolChoice,
}

impl RequestParameters {
    /// Create new empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capability catalog.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<CapabilityDescriptor>) -> Self {
        self.capabilities = Arc::new(capabilities);
        self
    }

    /// Set the capability catalog from a shared Arc.
    #[must_use]
    pub fn with_capabilities_arc(mut self, capabilities: Arc<Vec<CapabilityDescriptor>>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the tool choice strategy.
    #[must_use]
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }
}

/// Interface to a hosted chat model.
///
/// One blocking round trip per call: the full ordered history plus the
/// capability catalog go out, and either a final text or capability
/// invocation requests come back.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model (deployment) name.
    fn name(&self) -> &str;

    /// The hosting provider ("azure", "mock", ...).
    fn provider(&self) -> &str;

    /// Full identifier, `provider:name`.
    fn identifier(&self) -> String {
        format!("{}:{}", self.provider(), self.name())
    }

    /// Submit the history and wait for the model's reply.
    async fn request(
        &self,
        history: &ConversationHistory,
        settings: &ModelSettings,
        params: &RequestParameters,
    ) -> Result<ModelResponse, ModelError>;
}

/// Shared handle to a model for dynamic dispatch.
pub type BoxedModel = Arc<dyn ChatModel>;
