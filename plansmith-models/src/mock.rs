//! Scripted models for testing.
//!
//! - [`MockModel`]: returns a pre-configured queue of responses
//! - [`FunctionModel`]: computes responses from the observed history
//!
//! Both record the requests they receive so tests can assert on the exact
//! history the orchestrator submitted.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use plansmith_core::{ConversationHistory, ModelResponse, ModelSettings};

use crate::error::ModelError;
use crate::model::{ChatModel, RequestParameters};

// ============================================================================
// MockModel - scripted response queue
// ============================================================================

/// A mock model returning scripted responses in order.
///
/// When the queue is exhausted, further requests fail, which makes a test
/// that loops more than its script immediately visible.
#[derive(Debug, Clone)]
pub struct MockModel {
    name: String,
    responses: Arc<Mutex<Vec<ModelResponse>>>,
    requests: Arc<Mutex<Vec<ConversationHistory>>>,
}

impl MockModel {
    /// Create a new mock model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response.
    #[must_use]
    pub fn with_response(self, response: ModelResponse) -> Self {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push(response);
        self
    }

    /// Queue a plain text response.
    #[must_use]
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        let name = self.name.clone();
        self.with_response(ModelResponse::text(text).with_model_name(name))
    }

    /// Queue a capability invocation response.
    #[must_use]
    pub fn with_tool_call(self, tool_name: impl Into<String>, args: serde_json::Value) -> Self {
        self.with_response(ModelResponse::tool_call(tool_name, args))
    }

    /// The histories this model has received, in order.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<ConversationHistory> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> &str {
        "mock"
    }

    async fn request(
        &self,
        history: &ConversationHistory,
        _settings: &ModelSettings,
        _params: &RequestParameters,
    ) -> Result<ModelResponse, ModelError> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(history.clone());

        let mut responses = self.responses.lock().expect("mock response queue poisoned");
        if responses.is_empty() {
            Err(ModelError::api("mock response queue exhausted"))
        } else {
            Ok(responses.remove(0))
        }
    }
}

// ============================================================================
// FunctionModel - history-driven scripting
// ============================================================================

/// Callback type driving a [`FunctionModel`].
pub type ResponseFn =
    Box<dyn Fn(&ConversationHistory, &ModelSettings) -> ModelResponse + Send + Sync>;

/// A model whose responses are computed by a local function.
///
/// More flexible than [`MockModel`]: the function sees the full submitted
/// history, so it can branch on capability results the orchestrator fed
/// back. The validation-gate tests depend on this.
pub struct FunctionModel {
    name: String,
    function: Arc<ResponseFn>,
}

impl std::fmt::Debug for FunctionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionModel")
            .field("name", &self.name)
            .finish()
    }
}

impl Clone for FunctionModel {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            function: Arc::clone(&self.function),
        }
    }
}

impl FunctionModel {
    /// Create a new function model.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&ConversationHistory, &ModelSettings) -> ModelResponse + Send + Sync + 'static,
    {
        Self {
            name: "function-model".to_string(),
            function: Arc::new(Box::new(function)),
        }
    }

    /// Set a custom model name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// A model that always returns the same text.
    pub fn constant_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_, _| ModelResponse::text(text.clone()))
    }

    /// A model that echoes the last user prompt.
    pub fn echo() -> Self {
        Self::new(|history, _| {
            let last = history
                .messages()
                .iter()
                .rev()
                .flat_map(|m| m.user_prompts().collect::<Vec<_>>())
                .map(|p| p.content.clone())
                .next()
                .unwrap_or_else(|| "no user message".to_string());
            ModelResponse::text(format!("Echo: {last}"))
        })
    }
}

#[async_trait]
impl ChatModel for FunctionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> &str {
        "function"
    }

    async fn request(
        &self,
        history: &ConversationHistory,
        settings: &ModelSettings,
        _params: &RequestParameters,
    ) -> Result<ModelResponse, ModelError> {
        Ok((self.function)(history, settings))
    }
}
