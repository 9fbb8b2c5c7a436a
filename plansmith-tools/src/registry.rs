//! The capability registry and handler contract.
//!
//! The registry is built once at startup and never mutated afterwards; the
//! orchestrator resolves the model's invocation requests against it by
//! exact-name lookup.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::descriptor::CapabilityDescriptor;
use crate::errors::ToolError;

/// The plain-text result of a capability invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityOutput {
    /// Result text fed back to the model as a tool message.
    pub content: String,
}

impl CapabilityOutput {
    /// Create a new output.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl From<String> for CapabilityOutput {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl From<&str> for CapabilityOutput {
    fn from(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

/// Contract implemented by every capability invoker.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Invoke the capability with the model-supplied arguments.
    async fn invoke(&self, args: JsonValue) -> Result<CapabilityOutput, ToolError>;
}

/// Adapt an async closure into a [`CapabilityHandler`].
///
/// Useful for tests and small inline capabilities.
pub fn from_fn<F, Fut>(f: F) -> Arc<dyn CapabilityHandler>
where
    F: Fn(JsonValue) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CapabilityOutput, ToolError>> + Send + 'static,
{
    struct FnHandler<F>(F);

    #[async_trait]
    impl<F, Fut> CapabilityHandler for FnHandler<F>
    where
        F: Fn(JsonValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CapabilityOutput, ToolError>> + Send + 'static,
    {
        async fn invoke(&self, args: JsonValue) -> Result<CapabilityOutput, ToolError> {
            (self.0)(args).await
        }
    }

    Arc::new(FnHandler(f))
}

/// Registry mapping capability names to descriptors and handlers.
///
/// Registration order is preserved so the catalog sent to the model is
/// deterministic.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: IndexMap<String, (CapabilityDescriptor, Arc<dyn CapabilityHandler>)>,
}

impl CapabilityRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability.
    ///
    /// # Panics
    ///
    /// Panics if a capability with the same name is already registered;
    /// duplicate names are a programming error caught at startup.
    pub fn register(
        &mut self,
        descriptor: CapabilityDescriptor,
        handler: Arc<dyn CapabilityHandler>,
    ) -> &mut Self {
        let name = descriptor.name.clone();
        assert!(
            !self.entries.contains_key(&name),
            "capability '{name}' is already registered"
        );
        self.entries.insert(name, (descriptor, handler));
        self
    }

    /// All descriptors, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<CapabilityDescriptor> {
        self.entries.values().map(|(d, _)| d.clone()).collect()
    }

    /// Invoke a capability by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] when no capability with the given
    /// name is registered, and whatever the handler returns otherwise.
    pub async fn call(&self, name: &str, args: JsonValue) -> Result<CapabilityOutput, ToolError> {
        let (_, handler) = self
            .entries
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;
        handler.invoke(args).await
    }

    /// Check whether a capability exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_registry() -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        registry.register(
            CapabilityDescriptor::new("echo", "Echo the input"),
            from_fn(|args| async move {
                let text = args["text"].as_str().unwrap_or_default().to_string();
                Ok(CapabilityOutput::new(text))
            }),
        );
        registry
    }

    #[tokio::test]
    async fn test_call_by_name() {
        let registry = echo_registry();
        let out = registry
            .call("echo", serde_json::json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(out.content, "hi");
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let registry = echo_registry();
        let err = registry
            .call("missing", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_descriptors_in_registration_order() {
        let mut registry = echo_registry();
        registry.register(
            CapabilityDescriptor::new("second", "Another"),
            from_fn(|_| async move { Ok(CapabilityOutput::new("")) }),
        );

        let names: Vec<_> = registry.descriptors().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["echo", "second"]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = echo_registry();
        registry.register(
            CapabilityDescriptor::new("echo", "Duplicate"),
            from_fn(|_| async move { Ok(CapabilityOutput::new("")) }),
        );
    }
}
