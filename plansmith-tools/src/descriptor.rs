//! Capability descriptors sent to the model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::schema::ObjectJsonSchema;

/// A named, described capability the model may invoke.
///
/// Descriptors are registered once at startup and are immutable for the
/// session lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Capability name; the model invokes by exact name.
    pub name: String,

    /// Natural-language description shown to the model.
    pub description: String,

    /// JSON Schema for the capability's arguments.
    pub parameters: ObjectJsonSchema,
}

impl CapabilityDescriptor {
    /// Create a new descriptor with an empty parameter schema.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ObjectJsonSchema::new(),
        }
    }

    /// Set the parameter schema.
    #[must_use]
    pub fn with_parameters(mut self, parameters: ObjectJsonSchema) -> Self {
        self.parameters = parameters;
        self
    }

    /// Convert to the OpenAI chat-completions function format.
    #[must_use]
    pub fn to_openai_function(&self) -> JsonValue {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": JsonValue::from(self.parameters.clone()),
            }
        })
    }
}
