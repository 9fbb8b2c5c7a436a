//! JSON Schema types for capability parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

/// JSON Schema for an object type, used for capability parameters.
///
/// Property order is preserved so the catalog sent to the model is stable
/// across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectJsonSchema {
    /// The schema type (always `"object"`).
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Property definitions, in declaration order.
    pub properties: IndexMap<String, JsonValue>,

    /// Names of required properties.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    /// Optional schema description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectJsonSchema {
    /// Create a new empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
            description: None,
        }
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, name: &str, schema: JsonValue, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required && !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Check whether a property is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Number of properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl Default for ObjectJsonSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectJsonSchema> for JsonValue {
    fn from(schema: ObjectJsonSchema) -> Self {
        serde_json::to_value(schema).unwrap_or(JsonValue::Null)
    }
}

/// Fluent builder for common parameter schemas.
///
/// ```rust
/// use plansmith_tools::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .string("plan_name", "Name of the plan", true)
///     .string("plan_info", "Information about the plan", true)
///     .build();
/// assert_eq!(schema.property_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: ObjectJsonSchema,
}

impl SchemaBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: ObjectJsonSchema::new(),
        }
    }

    /// Add a string property.
    #[must_use]
    pub fn string(mut self, name: &str, description: &str, required: bool) -> Self {
        self.schema = self.schema.with_property(
            name,
            json!({"type": "string", "description": description}),
            required,
        );
        self
    }

    /// Add a boolean property.
    #[must_use]
    pub fn boolean(mut self, name: &str, description: &str, required: bool) -> Self {
        self.schema = self.schema.with_property(
            name,
            json!({"type": "boolean", "description": description}),
            required,
        );
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ObjectJsonSchema {
        self.schema
    }
}
