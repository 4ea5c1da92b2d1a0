//! Builder for tool JSON Schema definitions.

use quire_core::tools::{Tool, ToolParameterSchema};
use serde_json::Value;

/// Fluent builder for [`Tool`] schemas.
///
/// ```ignore
/// ToolSchemaBuilder::new("read_file", "Read a notebook file")
///     .required_property("path", json!({"type": "string", "description": "Relative path"}))
///     .build()
/// ```
pub struct ToolSchemaBuilder {
    name: String,
    description: String,
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
}

impl ToolSchemaBuilder {
    /// Create a new builder with the given tool name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional property.
    #[must_use]
    pub fn property(mut self, name: &str, schema: Value) -> Self {
        let _ = self.properties.insert(name.into(), schema);
        self
    }

    /// Add a required property.
    #[must_use]
    pub fn required_property(mut self, name: &str, schema: Value) -> Self {
        let _ = self.properties.insert(name.into(), schema);
        self.required.push(name.into());
        self
    }

    /// Build the final [`Tool`] definition.
    pub fn build(self) -> Tool {
        Tool {
            name: self.name,
            description: self.description,
            parameters: ToolParameterSchema {
                schema_type: "object".into(),
                properties: (!self.properties.is_empty()).then_some(self.properties),
                required: (!self.required.is_empty()).then_some(self.required),
            },
        }
    }
}
