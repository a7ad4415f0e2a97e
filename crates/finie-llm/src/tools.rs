//! Tool definition types for LLM tool use

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition advertised to the LLM
///
/// Describes a tool the model may invoke: its name, what it does, and a
/// JSON-Schema description of its input parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the tool in the registry)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Helpers for building tool input schemas
pub mod schema {
    use serde_json::{Value, json};

    /// Object schema with properties and a required list
    pub fn object(properties: Value, required: Vec<&str>) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// String property schema
    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// Integer property schema
    pub fn integer(description: &str) -> Value {
        json!({
            "type": "integer",
            "description": description,
        })
    }

    /// Boolean property schema
    pub fn boolean(description: &str) -> Value {
        json!({
            "type": "boolean",
            "description": description,
        })
    }

    /// Array property schema
    pub fn array(description: &str, items: Value) -> Value {
        json!({
            "type": "array",
            "description": description,
            "items": items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_creation() {
        let schema = schema::object(
            json!({
                "symbol": schema::string("Stock ticker symbol"),
            }),
            vec!["symbol"],
        );

        let tool = ToolDefinition::new("stock_price", "Fetch price data", schema.clone());
        assert_eq!(tool.name, "stock_price");
        assert_eq!(tool.description, "Fetch price data");
        assert_eq!(tool.input_schema, schema);
    }

    #[test]
    fn test_schema_builders() {
        let str_schema = schema::string("test");
        assert_eq!(str_schema["type"], "string");

        let int_schema = schema::integer("count");
        assert_eq!(int_schema["type"], "integer");

        let bool_schema = schema::boolean("flag");
        assert_eq!(bool_schema["type"], "boolean");

        let arr_schema = schema::array("symbols", schema::string("ticker"));
        assert_eq!(arr_schema["type"], "array");
    }
}
