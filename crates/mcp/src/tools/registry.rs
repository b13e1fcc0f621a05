// Tool trait, registry and schema helpers

use crate::error::{ToolError, ToolResult};
use crate::protocol::{CallToolResult, ToolAnnotations, ToolSchema};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema, without annotations
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    ///
    /// Missing arguments arrive as an empty object.
    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value>;

    /// What the tool does to remote data
    fn tier(&self) -> ToolTier {
        ToolTier::Read
    }
}

/// Effect of a tool on remote data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolTier {
    /// Read-only operations
    Read,
    /// Creates or updates records
    Write,
    /// Deletes records
    Destructive,
}

impl ToolTier {
    pub fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations {
            read_only_hint: *self == ToolTier::Read,
            destructive_hint: *self == ToolTier::Destructive,
        }
    }
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|t| {
                let mut schema = t.schema();
                schema.annotations = Some(t.tier().annotations());
                schema
            })
            .collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool and format its outcome for the client.
    ///
    /// Returns `None` for unknown tools. Tool errors become `isError` results.
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> Option<CallToolResult> {
        let tool = self.get(name)?;
        let arguments = if arguments.is_null() {
            serde_json::json!({})
        } else {
            arguments
        };

        debug!(tool = name, "Tool call");
        let result = match tool.execute(arguments).await {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => CallToolResult::text(text),
                Err(e) => CallToolResult::error(e.to_string()),
            },
            Err(err) => {
                warn!(tool = name, error = %err, "Tool call failed");
                CallToolResult::error(err.to_string())
            }
        };
        Some(result)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize tool arguments, mapping failures to `InvalidArgument`.
pub fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: serde_json::Value) -> ToolResult<T> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::invalid(format!("invalid arguments for {}: {}", tool, e)))
}

/// Reject empty or whitespace-only required text.
pub fn require_text(field: &str, value: &str) -> ToolResult<()> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid(format!("`{}` must not be empty", field)));
    }
    Ok(())
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: serde_json::Value, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    struct EchoTool;

    #[derive(Deserialize)]
    struct EchoArgs {
        message: String,
    }

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".to_string(),
                description: "Echo a message".to_string(),
                input_schema: json_schema_object(
                    json!({"message": json_schema_string("Text to echo")}),
                    vec!["message"],
                ),
                annotations: None,
            }
        }

        async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
            let args: EchoArgs = parse_arguments("echo", arguments)?;
            require_text("message", &args.message)?;
            Ok(json!({"echo": args.message}))
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry
    }

    #[tokio::test]
    async fn test_call_formats_success_as_pretty_json() {
        let result = registry().call("echo", json!({"message": "hi"})).await.unwrap();

        assert!(result.is_error.is_none());
        assert_eq!(result.text_content(), "{\n  \"echo\": \"hi\"\n}");
    }

    #[tokio::test]
    async fn test_missing_argument_is_reported_not_raised() {
        let result = registry().call("echo", serde_json::Value::Null).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        let text = result.text_content();
        assert!(text.starts_with("Error: Invalid argument: invalid arguments for echo"));
        assert!(text.contains("missing field `message`"));
    }

    #[tokio::test]
    async fn test_blank_argument_is_invalid() {
        let result = registry().call("echo", json!({"message": "  "})).await.unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(result.text_content().contains("`message` must not be empty"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        assert!(registry().call("nope", json!({})).await.is_none());
    }

    #[test]
    fn test_list_schemas_adds_annotations() {
        let registry = registry();
        let schemas = registry.list_schemas();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("echo"));
        assert_eq!(
            schemas[0].annotations,
            Some(ToolAnnotations {
                read_only_hint: true,
                destructive_hint: false
            })
        );
    }

    #[test]
    fn test_tier_annotations() {
        assert!(ToolTier::Destructive.annotations().destructive_hint);
        assert!(!ToolTier::Write.annotations().read_only_hint);
        assert!(ToolTier::Read < ToolTier::Write);
    }
}
