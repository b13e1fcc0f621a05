// Tag listing tool

use crate::error::ToolResult;
use crate::protocol::ToolSchema;
use crate::tools::{json_schema_object, Tool};
use odoo_client::OdooClient;
use std::sync::Arc;

/// Tool to list project tags
pub struct ListTagsTool {
    client: Arc<OdooClient>,
}

impl ListTagsTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListTagsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_list_tags".to_string(),
            description: "List all existing project tags. Useful to reuse tags before creating tasks.".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
            annotations: None,
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let tags = self.client.tags().list().await?;
        Ok(serde_json::Value::Array(tags))
    }
}
