// Connection check tool

use crate::error::ToolResult;
use crate::protocol::ToolSchema;
use crate::tools::{json_schema_object, Tool};
use odoo_client::OdooClient;
use std::sync::Arc;

/// Verifies credentials and reports the server version
pub struct TestConnectionTool {
    client: Arc<OdooClient>,
}

impl TestConnectionTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for TestConnectionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_test_connection".to_string(),
            description: "Test the Odoo connection and return server version info. Call this first to verify credentials are working.".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
            annotations: None,
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let version = self.client.version().await?;
        let uid = self.client.uid().await?;
        let config = self.client.config();

        Ok(serde_json::json!({
            "status": "connected",
            "uid": uid,
            "server_version": version.get("server_version").cloned().unwrap_or_default(),
            "url": config.base_url.as_str(),
            "database": config.database,
        }))
    }
}
