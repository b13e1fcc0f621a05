// User lookup tool

use crate::error::ToolResult;
use crate::protocol::ToolSchema;
use crate::tools::{json_schema_integer, json_schema_object, json_schema_string, parse_arguments, Tool};
use odoo_client::OdooClient;
use serde::Deserialize;
use std::sync::Arc;

/// Tool to search internal users
pub struct SearchUsersTool {
    client: Arc<OdooClient>,
}

impl SearchUsersTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct SearchUsersArgs {
    #[serde(default)]
    query: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    20
}

#[async_trait::async_trait]
impl Tool for SearchUsersTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_search_users".to_string(),
            description: "Search internal Odoo users by name or email. Use this to find user IDs before assigning tasks.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("Search term matched against name or email. Leave empty to list all internal users"),
                    "limit": json_schema_integer("Maximum number of users to return (default: 20)")
                }),
                vec![],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: SearchUsersArgs = parse_arguments("odoo_search_users", arguments)?;
        let users = self.client.users().search(&args.query, args.limit).await?;
        Ok(serde_json::Value::Array(users))
    }
}
