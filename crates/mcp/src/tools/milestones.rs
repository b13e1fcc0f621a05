// Milestone tools

use crate::error::ToolResult;
use crate::protocol::ToolSchema;
use crate::tools::{
    json_schema_integer, json_schema_object, json_schema_string, parse_arguments, require_text,
    Tool, ToolTier,
};
use odoo_client::{NewMilestone, OdooClient};
use serde::Deserialize;
use std::sync::Arc;

/// Tool to create a milestone
pub struct CreateMilestoneTool {
    client: Arc<OdooClient>,
}

impl CreateMilestoneTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateMilestoneArgs {
    project_id: i64,
    name: String,
    #[serde(default)]
    deadline: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CreateMilestoneTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_create_milestone".to_string(),
            description: "Create a project milestone. Milestones group tasks into phases or releases.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The project ID"),
                    "name": json_schema_string("Milestone name (e.g. \"Phase 1 - MVP\")"),
                    "deadline": json_schema_string("Optional deadline in 'YYYY-MM-DD' format")
                }),
                vec!["project_id", "name"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: CreateMilestoneArgs = parse_arguments("odoo_create_milestone", arguments)?;
        require_text("name", &args.name)?;

        let milestone = NewMilestone {
            project_id: args.project_id,
            name: args.name,
            deadline: args.deadline,
        };
        let id = self.client.milestones().create(&milestone).await?;

        Ok(serde_json::json!({
            "id": id,
            "name": milestone.name,
            "project_id": milestone.project_id,
        }))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to list the milestones of a project
pub struct ListMilestonesTool {
    client: Arc<OdooClient>,
}

impl ListMilestonesTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListMilestonesArgs {
    project_id: i64,
}

#[async_trait::async_trait]
impl Tool for ListMilestonesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_list_milestones".to_string(),
            description: "List the milestones of a project, earliest deadline first.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The project ID")
                }),
                vec!["project_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: ListMilestonesArgs = parse_arguments("odoo_list_milestones", arguments)?;
        let milestones = self.client.milestones().list(args.project_id).await?;
        Ok(serde_json::Value::Array(milestones))
    }
}
