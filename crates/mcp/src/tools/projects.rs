// Project tools: list, create, update and stages

use crate::error::{ToolError, ToolResult};
use crate::protocol::ToolSchema;
use crate::tools::{
    json_schema_array, json_schema_boolean, json_schema_integer, json_schema_object,
    json_schema_string, parse_arguments, require_text, Tool, ToolTier,
};
use odoo_client::{NewProject, OdooClient, ProjectUpdate};
use serde::Deserialize;
use std::sync::Arc;

/// Tool to list projects
pub struct ListProjectsTool {
    client: Arc<OdooClient>,
}

impl ListProjectsTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListProjectsArgs {
    #[serde(default = "default_true")]
    active_only: bool,
}

fn default_true() -> bool {
    true
}

#[async_trait::async_trait]
impl Tool for ListProjectsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_list_projects".to_string(),
            description: "List projects in Odoo with id, name, manager and task count. Use this to find the right project_id before creating tasks.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "active_only": json_schema_boolean("Only return active (non-archived) projects (default: true)")
                }),
                vec![],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: ListProjectsArgs = parse_arguments("odoo_list_projects", arguments)?;
        let projects = self.client.projects().list(args.active_only).await?;
        Ok(serde_json::Value::Array(projects))
    }
}

/// Tool to create a project
pub struct CreateProjectTool {
    client: Arc<OdooClient>,
}

impl CreateProjectTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateProjectArgs {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    partner_id: Option<i64>,
    #[serde(default)]
    tag_names: Vec<String>,
}

#[async_trait::async_trait]
impl Tool for CreateProjectTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_create_project".to_string(),
            description: "Create a new project. Returns the new project id.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string("Project name"),
                    "description": json_schema_string("Project description (HTML ok)"),
                    "user_id": json_schema_integer("Project manager user ID (see odoo_search_users)"),
                    "partner_id": json_schema_integer("Customer (res.partner) ID"),
                    "tag_names": json_schema_array(
                        json_schema_string("Tag name"),
                        "Tag names; missing tags are created"
                    )
                }),
                vec!["name"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: CreateProjectArgs = parse_arguments("odoo_create_project", arguments)?;
        require_text("name", &args.name)?;

        let tag_ids = self.client.tags().find_or_create(&args.tag_names).await?;
        let project = NewProject {
            name: args.name,
            description: args.description,
            user_id: args.user_id,
            partner_id: args.partner_id,
            tag_ids,
        };
        let id = self.client.projects().create(&project).await?;

        Ok(serde_json::json!({"id": id, "name": project.name}))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to update a project
pub struct UpdateProjectTool {
    client: Arc<OdooClient>,
}

impl UpdateProjectTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateProjectArgs {
    project_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    partner_id: Option<i64>,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    tag_names: Option<Vec<String>>,
}

#[async_trait::async_trait]
impl Tool for UpdateProjectTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_update_project".to_string(),
            description: "Update an existing project. Only the fields you provide are changed; set active=false to archive.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The project ID to update"),
                    "name": json_schema_string("New project name"),
                    "description": json_schema_string("New description (HTML ok)"),
                    "user_id": json_schema_integer("New project manager user ID"),
                    "partner_id": json_schema_integer("New customer ID"),
                    "active": json_schema_boolean("false archives the project, true restores it"),
                    "tag_names": json_schema_array(
                        json_schema_string("Tag name"),
                        "Replace tags with these (created if needed)"
                    )
                }),
                vec!["project_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: UpdateProjectArgs = parse_arguments("odoo_update_project", arguments)?;

        let mut update = ProjectUpdate {
            name: args.name,
            description: args.description,
            user_id: args.user_id,
            partner_id: args.partner_id,
            active: args.active,
            tag_ids: None,
        };
        if update.is_empty() && args.tag_names.is_none() {
            return Err(ToolError::invalid("no fields provided to update"));
        }
        if let Some(names) = &args.tag_names {
            update.tag_ids = Some(self.client.tags().find_or_create(names).await?);
        }

        let fields_changed: Vec<String> = update.to_values().keys().cloned().collect();
        let updated = self.client.projects().update(args.project_id, &update).await?;

        Ok(serde_json::json!({
            "updated": updated,
            "project_id": args.project_id,
            "fields_changed": fields_changed,
        }))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to get the kanban stages of a project
pub struct GetProjectStagesTool {
    client: Arc<OdooClient>,
}

impl GetProjectStagesTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct GetProjectStagesArgs {
    project_id: i64,
}

#[async_trait::async_trait]
impl Tool for GetProjectStagesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_get_project_stages".to_string(),
            description: "Get the kanban stages (columns) of a project with id, name and sequence. Use this to set the right stage_id on tasks.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The Odoo project ID")
                }),
                vec!["project_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: GetProjectStagesArgs = parse_arguments("odoo_get_project_stages", arguments)?;
        let stages = self.client.projects().stages(args.project_id).await?;
        Ok(serde_json::Value::Array(stages))
    }
}
