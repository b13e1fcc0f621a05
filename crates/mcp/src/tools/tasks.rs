// Task tools: create (single and batch), list, update and chatter messages

use crate::error::{ToolError, ToolResult};
use crate::protocol::ToolSchema;
use crate::tools::{
    json_schema_array, json_schema_boolean, json_schema_integer, json_schema_number,
    json_schema_object, json_schema_string, parse_arguments, require_text, Tool, ToolTier,
};
use odoo_client::{NewTask, OdooClient, TaskFilter, TaskUpdate};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Optional fields shared by single and batch task creation.
#[derive(Debug, Default, Deserialize)]
struct TaskFields {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    stage_id: Option<i64>,
    #[serde(default)]
    tag_names: Vec<String>,
    #[serde(default)]
    user_ids: Vec<i64>,
    #[serde(default)]
    parent_id: Option<i64>,
    #[serde(default)]
    planned_hours: Option<f64>,
    #[serde(default)]
    date_deadline: Option<String>,
    #[serde(default)]
    milestone_id: Option<i64>,
}

/// JSON-Schema properties of [`TaskFields`].
fn task_field_properties() -> serde_json::Map<String, serde_json::Value> {
    let properties = serde_json::json!({
        "description": json_schema_string("Detailed description. Supports HTML for rich formatting"),
        "priority": {
            "type": "string",
            "description": "'0' = Normal, '1' = Important (default: '0')",
            "enum": ["0", "1", "2", "3"]
        },
        "stage_id": json_schema_integer("Stage/column ID. If omitted, the project's default stage is used"),
        "tag_names": json_schema_array(
            json_schema_string("Tag name"),
            "Tag names (e.g. [\"backend\", \"auth\"]). Missing tags are created"
        ),
        "user_ids": json_schema_array(
            json_schema_integer("User ID"),
            "Assignee user IDs. Use odoo_search_users to find them"
        ),
        "parent_id": json_schema_integer("Parent task ID, to create this task as a subtask"),
        "planned_hours": json_schema_number("Estimated hours"),
        "date_deadline": json_schema_string("Deadline in 'YYYY-MM-DD' format"),
        "milestone_id": json_schema_integer("Milestone ID (see odoo_list_milestones)")
    });
    match properties {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

/// Resolve tags and assemble the record to create.
async fn build_task(
    client: &OdooClient,
    project_id: i64,
    name: String,
    fields: TaskFields,
) -> ToolResult<NewTask> {
    require_text("name", &name)?;
    let tag_ids = client.tags().find_or_create(&fields.tag_names).await?;

    Ok(NewTask {
        project_id,
        name,
        description: fields.description,
        priority: fields.priority,
        stage_id: fields.stage_id,
        tag_ids,
        user_ids: fields.user_ids,
        parent_id: fields.parent_id,
        planned_hours: fields.planned_hours,
        date_deadline: fields.date_deadline,
        milestone_id: fields.milestone_id,
    })
}

/// Tool to create a single task
pub struct CreateTaskTool {
    client: Arc<OdooClient>,
}

impl CreateTaskTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskArgs {
    project_id: i64,
    name: String,
    #[serde(flatten)]
    fields: TaskFields,
}

#[async_trait::async_trait]
impl Tool for CreateTaskTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = task_field_properties();
        properties.insert(
            "project_id".into(),
            json_schema_integer("The project to create the task in"),
        );
        properties.insert("name".into(), json_schema_string("Task title / summary"));

        ToolSchema {
            name: "odoo_create_task".to_string(),
            description: "Create a single task in an Odoo project. For subtasks, set parent_id to the ID of the parent task; for epics, create the parent task first.".to_string(),
            input_schema: json_schema_object(
                serde_json::Value::Object(properties),
                vec!["project_id", "name"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: CreateTaskArgs = parse_arguments("odoo_create_task", arguments)?;

        let task = build_task(&self.client, args.project_id, args.name, args.fields).await?;
        let id = self.client.tasks().create(&task).await?;

        Ok(serde_json::json!({
            "id": id,
            "name": task.name,
            "project_id": task.project_id,
            "parent_id": task.parent_id,
        }))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to create many tasks, one remote call per task
pub struct CreateTasksBatchTool {
    client: Arc<OdooClient>,
}

impl CreateTasksBatchTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTasksBatchArgs {
    project_id: i64,
    tasks: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BatchTask {
    name: String,
    #[serde(flatten)]
    fields: TaskFields,
}

impl CreateTasksBatchTool {
    async fn create_one(&self, project_id: i64, item: serde_json::Value) -> ToolResult<(i64, String)> {
        let item: BatchTask = parse_arguments("task", item)?;
        let task = build_task(&self.client, project_id, item.name, item.fields).await?;
        let id = self.client.tasks().create(&task).await?;
        Ok((id, task.name))
    }
}

#[async_trait::async_trait]
impl Tool for CreateTasksBatchTool {
    fn schema(&self) -> ToolSchema {
        let mut item_properties = task_field_properties();
        item_properties.insert("name".into(), json_schema_string("Task title"));

        ToolSchema {
            name: "odoo_create_tasks_batch".to_string(),
            description: "Create multiple tasks in a project at once. This is the primary tool for turning a PRD into actionable items. To build a hierarchy, create parent tasks first, note their IDs, then create subtasks with parent_id. Each task succeeds or fails on its own; failures are listed under 'errors'.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The project to create all tasks in"),
                    "tasks": json_schema_array(
                        json_schema_object(serde_json::Value::Object(item_properties), vec!["name"]),
                        "Task definitions"
                    )
                }),
                vec!["project_id", "tasks"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: CreateTasksBatchArgs = parse_arguments("odoo_create_tasks_batch", arguments)?;
        if args.tasks.is_empty() {
            return Err(ToolError::invalid("`tasks` must contain at least one task"));
        }

        let mut created = Vec::new();
        let mut errors = Vec::new();
        for (index, item) in args.tasks.into_iter().enumerate() {
            let label = item
                .get("name")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            match self.create_one(args.project_id, item).await {
                Ok((id, name)) => created.push(serde_json::json!({
                    "index": index,
                    "id": id,
                    "name": name,
                })),
                Err(err) => errors.push(serde_json::json!({
                    "index": index,
                    "name": label,
                    "error": err.to_string(),
                })),
            }
        }

        info!(
            project_id = args.project_id,
            created = created.len(),
            failed = errors.len(),
            "Batch task creation finished"
        );

        Ok(serde_json::json!({
            "created": created.len(),
            "failed": errors.len(),
            "tasks": created,
            "errors": errors,
        }))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to list the tasks of a project
pub struct ListTasksTool {
    client: Arc<OdooClient>,
}

impl ListTasksTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListTasksArgs {
    project_id: i64,
    #[serde(default)]
    stage_id: Option<i64>,
    #[serde(default)]
    parent_id: Option<i64>,
    #[serde(default)]
    limit: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListTasksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_list_tasks".to_string(),
            description: "List tasks in a project, optionally filtered by stage or parent task.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The project ID"),
                    "stage_id": json_schema_integer("Only tasks in this stage"),
                    "parent_id": json_schema_integer("Only direct subtasks of this task"),
                    "limit": json_schema_integer("Maximum number of tasks to return (default: 100)")
                }),
                vec!["project_id"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: ListTasksArgs = parse_arguments("odoo_list_tasks", arguments)?;
        let filter = TaskFilter {
            stage_id: args.stage_id,
            parent_id: args.parent_id,
            limit: args.limit,
        };
        let tasks = self.client.tasks().list(args.project_id, &filter).await?;
        Ok(serde_json::Value::Array(tasks))
    }
}

/// Tool to update a task
pub struct UpdateTaskTool {
    client: Arc<OdooClient>,
}

impl UpdateTaskTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateTaskArgs {
    task_id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    stage_id: Option<i64>,
    #[serde(default)]
    tag_names: Option<Vec<String>>,
    #[serde(default)]
    user_ids: Option<Vec<i64>>,
    #[serde(default)]
    parent_id: Option<i64>,
    #[serde(default)]
    planned_hours: Option<f64>,
    #[serde(default)]
    date_deadline: Option<String>,
    #[serde(default)]
    milestone_id: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for UpdateTaskTool {
    fn schema(&self) -> ToolSchema {
        let mut properties = task_field_properties();
        properties.insert("task_id".into(), json_schema_integer("The task ID to update"));
        properties.insert("name".into(), json_schema_string("New task title"));
        properties.insert(
            "tag_names".into(),
            json_schema_array(
                json_schema_string("Tag name"),
                "Replace tags with these (created if needed)",
            ),
        );
        properties.insert(
            "user_ids".into(),
            json_schema_array(
                json_schema_integer("User ID"),
                "Replace assignees with these user IDs",
            ),
        );

        ToolSchema {
            name: "odoo_update_task".to_string(),
            description: "Update an existing task. Only the fields you provide are changed; others are left untouched.".to_string(),
            input_schema: json_schema_object(serde_json::Value::Object(properties), vec!["task_id"]),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: UpdateTaskArgs = parse_arguments("odoo_update_task", arguments)?;

        let mut update = TaskUpdate {
            name: args.name,
            description: args.description,
            priority: args.priority,
            stage_id: args.stage_id,
            tag_ids: None,
            user_ids: args.user_ids,
            parent_id: args.parent_id,
            planned_hours: args.planned_hours,
            date_deadline: args.date_deadline,
            milestone_id: args.milestone_id,
        };
        if update.is_empty() && args.tag_names.is_none() {
            return Err(ToolError::invalid("no fields provided to update"));
        }
        if let Some(names) = &args.tag_names {
            update.tag_ids = Some(self.client.tags().find_or_create(names).await?);
        }

        let fields_changed: Vec<String> = update.to_values().keys().cloned().collect();
        let updated = self.client.tasks().update(args.task_id, &update).await?;

        Ok(serde_json::json!({
            "updated": updated,
            "task_id": args.task_id,
            "fields_changed": fields_changed,
        }))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to post in the chatter of a task
pub struct PostTaskMessageTool {
    client: Arc<OdooClient>,
}

impl PostTaskMessageTool {
    pub fn new(client: Arc<OdooClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct PostTaskMessageArgs {
    task_id: i64,
    body: String,
    #[serde(default = "default_internal_note")]
    internal_note: bool,
}

fn default_internal_note() -> bool {
    true
}

#[async_trait::async_trait]
impl Tool for PostTaskMessageTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_post_task_message".to_string(),
            description: "Post a message to the activity log (chatter) of a task. By default this is an internal note; set internal_note=false to notify followers.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "task_id": json_schema_integer("The task ID"),
                    "body": json_schema_string("Message body (HTML ok)"),
                    "internal_note": json_schema_boolean("Log as an internal note instead of a message to followers (default: true)")
                }),
                vec!["task_id", "body"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: PostTaskMessageArgs = parse_arguments("odoo_post_task_message", arguments)?;
        require_text("body", &args.body)?;

        let message_id = self
            .client
            .tasks()
            .post_message(args.task_id, &args.body, args.internal_note)
            .await?;

        Ok(serde_json::json!({
            "message_id": message_id,
            "task_id": args.task_id,
            "internal_note": args.internal_note,
        }))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}
