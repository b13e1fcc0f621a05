//! Tasks API.

use crate::api::{expect_id, replace_ids, SearchOptions};
use crate::client::OdooClient;
use crate::error::OdooResult;
use serde_json::{json, Map, Value};

const MODEL: &str = "project.task";

/// Fields returned when listing tasks.
const LIST_FIELDS: [&str; 11] = [
    "id",
    "name",
    "stage_id",
    "priority",
    "user_ids",
    "tag_ids",
    "parent_id",
    "child_ids",
    "milestone_id",
    "planned_hours",
    "date_deadline",
];

/// Tasks API for `project.task` records.
pub struct TasksApi<'a> {
    client: &'a OdooClient,
}

impl<'a> TasksApi<'a> {
    pub(crate) fn new(client: &'a OdooClient) -> Self {
        Self { client }
    }

    /// Create a task, returning its id.
    pub async fn create(&self, task: &NewTask) -> OdooResult<i64> {
        self.client.records().create(MODEL, task.to_values()).await
    }

    /// List tasks of a project in board order.
    pub async fn list(&self, project_id: i64, filter: &TaskFilter) -> OdooResult<Vec<Value>> {
        let mut domain = vec![json!(["project_id", "=", project_id])];
        if let Some(stage_id) = filter.stage_id {
            domain.push(json!(["stage_id", "=", stage_id]));
        }
        if let Some(parent_id) = filter.parent_id {
            domain.push(json!(["parent_id", "=", parent_id]));
        }

        let options = SearchOptions::new()
            .fields(LIST_FIELDS)
            .limit(filter.limit.unwrap_or(100))
            .order("sequence asc, id asc");

        self.client
            .records()
            .search_read(MODEL, Value::Array(domain), &options)
            .await
    }

    /// Update a task.
    pub async fn update(&self, task_id: i64, update: &TaskUpdate) -> OdooResult<bool> {
        self.client
            .records()
            .write(MODEL, &[task_id], update.to_values())
            .await
    }

    /// Post a message in the chatter of a task, returning the message id.
    ///
    /// Internal notes are only visible to employees; otherwise followers are notified.
    pub async fn post_message(&self, task_id: i64, body: &str, internal_note: bool) -> OdooResult<i64> {
        let subtype = if internal_note {
            "mail.mt_note"
        } else {
            "mail.mt_comment"
        };
        let mut kwargs = Map::new();
        kwargs.insert("body".into(), json!(body));
        kwargs.insert("message_type".into(), json!("comment"));
        kwargs.insert("subtype_xmlid".into(), json!(subtype));

        let result = self
            .client
            .execute(MODEL, "message_post", vec![json!([task_id])], kwargs)
            .await?;
        expect_id(result)
    }
}

/// Fields of a task to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub project_id: i64,
    pub name: String,
    /// HTML allowed.
    pub description: Option<String>,
    /// `"0"` normal, `"1"` important (Odoo 17+ also knows `"2"`/`"3"`). Defaults to `"0"`.
    pub priority: Option<String>,
    pub stage_id: Option<i64>,
    pub tag_ids: Vec<i64>,
    pub user_ids: Vec<i64>,
    /// Makes this task a subtask. Not checked locally.
    pub parent_id: Option<i64>,
    pub planned_hours: Option<f64>,
    /// `YYYY-MM-DD`.
    pub date_deadline: Option<String>,
    pub milestone_id: Option<i64>,
}

impl NewTask {
    pub fn new(project_id: i64, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn to_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".into(), json!(self.name));
        values.insert("project_id".into(), json!(self.project_id));
        values.insert(
            "priority".into(),
            json!(self.priority.as_deref().unwrap_or("0")),
        );
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            values.insert("description".into(), json!(description));
        }
        if let Some(stage_id) = self.stage_id {
            values.insert("stage_id".into(), json!(stage_id));
        }
        if let Some(parent_id) = self.parent_id {
            values.insert("parent_id".into(), json!(parent_id));
        }
        if let Some(hours) = self.planned_hours {
            values.insert("planned_hours".into(), json!(hours));
        }
        if let Some(deadline) = &self.date_deadline {
            values.insert("date_deadline".into(), json!(deadline));
        }
        if let Some(milestone_id) = self.milestone_id {
            values.insert("milestone_id".into(), json!(milestone_id));
        }
        if !self.tag_ids.is_empty() {
            values.insert("tag_ids".into(), replace_ids(&self.tag_ids));
        }
        if !self.user_ids.is_empty() {
            values.insert("user_ids".into(), replace_ids(&self.user_ids));
        }
        values
    }
}

/// Fields of a task to change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub stage_id: Option<i64>,
    /// Replaces all tags.
    pub tag_ids: Option<Vec<i64>>,
    /// Replaces all assignees.
    pub user_ids: Option<Vec<i64>>,
    pub parent_id: Option<i64>,
    pub planned_hours: Option<f64>,
    pub date_deadline: Option<String>,
    pub milestone_id: Option<i64>,
}

impl TaskUpdate {
    pub fn to_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        if let Some(name) = &self.name {
            values.insert("name".into(), json!(name));
        }
        if let Some(description) = &self.description {
            values.insert("description".into(), json!(description));
        }
        if let Some(priority) = &self.priority {
            values.insert("priority".into(), json!(priority));
        }
        if let Some(stage_id) = self.stage_id {
            values.insert("stage_id".into(), json!(stage_id));
        }
        if let Some(parent_id) = self.parent_id {
            values.insert("parent_id".into(), json!(parent_id));
        }
        if let Some(hours) = self.planned_hours {
            values.insert("planned_hours".into(), json!(hours));
        }
        if let Some(deadline) = &self.date_deadline {
            values.insert("date_deadline".into(), json!(deadline));
        }
        if let Some(milestone_id) = self.milestone_id {
            values.insert("milestone_id".into(), json!(milestone_id));
        }
        if let Some(tag_ids) = &self.tag_ids {
            values.insert("tag_ids".into(), replace_ids(tag_ids));
        }
        if let Some(user_ids) = &self.user_ids {
            values.insert("user_ids".into(), replace_ids(user_ids));
        }
        values
    }

    pub fn is_empty(&self) -> bool {
        self.to_values().is_empty()
    }
}

/// Filters for [`TasksApi::list`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub stage_id: Option<i64>,
    /// Only direct subtasks of this task.
    pub parent_id: Option<i64>,
    /// Defaults to 100.
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_minimal_values() {
        let task = NewTask::new(3, "Login page");

        assert_eq!(
            Value::Object(task.to_values()),
            json!({"name": "Login page", "project_id": 3, "priority": "0"})
        );
    }

    #[test]
    fn test_new_task_full_values() {
        let task = NewTask {
            project_id: 3,
            name: "OAuth callback".to_string(),
            description: Some("<p>Handle the redirect</p>".to_string()),
            priority: Some("1".to_string()),
            stage_id: Some(8),
            tag_ids: vec![1, 2],
            user_ids: vec![6],
            parent_id: Some(40),
            planned_hours: Some(4.5),
            date_deadline: Some("2026-11-01".to_string()),
            milestone_id: Some(9),
        };

        assert_eq!(
            Value::Object(task.to_values()),
            json!({
                "name": "OAuth callback",
                "project_id": 3,
                "priority": "1",
                "description": "<p>Handle the redirect</p>",
                "stage_id": 8,
                "parent_id": 40,
                "planned_hours": 4.5,
                "date_deadline": "2026-11-01",
                "milestone_id": 9,
                "tag_ids": [[6, 0, [1, 2]]],
                "user_ids": [[6, 0, [6]]]
            })
        );
    }

    #[test]
    fn test_task_update_only_given_fields() {
        let update = TaskUpdate {
            stage_id: Some(5),
            user_ids: Some(vec![]),
            ..Default::default()
        };

        assert_eq!(
            Value::Object(update.to_values()),
            json!({"stage_id": 5, "user_ids": [[6, 0, []]]})
        );
        assert!(TaskUpdate::default().is_empty());
    }
}
