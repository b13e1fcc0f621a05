//! Projects API.

use crate::api::{replace_ids, SearchOptions};
use crate::client::OdooClient;
use crate::error::OdooResult;
use serde_json::{json, Map, Value};

const MODEL: &str = "project.project";

/// Projects API for listing and editing `project.project` records.
pub struct ProjectsApi<'a> {
    client: &'a OdooClient,
}

impl<'a> ProjectsApi<'a> {
    pub(crate) fn new(client: &'a OdooClient) -> Self {
        Self { client }
    }

    /// List projects with key metadata, sorted by name.
    pub async fn list(&self, active_only: bool) -> OdooResult<Vec<Value>> {
        let domain = if active_only {
            json!([["active", "=", true]])
        } else {
            json!([])
        };
        let options = SearchOptions::new()
            .fields(["id", "name", "user_id", "partner_id", "tag_ids", "task_count"])
            .limit(100)
            .order("name asc");

        self.client.records().search_read(MODEL, domain, &options).await
    }

    /// Task stages (kanban columns) of a project, in board order.
    pub async fn stages(&self, project_id: i64) -> OdooResult<Vec<Value>> {
        let options = SearchOptions::new()
            .fields(["id", "name", "sequence", "fold"])
            .order("sequence asc");

        self.client
            .records()
            .search_read(
                "project.task.type",
                json!([["project_ids", "in", [project_id]]]),
                &options,
            )
            .await
    }

    /// Create a project, returning its id.
    pub async fn create(&self, project: &NewProject) -> OdooResult<i64> {
        self.client.records().create(MODEL, project.to_values()).await
    }

    /// Update a project.
    pub async fn update(&self, project_id: i64, update: &ProjectUpdate) -> OdooResult<bool> {
        self.client
            .records()
            .write(MODEL, &[project_id], update.to_values())
            .await
    }
}

/// Fields of a project to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    /// Project manager.
    pub user_id: Option<i64>,
    /// Customer.
    pub partner_id: Option<i64>,
    pub tag_ids: Vec<i64>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn to_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".into(), json!(self.name));
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            values.insert("description".into(), json!(description));
        }
        if let Some(user_id) = self.user_id {
            values.insert("user_id".into(), json!(user_id));
        }
        if let Some(partner_id) = self.partner_id {
            values.insert("partner_id".into(), json!(partner_id));
        }
        if !self.tag_ids.is_empty() {
            values.insert("tag_ids".into(), replace_ids(&self.tag_ids));
        }
        values
    }
}

/// Fields of a project to change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<i64>,
    pub partner_id: Option<i64>,
    /// `false` archives the project.
    pub active: Option<bool>,
    /// Replaces all tags.
    pub tag_ids: Option<Vec<i64>>,
}

impl ProjectUpdate {
    pub fn to_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        if let Some(name) = &self.name {
            values.insert("name".into(), json!(name));
        }
        if let Some(description) = &self.description {
            values.insert("description".into(), json!(description));
        }
        if let Some(user_id) = self.user_id {
            values.insert("user_id".into(), json!(user_id));
        }
        if let Some(partner_id) = self.partner_id {
            values.insert("partner_id".into(), json!(partner_id));
        }
        if let Some(active) = self.active {
            values.insert("active".into(), json!(active));
        }
        if let Some(tag_ids) = &self.tag_ids {
            values.insert("tag_ids".into(), replace_ids(tag_ids));
        }
        values
    }

    pub fn is_empty(&self) -> bool {
        self.to_values().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_values() {
        let project = NewProject {
            name: "Website".to_string(),
            description: Some(String::new()),
            user_id: Some(2),
            partner_id: None,
            tag_ids: vec![4],
        };

        assert_eq!(
            Value::Object(project.to_values()),
            json!({"name": "Website", "user_id": 2, "tag_ids": [[6, 0, [4]]]})
        );
    }

    #[test]
    fn test_project_update_values() {
        let update = ProjectUpdate {
            active: Some(false),
            ..Default::default()
        };

        assert!(!update.is_empty());
        assert_eq!(Value::Object(update.to_values()), json!({"active": false}));
        assert!(ProjectUpdate::default().is_empty());
    }
}
