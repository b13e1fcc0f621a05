//! Milestones API.

use crate::api::SearchOptions;
use crate::client::OdooClient;
use crate::error::OdooResult;
use serde_json::{json, Map, Value};

const MODEL: &str = "project.milestone";

/// Milestones API for `project.milestone` records.
pub struct MilestonesApi<'a> {
    client: &'a OdooClient,
}

impl<'a> MilestonesApi<'a> {
    pub(crate) fn new(client: &'a OdooClient) -> Self {
        Self { client }
    }

    /// Create a milestone, returning its id.
    pub async fn create(&self, milestone: &NewMilestone) -> OdooResult<i64> {
        self.client.records().create(MODEL, milestone.to_values()).await
    }

    /// List the milestones of a project by deadline.
    pub async fn list(&self, project_id: i64) -> OdooResult<Vec<Value>> {
        let options = SearchOptions::new()
            .fields(["id", "name", "deadline", "is_reached"])
            .order("deadline asc, id asc");

        self.client
            .records()
            .search_read(MODEL, json!([["project_id", "=", project_id]]), &options)
            .await
    }
}

/// Fields of a milestone to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMilestone {
    pub project_id: i64,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub deadline: Option<String>,
}

impl NewMilestone {
    pub fn to_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".into(), json!(self.name));
        values.insert("project_id".into(), json!(self.project_id));
        if let Some(deadline) = self.deadline.as_deref().filter(|d| !d.is_empty()) {
            values.insert("deadline".into(), json!(deadline));
        }
        values
    }
}
