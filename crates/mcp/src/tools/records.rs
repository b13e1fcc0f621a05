// Generic record tools: search, create, update and delete on any model

use crate::error::{ToolError, ToolResult};
use crate::protocol::ToolSchema;
use crate::tools::{
    json_schema_array, json_schema_integer, json_schema_object, json_schema_string,
    parse_arguments, require_text, Tool, ToolTier,
};
use odoo_client::{OdooClient, SearchOptions};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

const COMMON_MODELS: &str = "Common models: project.project (projects), project.task (tasks), \
project.task.type (stages), project.tags (tags), project.milestone (milestones), \
res.users (users), res.partner (contacts).";

/// Models the generic tools may touch. Unrestricted unless configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAllowList {
    models: Option<Arc<BTreeSet<String>>>,
}

impl ModelAllowList {
    /// Every model is allowed; Odoo's access rules decide.
    pub fn any() -> Self {
        Self { models: None }
    }

    /// Only the given models are allowed.
    pub fn only<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models = models
            .into_iter()
            .map(Into::into)
            .map(|m: String| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        Self {
            models: Some(Arc::new(models)),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.models.is_some()
    }

    pub fn check(&self, model: &str) -> ToolResult<()> {
        require_text("model", model)?;
        match &self.models {
            Some(models) if !models.contains(model) => Err(ToolError::invalid(format!(
                "model '{}' is not allowed; allowed models: {}",
                model,
                models.iter().cloned().collect::<Vec<_>>().join(", ")
            ))),
            _ => Ok(()),
        }
    }
}

/// One id or a list of ids.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum RecordIds {
    One(i64),
    Many(Vec<i64>),
}

impl RecordIds {
    fn into_vec(self) -> ToolResult<Vec<i64>> {
        let ids = match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        };
        if ids.is_empty() {
            return Err(ToolError::invalid("`ids` must contain at least one id"));
        }
        Ok(ids)
    }
}

fn ids_schema() -> serde_json::Value {
    serde_json::json!({
        "oneOf": [
            json_schema_integer("A single record ID"),
            json_schema_array(json_schema_integer("Record ID"), "Record IDs")
        ],
        "description": "Record ID or list of record IDs"
    })
}

/// Tool to search any model
pub struct SearchRecordsTool {
    client: Arc<OdooClient>,
    allowed: ModelAllowList,
}

impl SearchRecordsTool {
    pub fn new(client: Arc<OdooClient>, allowed: ModelAllowList) -> Self {
        Self { client, allowed }
    }
}

#[derive(Debug, Deserialize)]
struct SearchRecordsArgs {
    model: String,
    #[serde(default)]
    domain: Option<serde_json::Value>,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default = "default_search_limit")]
    limit: u32,
    #[serde(default)]
    offset: Option<u32>,
    #[serde(default)]
    order: Option<String>,
}

fn default_search_limit() -> u32 {
    50
}

#[async_trait::async_trait]
impl Tool for SearchRecordsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_search_records".to_string(),
            description: format!(
                "Search any Odoo model, for advanced use cases beyond projects and tasks. {}",
                COMMON_MODELS
            ),
            input_schema: json_schema_object(
                serde_json::json!({
                    "model": json_schema_string("The Odoo model name (e.g. 'project.task')"),
                    "domain": {
                        "type": "array",
                        "description": "Odoo domain filter (e.g. [[\"name\", \"ilike\", \"auth\"]]). Defaults to [] (all records)"
                    },
                    "fields": json_schema_array(
                        json_schema_string("Field name"),
                        "Field names to return. Defaults to all fields"
                    ),
                    "limit": json_schema_integer("Maximum number of records to return (default: 50)"),
                    "offset": json_schema_integer("Number of records to skip"),
                    "order": json_schema_string("Sort order (e.g. 'name asc', 'create_date desc')")
                }),
                vec!["model"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: SearchRecordsArgs = parse_arguments("odoo_search_records", arguments)?;
        self.allowed.check(&args.model)?;

        let domain = match args.domain {
            None | Some(serde_json::Value::Null) => serde_json::json!([]),
            Some(domain @ serde_json::Value::Array(_)) => domain,
            Some(_) => return Err(ToolError::invalid("`domain` must be a list")),
        };

        let mut options = SearchOptions::new().fields(args.fields).limit(args.limit);
        options.offset = args.offset;
        options.order = args.order;

        let records = self
            .client
            .records()
            .search_read(&args.model, domain, &options)
            .await?;
        Ok(serde_json::Value::Array(records))
    }
}

/// Tool to create a record of any model
pub struct CreateRecordTool {
    client: Arc<OdooClient>,
    allowed: ModelAllowList,
}

impl CreateRecordTool {
    pub fn new(client: Arc<OdooClient>, allowed: ModelAllowList) -> Self {
        Self { client, allowed }
    }
}

#[derive(Debug, Deserialize)]
struct CreateRecordArgs {
    model: String,
    values: serde_json::Map<String, serde_json::Value>,
}

#[async_trait::async_trait]
impl Tool for CreateRecordTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_create_record".to_string(),
            description: "Create a record in any Odoo model. Values are passed to Odoo unchanged.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "model": json_schema_string("The Odoo model name"),
                    "values": {
                        "type": "object",
                        "description": "Field values to set"
                    }
                }),
                vec!["model", "values"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: CreateRecordArgs = parse_arguments("odoo_create_record", arguments)?;
        self.allowed.check(&args.model)?;

        let id = self
            .client
            .records()
            .create_raw(&args.model, args.values)
            .await?;
        Ok(serde_json::json!({"id": id, "model": args.model}))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to update records of any model
pub struct UpdateRecordTool {
    client: Arc<OdooClient>,
    allowed: ModelAllowList,
}

impl UpdateRecordTool {
    pub fn new(client: Arc<OdooClient>, allowed: ModelAllowList) -> Self {
        Self { client, allowed }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateRecordArgs {
    model: String,
    ids: RecordIds,
    values: serde_json::Map<String, serde_json::Value>,
}

#[async_trait::async_trait]
impl Tool for UpdateRecordTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_update_record".to_string(),
            description: "Update one or more records of any Odoo model. Values are passed to Odoo unchanged.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "model": json_schema_string("The Odoo model name"),
                    "ids": ids_schema(),
                    "values": {
                        "type": "object",
                        "description": "Field values to write"
                    }
                }),
                vec!["model", "ids", "values"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: UpdateRecordArgs = parse_arguments("odoo_update_record", arguments)?;
        self.allowed.check(&args.model)?;
        let ids = args.ids.into_vec()?;
        if args.values.is_empty() {
            return Err(ToolError::invalid("`values` must contain at least one field"));
        }

        let updated = self
            .client
            .records()
            .write_raw(&args.model, &ids, args.values)
            .await?;
        Ok(serde_json::json!({"updated": updated, "model": args.model, "ids": ids}))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// Tool to delete records of any model
pub struct DeleteRecordTool {
    client: Arc<OdooClient>,
    allowed: ModelAllowList,
}

impl DeleteRecordTool {
    pub fn new(client: Arc<OdooClient>, allowed: ModelAllowList) -> Self {
        Self { client, allowed }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteRecordArgs {
    model: String,
    ids: RecordIds,
}

#[async_trait::async_trait]
impl Tool for DeleteRecordTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "odoo_delete_record".to_string(),
            description: "Permanently delete one or more records of any Odoo model. Prefer archiving (active=false) when the model supports it.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "model": json_schema_string("The Odoo model name"),
                    "ids": ids_schema()
                }),
                vec!["model", "ids"],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult<serde_json::Value> {
        let args: DeleteRecordArgs = parse_arguments("odoo_delete_record", arguments)?;
        self.allowed.check(&args.model)?;
        let ids = args.ids.into_vec()?;

        let deleted = self.client.records().unlink_raw(&args.model, &ids).await?;
        Ok(serde_json::json!({"deleted": deleted, "model": args.model, "ids": ids}))
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Destructive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allow_list_any() {
        let allowed = ModelAllowList::any();
        assert!(!allowed.is_restricted());
        assert!(allowed.check("res.partner").is_ok());
        assert!(allowed.check(" ").is_err());
    }

    #[test]
    fn test_allow_list_only() {
        let allowed = ModelAllowList::only([" project.task ", "project.project", ""]);

        assert!(allowed.is_restricted());
        assert!(allowed.check("project.task").is_ok());

        let err = allowed.check("res.users").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: model 'res.users' is not allowed; allowed models: project.project, project.task"
        );
    }

    #[test]
    fn test_record_ids_single_or_list() {
        let one: RecordIds = serde_json::from_value(json!(4)).unwrap();
        assert_eq!(one.into_vec().unwrap(), vec![4]);

        let many: RecordIds = serde_json::from_value(json!([4, 5])).unwrap();
        assert_eq!(many.into_vec().unwrap(), vec![4, 5]);

        let none: RecordIds = serde_json::from_value(json!([])).unwrap();
        assert!(none.into_vec().is_err());

        assert!(serde_json::from_value::<RecordIds>(json!("4")).is_err());
    }
}
