//! Tags API.

use crate::api::SearchOptions;
use crate::client::OdooClient;
use crate::error::OdooResult;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::debug;

const MODEL: &str = "project.tags";

/// Tags API for `project.tags` records.
pub struct TagsApi<'a> {
    client: &'a OdooClient,
}

impl<'a> TagsApi<'a> {
    pub(crate) fn new(client: &'a OdooClient) -> Self {
        Self { client }
    }

    /// List all tags, sorted by name.
    pub async fn list(&self) -> OdooResult<Vec<Value>> {
        let options = SearchOptions::new()
            .fields(["id", "name", "color"])
            .order("name asc");

        self.client.records().search_read(MODEL, json!([]), &options).await
    }

    /// Resolve tag names to ids, creating the ones that do not exist yet.
    ///
    /// Matching is case-insensitive. Ids come back in the order of `names`.
    pub async fn find_or_create(&self, names: &[String]) -> OdooResult<Vec<i64>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let options = SearchOptions::new().fields(["id", "name"]);
        let existing = self
            .client
            .records()
            .search_read(MODEL, name_domain(names), &options)
            .await?;

        let mut known: HashMap<String, i64> = existing
            .iter()
            .filter_map(|tag| {
                let name = tag.get("name")?.as_str()?.to_lowercase();
                let id = tag.get("id")?.as_i64()?;
                Some((name, id))
            })
            .collect();

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let key = name.to_lowercase();
            let id = match known.get(&key) {
                Some(id) => *id,
                None => {
                    let mut values = Map::new();
                    values.insert("name".into(), json!(name));
                    let id = self.client.records().create(MODEL, values).await?;
                    debug!(tag = %name, id = id, "Created tag");
                    known.insert(key, id);
                    id
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }
}

/// `name =ilike n1 OR name =ilike n2 ...`, with LIKE wildcards escaped.
fn name_domain(names: &[String]) -> Value {
    let mut domain: Vec<Value> = Vec::with_capacity(names.len() * 2);
    for _ in 1..names.len() {
        domain.push(json!("|"));
    }
    for name in names {
        domain.push(json!(["name", "=ilike", escape_like(name)]));
    }
    Value::Array(domain)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
