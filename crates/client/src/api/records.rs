//! Generic record access on any model.

use crate::api::{expect_bool, expect_id, expect_records};
use crate::client::OdooClient;
use crate::error::OdooResult;
use serde_json::{json, Map, Value};

/// Keyword arguments of `search_read`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Fields to return; all fields when empty.
    pub fields: Vec<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Sort specification, e.g. `"name asc"`.
    pub order: Option<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub(crate) fn to_kwargs(&self) -> Map<String, Value> {
        let mut kwargs = Map::new();
        if !self.fields.is_empty() {
            kwargs.insert("fields".into(), json!(self.fields));
        }
        if let Some(limit) = self.limit {
            kwargs.insert("limit".into(), json!(limit));
        }
        if let Some(offset) = self.offset {
            kwargs.insert("offset".into(), json!(offset));
        }
        if let Some(order) = &self.order {
            kwargs.insert("order".into(), json!(order));
        }
        kwargs
    }
}

/// Records API: search/read/create/write/unlink on arbitrary models.
pub struct RecordsApi<'a> {
    client: &'a OdooClient,
}

impl<'a> RecordsApi<'a> {
    pub(crate) fn new(client: &'a OdooClient) -> Self {
        Self { client }
    }

    /// Search and read records in one call.
    ///
    /// `domain` is an Odoo domain such as `[["name", "ilike", "auth"]]`.
    pub async fn search_read(
        &self,
        model: &str,
        domain: Value,
        options: &SearchOptions,
    ) -> OdooResult<Vec<Value>> {
        let result = self
            .client
            .execute(model, "search_read", vec![domain], options.to_kwargs())
            .await?;
        expect_records(result)
    }

    /// Read specific records by id.
    pub async fn read(&self, model: &str, ids: &[i64], fields: &[String]) -> OdooResult<Vec<Value>> {
        let mut kwargs = Map::new();
        if !fields.is_empty() {
            kwargs.insert("fields".into(), json!(fields));
        }
        let result = self
            .client
            .execute(model, "read", vec![json!(ids)], kwargs)
            .await?;
        expect_records(result)
    }

    /// Create a record, returning its id.
    pub async fn create(&self, model: &str, values: Map<String, Value>) -> OdooResult<i64> {
        expect_id(self.create_raw(model, values).await?)
    }

    /// Create a record, returning whatever the model's `create` answered.
    pub async fn create_raw(&self, model: &str, values: Map<String, Value>) -> OdooResult<Value> {
        self.client
            .execute(model, "create", vec![Value::Object(values)], Map::new())
            .await
    }

    /// Update one or more records.
    pub async fn write(&self, model: &str, ids: &[i64], values: Map<String, Value>) -> OdooResult<bool> {
        expect_bool(self.write_raw(model, ids, values).await?)
    }

    /// Update records, returning the raw result of `write`.
    pub async fn write_raw(
        &self,
        model: &str,
        ids: &[i64],
        values: Map<String, Value>,
    ) -> OdooResult<Value> {
        self.client
            .execute(model, "write", vec![json!(ids), Value::Object(values)], Map::new())
            .await
    }

    /// Delete records, returning the raw result of `unlink`.
    pub async fn unlink_raw(&self, model: &str, ids: &[i64]) -> OdooResult<Value> {
        self.client
            .execute(model, "unlink", vec![json!(ids)], Map::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_kwargs() {
        let kwargs = SearchOptions::new()
            .fields(["id", "name"])
            .limit(10)
            .offset(20)
            .order("name asc")
            .to_kwargs();

        assert_eq!(
            Value::Object(kwargs),
            json!({"fields": ["id", "name"], "limit": 10, "offset": 20, "order": "name asc"})
        );
    }

    #[test]
    fn test_default_search_options_are_empty() {
        assert!(SearchOptions::default().to_kwargs().is_empty());
    }
}
