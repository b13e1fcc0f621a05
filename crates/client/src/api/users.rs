//! Users API.

use crate::api::SearchOptions;
use crate::client::OdooClient;
use crate::error::OdooResult;
use serde_json::{json, Value};

/// Users API for internal `res.users` records.
pub struct UsersApi<'a> {
    client: &'a OdooClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a OdooClient) -> Self {
        Self { client }
    }

    /// Search internal users by name or email. An empty query lists them all.
    pub async fn search(&self, query: &str, limit: u32) -> OdooResult<Vec<Value>> {
        let options = SearchOptions::new()
            .fields(["id", "name", "email"])
            .limit(limit)
            .order("name asc");

        self.client
            .records()
            .search_read("res.users", user_domain(query), &options)
            .await
    }
}

/// Portal and public users are excluded (`share = False`).
fn user_domain(query: &str) -> Value {
    let query = query.trim();
    if query.is_empty() {
        json!([["share", "=", false]])
    } else {
        json!([
            "&",
            ["share", "=", false],
            "|",
            ["name", "ilike", query],
            ["email", "ilike", query]
        ])
    }
}
