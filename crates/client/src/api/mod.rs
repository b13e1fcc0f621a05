//! Typed API groups over `execute_kw`.

pub mod milestones;
pub mod projects;
pub mod records;
pub mod tags;
pub mod tasks;
pub mod users;

pub use milestones::{MilestonesApi, NewMilestone};
pub use projects::{NewProject, ProjectUpdate, ProjectsApi};
pub use records::{RecordsApi, SearchOptions};
pub use tags::TagsApi;
pub use tasks::{NewTask, TaskFilter, TaskUpdate, TasksApi};
pub use users::UsersApi;

use crate::error::{OdooError, OdooResult};
use serde_json::{json, Value};

/// Many2many "replace all" command: `[(6, 0, ids)]`.
pub fn replace_ids(ids: &[i64]) -> Value {
    json!([[6, 0, ids]])
}

/// Interpret the result of `create` (or `message_post`) as a record id.
pub(crate) fn expect_id(value: Value) -> OdooResult<i64> {
    match &value {
        Value::Number(n) => n.as_i64(),
        // Some methods answer with a one-element id list.
        Value::Array(items) if items.len() == 1 => items[0].as_i64(),
        _ => None,
    }
    .ok_or_else(|| OdooError::Malformed(format!("expected a record id, got {value}")))
}

/// Interpret the result of `write` / `unlink`.
pub(crate) fn expect_bool(value: Value) -> OdooResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| OdooError::Malformed(format!("expected a boolean, got {value}")))
}

/// Interpret the result of `search_read` / `read`.
pub(crate) fn expect_records(value: Value) -> OdooResult<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        other => Err(OdooError::Malformed(format!(
            "expected a list of records, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_ids() {
        assert_eq!(replace_ids(&[3, 5]), json!([[6, 0, [3, 5]]]));
        assert_eq!(replace_ids(&[]), json!([[6, 0, []]]));
    }

    #[test]
    fn test_expect_id() {
        assert_eq!(expect_id(json!(42)).unwrap(), 42);
        assert_eq!(expect_id(json!([42])).unwrap(), 42);
        assert!(expect_id(json!(false)).is_err());
    }

    #[test]
    fn test_expect_records() {
        assert_eq!(expect_records(json!([{"id": 1}])).unwrap().len(), 1);
        assert!(expect_records(json!({"id": 1})).is_err());
    }
}
