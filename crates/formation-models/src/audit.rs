//! Audit-trail entries and diff formatting for display.

use chrono::{DateTime, Utc};
use formation_core::pagination::PaginationMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    StatusChanged,
}

/// One recorded change to an entity.
///
/// `changes` maps field names to `{"old": ..., "new": ...}` objects.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AuditLog {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: AuditAction,
    #[schema(value_type = Object)]
    pub changes: Value,
    pub actor: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAuditLogsResponse {
    pub data: Vec<AuditLog>,
    pub meta: PaginationMeta,
}

/// Audit entry with its changes pre-formatted for display.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormattedAuditLog {
    #[serde(flatten)]
    pub entry: AuditLog,
    pub formatted_changes: Vec<String>,
}

/// Builds a `{"field": {"old": ..., "new": ...}}` changes document from the
/// fields that actually differ.
#[must_use]
pub fn build_changes(pairs: &[(&str, Value, Value)]) -> Value {
    let mut map = serde_json::Map::new();
    for (field, old, new) in pairs {
        if old != new {
            map.insert(
                (*field).to_string(),
                serde_json::json!({ "old": old, "new": new }),
            );
        }
    }
    Value::Object(map)
}

/// Renders a changes document as `field: old -> new` lines, sorted by field
/// name so the output is stable.
#[must_use]
pub fn format_changes(changes: &Value) -> Vec<String> {
    let Some(map) = changes.as_object() else {
        return Vec::new();
    };

    let mut fields: Vec<&String> = map.keys().collect();
    fields.sort();

    fields
        .into_iter()
        .map(|field| {
            let entry = &map[field];
            let old = entry.get("old").unwrap_or(&Value::Null);
            let new = entry.get("new").unwrap_or(&Value::Null);
            format!("{}: {} -> {}", field, display_value(old), display_value(new))
        })
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "(vide)".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_changes_skips_equal_fields() {
        let changes = build_changes(&[
            ("status", json!("enrolled"), json!("suspended")),
            ("email", json!("a@b.fr"), json!("a@b.fr")),
        ]);
        let map = changes.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("status"));
    }

    #[test]
    fn test_format_changes_sorted_lines() {
        let changes = json!({
            "status": { "old": "enrolled", "new": "dropped_out" },
            "completed_at": { "old": null, "new": "2026-02-01" },
        });
        let lines = format_changes(&changes);
        assert_eq!(
            lines,
            vec![
                "completed_at: (vide) -> 2026-02-01".to_string(),
                "status: enrolled -> dropped_out".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_changes_non_string_values() {
        let changes = json!({ "missed_sessions": { "old": 1, "new": 3 } });
        assert_eq!(format_changes(&changes), vec!["missed_sessions: 1 -> 3"]);
    }

    #[test]
    fn test_format_changes_non_object_is_empty() {
        assert!(format_changes(&json!("not a map")).is_empty());
        assert!(format_changes(&Value::Null).is_empty());
    }
}
