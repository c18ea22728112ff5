//! Typed key/value metadata attached to documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateUrl};

/// Declared type of a metadata value. Values are stored as text and checked
/// against the declared type before persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "metadata_value_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MetadataValueType {
    Integer,
    Float,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    #[sqlx(rename = "datetime")]
    DateTime,
    Json,
    Url,
    String,
}

impl MetadataValueType {
    /// Checks that `value` is representable as this type.
    pub fn validate_value(&self, value: &str) -> Result<(), String> {
        match self {
            MetadataValueType::Integer => value
                .trim()
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a valid integer", value)),
            MetadataValueType::Float => value
                .trim()
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a valid float", value)),
            MetadataValueType::Boolean => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "false" => Ok(()),
                _ => Err(format!("'{}' is not a valid boolean", value)),
            },
            MetadataValueType::Date => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a valid date (expected YYYY-MM-DD)", value)),
            MetadataValueType::DateTime => DateTime::parse_from_rfc3339(value.trim())
                .map(|_| ())
                .map_err(|_| format!("'{}' is not a valid RFC 3339 datetime", value)),
            MetadataValueType::Json => serde_json::from_str::<Value>(value)
                .map(|_| ())
                .map_err(|_| format!("'{}' is not valid JSON", value)),
            MetadataValueType::Url => {
                if value.validate_url() {
                    Ok(())
                } else {
                    Err(format!("'{}' is not a valid URL", value))
                }
            }
            MetadataValueType::String => Ok(()),
        }
    }

    /// Projects the stored text value into a typed JSON value.
    ///
    /// Assumes the value passed [`Self::validate_value`]; anything that no
    /// longer parses falls back to a JSON string.
    #[must_use]
    pub fn to_json_value(&self, value: &str) -> Value {
        match self {
            MetadataValueType::Integer => value
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(value.to_string())),
            MetadataValueType::Float => value
                .trim()
                .parse::<f64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(value.to_string())),
            MetadataValueType::Boolean => {
                Value::Bool(value.trim().eq_ignore_ascii_case("true"))
            }
            MetadataValueType::Json => serde_json::from_str(value)
                .unwrap_or_else(|_| Value::String(value.to_string())),
            _ => Value::String(value.to_string()),
        }
    }
}

/// One metadata entry. Keys are unique per document.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DocumentMetadata {
    pub id: Uuid,
    pub document_id: Uuid,
    pub key: String,
    pub value: String,
    pub value_type: MetadataValueType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata entry with its value projected into typed JSON.
#[derive(Debug, Serialize, ToSchema)]
pub struct TypedMetadata {
    pub key: String,
    pub value_type: MetadataValueType,
    #[schema(value_type = Object)]
    pub value: Value,
}

impl From<&DocumentMetadata> for TypedMetadata {
    fn from(entry: &DocumentMetadata) -> Self {
        Self {
            key: entry.key.clone(),
            value_type: entry.value_type,
            value: entry.value_type.to_json_value(&entry.value),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetMetadataDto {
    #[validate(length(min = 1, max = 100))]
    pub key: String,
    #[validate(length(max = 5000))]
    pub value: String,
    pub value_type: MetadataValueType,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMetadataDto {
    #[validate(length(max = 5000))]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::MetadataValueType::*;
    use serde_json::json;

    #[test]
    fn test_integer_validation() {
        assert!(Integer.validate_value("42").is_ok());
        assert!(Integer.validate_value("-7").is_ok());
        assert!(Integer.validate_value("3.14").is_err());
        assert!(Integer.validate_value("quarante-deux").is_err());
    }

    #[test]
    fn test_float_validation() {
        assert!(Float.validate_value("3.14").is_ok());
        assert!(Float.validate_value("42").is_ok());
        assert!(Float.validate_value("pi").is_err());
    }

    #[test]
    fn test_boolean_validation() {
        assert!(Boolean.validate_value("true").is_ok());
        assert!(Boolean.validate_value("False").is_ok());
        assert!(Boolean.validate_value("oui").is_err());
        assert!(Boolean.validate_value("1").is_err());
    }

    #[test]
    fn test_date_validation() {
        assert!(Date.validate_value("2026-02-01").is_ok());
        assert!(Date.validate_value("01/02/2026").is_err());
        assert!(Date.validate_value("2026-13-01").is_err());
    }

    #[test]
    fn test_datetime_wire_token() {
        assert_eq!(serde_json::to_value(DateTime).unwrap(), json!("datetime"));
        assert_eq!(
            serde_json::from_value::<super::MetadataValueType>(json!("datetime")).unwrap(),
            DateTime
        );
    }

    #[test]
    fn test_datetime_validation() {
        assert!(DateTime.validate_value("2026-02-01T09:30:00Z").is_ok());
        assert!(DateTime.validate_value("2026-02-01 09:30").is_err());
    }

    #[test]
    fn test_json_validation() {
        assert!(Json.validate_value(r#"{"hours": 35}"#).is_ok());
        assert!(Json.validate_value(r#"{"hours": }"#).is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(Url.validate_value("https://example.com/doc").is_ok());
        assert!(Url.validate_value("not a url").is_err());
    }

    #[test]
    fn test_string_always_valid() {
        assert!(String.validate_value("").is_ok());
        assert!(String.validate_value("n'importe quoi").is_ok());
    }

    #[test]
    fn test_typed_projection() {
        assert_eq!(Integer.to_json_value("42"), json!(42));
        assert_eq!(Float.to_json_value("2.5"), json!(2.5));
        assert_eq!(Boolean.to_json_value("True"), json!(true));
        assert_eq!(Json.to_json_value(r#"{"a":1}"#), json!({"a":1}));
        assert_eq!(Date.to_json_value("2026-02-01"), json!("2026-02-01"));
    }
}
