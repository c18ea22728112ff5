//! Document type reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DocumentType {
    pub id: Uuid,
    /// Stable machine code, e.g. `convention` or `attestation`.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentTypeDto {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentTypeDto {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_document_type_dto_validation() {
        let dto = CreateDocumentTypeDto {
            code: "convention".to_string(),
            name: "Convention de formation".to_string(),
            description: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_document_type_dto_empty_code() {
        let dto = CreateDocumentTypeDto {
            code: "".to_string(),
            name: "Convention de formation".to_string(),
            description: None,
        };
        assert!(dto.validate().is_err());
    }
}
