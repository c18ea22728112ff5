use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::document_types::model::{
    CreateDocumentTypeDto, DocumentType, UpdateDocumentTypeDto,
};
use formation_core::AppError;

const TYPE_COLUMNS: &str = "id, code, name, description, created_at, updated_at";

pub struct DocumentTypeService;

impl DocumentTypeService {
    #[instrument(skip(db, dto))]
    pub async fn create_type(
        db: &PgPool,
        dto: CreateDocumentTypeDto,
    ) -> Result<DocumentType, AppError> {
        sqlx::query_as::<_, DocumentType>(&format!(
            "INSERT INTO document_types (code, name, description)
             VALUES ($1, $2, $3)
             RETURNING {TYPE_COLUMNS}"
        ))
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Document type with code {} already exists",
                        dto.code
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })
    }

    #[instrument(skip(db))]
    pub async fn get_types(db: &PgPool) -> Result<Vec<DocumentType>, AppError> {
        sqlx::query_as::<_, DocumentType>(&format!(
            "SELECT {TYPE_COLUMNS} FROM document_types ORDER BY code"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch document types")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_type_by_id(db: &PgPool, id: Uuid) -> Result<DocumentType, AppError> {
        sqlx::query_as::<_, DocumentType>(&format!(
            "SELECT {TYPE_COLUMNS} FROM document_types WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch document type")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Document type not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_type(
        db: &PgPool,
        id: Uuid,
        dto: UpdateDocumentTypeDto,
    ) -> Result<DocumentType, AppError> {
        let existing = Self::get_type_by_id(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.or(existing.description);

        sqlx::query_as::<_, DocumentType>(&format!(
            "UPDATE document_types
             SET name = $1, description = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {TYPE_COLUMNS}"
        ))
        .bind(&name)
        .bind(&description)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update document type")
        .map_err(AppError::database)
    }

    /// Deletes a type unless documents still reference it.
    #[instrument(skip(db))]
    pub async fn delete_type(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let in_use = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM documents WHERE document_type_id = $1",
        )
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to count documents of type")
        .map_err(AppError::database)?;

        if in_use > 0 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Document type is referenced by {} document(s)",
                in_use
            )));
        }

        let result = sqlx::query("DELETE FROM document_types WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete document type")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Document type not found"
            )));
        }

        Ok(())
    }
}
