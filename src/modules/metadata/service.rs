use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::documents::service::DocumentService;
use crate::modules::metadata::model::{
    DocumentMetadata, SetMetadataDto, TypedMetadata, UpdateMetadataDto,
};
use formation_core::AppError;

const METADATA_COLUMNS: &str =
    "id, document_id, key, value, value_type, created_at, updated_at";

pub struct MetadataService;

impl MetadataService {
    /// Attaches a metadata entry to a document. The value must parse as its
    /// declared type, and keys are unique per document.
    #[instrument(skip(db, dto))]
    pub async fn set_metadata(
        db: &PgPool,
        document_id: Uuid,
        dto: SetMetadataDto,
    ) -> Result<DocumentMetadata, AppError> {
        DocumentService::get_document_by_id(db, document_id).await?;

        dto.value_type
            .validate_value(&dto.value)
            .map_err(|msg| AppError::unprocessable(anyhow::anyhow!(msg)))?;

        sqlx::query_as::<_, DocumentMetadata>(&format!(
            "INSERT INTO document_metadata (document_id, key, value, value_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {METADATA_COLUMNS}"
        ))
        .bind(document_id)
        .bind(&dto.key)
        .bind(&dto.value)
        .bind(dto.value_type)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Metadata key {} already exists on this document",
                        dto.key
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })
    }

    /// Replaces the value of an existing entry, keeping its declared type.
    #[instrument(skip(db, dto))]
    pub async fn update_metadata(
        db: &PgPool,
        document_id: Uuid,
        key: &str,
        dto: UpdateMetadataDto,
    ) -> Result<DocumentMetadata, AppError> {
        let existing = Self::get_entry(db, document_id, key).await?;

        existing
            .value_type
            .validate_value(&dto.value)
            .map_err(|msg| AppError::unprocessable(anyhow::anyhow!(msg)))?;

        sqlx::query_as::<_, DocumentMetadata>(&format!(
            "UPDATE document_metadata
             SET value = $1, updated_at = NOW()
             WHERE document_id = $2 AND key = $3
             RETURNING {METADATA_COLUMNS}"
        ))
        .bind(&dto.value)
        .bind(document_id)
        .bind(key)
        .fetch_one(db)
        .await
        .context("Failed to update metadata")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_metadata(
        db: &PgPool,
        document_id: Uuid,
    ) -> Result<Vec<DocumentMetadata>, AppError> {
        DocumentService::get_document_by_id(db, document_id).await?;

        sqlx::query_as::<_, DocumentMetadata>(&format!(
            "SELECT {METADATA_COLUMNS}
             FROM document_metadata
             WHERE document_id = $1
             ORDER BY key"
        ))
        .bind(document_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch document metadata")
        .map_err(AppError::database)
    }

    /// Metadata entries with values projected into typed JSON.
    #[instrument(skip(db))]
    pub async fn get_typed_metadata(
        db: &PgPool,
        document_id: Uuid,
    ) -> Result<Vec<TypedMetadata>, AppError> {
        let entries = Self::get_metadata(db, document_id).await?;
        Ok(entries.iter().map(TypedMetadata::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn delete_metadata(
        db: &PgPool,
        document_id: Uuid,
        key: &str,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM document_metadata WHERE document_id = $1 AND key = $2")
                .bind(document_id)
                .bind(key)
                .execute(db)
                .await
                .context("Failed to delete metadata")
                .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Metadata key not found"
            )));
        }

        Ok(())
    }

    async fn get_entry(
        db: &PgPool,
        document_id: Uuid,
        key: &str,
    ) -> Result<DocumentMetadata, AppError> {
        sqlx::query_as::<_, DocumentMetadata>(&format!(
            "SELECT {METADATA_COLUMNS}
             FROM document_metadata
             WHERE document_id = $1 AND key = $2"
        ))
        .bind(document_id)
        .bind(key)
        .fetch_optional(db)
        .await
        .context("Failed to fetch metadata entry")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Metadata key not found")))
    }
}
