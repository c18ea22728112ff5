use anyhow::Context;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::metrics;
use crate::modules::audit::model::{AuditAction, build_changes};
use crate::modules::audit::service::AuditService;
use crate::modules::documents::model::{
    CreateDocumentDto, Document, DocumentVersion, INITIAL_VERSION, UpdateDocumentDto, VersionBump,
    bump_version,
};
use formation_core::AppError;
use formation_core::pagination::PaginationParams;

const DOCUMENT_COLUMNS: &str = "id, title, content, document_type_id, created_at, updated_at";
const VERSION_COLUMNS: &str = "id, document_id, version, title, content, is_current, created_at";

pub struct DocumentService;

impl DocumentService {
    /// Creates a document together with its initial `1.0.0` version.
    #[instrument(skip(db, dto))]
    pub async fn create_document(db: &PgPool, dto: CreateDocumentDto) -> Result<Document, AppError> {
        let mut tx = db.begin().await.context("Failed to open transaction")?;

        let document = sqlx::query_as::<_, Document>(&format!(
            "INSERT INTO documents (title, content, document_type_id)
             VALUES ($1, $2, $3)
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(dto.document_type_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Unknown document type"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Self::insert_current_version(&mut tx, &document, INITIAL_VERSION).await?;

        AuditService::record(
            &mut *tx,
            "document",
            document.id,
            AuditAction::Created,
            json!({ "title": { "old": null, "new": document.title } }),
            None,
        )
        .await?;

        tx.commit().await.context("Failed to commit document")?;

        metrics::track_document_version_created();

        Ok(document)
    }

    #[instrument(skip(db))]
    pub async fn get_documents(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<(Vec<Document>, i64), AppError> {
        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS}
             FROM documents
             ORDER BY updated_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch documents")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents")
            .fetch_one(db)
            .await
            .context("Failed to count documents")
            .map_err(AppError::database)?;

        Ok((documents, total))
    }

    #[instrument(skip(db))]
    pub async fn get_document_by_id(db: &PgPool, id: Uuid) -> Result<Document, AppError> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch document")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Document not found")))
    }

    /// Updates a document and snapshots the result as a new version. A
    /// payload that changes nothing returns the document untouched, without
    /// minting a version.
    #[instrument(skip(db, dto))]
    pub async fn update_document(
        db: &PgPool,
        id: Uuid,
        dto: UpdateDocumentDto,
    ) -> Result<Document, AppError> {
        let existing = Self::get_document_by_id(db, id).await?;

        let title = dto.title.unwrap_or_else(|| existing.title.clone());
        let content = dto.content.unwrap_or_else(|| existing.content.clone());

        if title == existing.title && content == existing.content {
            return Ok(existing);
        }

        let bump = if dto.major {
            VersionBump::Major
        } else {
            VersionBump::Minor
        };

        let mut tx = db.begin().await.context("Failed to open transaction")?;

        let current_version = Self::current_version_string(&mut tx, id).await?;
        let next_version = bump_version(&current_version, bump).ok_or_else(|| {
            AppError::internal(anyhow::anyhow!(
                "Stored version {} is malformed",
                current_version
            ))
        })?;

        let document = sqlx::query_as::<_, Document>(&format!(
            "UPDATE documents
             SET title = $1, content = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&title)
        .bind(&content)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update document")
        .map_err(AppError::database)?;

        Self::insert_current_version(&mut tx, &document, &next_version).await?;

        let changes = build_changes(&[
            ("title", json!(existing.title), json!(document.title)),
            (
                "version",
                json!(current_version),
                json!(next_version),
            ),
        ]);

        AuditService::record(&mut *tx, "document", id, AuditAction::Updated, changes, None)
            .await?;

        tx.commit().await.context("Failed to commit update")?;

        metrics::track_document_version_created();

        Ok(document)
    }

    #[instrument(skip(db))]
    pub async fn delete_document(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let existing = Self::get_document_by_id(db, id).await?;

        let mut tx = db.begin().await.context("Failed to open transaction")?;

        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete document")
            .map_err(AppError::database)?;

        AuditService::record(
            &mut *tx,
            "document",
            id,
            AuditAction::Deleted,
            json!({ "title": { "old": existing.title, "new": null } }),
            None,
        )
        .await?;

        tx.commit().await.context("Failed to commit deletion")?;

        Ok(())
    }

    /// Version history, newest first.
    #[instrument(skip(db))]
    pub async fn get_versions(
        db: &PgPool,
        document_id: Uuid,
    ) -> Result<Vec<DocumentVersion>, AppError> {
        Self::get_document_by_id(db, document_id).await?;

        sqlx::query_as::<_, DocumentVersion>(&format!(
            "SELECT {VERSION_COLUMNS}
             FROM document_versions
             WHERE document_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(document_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch document versions")
        .map_err(AppError::database)
    }

    /// Restores an old version by minting a new current version with its
    /// title and content. History is never rewritten.
    #[instrument(skip(db))]
    pub async fn restore_version(
        db: &PgPool,
        document_id: Uuid,
        version_id: Uuid,
    ) -> Result<Document, AppError> {
        let restored = sqlx::query_as::<_, DocumentVersion>(&format!(
            "SELECT {VERSION_COLUMNS}
             FROM document_versions
             WHERE id = $1 AND document_id = $2"
        ))
        .bind(version_id)
        .bind(document_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch version to restore")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Document version not found")))?;

        let mut tx = db.begin().await.context("Failed to open transaction")?;

        let current_version = Self::current_version_string(&mut tx, document_id).await?;
        let next_version = bump_version(&current_version, VersionBump::Minor).ok_or_else(|| {
            AppError::internal(anyhow::anyhow!(
                "Stored version {} is malformed",
                current_version
            ))
        })?;

        let document = sqlx::query_as::<_, Document>(&format!(
            "UPDATE documents
             SET title = $1, content = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&restored.title)
        .bind(&restored.content)
        .bind(document_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to apply restored version")
        .map_err(AppError::database)?;

        Self::insert_current_version(&mut tx, &document, &next_version).await?;

        AuditService::record(
            &mut *tx,
            "document",
            document_id,
            AuditAction::Updated,
            json!({
                "version": { "old": current_version, "new": next_version },
                "restored_from": { "old": null, "new": restored.version },
            }),
            None,
        )
        .await?;

        tx.commit().await.context("Failed to commit restore")?;

        metrics::track_document_version_created();

        Ok(document)
    }

    /// Demotes the current version and inserts the new one, inside the
    /// caller's transaction so the one-current invariant holds.
    async fn insert_current_version(
        tx: &mut Transaction<'_, Postgres>,
        document: &Document,
        version: &str,
    ) -> Result<DocumentVersion, AppError> {
        sqlx::query("UPDATE document_versions SET is_current = FALSE WHERE document_id = $1")
            .bind(document.id)
            .execute(&mut **tx)
            .await
            .context("Failed to demote current version")
            .map_err(AppError::database)?;

        sqlx::query_as::<_, DocumentVersion>(&format!(
            "INSERT INTO document_versions (document_id, version, title, content, is_current)
             VALUES ($1, $2, $3, $4, TRUE)
             RETURNING {VERSION_COLUMNS}"
        ))
        .bind(document.id)
        .bind(version)
        .bind(&document.title)
        .bind(&document.content)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to insert document version")
        .map_err(AppError::database)
    }

    async fn current_version_string(
        tx: &mut Transaction<'_, Postgres>,
        document_id: Uuid,
    ) -> Result<String, AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT version FROM document_versions
             WHERE document_id = $1 AND is_current",
        )
        .bind(document_id)
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to fetch current version")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("Document has no current version"))
        })
    }
}
