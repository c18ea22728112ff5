use anyhow::Context;
use serde_json::Value;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::audit::model::{AuditAction, AuditLog, FormattedAuditLog, format_changes};
use formation_core::AppError;
use formation_core::pagination::PaginationParams;

const AUDIT_COLUMNS: &str = "id, entity_type, entity_id, action, changes, actor, created_at";

pub struct AuditService;

impl AuditService {
    /// Appends an audit entry. Takes any executor so callers can record
    /// inside the transaction that performed the change.
    #[instrument(skip(executor, changes))]
    pub async fn record<'e, E>(
        executor: E,
        entity_type: &str,
        entity_id: Uuid,
        action: AuditAction,
        changes: Value,
        actor: Option<&str>,
    ) -> Result<AuditLog, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, AuditLog>(&format!(
            "INSERT INTO audit_logs (entity_type, entity_id, action, changes, actor)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {AUDIT_COLUMNS}"
        ))
        .bind(entity_type)
        .bind(entity_id)
        .bind(action)
        .bind(changes)
        .bind(actor)
        .fetch_one(executor)
        .await
        .context("Failed to record audit entry")
        .map_err(AppError::database)
    }

    /// Lists audit entries, newest first, optionally filtered by entity type.
    #[instrument(skip(db))]
    pub async fn get_logs(
        db: &PgPool,
        params: &PaginationParams,
        entity_type: Option<&str>,
    ) -> Result<(Vec<AuditLog>, i64), AppError> {
        let logs = sqlx::query_as::<_, AuditLog>(&format!(
            "SELECT {AUDIT_COLUMNS}
             FROM audit_logs
             WHERE ($1::text IS NULL OR entity_type = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(entity_type)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch audit logs")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM audit_logs WHERE ($1::text IS NULL OR entity_type = $1)",
        )
        .bind(entity_type)
        .fetch_one(db)
        .await
        .context("Failed to count audit logs")
        .map_err(AppError::database)?;

        Ok((logs, total))
    }

    /// Full history of one entity, newest first, with changes rendered as
    /// `field: old -> new` lines.
    #[instrument(skip(db))]
    pub async fn get_entity_history(
        db: &PgPool,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<FormattedAuditLog>, AppError> {
        let logs = sqlx::query_as::<_, AuditLog>(&format!(
            "SELECT {AUDIT_COLUMNS}
             FROM audit_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at DESC"
        ))
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch entity history")
        .map_err(AppError::database)?;

        Ok(logs
            .into_iter()
            .map(|entry| {
                let formatted_changes = format_changes(&entry.changes);
                FormattedAuditLog {
                    entry,
                    formatted_changes,
                }
            })
            .collect())
    }
}
