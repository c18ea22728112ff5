use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::modules::audit::model::{
    FormattedAuditLog, PaginatedAuditLogsResponse,
};
use crate::modules::audit::service::AuditService;
use crate::modules::students::controller::ErrorResponse;
use crate::state::AppState;
use formation_core::AppError;
use formation_core::pagination::{PaginationMeta, PaginationParams};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AuditLogFilter {
    /// Restrict to one entity type, e.g. `student` or `document`.
    pub entity_type: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/audit",
    params(PaginationParams, AuditLogFilter),
    responses(
        (status = 200, description = "Audit entries, newest first", body = PaginatedAuditLogsResponse)
    ),
    tag = "Audit"
)]
#[instrument(skip(state))]
pub async fn get_audit_logs(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<AuditLogFilter>,
) -> Result<Json<PaginatedAuditLogsResponse>, AppError> {
    let (logs, total) =
        AuditService::get_logs(&state.db, &params, filter.entity_type.as_deref()).await?;

    Ok(Json(PaginatedAuditLogsResponse {
        data: logs,
        meta: PaginationMeta::new(&params, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/audit/{entity_type}/{entity_id}",
    params(
        ("entity_type" = String, Path, description = "Entity type"),
        ("entity_id" = Uuid, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Entity history with formatted changes", body = Vec<FormattedAuditLog>),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Audit"
)]
#[instrument(skip(state))]
pub async fn get_entity_history(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> Result<Json<Vec<FormattedAuditLog>>, AppError> {
    let history = AuditService::get_entity_history(&state.db, &entity_type, entity_id).await?;
    Ok(Json(history))
}
