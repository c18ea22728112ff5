use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::sessions::model::{CreateSessionDto, TrainingSession};
use crate::modules::sessions::service::SessionService;
use crate::modules::students::controller::ErrorResponse;
use crate::state::AppState;
use formation_core::AppError;

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionDto,
    responses(
        (status = 200, description = "Session created", body = TrainingSession),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip(state, dto))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(dto): Json<CreateSessionDto>,
) -> Result<Json<TrainingSession>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let session = SessionService::create_session(&state.db, dto).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "Sessions, most recent first", body = Vec<TrainingSession>)
    ),
    tag = "Sessions"
)]
#[instrument(skip(state))]
pub async fn get_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainingSession>>, AppError> {
    let sessions = SessionService::get_sessions(&state.db).await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = TrainingSession),
        (status = 404, description = "Session not found", body = ErrorResponse)
    ),
    tag = "Sessions"
)]
#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingSession>, AppError> {
    let session = SessionService::get_session_by_id(&state.db, id).await?;
    Ok(Json(session))
}
