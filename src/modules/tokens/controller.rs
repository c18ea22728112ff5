use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::controller::ErrorResponse;
use crate::modules::tokens::model::{
    AccessToken, BulkIssueTokensDto, IssueTokenDto, TokenWithStatus,
};
use crate::modules::tokens::service::{DEFAULT_VALIDITY_DAYS, TokenService};
use crate::state::AppState;
use formation_core::AppError;
use formation_core::pagination::{PaginationMeta, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTokensResponse {
    pub data: Vec<TokenWithStatus>,
    pub meta: PaginationMeta,
}

#[utoipa::path(
    post,
    path = "/api/tokens",
    request_body = IssueTokenDto,
    responses(
        (status = 200, description = "Token issued", body = AccessToken),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Tokens"
)]
#[instrument(skip(state, dto))]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(dto): Json<IssueTokenDto>,
) -> Result<Json<AccessToken>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let token = TokenService::issue(
        &state.db,
        dto.purpose,
        dto.student_id,
        dto.validity_days.unwrap_or(DEFAULT_VALIDITY_DAYS),
    )
    .await?;
    Ok(Json(token))
}

#[utoipa::path(
    post,
    path = "/api/tokens/bulk",
    request_body = BulkIssueTokensDto,
    responses(
        (status = 200, description = "Tokens issued", body = Vec<AccessToken>),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Generation retry budget exhausted", body = ErrorResponse)
    ),
    tag = "Tokens"
)]
#[instrument(skip(state, dto))]
pub async fn bulk_issue_tokens(
    State(state): State<AppState>,
    Json(dto): Json<BulkIssueTokensDto>,
) -> Result<Json<Vec<AccessToken>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let tokens = TokenService::bulk_issue(&state.db, dto).await?;
    Ok(Json(tokens))
}

#[utoipa::path(
    get,
    path = "/api/tokens",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of tokens with expiration status", body = PaginatedTokensResponse)
    ),
    tag = "Tokens"
)]
#[instrument(skip(state))]
pub async fn get_tokens(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedTokensResponse>, AppError> {
    let (tokens, total) = TokenService::get_tokens(&state.db, &params).await?;

    Ok(Json(PaginatedTokensResponse {
        data: tokens,
        meta: PaginationMeta::new(&params, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/tokens/{id}",
    params(("id" = Uuid, Path, description = "Token ID")),
    responses(
        (status = 200, description = "Token with expiration status", body = TokenWithStatus),
        (status = 404, description = "Token not found", body = ErrorResponse)
    ),
    tag = "Tokens"
)]
#[instrument(skip(state))]
pub async fn get_token(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TokenWithStatus>, AppError> {
    let token = TokenService::get_token_by_id(&state.db, id).await?;
    Ok(Json(token))
}

#[utoipa::path(
    delete,
    path = "/api/tokens/{id}",
    params(("id" = Uuid, Path, description = "Token ID")),
    responses(
        (status = 200, description = "Token deleted"),
        (status = 404, description = "Token not found", body = ErrorResponse)
    ),
    tag = "Tokens"
)]
#[instrument(skip(state))]
pub async fn delete_token(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    TokenService::delete_token(&state.db, id).await?;
    Ok(Json(json!({"message": "Token deleted successfully"})))
}
