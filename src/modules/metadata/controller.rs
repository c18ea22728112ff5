use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::metadata::model::{
    DocumentMetadata, SetMetadataDto, TypedMetadata, UpdateMetadataDto,
};
use crate::modules::metadata::service::MetadataService;
use crate::modules::students::controller::ErrorResponse;
use crate::state::AppState;
use formation_core::AppError;

#[utoipa::path(
    post,
    path = "/api/documents/{id}/metadata",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = SetMetadataDto,
    responses(
        (status = 200, description = "Metadata attached", body = DocumentMetadata),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Key already exists on this document", body = ErrorResponse),
        (status = 422, description = "Value does not match its declared type", body = ErrorResponse)
    ),
    tag = "Metadata"
)]
#[instrument(skip(state, dto))]
pub async fn set_metadata(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<SetMetadataDto>,
) -> Result<Json<DocumentMetadata>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let entry = MetadataService::set_metadata(&state.db, id, dto).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}/metadata",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Metadata of one document", body = Vec<DocumentMetadata>),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Metadata"
)]
#[instrument(skip(state))]
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DocumentMetadata>>, AppError> {
    let entries = MetadataService::get_metadata(&state.db, id).await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}/metadata/typed",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Metadata with typed JSON values", body = Vec<TypedMetadata>),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Metadata"
)]
#[instrument(skip(state))]
pub async fn get_typed_metadata(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TypedMetadata>>, AppError> {
    let entries = MetadataService::get_typed_metadata(&state.db, id).await?;
    Ok(Json(entries))
}

#[utoipa::path(
    put,
    path = "/api/documents/{id}/metadata/{key}",
    params(
        ("id" = Uuid, Path, description = "Document ID"),
        ("key" = String, Path, description = "Metadata key")
    ),
    request_body = UpdateMetadataDto,
    responses(
        (status = 200, description = "Metadata value updated", body = DocumentMetadata),
        (status = 404, description = "Metadata key not found", body = ErrorResponse),
        (status = 422, description = "Value does not match its declared type", body = ErrorResponse)
    ),
    tag = "Metadata"
)]
#[instrument(skip(state, dto))]
pub async fn update_metadata(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
    Json(dto): Json<UpdateMetadataDto>,
) -> Result<Json<DocumentMetadata>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let entry = MetadataService::update_metadata(&state.db, id, &key, dto).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}/metadata/{key}",
    params(
        ("id" = Uuid, Path, description = "Document ID"),
        ("key" = String, Path, description = "Metadata key")
    ),
    responses(
        (status = 200, description = "Metadata entry deleted"),
        (status = 404, description = "Metadata key not found", body = ErrorResponse)
    ),
    tag = "Metadata"
)]
#[instrument(skip(state))]
pub async fn delete_metadata(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    MetadataService::delete_metadata(&state.db, id, &key).await?;
    Ok(Json(json!({"message": "Metadata entry deleted successfully"})))
}
