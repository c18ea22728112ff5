use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::document_types::model::{
    CreateDocumentTypeDto, DocumentType, UpdateDocumentTypeDto,
};
use crate::modules::document_types::service::DocumentTypeService;
use crate::modules::students::controller::ErrorResponse;
use crate::state::AppState;
use formation_core::AppError;

#[utoipa::path(
    post,
    path = "/api/document-types",
    request_body = CreateDocumentTypeDto,
    responses(
        (status = 200, description = "Document type created", body = DocumentType),
        (status = 409, description = "Code already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Document types"
)]
#[instrument(skip(state))]
pub async fn create_document_type(
    State(state): State<AppState>,
    Json(dto): Json<CreateDocumentTypeDto>,
) -> Result<Json<DocumentType>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let document_type = DocumentTypeService::create_type(&state.db, dto).await?;
    Ok(Json(document_type))
}

#[utoipa::path(
    get,
    path = "/api/document-types",
    responses(
        (status = 200, description = "All document types", body = Vec<DocumentType>)
    ),
    tag = "Document types"
)]
#[instrument(skip(state))]
pub async fn get_document_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentType>>, AppError> {
    let types = DocumentTypeService::get_types(&state.db).await?;
    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/api/document-types/{id}",
    params(("id" = Uuid, Path, description = "Document type ID")),
    responses(
        (status = 200, description = "Document type details", body = DocumentType),
        (status = 404, description = "Document type not found", body = ErrorResponse)
    ),
    tag = "Document types"
)]
#[instrument(skip(state))]
pub async fn get_document_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentType>, AppError> {
    let document_type = DocumentTypeService::get_type_by_id(&state.db, id).await?;
    Ok(Json(document_type))
}

#[utoipa::path(
    put,
    path = "/api/document-types/{id}",
    params(("id" = Uuid, Path, description = "Document type ID")),
    request_body = UpdateDocumentTypeDto,
    responses(
        (status = 200, description = "Document type updated", body = DocumentType),
        (status = 404, description = "Document type not found", body = ErrorResponse)
    ),
    tag = "Document types"
)]
#[instrument(skip(state))]
pub async fn update_document_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateDocumentTypeDto>,
) -> Result<Json<DocumentType>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let document_type = DocumentTypeService::update_type(&state.db, id, dto).await?;
    Ok(Json(document_type))
}

#[utoipa::path(
    delete,
    path = "/api/document-types/{id}",
    params(("id" = Uuid, Path, description = "Document type ID")),
    responses(
        (status = 200, description = "Document type deleted"),
        (status = 404, description = "Document type not found", body = ErrorResponse),
        (status = 409, description = "Type is still referenced by documents", body = ErrorResponse)
    ),
    tag = "Document types"
)]
#[instrument(skip(state))]
pub async fn delete_document_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    DocumentTypeService::delete_type(&state.db, id).await?;
    Ok(Json(json!({"message": "Document type deleted successfully"})))
}
