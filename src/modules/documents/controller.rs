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

use crate::modules::documents::model::{
    CreateDocumentDto, Document, DocumentVersion, UpdateDocumentDto,
};
use crate::modules::documents::service::DocumentService;
use crate::modules::students::controller::ErrorResponse;
use crate::state::AppState;
use formation_core::AppError;
use formation_core::pagination::{PaginationMeta, PaginationParams};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedDocumentsResponse {
    pub data: Vec<Document>,
    pub meta: PaginationMeta,
}

#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentDto,
    responses(
        (status = 200, description = "Document created with its initial version", body = Document),
        (status = 400, description = "Unknown document type", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state, dto))]
pub async fn create_document(
    State(state): State<AppState>,
    Json(dto): Json<CreateDocumentDto>,
) -> Result<Json<Document>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let document = DocumentService::create_document(&state.db, dto).await?;
    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/api/documents",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of documents", body = PaginatedDocumentsResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state))]
pub async fn get_documents(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedDocumentsResponse>, AppError> {
    let (documents, total) = DocumentService::get_documents(&state.db, &params).await?;

    Ok(Json(PaginatedDocumentsResponse {
        data: documents,
        meta: PaginationMeta::new(&params, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document details", body = Document),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state))]
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, AppError> {
    let document = DocumentService::get_document_by_id(&state.db, id).await?;
    Ok(Json(document))
}

#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateDocumentDto,
    responses(
        (status = 200, description = "Document updated, new version minted", body = Document),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state, dto))]
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateDocumentDto>,
) -> Result<Json<Document>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let document = DocumentService::update_document(&state.db, id, dto).await?;
    Ok(Json(document))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state))]
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    DocumentService::delete_document(&state.db, id).await?;
    Ok(Json(json!({"message": "Document deleted successfully"})))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}/versions",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Version history, newest first", body = Vec<DocumentVersion>),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state))]
pub async fn get_document_versions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DocumentVersion>>, AppError> {
    let versions = DocumentService::get_versions(&state.db, id).await?;
    Ok(Json(versions))
}

#[utoipa::path(
    post,
    path = "/api/documents/{id}/versions/{version_id}/restore",
    params(
        ("id" = Uuid, Path, description = "Document ID"),
        ("version_id" = Uuid, Path, description = "Version to restore")
    ),
    responses(
        (status = 200, description = "Version restored as a new current version", body = Document),
        (status = 404, description = "Document or version not found", body = ErrorResponse)
    ),
    tag = "Documents"
)]
#[instrument(skip(state))]
pub async fn restore_document_version(
    State(state): State<AppState>,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Document>, AppError> {
    let document = DocumentService::restore_version(&state.db, id, version_id).await?;
    Ok(Json(document))
}
