use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::controller::ErrorResponse;
use crate::modules::templates::model::{
    CreateTemplateDto, DocumentTemplate, RenderTemplateDto, RenderedTemplate, UpdateTemplateDto,
};
use crate::modules::templates::service::TemplateService;
use crate::state::AppState;
use formation_core::AppError;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TemplateFilter {
    pub document_type_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/templates",
    request_body = CreateTemplateDto,
    responses(
        (status = 200, description = "Template created", body = DocumentTemplate),
        (status = 400, description = "Unknown document type", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Templates"
)]
#[instrument(skip(state, dto))]
pub async fn create_template(
    State(state): State<AppState>,
    Json(dto): Json<CreateTemplateDto>,
) -> Result<Json<DocumentTemplate>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let template = TemplateService::create_template(&state.db, dto).await?;
    Ok(Json(template))
}

#[utoipa::path(
    get,
    path = "/api/templates",
    params(TemplateFilter),
    responses(
        (status = 200, description = "List of templates", body = Vec<DocumentTemplate>)
    ),
    tag = "Templates"
)]
#[instrument(skip(state))]
pub async fn get_templates(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> Result<Json<Vec<DocumentTemplate>>, AppError> {
    let templates = TemplateService::get_templates(&state.db, filter.document_type_id).await?;
    Ok(Json(templates))
}

#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template details", body = DocumentTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    tag = "Templates"
)]
#[instrument(skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentTemplate>, AppError> {
    let template = TemplateService::get_template_by_id(&state.db, id).await?;
    Ok(Json(template))
}

#[utoipa::path(
    put,
    path = "/api/templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    request_body = UpdateTemplateDto,
    responses(
        (status = 200, description = "Template updated", body = DocumentTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    tag = "Templates"
)]
#[instrument(skip(state, dto))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateTemplateDto>,
) -> Result<Json<DocumentTemplate>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let template = TemplateService::update_template(&state.db, id, dto).await?;
    Ok(Json(template))
}

#[utoipa::path(
    delete,
    path = "/api/templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template deleted"),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    tag = "Templates"
)]
#[instrument(skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    TemplateService::delete_template(&state.db, id).await?;
    Ok(Json(json!({"message": "Template deleted successfully"})))
}

#[utoipa::path(
    post,
    path = "/api/templates/{id}/default",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template promoted to default", body = DocumentTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    tag = "Templates"
)]
#[instrument(skip(state))]
pub async fn set_default_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentTemplate>, AppError> {
    let template = TemplateService::set_default(&state.db, id).await?;
    Ok(Json(template))
}

#[utoipa::path(
    post,
    path = "/api/templates/{id}/duplicate",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template duplicated", body = DocumentTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    tag = "Templates"
)]
#[instrument(skip(state))]
pub async fn duplicate_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentTemplate>, AppError> {
    let template = TemplateService::duplicate_template(&state.db, id).await?;
    Ok(Json(template))
}

#[utoipa::path(
    post,
    path = "/api/templates/{id}/render",
    params(("id" = Uuid, Path, description = "Template ID")),
    request_body = RenderTemplateDto,
    responses(
        (status = 200, description = "Rendered template", body = RenderedTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    tag = "Templates"
)]
#[instrument(skip(state, dto))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<RenderTemplateDto>,
) -> Result<Json<RenderedTemplate>, AppError> {
    let rendered = TemplateService::render_template(&state.db, id, dto).await?;
    Ok(Json(rendered))
}
