use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::controller::ErrorResponse;
use crate::modules::ui_templates::model::{
    CreateUiComponentDto, CreateUiTemplateDto, DocumentUiComponent, DocumentUiTemplate,
    ReorderComponentsDto, UiTemplateWithComponents, UpdateUiTemplateDto,
};
use crate::modules::ui_templates::service::UiTemplateService;
use crate::state::AppState;
use formation_core::AppError;

#[utoipa::path(
    post,
    path = "/api/ui-templates",
    request_body = CreateUiTemplateDto,
    responses(
        (status = 200, description = "UI template created", body = DocumentUiTemplate),
        (status = 400, description = "Unknown document type", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state))]
pub async fn create_ui_template(
    State(state): State<AppState>,
    Json(dto): Json<CreateUiTemplateDto>,
) -> Result<Json<DocumentUiTemplate>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let template = UiTemplateService::create_template(&state.db, dto).await?;
    Ok(Json(template))
}

#[utoipa::path(
    get,
    path = "/api/ui-templates",
    responses(
        (status = 200, description = "List of UI templates", body = Vec<DocumentUiTemplate>)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state))]
pub async fn get_ui_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentUiTemplate>>, AppError> {
    let templates = UiTemplateService::get_templates(&state.db).await?;
    Ok(Json(templates))
}

#[utoipa::path(
    get,
    path = "/api/ui-templates/{id}",
    params(("id" = Uuid, Path, description = "UI template ID")),
    responses(
        (status = 200, description = "UI template with its components", body = UiTemplateWithComponents),
        (status = 404, description = "UI template not found", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state))]
pub async fn get_ui_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UiTemplateWithComponents>, AppError> {
    let template = UiTemplateService::get_template_with_components(&state.db, id).await?;
    Ok(Json(template))
}

#[utoipa::path(
    put,
    path = "/api/ui-templates/{id}",
    params(("id" = Uuid, Path, description = "UI template ID")),
    request_body = UpdateUiTemplateDto,
    responses(
        (status = 200, description = "UI template updated", body = DocumentUiTemplate),
        (status = 404, description = "UI template not found", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state))]
pub async fn update_ui_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateUiTemplateDto>,
) -> Result<Json<DocumentUiTemplate>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let template = UiTemplateService::update_template(&state.db, id, dto).await?;
    Ok(Json(template))
}

#[utoipa::path(
    delete,
    path = "/api/ui-templates/{id}",
    params(("id" = Uuid, Path, description = "UI template ID")),
    responses(
        (status = 200, description = "UI template deleted"),
        (status = 404, description = "UI template not found", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state))]
pub async fn delete_ui_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    UiTemplateService::delete_template(&state.db, id).await?;
    Ok(Json(json!({"message": "UI template deleted successfully"})))
}

#[utoipa::path(
    post,
    path = "/api/ui-templates/{id}/components",
    params(("id" = Uuid, Path, description = "UI template ID")),
    request_body = CreateUiComponentDto,
    responses(
        (status = 200, description = "Component added", body = DocumentUiComponent),
        (status = 404, description = "UI template not found", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state, dto))]
pub async fn add_ui_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<CreateUiComponentDto>,
) -> Result<Json<DocumentUiComponent>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let component = UiTemplateService::add_component(&state.db, id, dto).await?;
    Ok(Json(component))
}

#[utoipa::path(
    delete,
    path = "/api/ui-templates/{id}/components/{component_id}",
    params(
        ("id" = Uuid, Path, description = "UI template ID"),
        ("component_id" = Uuid, Path, description = "Component ID")
    ),
    responses(
        (status = 200, description = "Component removed"),
        (status = 404, description = "Component not found", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state))]
pub async fn delete_ui_component(
    State(state): State<AppState>,
    Path((id, component_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    UiTemplateService::delete_component(&state.db, id, component_id).await?;
    Ok(Json(json!({"message": "Component removed successfully"})))
}

#[utoipa::path(
    put,
    path = "/api/ui-templates/{id}/components/order",
    params(("id" = Uuid, Path, description = "UI template ID")),
    request_body = ReorderComponentsDto,
    responses(
        (status = 200, description = "Components reordered", body = Vec<DocumentUiComponent>),
        (status = 404, description = "UI template not found", body = ErrorResponse),
        (status = 422, description = "Ids are not a permutation of the components", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state, dto))]
pub async fn reorder_ui_components(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<ReorderComponentsDto>,
) -> Result<Json<Vec<DocumentUiComponent>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let components = UiTemplateService::reorder_components(&state.db, id, dto).await?;
    Ok(Json(components))
}

#[utoipa::path(
    get,
    path = "/api/ui-templates/{id}/render",
    params(("id" = Uuid, Path, description = "UI template ID")),
    responses(
        (status = 200, description = "Assembled HTML fragment", content_type = "text/html"),
        (status = 404, description = "UI template not found", body = ErrorResponse)
    ),
    tag = "UI templates"
)]
#[instrument(skip(state))]
pub async fn render_ui_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let html = UiTemplateService::render_template(&state.db, id).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    ))
}
