use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::audit::router::init_audit_router;
use crate::modules::document_types::router::init_document_types_router;
use crate::modules::documents::router::init_documents_router;
use crate::modules::enrollments::router::init_enrollments_router;
use crate::modules::metadata::router::init_metadata_router;
use crate::modules::progress::router::init_progress_router;
use crate::modules::sessions::router::init_sessions_router;
use crate::modules::students::router::init_students_router;
use crate::modules::templates::router::init_templates_router;
use crate::modules::tokens::router::init_tokens_router;
use crate::modules::ui_templates::router::init_ui_templates_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/students", init_students_router())
                .nest("/sessions", init_sessions_router())
                .nest("/enrollments", init_enrollments_router())
                .nest("/progress", init_progress_router())
                .nest("/tokens", init_tokens_router())
                .nest("/audit", init_audit_router())
                .nest(
                    "/documents",
                    init_documents_router().nest("/{id}/metadata", init_metadata_router()),
                )
                .nest("/document-types", init_document_types_router())
                .nest("/templates", init_templates_router())
                .nest("/ui-templates", init_ui_templates_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
