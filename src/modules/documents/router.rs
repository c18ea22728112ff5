use crate::modules::documents::controller::{
    create_document, delete_document, get_document, get_document_versions, get_documents,
    restore_document_version, update_document,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_documents_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_documents).post(create_document))
        .route(
            "/{id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/{id}/versions", get(get_document_versions))
        .route(
            "/{id}/versions/{version_id}/restore",
            post(restore_document_version),
        )
}
