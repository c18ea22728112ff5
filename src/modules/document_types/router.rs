use crate::modules::document_types::controller::{
    create_document_type, delete_document_type, get_document_type, get_document_types,
    update_document_type,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_document_types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_document_types).post(create_document_type))
        .route(
            "/{id}",
            get(get_document_type)
                .put(update_document_type)
                .delete(delete_document_type),
        )
}
