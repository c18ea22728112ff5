use crate::modules::metadata::controller::{
    delete_metadata, get_metadata, get_typed_metadata, set_metadata, update_metadata,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

/// Nested under `/documents/{id}/metadata`.
pub fn init_metadata_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_metadata).post(set_metadata))
        .route("/typed", get(get_typed_metadata))
        .route("/{key}", put(update_metadata).delete(delete_metadata))
}
