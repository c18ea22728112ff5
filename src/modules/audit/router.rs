use crate::modules::audit::controller::{get_audit_logs, get_entity_history};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_audit_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_audit_logs))
        .route("/{entity_type}/{entity_id}", get(get_entity_history))
}
