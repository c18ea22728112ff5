use crate::modules::sessions::controller::{create_session, get_session, get_sessions};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_sessions).post(create_session))
        .route("/{id}", get(get_session))
}
