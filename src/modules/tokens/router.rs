use crate::modules::tokens::controller::{
    bulk_issue_tokens, delete_token, get_token, get_tokens, issue_token,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_tokens_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_tokens).post(issue_token))
        .route("/bulk", post(bulk_issue_tokens))
        .route("/{id}", get(get_token).delete(delete_token))
}
