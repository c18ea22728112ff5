use crate::modules::progress::controller::{
    assess_all, assess_enrollment, get_at_risk_students, get_progress, upsert_progress,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn init_progress_router() -> Router<AppState> {
    Router::new()
        .route("/", put(upsert_progress))
        .route("/assess-all", post(assess_all))
        .route("/at-risk", get(get_at_risk_students))
        .route("/{enrollment_id}", get(get_progress))
        .route("/{enrollment_id}/assess", post(assess_enrollment))
}
