use crate::modules::enrollments::controller::{
    create_enrollment, get_enrollment, get_enrollments, get_student_enrollments,
    update_enrollment_status,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_enrollments).post(create_enrollment))
        .route("/student/{student_id}", get(get_student_enrollments))
        .route("/{id}", get(get_enrollment))
        .route("/{id}/status", patch(update_enrollment_status))
}
