use crate::modules::students::controller::{
    create_student, delete_student, export_students, forgot_password, get_dashboard_stats,
    get_student, get_students, request_email_verification, reset_password, send_welcome_email,
    update_student, verify_email,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route("/export", get(export_students))
        .route("/stats", get(get_dashboard_stats))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/verify-email", post(verify_email))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{id}/welcome", post(send_welcome_email))
        .route("/{id}/verification", post(request_email_verification))
}
