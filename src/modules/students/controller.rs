use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::model::{
    CreateStudentDto, DashboardStats, PaginatedStudentsResponse, ResetPasswordDto, Student,
    UpdateStudentDto, VerifyEmailDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::email::EmailService;
use formation_core::pagination::{PaginationMeta, PaginationParams};
use formation_core::AppError;

/// Error payload shared by every endpoint.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordDto {
    #[validate(email)]
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 200, description = "Student created successfully", body = Student),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    Json(dto): Json<CreateStudentDto>,
) -> Result<Json<Student>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let student = StudentService::create_student(&state.db, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of students", body = PaginatedStudentsResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let (students, total) = StudentService::get_students(&state.db, &params).await?;

    Ok(Json(PaginatedStudentsResponse {
        data: students,
        meta: PaginationMeta::new(&params, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/students/export",
    responses(
        (status = 200, description = "CSV export of all students", content_type = "text/csv")
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn export_students(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let csv = StudentService::export_csv(&state.db).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"students.csv\"",
            ),
        ],
        csv,
    ))
}

#[utoipa::path(
    get,
    path = "/api/students/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = StudentService::dashboard_stats(&state.db).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get_student_by_id(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated successfully", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted successfully"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(json!({"message": "Student deleted successfully"})))
}

#[utoipa::path(
    post,
    path = "/api/students/{id}/welcome",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Welcome email sent"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn send_welcome_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    StudentService::send_welcome_email(&state.db, &email_service, id).await?;
    Ok(Json(json!({"message": "Welcome email sent"})))
}

#[utoipa::path(
    post,
    path = "/api/students/{id}/verification",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Verification email sent"),
        (status = 400, description = "Email already verified", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn request_email_verification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    StudentService::request_email_verification(&state.db, &email_service, id).await?;
    Ok(Json(json!({"message": "Verification email sent"})))
}

#[utoipa::path(
    post,
    path = "/api/students/forgot-password",
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset email sent if the address exists")
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(dto): Json<ForgotPasswordDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let email_service = EmailService::new(state.email_config.clone());
    StudentService::request_password_reset(&state.db, &email_service, &dto.email).await?;
    Ok(Json(
        json!({"message": "If the address exists, a reset email has been sent"}),
    ))
}

#[utoipa::path(
    post,
    path = "/api/students/reset-password",
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password reset successfully"),
        (status = 422, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(dto): Json<ResetPasswordDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    StudentService::reset_password(&state.db, dto).await?;
    Ok(Json(json!({"message": "Password reset successfully"})))
}

#[utoipa::path(
    post,
    path = "/api/students/verify-email",
    request_body = VerifyEmailDto,
    responses(
        (status = 200, description = "Email verified", body = Student),
        (status = 422, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(dto): Json<VerifyEmailDto>,
) -> Result<Json<Student>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let student = StudentService::verify_email(&state.db, dto).await?;
    Ok(Json(student))
}
