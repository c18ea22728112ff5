use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::enrollments::model::{
    CreateEnrollmentDto, PaginatedEnrollmentsResponse, StudentEnrollment,
    UpdateEnrollmentStatusDto,
};
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::students::controller::ErrorResponse;
use crate::state::AppState;
use formation_core::AppError;
use formation_core::pagination::{PaginationMeta, PaginationParams};

#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment created", body = StudentEnrollment),
        (status = 400, description = "Unknown student or session", body = ErrorResponse),
        (status = 409, description = "Already enrolled in this session", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    Json(dto): Json<CreateEnrollmentDto>,
) -> Result<Json<StudentEnrollment>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let enrollment = EnrollmentService::enroll(&state.db, dto).await?;
    Ok(Json(enrollment))
}

#[utoipa::path(
    get,
    path = "/api/enrollments",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of enrollments", body = PaginatedEnrollmentsResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_enrollments(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedEnrollmentsResponse>, AppError> {
    let (enrollments, total) = EnrollmentService::get_enrollments(&state.db, &params).await?;

    Ok(Json(PaginatedEnrollmentsResponse {
        data: enrollments,
        meta: PaginationMeta::new(&params, total),
    }))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment details", body = StudentEnrollment),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentEnrollment>, AppError> {
    let enrollment = EnrollmentService::get_enrollment_by_id(&state.db, id).await?;
    Ok(Json(enrollment))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Enrollments of one student", body = Vec<StudentEnrollment>)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_student_enrollments(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<StudentEnrollment>>, AppError> {
    let enrollments = EnrollmentService::get_student_enrollments(&state.db, student_id).await?;
    Ok(Json(enrollments))
}

#[utoipa::path(
    patch,
    path = "/api/enrollments/{id}/status",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentStatusDto,
    responses(
        (status = 200, description = "Status updated", body = StudentEnrollment),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 422, description = "Illegal transition or missing dropout reason", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn update_enrollment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateEnrollmentStatusDto>,
) -> Result<Json<StudentEnrollment>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let enrollment = EnrollmentService::update_status(&state.db, id, dto).await?;
    Ok(Json(enrollment))
}
