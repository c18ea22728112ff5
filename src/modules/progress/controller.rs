use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::{instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::progress::model::{
    AtRiskStudent, RiskFactor, RiskSweepSummary, StudentProgress, UpsertProgressDto,
};
use crate::modules::progress::service::ProgressService;
use crate::modules::students::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::email::EmailService;
use formation_core::AppError;

/// Assessment enriched with the advisory texts for the triggered factors.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssessmentResponse {
    pub score: f64,
    pub at_risk: bool,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

#[utoipa::path(
    put,
    path = "/api/progress",
    request_body = UpsertProgressDto,
    responses(
        (status = 200, description = "Progress recorded", body = StudentProgress),
        (status = 400, description = "Unknown enrollment", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Progress"
)]
#[instrument(skip(state, dto))]
pub async fn upsert_progress(
    State(state): State<AppState>,
    Json(dto): Json<UpsertProgressDto>,
) -> Result<Json<StudentProgress>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let progress = ProgressService::upsert_progress(&state.db, dto).await?;
    Ok(Json(progress))
}

#[utoipa::path(
    get,
    path = "/api/progress/{enrollment_id}",
    params(("enrollment_id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Progress of one enrollment", body = StudentProgress),
        (status = 404, description = "No progress recorded", body = ErrorResponse)
    ),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_progress(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
) -> Result<Json<StudentProgress>, AppError> {
    let progress = ProgressService::get_progress_by_enrollment(&state.db, enrollment_id).await?;
    Ok(Json(progress))
}

#[utoipa::path(
    post,
    path = "/api/progress/{enrollment_id}/assess",
    params(("enrollment_id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Risk assessment with recommendations", body = AssessmentResponse),
        (status = 404, description = "No progress recorded", body = ErrorResponse)
    ),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn assess_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let assessment = ProgressService::assess_enrollment(&state.db, enrollment_id).await?;

    let recommendations = assessment.recommendations();
    Ok(Json(AssessmentResponse {
        score: assessment.score,
        at_risk: assessment.at_risk,
        factors: assessment.factors,
        recommendations,
    }))
}

#[utoipa::path(
    post,
    path = "/api/progress/assess-all",
    responses(
        (status = 200, description = "Batch scoring summary", body = RiskSweepSummary)
    ),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn assess_all(
    State(state): State<AppState>,
) -> Result<Json<RiskSweepSummary>, AppError> {
    let summary = ProgressService::assess_all(&state.db).await?;

    if summary.at_risk > 0 {
        let email_service = EmailService::new(state.email_config.clone());
        if let Err(e) = email_service
            .send_admin_notification(
                "Stagiaires en risque de décrochage",
                &format!(
                    "Le calcul des scores de risque a identifié {} stagiaire(s) en risque \
                     de décrochage sur {} évalué(s).",
                    summary.at_risk, summary.assessed
                ),
            )
            .await
        {
            warn!(error = %e.error, "Failed to notify admin after risk sweep");
        }
    }

    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/progress/at-risk",
    responses(
        (status = 200, description = "Students at risk, most endangered first", body = Vec<AtRiskStudent>)
    ),
    tag = "Progress"
)]
#[instrument(skip(state))]
pub async fn get_at_risk_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<AtRiskStudent>>, AppError> {
    let students = ProgressService::get_at_risk_students(&state.db).await?;
    Ok(Json(students))
}
