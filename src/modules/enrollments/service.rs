use anyhow::Context;
use serde_json::json;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics;
use crate::modules::audit::model::{AuditAction, build_changes};
use crate::modules::audit::service::AuditService;
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, StudentEnrollment, UpdateEnrollmentStatusDto,
};
use formation_core::AppError;
use formation_core::pagination::PaginationParams;

const ENROLLMENT_COLUMNS: &str = "id, student_id, session_id, progress_id, status, \
     dropout_reason, enrolled_at, completed_at, updated_at";

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls a student into a session. A student can hold at most one
    /// enrollment per session.
    #[instrument(skip(db, dto))]
    pub async fn enroll(db: &PgPool, dto: CreateEnrollmentDto) -> Result<StudentEnrollment, AppError> {
        let mut tx = db.begin().await.context("Failed to open transaction")?;

        let enrollment = sqlx::query_as::<_, StudentEnrollment>(&format!(
            "INSERT INTO student_enrollments (student_id, session_id)
             VALUES ($1, $2)
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(dto.student_id)
        .bind(dto.session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Student is already enrolled in this session"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Unknown student or session"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        AuditService::record(
            &mut *tx,
            "enrollment",
            enrollment.id,
            AuditAction::Created,
            json!({
                "student_id": { "old": null, "new": enrollment.student_id },
                "session_id": { "old": null, "new": enrollment.session_id },
            }),
            None,
        )
        .await?;

        tx.commit().await.context("Failed to commit enrollment")?;

        Ok(enrollment)
    }

    #[instrument(skip(db))]
    pub async fn get_enrollments(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<(Vec<StudentEnrollment>, i64), AppError> {
        let enrollments = sqlx::query_as::<_, StudentEnrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS}
             FROM student_enrollments
             ORDER BY enrolled_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch enrollments")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM student_enrollments")
            .fetch_one(db)
            .await
            .context("Failed to count enrollments")
            .map_err(AppError::database)?;

        Ok((enrollments, total))
    }

    #[instrument(skip(db))]
    pub async fn get_enrollment_by_id(
        db: &PgPool,
        id: Uuid,
    ) -> Result<StudentEnrollment, AppError> {
        sqlx::query_as::<_, StudentEnrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM student_enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch enrollment by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Enrollment not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_student_enrollments(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<StudentEnrollment>, AppError> {
        sqlx::query_as::<_, StudentEnrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS}
             FROM student_enrollments
             WHERE student_id = $1
             ORDER BY enrolled_at DESC"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student enrollments")
        .map_err(AppError::database)
    }

    /// Moves an enrollment through the status transition table. Dropping out
    /// requires a non-empty reason; completion stamps `completed_at`.
    #[instrument(skip(db, dto))]
    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        dto: UpdateEnrollmentStatusDto,
    ) -> Result<StudentEnrollment, AppError> {
        let current = Self::get_enrollment_by_id(db, id).await?;

        if !current.status.can_transition_to(dto.status) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Cannot change enrollment status from {} to {}",
                current.status.as_str(),
                dto.status.as_str()
            )));
        }

        let dropout_reason = dto
            .dropout_reason()
            .map_err(|e| AppError::unprocessable(anyhow::anyhow!(e)))?;

        let mut tx = db.begin().await.context("Failed to open transaction")?;

        let updated = sqlx::query_as::<_, StudentEnrollment>(&format!(
            "UPDATE student_enrollments
             SET status = $1,
                 dropout_reason = $2,
                 completed_at = CASE WHEN $1 = 'completed'::enrollment_status
                                     THEN NOW() ELSE completed_at END,
                 updated_at = NOW()
             WHERE id = $3
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(dto.status)
        .bind(&dropout_reason)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update enrollment status")
        .map_err(AppError::database)?;

        let changes = build_changes(&[
            (
                "status",
                json!(current.status.as_str()),
                json!(dto.status.as_str()),
            ),
            (
                "dropout_reason",
                json!(current.dropout_reason),
                json!(dropout_reason),
            ),
        ]);

        AuditService::record(
            &mut *tx,
            "enrollment",
            id,
            AuditAction::StatusChanged,
            changes,
            None,
        )
        .await?;

        tx.commit()
            .await
            .context("Failed to commit status change")?;

        metrics::track_enrollment_status_change(current.status.as_str(), dto.status.as_str());

        Ok(updated)
    }
}
