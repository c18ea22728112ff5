use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::metrics;
use crate::modules::progress::model::{
    AT_RISK_THRESHOLD, AtRiskStudent, RiskAssessment, RiskInputs, RiskSweepSummary,
    StudentProgress, UpsertProgressDto, evaluate_risk,
};
use formation_core::AppError;

const PROGRESS_COLUMNS: &str = "id, enrollment_id, engagement_score, completion_percentage, \
     attendance_rate, missed_sessions, last_activity_at, started_at, risk_score, \
     difficulty_signals, assessed_at, created_at, updated_at";

pub struct ProgressService;

impl ProgressService {
    /// Creates or updates the progress record of an enrollment. Measurements
    /// not present in the payload keep their stored value.
    #[instrument(skip(db, dto))]
    pub async fn upsert_progress(
        db: &PgPool,
        dto: UpsertProgressDto,
    ) -> Result<StudentProgress, AppError> {
        let mut tx = db.begin().await.context("Failed to open transaction")?;

        let progress = sqlx::query_as::<_, StudentProgress>(&format!(
            "INSERT INTO student_progress
                 (enrollment_id, engagement_score, completion_percentage, attendance_rate,
                  missed_sessions, last_activity_at, started_at)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, COALESCE($7, NOW()))
             ON CONFLICT (enrollment_id) DO UPDATE SET
                 engagement_score = COALESCE($2, student_progress.engagement_score),
                 completion_percentage = COALESCE($3, student_progress.completion_percentage),
                 attendance_rate = COALESCE($4, student_progress.attendance_rate),
                 missed_sessions = COALESCE($5, student_progress.missed_sessions),
                 last_activity_at = COALESCE($6, student_progress.last_activity_at),
                 started_at = COALESCE($7, student_progress.started_at),
                 updated_at = NOW()
             RETURNING {PROGRESS_COLUMNS}"
        ))
        .bind(dto.enrollment_id)
        .bind(dto.engagement_score)
        .bind(dto.completion_percentage)
        .bind(dto.attendance_rate)
        .bind(dto.missed_sessions)
        .bind(dto.last_activity_at)
        .bind(dto.started_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Unknown enrollment"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        sqlx::query("UPDATE student_enrollments SET progress_id = $1 WHERE id = $2")
            .bind(progress.id)
            .bind(progress.enrollment_id)
            .execute(&mut *tx)
            .await
            .context("Failed to link progress to enrollment")
            .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit progress")?;

        Ok(progress)
    }

    #[instrument(skip(db))]
    pub async fn get_progress_by_enrollment(
        db: &PgPool,
        enrollment_id: Uuid,
    ) -> Result<StudentProgress, AppError> {
        sqlx::query_as::<_, StudentProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM student_progress WHERE enrollment_id = $1"
        ))
        .bind(enrollment_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch progress")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("No progress recorded for this enrollment"))
        })
    }

    /// Scores one enrollment and persists the result onto its progress row.
    #[instrument(skip(db))]
    pub async fn assess_enrollment(
        db: &PgPool,
        enrollment_id: Uuid,
    ) -> Result<RiskAssessment, AppError> {
        let progress = Self::get_progress_by_enrollment(db, enrollment_id).await?;
        let assessment = Self::store_assessment(db, &progress).await?;
        Ok(assessment)
    }

    /// Scores every progress record. Individual failures are counted, not
    /// fatal, so one bad row cannot sink the sweep.
    #[instrument(skip(db))]
    pub async fn assess_all(db: &PgPool) -> Result<RiskSweepSummary, AppError> {
        let rows = sqlx::query_as::<_, StudentProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM student_progress ORDER BY created_at"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch progress records for sweep")
        .map_err(AppError::database)?;

        let mut summary = RiskSweepSummary {
            assessed: 0,
            at_risk: 0,
            failures: 0,
        };

        for progress in rows {
            match Self::store_assessment(db, &progress).await {
                Ok(assessment) => {
                    summary.assessed += 1;
                    if assessment.at_risk {
                        summary.at_risk += 1;
                    }
                }
                Err(e) => {
                    error!(
                        enrollment_id = %progress.enrollment_id,
                        error = %e.error,
                        "Risk assessment failed"
                    );
                    summary.failures += 1;
                }
            }
        }

        metrics::track_risk_sweep(summary.assessed, summary.at_risk);

        Ok(summary)
    }

    /// Students whose latest assessment puts them at or above the risk
    /// threshold, most endangered first.
    #[instrument(skip(db))]
    pub async fn get_at_risk_students(db: &PgPool) -> Result<Vec<AtRiskStudent>, AppError> {
        sqlx::query_as::<_, AtRiskStudent>(
            "SELECT s.id AS student_id, s.first_name, s.last_name, s.email,
                    p.enrollment_id, p.risk_score, p.difficulty_signals, p.assessed_at
             FROM student_progress p
             JOIN student_enrollments e ON e.id = p.enrollment_id
             JOIN students s ON s.id = e.student_id
             WHERE p.risk_score >= $1
             ORDER BY p.risk_score DESC",
        )
        .bind(AT_RISK_THRESHOLD)
        .fetch_all(db)
        .await
        .context("Failed to fetch at-risk students")
        .map_err(AppError::database)
    }

    async fn store_assessment(
        db: &PgPool,
        progress: &StudentProgress,
    ) -> Result<RiskAssessment, AppError> {
        let now = Utc::now();

        let inputs = RiskInputs {
            engagement_score: progress.engagement_score,
            days_inactive: progress.last_activity_at.map(|at| (now - at).num_days()),
            attendance_rate: progress.attendance_rate,
            completion_percentage: progress.completion_percentage,
            days_since_start: Some((now - progress.started_at).num_days()),
            missed_sessions: Some(progress.missed_sessions),
        };

        let assessment = evaluate_risk(&inputs);
        let signals: Vec<String> = assessment
            .factors
            .iter()
            .map(|f| f.signal().to_string())
            .collect();

        sqlx::query(
            "UPDATE student_progress
             SET risk_score = $1, difficulty_signals = $2, assessed_at = NOW(), updated_at = NOW()
             WHERE id = $3",
        )
        .bind(assessment.score)
        .bind(&signals)
        .bind(progress.id)
        .execute(db)
        .await
        .context("Failed to store risk assessment")
        .map_err(AppError::database)?;

        Ok(assessment)
    }
}
