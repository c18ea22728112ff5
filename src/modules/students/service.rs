use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::students::model::{
    CreateStudentDto, DashboardStats, ResetPasswordDto, Student, UpdateStudentDto, VerifyEmailDto,
};
use crate::modules::tokens::service::TokenService;
use crate::utils::csv_export::{StudentCsvRow, write_csv};
use crate::utils::email::EmailService;
use formation_core::AppError;
use formation_core::pagination::PaginationParams;
use formation_core::password::{generate_password, hash_password};
use formation_models::tokens::TokenPurpose;

const STUDENT_COLUMNS: &str =
    "id, first_name, last_name, email, phone, birth_date, email_verified, created_at, updated_at";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (first_name, last_name, email, phone, birth_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(dto.birth_date)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Student with email {} already exists",
                        dto.email
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        metrics::track_student_created();
        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS}
             FROM students
             ORDER BY last_name, first_name
             LIMIT $1 OFFSET $2"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student_by_id(db, id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let email = dto.email.unwrap_or(existing.email);
        let phone = dto.phone.or(existing.phone);
        let birth_date = dto.birth_date.or(existing.birth_date);

        sqlx::query_as::<_, Student>(&format!(
            "UPDATE students
             SET first_name = $1, last_name = $2, email = $3, phone = $4, birth_date = $5,
                 updated_at = NOW()
             WHERE id = $6
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&phone)
        .bind(birth_date)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Student with email {} already exists",
                        email
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }

    /// Generates and stores a temporary password, then emails the credentials.
    #[instrument(skip(db, email_service))]
    pub async fn send_welcome_email(
        db: &PgPool,
        email_service: &EmailService,
        id: Uuid,
    ) -> Result<(), AppError> {
        let student = Self::get_student_by_id(db, id).await?;

        let password = generate_password(12);
        let hashed = hash_password(&password)?;

        sqlx::query("UPDATE students SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&hashed)
            .bind(id)
            .execute(db)
            .await
            .context("Failed to store temporary password")
            .map_err(AppError::database)?;

        email_service
            .send_welcome_email(&student.email, &student.first_name, &password)
            .await
    }

    /// Issues a password-reset token and emails the reset link.
    #[instrument(skip(db, email_service))]
    pub async fn request_password_reset(
        db: &PgPool,
        email_service: &EmailService,
        email: &str,
    ) -> Result<(), AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .context("Failed to look up student by email")
        .map_err(AppError::database)?;

        // Do not reveal whether the address exists.
        let Some(student) = student else {
            warn!(email, "Password reset requested for unknown email");
            return Ok(());
        };

        let token =
            TokenService::issue(db, TokenPurpose::PasswordReset, Some(student.id), 1).await?;

        email_service
            .send_password_reset_email(&student.email, &student.first_name, &token.token)
            .await
    }

    #[instrument(skip(db, dto))]
    pub async fn reset_password(db: &PgPool, dto: ResetPasswordDto) -> Result<(), AppError> {
        let token = TokenService::consume(db, &dto.token, TokenPurpose::PasswordReset).await?;

        let student_id = token.student_id.ok_or_else(|| {
            AppError::unprocessable(anyhow::anyhow!("Token is not bound to a student"))
        })?;

        let hashed = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE students SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&hashed)
            .bind(student_id)
            .execute(db)
            .await
            .context("Failed to update password")
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Issues an email-verification token and emails the confirmation link.
    #[instrument(skip(db, email_service))]
    pub async fn request_email_verification(
        db: &PgPool,
        email_service: &EmailService,
        id: Uuid,
    ) -> Result<(), AppError> {
        let student = Self::get_student_by_id(db, id).await?;

        if student.email_verified {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email is already verified"
            )));
        }

        let token =
            TokenService::issue(db, TokenPurpose::EmailVerification, Some(student.id), 3).await?;

        email_service
            .send_verification_email(&student.email, &student.first_name, &token.token)
            .await
    }

    #[instrument(skip(db, dto))]
    pub async fn verify_email(db: &PgPool, dto: VerifyEmailDto) -> Result<Student, AppError> {
        let token = TokenService::consume(db, &dto.token, TokenPurpose::EmailVerification).await?;

        let student_id = token.student_id.ok_or_else(|| {
            AppError::unprocessable(anyhow::anyhow!("Token is not bound to a student"))
        })?;

        sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET email_verified = TRUE, updated_at = NOW()
             WHERE id = $1
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to mark email verified")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    /// Exports all students as a `;`-delimited CSV document. The status
    /// column carries the student's most recent enrollment status, or
    /// `none` when the student was never enrolled.
    #[instrument(skip(db))]
    pub async fn export_csv(db: &PgPool) -> Result<String, AppError> {
        #[derive(sqlx::FromRow)]
        struct ExportRow {
            last_name: String,
            first_name: String,
            email: String,
            phone: Option<String>,
            status: Option<String>,
            created_at: chrono::DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, ExportRow>(
            "SELECT s.last_name, s.first_name, s.email, s.phone,
                    (SELECT e.status::text FROM student_enrollments e
                     WHERE e.student_id = s.id
                     ORDER BY e.enrolled_at DESC LIMIT 1) AS status,
                    s.created_at
             FROM students s
             ORDER BY s.last_name, s.first_name",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch students for export")
        .map_err(AppError::database)?;

        let csv_rows: Vec<StudentCsvRow> = rows
            .into_iter()
            .map(|r| StudentCsvRow {
                last_name: r.last_name,
                first_name: r.first_name,
                email: r.email,
                phone: r.phone.unwrap_or_default(),
                status: r.status.unwrap_or_else(|| "none".to_string()),
                created_at: r.created_at.to_rfc3339(),
            })
            .collect();

        write_csv(&csv_rows)
    }

    #[instrument(skip(db))]
    pub async fn dashboard_stats(db: &PgPool) -> Result<DashboardStats, AppError> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT
                (SELECT COUNT(*) FROM students) AS total_students,
                (SELECT COUNT(*) FROM student_enrollments WHERE status = 'enrolled')
                    AS active_enrollments,
                (SELECT COUNT(*) FROM student_enrollments WHERE status = 'completed')
                    AS completed_enrollments,
                (SELECT COUNT(*) FROM student_progress WHERE risk_score >= $1)
                    AS at_risk_students,
                (SELECT AVG(risk_score) FROM student_progress WHERE risk_score IS NOT NULL)
                    AS average_risk_score",
        )
        .bind(formation_models::progress::AT_RISK_THRESHOLD)
        .fetch_one(db)
        .await
        .context("Failed to compute dashboard stats")
        .map_err(AppError::database)
    }
}
