use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::sessions::model::{CreateSessionDto, TrainingSession};
use formation_core::AppError;

const SESSION_COLUMNS: &str = "id, title, starts_on, ends_on, created_at, updated_at";

pub struct SessionService;

impl SessionService {
    /// Creates a session. The window must be ordered (end on or after start).
    #[instrument(skip(db, dto))]
    pub async fn create_session(
        db: &PgPool,
        dto: CreateSessionDto,
    ) -> Result<TrainingSession, AppError> {
        if !dto.window_is_valid() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Session cannot end before it starts"
            )));
        }

        sqlx::query_as::<_, TrainingSession>(&format!(
            "INSERT INTO training_sessions (title, starts_on, ends_on)
             VALUES ($1, $2, $3)
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(dto.starts_on)
        .bind(dto.ends_on)
        .fetch_one(db)
        .await
        .context("Failed to create session")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_sessions(db: &PgPool) -> Result<Vec<TrainingSession>, AppError> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions ORDER BY starts_on DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch sessions")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_session_by_id(db: &PgPool, id: Uuid) -> Result<TrainingSession, AppError> {
        sqlx::query_as::<_, TrainingSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch session by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))
    }
}
