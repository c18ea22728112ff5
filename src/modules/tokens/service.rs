use std::future::Future;

use anyhow::Context;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::metrics;
use crate::modules::tokens::model::{
    AccessToken, BulkIssueTokensDto, TokenPurpose, TokenWithStatus,
};
use formation_core::AppError;
use formation_core::pagination::PaginationParams;

const TOKEN_COLUMNS: &str = "id, token, purpose, student_id, issued_at, expires_at, used_at";

/// Attempts per token before bulk generation gives up on a slot.
const MAX_GENERATION_ATTEMPTS: u32 = 5;

pub(crate) const DEFAULT_VALIDITY_DAYS: i64 = 30;

pub struct TokenService;

impl TokenService {
    /// Issues a fresh UUIDv4 token. Collisions with existing token values
    /// are retried up to [`MAX_GENERATION_ATTEMPTS`] times.
    #[instrument(skip(db))]
    pub async fn issue(
        db: &PgPool,
        purpose: TokenPurpose,
        student_id: Option<Uuid>,
        validity_days: i64,
    ) -> Result<AccessToken, AppError> {
        let expires_at = Utc::now() + Duration::days(validity_days);

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let value = Uuid::new_v4().to_string();

            let result = sqlx::query_as::<_, AccessToken>(&format!(
                "INSERT INTO access_tokens (token, purpose, student_id, expires_at)
                 VALUES ($1, $2, $3, $4)
                 RETURNING {TOKEN_COLUMNS}"
            ))
            .bind(&value)
            .bind(purpose)
            .bind(student_id)
            .bind(expires_at)
            .fetch_one(db)
            .await;

            match result {
                Ok(token) => {
                    metrics::track_token_issued(purpose.as_str());
                    return Ok(token);
                }
                Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                    warn!(attempt, "Token value collision, regenerating");
                }
                Err(e) => {
                    return Err(AppError::database(
                        anyhow::Error::from(e).context("Failed to insert token"),
                    ));
                }
            }
        }

        Err(AppError::internal(anyhow::anyhow!(
            "Could not generate a unique token after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }

    /// Issues `count` tokens with the same purpose and window. A slot that
    /// exhausts its retry budget fails the whole request.
    #[instrument(skip(db, dto))]
    pub async fn bulk_issue(
        db: &PgPool,
        dto: BulkIssueTokensDto,
    ) -> Result<Vec<AccessToken>, AppError> {
        let validity_days = dto.validity_days.unwrap_or(DEFAULT_VALIDITY_DAYS);
        Self::issue_batch(dto.count, || {
            Self::issue(db, dto.purpose, None, validity_days)
        })
        .await
    }

    /// Collects `count` tokens from `issue_one`, stopping at the first error
    /// so a partial batch is never reported as success.
    async fn issue_batch<F, Fut>(count: i64, mut issue_one: F) -> Result<Vec<AccessToken>, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<AccessToken, AppError>>,
    {
        let mut tokens = Vec::with_capacity(count as usize);
        for _ in 0..count {
            tokens.push(issue_one().await?);
        }
        Ok(tokens)
    }

    #[instrument(skip(db))]
    pub async fn get_tokens(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<(Vec<TokenWithStatus>, i64), AppError> {
        let tokens = sqlx::query_as::<_, AccessToken>(&format!(
            "SELECT {TOKEN_COLUMNS}
             FROM access_tokens
             ORDER BY issued_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch tokens")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM access_tokens")
            .fetch_one(db)
            .await
            .context("Failed to count tokens")
            .map_err(AppError::database)?;

        let now = Utc::now();
        let enriched = tokens
            .into_iter()
            .map(|t| TokenWithStatus::new(t, now))
            .collect();

        Ok((enriched, total))
    }

    #[instrument(skip(db))]
    pub async fn get_token_by_id(db: &PgPool, id: Uuid) -> Result<TokenWithStatus, AppError> {
        let token = sqlx::query_as::<_, AccessToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM access_tokens WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch token by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Token not found")))?;

        Ok(TokenWithStatus::new(token, Utc::now()))
    }

    /// Marks a token as used, atomically. Rejects unknown, expired and
    /// already-used tokens, and tokens issued for a different purpose.
    #[instrument(skip(db, value))]
    pub async fn consume(
        db: &PgPool,
        value: &str,
        purpose: TokenPurpose,
    ) -> Result<AccessToken, AppError> {
        let token = sqlx::query_as::<_, AccessToken>(&format!(
            "UPDATE access_tokens
             SET used_at = NOW()
             WHERE token = $1 AND purpose = $2 AND used_at IS NULL AND expires_at > NOW()
             RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(value)
        .bind(purpose)
        .fetch_optional(db)
        .await
        .context("Failed to consume token")
        .map_err(AppError::database)?;

        token.ok_or_else(|| AppError::unprocessable(anyhow::anyhow!("Invalid or expired token")))
    }

    #[instrument(skip(db))]
    pub async fn delete_token(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete token")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Token not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_token(n: u32) -> AccessToken {
        let now = Utc::now();
        AccessToken {
            id: Uuid::new_v4(),
            token: format!("token-{n}"),
            purpose: TokenPurpose::PlatformAccess,
            student_id: None,
            issued_at: now,
            expires_at: now + Duration::days(DEFAULT_VALIDITY_DAYS),
            used_at: None,
        }
    }

    #[tokio::test]
    async fn test_issue_batch_collects_requested_count() {
        let mut issued = 0;
        let tokens = TokenService::issue_batch(3, || {
            issued += 1;
            let token = fake_token(issued);
            async move { Ok(token) }
        })
        .await
        .unwrap();

        assert_eq!(tokens.len(), 3);
    }

    #[tokio::test]
    async fn test_issue_batch_fails_when_a_slot_exhausts_retries() {
        let mut attempts = 0;
        let result = TokenService::issue_batch(5, || {
            attempts += 1;
            let outcome = if attempts == 3 {
                Err(AppError::internal(anyhow::anyhow!(
                    "Could not generate a unique token after {} attempts",
                    MAX_GENERATION_ATTEMPTS
                )))
            } else {
                Ok(fake_token(attempts))
            };
            async move { outcome }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts, 3);
    }
}
