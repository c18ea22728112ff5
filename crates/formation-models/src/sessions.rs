//! Training sessions that enrollments attach to.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A scheduled training session.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TrainingSession {
    pub id: Uuid,
    pub title: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSessionDto {
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

impl CreateSessionDto {
    /// A session may not end before it starts.
    #[must_use]
    pub fn window_is_valid(&self) -> bool {
        self.ends_on >= self.starts_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(starts: (i32, u32, u32), ends: (i32, u32, u32)) -> CreateSessionDto {
        CreateSessionDto {
            title: "Rust avancé".to_string(),
            starts_on: NaiveDate::from_ymd_opt(starts.0, starts.1, starts.2).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(ends.0, ends.1, ends.2).unwrap(),
        }
    }

    #[test]
    fn test_window_accepts_ordered_dates() {
        assert!(dto((2026, 1, 5), (2026, 3, 27)).window_is_valid());
        assert!(dto((2026, 1, 5), (2026, 1, 5)).window_is_valid());
    }

    #[test]
    fn test_window_rejects_end_before_start() {
        assert!(!dto((2026, 3, 27), (2026, 1, 5)).window_is_valid());
    }
}
