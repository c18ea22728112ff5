//! Student domain models and DTOs.

use chrono::{DateTime, Utc};
use formation_core::pagination::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A student (trainee) of the training organization.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordDto {
    #[validate(length(min = 36, max = 36))]
    pub token: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailDto {
    #[validate(length(min = 36, max = 36))]
    pub token: String,
}

/// Aggregate counters shown on the organization dashboard.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct DashboardStats {
    pub total_students: i64,
    pub active_enrollments: i64,
    pub completed_enrollments: i64,
    pub at_risk_students: i64,
    pub average_risk_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_student_dto_validation() {
        let valid_dto = CreateStudentDto {
            first_name: "Camille".to_string(),
            last_name: "Durand".to_string(),
            email: "camille.durand@example.com".to_string(),
            phone: Some("+33612345678".to_string()),
            birth_date: None,
        };
        assert!(valid_dto.validate().is_ok());
    }

    #[test]
    fn test_create_student_dto_invalid_email() {
        let invalid_dto = CreateStudentDto {
            first_name: "Camille".to_string(),
            last_name: "Durand".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            birth_date: None,
        };
        assert!(invalid_dto.validate().is_err());
    }

    #[test]
    fn test_create_student_dto_empty_name() {
        let invalid_dto = CreateStudentDto {
            first_name: "".to_string(),
            last_name: "Durand".to_string(),
            email: "camille.durand@example.com".to_string(),
            phone: None,
            birth_date: None,
        };
        assert!(invalid_dto.validate().is_err());
    }

    #[test]
    fn test_update_student_dto_empty_is_valid() {
        let empty_dto = UpdateStudentDto {
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            birth_date: None,
        };
        assert!(empty_dto.validate().is_ok());
    }

    #[test]
    fn test_reset_password_dto_short_password() {
        let dto = ResetPasswordDto {
            token: "0".repeat(36),
            new_password: "short".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
