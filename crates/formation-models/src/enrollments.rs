//! Enrollment entity and the status transition table.

use chrono::{DateTime, Utc};
use formation_core::pagination::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of an enrollment.
///
/// Legal transitions:
///
/// ```text
/// enrolled    → completed | dropped_out | suspended
/// suspended   → enrolled  | dropped_out
/// dropped_out → enrolled            (re-enrollment)
/// completed   → (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Enrolled,
    Completed,
    DroppedOut,
    Suspended,
}

impl EnrollmentStatus {
    /// Whether the transition table allows moving from `self` to `target`.
    #[must_use]
    pub fn can_transition_to(self, target: EnrollmentStatus) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, target),
            (Enrolled, Completed)
                | (Enrolled, DroppedOut)
                | (Enrolled, Suspended)
                | (Suspended, Enrolled)
                | (Suspended, DroppedOut)
                | (DroppedOut, Enrolled)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::DroppedOut => "dropped_out",
            EnrollmentStatus::Suspended => "suspended",
        }
    }
}

/// A student's enrollment into a training session.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentEnrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub session_id: Uuid,
    pub progress_id: Option<Uuid>,
    pub status: EnrollmentStatus,
    pub dropout_reason: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEnrollmentDto {
    pub student_id: Uuid,
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentStatusDto {
    pub status: EnrollmentStatus,
    /// Required (non-empty) when `status` is `dropped_out`.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl UpdateEnrollmentStatusDto {
    /// Trimmed dropout reason to persist. `Err` when dropping out without a
    /// reason that survives trimming; `None` for every other status.
    pub fn dropout_reason(&self) -> Result<Option<String>, String> {
        if self.status != EnrollmentStatus::DroppedOut {
            return Ok(None);
        }
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| Some(r.to_string()))
            .ok_or_else(|| "A dropout reason is required".to_string())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEnrollmentsResponse {
    pub data: Vec<StudentEnrollment>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::EnrollmentStatus::*;
    use super::UpdateEnrollmentStatusDto;

    const ALL: [super::EnrollmentStatus; 4] = [Enrolled, Completed, DroppedOut, Suspended];

    fn dto(status: super::EnrollmentStatus, reason: Option<&str>) -> UpdateEnrollmentStatusDto {
        UpdateEnrollmentStatusDto {
            status,
            reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn test_enrolled_transitions() {
        assert!(Enrolled.can_transition_to(Completed));
        assert!(Enrolled.can_transition_to(DroppedOut));
        assert!(Enrolled.can_transition_to(Suspended));
        assert!(!Enrolled.can_transition_to(Enrolled));
    }

    #[test]
    fn test_suspended_transitions() {
        assert!(Suspended.can_transition_to(Enrolled));
        assert!(Suspended.can_transition_to(DroppedOut));
        assert!(!Suspended.can_transition_to(Completed));
        assert!(!Suspended.can_transition_to(Suspended));
    }

    #[test]
    fn test_completed_is_terminal() {
        for target in ALL {
            assert!(!Completed.can_transition_to(target));
        }
    }

    #[test]
    fn test_dropped_out_only_reenrolls() {
        assert!(DroppedOut.can_transition_to(Enrolled));
        assert!(!DroppedOut.can_transition_to(Completed));
        assert!(!DroppedOut.can_transition_to(Suspended));
        assert!(!DroppedOut.can_transition_to(DroppedOut));
    }

    #[test]
    fn test_dropout_without_reason_rejected() {
        assert!(dto(DroppedOut, None).dropout_reason().is_err());
        assert!(dto(DroppedOut, Some("")).dropout_reason().is_err());
        assert!(dto(DroppedOut, Some("   ")).dropout_reason().is_err());
    }

    #[test]
    fn test_dropout_reason_trimmed() {
        let reason = dto(DroppedOut, Some("  raisons personnelles  "))
            .dropout_reason()
            .unwrap();
        assert_eq!(reason.as_deref(), Some("raisons personnelles"));
    }

    #[test]
    fn test_reason_ignored_outside_dropout() {
        assert_eq!(dto(Suspended, Some("absences")).dropout_reason(), Ok(None));
        assert_eq!(dto(Completed, None).dropout_reason(), Ok(None));
    }

    #[test]
    fn test_exactly_six_legal_transitions() {
        let mut legal = 0;
        for from in ALL {
            for to in ALL {
                if from.can_transition_to(to) {
                    legal += 1;
                }
            }
        }
        assert_eq!(legal, 6);
    }
}
