//! Access tokens and their expiration arithmetic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// What a token grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "token_purpose", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    PasswordReset,
    EmailVerification,
    PlatformAccess,
}

impl TokenPurpose {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::PasswordReset => "password_reset",
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PlatformAccess => "platform_access",
        }
    }
}

/// Expiration tier derived from the remaining window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    Valid,
    Warning,
    Critical,
    Expired,
}

/// An issued UUIDv4 token with an expiration window.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AccessToken {
    pub id: Uuid,
    pub token: String,
    pub purpose: TokenPurpose,
    pub student_id: Option<Uuid>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whole days left before expiry, floored at 0.
    #[must_use]
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_days().max(0)
    }

    /// Share of the expiration window already elapsed, in [0, 100].
    ///
    /// 0 at issuance, 100 at or after expiry, non-decreasing in between.
    /// A degenerate window (expiry not after issuance) reads as 100.
    #[must_use]
    pub fn percentage_elapsed(&self, now: DateTime<Utc>) -> f64 {
        let window = self.expires_at - self.issued_at;
        if window <= Duration::zero() || now >= self.expires_at {
            return 100.0;
        }
        if now <= self.issued_at {
            return 0.0;
        }
        let elapsed = (now - self.issued_at).num_milliseconds() as f64;
        (elapsed / window.num_milliseconds() as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Expiration tier: expired, critical (≤ 2 days), warning (≤ 7 days), valid.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> TokenStatus {
        if now >= self.expires_at {
            return TokenStatus::Expired;
        }
        match self.days_remaining(now) {
            0..=2 => TokenStatus::Critical,
            3..=7 => TokenStatus::Warning,
            _ => TokenStatus::Valid,
        }
    }

    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && now < self.expires_at
    }
}

/// Token enriched with the derived expiration bookkeeping.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenWithStatus {
    #[serde(flatten)]
    pub token: AccessToken,
    pub status: TokenStatus,
    pub days_remaining: i64,
    pub percentage_elapsed: f64,
}

impl TokenWithStatus {
    #[must_use]
    pub fn new(token: AccessToken, now: DateTime<Utc>) -> Self {
        let status = token.status(now);
        let days_remaining = token.days_remaining(now);
        let percentage_elapsed = token.percentage_elapsed(now);
        Self {
            token,
            status,
            days_remaining,
            percentage_elapsed,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct IssueTokenDto {
    pub purpose: TokenPurpose,
    pub student_id: Option<Uuid>,
    /// Validity window in days (default 30).
    #[validate(range(min = 1, max = 730))]
    pub validity_days: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkIssueTokensDto {
    pub purpose: TokenPurpose,
    #[validate(range(min = 1, max = 500))]
    pub count: i64,
    #[validate(range(min = 1, max = 730))]
    pub validity_days: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token(issued: DateTime<Utc>, expires: DateTime<Utc>) -> AccessToken {
        AccessToken {
            id: Uuid::nil(),
            token: Uuid::nil().to_string(),
            purpose: TokenPurpose::PlatformAccess,
            student_id: None,
            issued_at: issued,
            expires_at: expires,
            used_at: None,
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_percentage_zero_at_issuance() {
        let t = token(at(1), at(11));
        assert_eq!(t.percentage_elapsed(at(1)), 0.0);
    }

    #[test]
    fn test_percentage_hundred_at_expiry() {
        let t = token(at(1), at(11));
        assert_eq!(t.percentage_elapsed(at(11)), 100.0);
        assert_eq!(t.percentage_elapsed(at(20)), 100.0);
    }

    #[test]
    fn test_percentage_midpoint() {
        let t = token(at(1), at(11));
        assert!((t.percentage_elapsed(at(6)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_monotonic() {
        let t = token(at(1), at(11));
        let mut previous = -1.0;
        for day in 1..=15 {
            let p = t.percentage_elapsed(at(day));
            assert!(p >= previous);
            previous = p;
        }
    }

    #[test]
    fn test_degenerate_window_is_expired() {
        let t = token(at(5), at(5));
        assert_eq!(t.percentage_elapsed(at(5)), 100.0);
        assert_eq!(t.status(at(5)), TokenStatus::Expired);
    }

    #[test]
    fn test_status_tiers() {
        let t = token(at(1), at(21));
        assert_eq!(t.status(at(1)), TokenStatus::Valid);
        assert_eq!(t.status(at(14)), TokenStatus::Warning);
        assert_eq!(t.status(at(19)), TokenStatus::Critical);
        assert_eq!(t.status(at(21)), TokenStatus::Expired);
        assert_eq!(t.status(at(25)), TokenStatus::Expired);
    }

    #[test]
    fn test_days_remaining_floors_at_zero() {
        let t = token(at(1), at(4));
        assert_eq!(t.days_remaining(at(1)), 3);
        assert_eq!(t.days_remaining(at(10)), 0);
    }

    #[test]
    fn test_used_token_not_usable() {
        let mut t = token(at(1), at(11));
        assert!(t.is_usable(at(2)));
        t.used_at = Some(at(2));
        assert!(!t.is_usable(at(3)));
    }
}
