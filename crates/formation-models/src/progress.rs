//! Student progress records and the dropout risk-scoring rules.
//!
//! Risk evaluation is a deterministic function over five optional factors.
//! Each factor maps to a fixed linear formula; contributions are summed and
//! clamped to [0, 100]. A score of 40 or more marks the student at risk.
//! Missing data means the factor is simply absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Score at or above which a student is considered at risk of dropping out.
pub const AT_RISK_THRESHOLD: f64 = 40.0;

/// Engagement and completion measurements for one enrollment.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentProgress {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub engagement_score: Option<f64>,
    pub completion_percentage: Option<f64>,
    pub attendance_rate: Option<f64>,
    pub missed_sessions: i32,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub started_at: DateTime<Utc>,
    pub risk_score: Option<f64>,
    pub difficulty_signals: Vec<String>,
    pub assessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertProgressDto {
    pub enrollment_id: Uuid,
    #[validate(range(min = 0.0, max = 100.0))]
    pub engagement_score: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub completion_percentage: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub attendance_rate: Option<f64>,
    #[validate(range(min = 0))]
    pub missed_sessions: Option<i32>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
}

/// One of the five measurable signals feeding the dropout score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    LowEngagement,
    Inactivity,
    LowAttendance,
    CompletionLag,
    MissedSessions,
}

impl RiskFactor {
    /// Stable identifier stored in `difficulty_signals`.
    #[must_use]
    pub fn signal(self) -> &'static str {
        match self {
            RiskFactor::LowEngagement => "low_engagement",
            RiskFactor::Inactivity => "inactivity",
            RiskFactor::LowAttendance => "low_attendance",
            RiskFactor::CompletionLag => "completion_lag",
            RiskFactor::MissedSessions => "missed_sessions",
        }
    }

    /// Canned advisory text, one per factor, shown to the pedagogic team.
    #[must_use]
    pub fn recommendation(self) -> &'static str {
        match self {
            RiskFactor::LowEngagement => {
                "Prévoir un entretien individuel pour relancer l'engagement du stagiaire."
            }
            RiskFactor::Inactivity => {
                "Contacter le stagiaire : aucune activité depuis plus de 7 jours."
            }
            RiskFactor::LowAttendance => {
                "Analyser les absences et proposer un aménagement du planning."
            }
            RiskFactor::CompletionLag => {
                "Mettre en place un plan de rattrapage sur les modules en retard."
            }
            RiskFactor::MissedSessions => {
                "Signaler les sessions manquées au référent pédagogique."
            }
        }
    }
}

/// Inputs to one risk evaluation. `None` means the measurement is missing.
#[derive(Debug, Clone, Default)]
pub struct RiskInputs {
    pub engagement_score: Option<f64>,
    pub days_inactive: Option<i64>,
    pub attendance_rate: Option<f64>,
    pub completion_percentage: Option<f64>,
    pub days_since_start: Option<i64>,
    pub missed_sessions: Option<i32>,
}

/// Result of one risk evaluation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RiskAssessment {
    pub score: f64,
    pub at_risk: bool,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Advisory texts for the triggered factors, or the all-clear message.
    #[must_use]
    pub fn recommendations(&self) -> Vec<String> {
        if self.factors.is_empty() {
            return vec!["Aucune action particulière requise.".to_string()];
        }
        self.factors
            .iter()
            .map(|f| f.recommendation().to_string())
            .collect()
    }
}

/// Evaluates the dropout risk score for one set of measurements.
///
/// Factor formulas (each contribution capped, sum clamped to [0, 100]):
///
/// - engagement < 40:      (60 − engagement) × 0.5, cap 30
/// - inactivity > 7 days:  days × 2, cap 25
/// - attendance < 70%:     (70 − attendance) × 0.4, cap 28
/// - completion behind the 30-day linear expectation curve:
///                         (expected − completion) × 0.3, cap 20
/// - missed sessions ≥ 2:  missed × 5, cap 15
#[must_use]
pub fn evaluate_risk(inputs: &RiskInputs) -> RiskAssessment {
    let mut score = 0.0;
    let mut factors = Vec::new();

    if let Some(engagement) = inputs.engagement_score {
        if engagement < 40.0 {
            score += ((60.0 - engagement) * 0.5).min(30.0);
            factors.push(RiskFactor::LowEngagement);
        }
    }

    if let Some(days) = inputs.days_inactive {
        if days > 7 {
            score += (days as f64 * 2.0).min(25.0);
            factors.push(RiskFactor::Inactivity);
        }
    }

    if let Some(attendance) = inputs.attendance_rate {
        if attendance < 70.0 {
            score += ((70.0 - attendance) * 0.4).min(28.0);
            factors.push(RiskFactor::LowAttendance);
        }
    }

    if let (Some(completion), Some(days)) = (inputs.completion_percentage, inputs.days_since_start)
    {
        let expected = (days.max(0) as f64 / 30.0 * 100.0).min(100.0);
        if completion < expected {
            score += ((expected - completion) * 0.3).min(20.0);
            factors.push(RiskFactor::CompletionLag);
        }
    }

    if let Some(missed) = inputs.missed_sessions {
        if missed >= 2 {
            score += (missed as f64 * 5.0).min(15.0);
            factors.push(RiskFactor::MissedSessions);
        }
    }

    let score = score.clamp(0.0, 100.0);

    RiskAssessment {
        score,
        at_risk: score >= AT_RISK_THRESHOLD,
        factors,
    }
}

/// At-risk listing row, joining the student identity onto the latest
/// assessment.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct AtRiskStudent {
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub enrollment_id: Uuid,
    pub risk_score: f64,
    pub difficulty_signals: Vec<String>,
    pub assessed_at: Option<DateTime<Utc>>,
}

/// Outcome of a batch risk-scoring pass.
#[derive(Debug, Serialize, ToSchema)]
pub struct RiskSweepSummary {
    pub assessed: u64,
    pub at_risk: u64,
    pub failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_scores_zero() {
        let assessment = evaluate_risk(&RiskInputs::default());
        assert_eq!(assessment.score, 0.0);
        assert!(!assessment.at_risk);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn test_worked_example() {
        // engagement=30, inactive 10 days: (60-30)*0.5 + min(25, 20) = 35
        let inputs = RiskInputs {
            engagement_score: Some(30.0),
            days_inactive: Some(10),
            ..Default::default()
        };
        let assessment = evaluate_risk(&inputs);
        assert_eq!(assessment.score, 35.0);
        assert!(!assessment.at_risk);
        assert_eq!(
            assessment.factors,
            vec![RiskFactor::LowEngagement, RiskFactor::Inactivity]
        );
    }

    #[test]
    fn test_factor_thresholds_are_exclusive() {
        let inputs = RiskInputs {
            engagement_score: Some(40.0),
            days_inactive: Some(7),
            attendance_rate: Some(70.0),
            missed_sessions: Some(1),
            ..Default::default()
        };
        let assessment = evaluate_risk(&inputs);
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn test_inactivity_is_capped() {
        let inputs = RiskInputs {
            days_inactive: Some(400),
            ..Default::default()
        };
        assert_eq!(evaluate_risk(&inputs).score, 25.0);
    }

    #[test]
    fn test_engagement_is_capped() {
        let inputs = RiskInputs {
            engagement_score: Some(0.0),
            ..Default::default()
        };
        assert_eq!(evaluate_risk(&inputs).score, 30.0);
    }

    #[test]
    fn test_completion_lag_uses_expectation_curve() {
        // 15 days in, expectation is 50%; 20% done leaves a 30-point gap.
        let inputs = RiskInputs {
            completion_percentage: Some(20.0),
            days_since_start: Some(15),
            ..Default::default()
        };
        let assessment = evaluate_risk(&inputs);
        assert!((assessment.score - 9.0).abs() < 1e-9);
        assert_eq!(assessment.factors, vec![RiskFactor::CompletionLag]);
    }

    #[test]
    fn test_completion_on_track_is_clean() {
        let inputs = RiskInputs {
            completion_percentage: Some(60.0),
            days_since_start: Some(15),
            ..Default::default()
        };
        assert_eq!(evaluate_risk(&inputs).score, 0.0);
    }

    #[test]
    fn test_missed_sessions_capped() {
        let inputs = RiskInputs {
            missed_sessions: Some(10),
            ..Default::default()
        };
        assert_eq!(evaluate_risk(&inputs).score, 15.0);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let inputs = RiskInputs {
            engagement_score: Some(0.0),
            days_inactive: Some(60),
            attendance_rate: Some(0.0),
            completion_percentage: Some(0.0),
            days_since_start: Some(90),
            missed_sessions: Some(20),
        };
        // Raw contributions sum to 118; the score clamps at 100.
        let assessment = evaluate_risk(&inputs);
        assert_eq!(assessment.score, 100.0);
        assert!(assessment.at_risk);
        assert_eq!(assessment.factors.len(), 5);
    }

    #[test]
    fn test_monotonic_in_engagement() {
        let mut previous = f64::MAX;
        for engagement in [0.0, 10.0, 20.0, 30.0, 39.9, 40.0, 80.0] {
            let inputs = RiskInputs {
                engagement_score: Some(engagement),
                ..Default::default()
            };
            let score = evaluate_risk(&inputs).score;
            assert!(score <= previous, "score must not grow with engagement");
            previous = score;
        }
    }

    #[test]
    fn test_monotonic_in_inactivity() {
        let mut previous = f64::MIN;
        for days in [0, 5, 8, 10, 12, 13, 100] {
            let inputs = RiskInputs {
                days_inactive: Some(days),
                ..Default::default()
            };
            let score = evaluate_risk(&inputs).score;
            assert!(score >= previous, "score must not shrink with inactivity");
            previous = score;
        }
    }

    #[test]
    fn test_at_risk_threshold() {
        let inputs = RiskInputs {
            engagement_score: Some(10.0),
            days_inactive: Some(10),
            ..Default::default()
        };
        // 25 + 20 = 45 >= 40
        let assessment = evaluate_risk(&inputs);
        assert_eq!(assessment.score, 45.0);
        assert!(assessment.at_risk);
    }

    #[test]
    fn test_recommendations_match_factors() {
        let inputs = RiskInputs {
            days_inactive: Some(10),
            ..Default::default()
        };
        let recommendations = evaluate_risk(&inputs).recommendations();
        assert_eq!(recommendations.len(), 1);
        assert!(recommendations[0].contains("Contacter le stagiaire"));
    }

    #[test]
    fn test_recommendations_all_clear() {
        let recommendations = evaluate_risk(&RiskInputs::default()).recommendations();
        assert_eq!(
            recommendations,
            vec!["Aucune action particulière requise.".to_string()]
        );
    }
}
