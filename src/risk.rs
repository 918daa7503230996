use serde::Serialize;

use crate::attendance::{self, AttendanceBand, AttendanceSummary};
use crate::classify::{self, LearnerBand};
use crate::config::Thresholds;
use crate::models::{AttendanceRecord, ScoreRecord, StudentContext};
use crate::score;
use crate::trend::{self, TrendDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Safe,
    AtRisk,
    HighRisk,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::AtRisk => "At Risk",
            RiskLevel::HighRisk => "High Risk",
        }
    }
}

/// A passing average is safe no matter which way the trend points; the trend
/// only escalates students who are already below the passing cut.
pub fn predict_risk(average: f64, trend: TrendDirection, thresholds: &Thresholds) -> RiskLevel {
    if average >= thresholds.average_cut {
        return RiskLevel::Safe;
    }
    match trend {
        TrendDirection::Declining => RiskLevel::HighRisk,
        TrendDirection::Improving | TrendDirection::Stable => RiskLevel::AtRisk,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentAssessment {
    pub context: StudentContext,
    pub average: Option<f64>,
    pub band: Option<LearnerBand>,
    pub trend: TrendDirection,
    pub risk: Option<RiskLevel>,
    pub attendance: AttendanceSummary,
    pub attendance_band: Option<AttendanceBand>,
}

/// Full picture for one student from that student's records. A student with
/// no scored exams has no average, band, or risk level, which stays distinct
/// from scoring zero.
pub fn assess_student(
    context: StudentContext,
    scores: &[ScoreRecord],
    attendance_records: &[AttendanceRecord],
    thresholds: &Thresholds,
) -> StudentAssessment {
    let average = score::average_percentage(scores);
    let band = average.map(|value| classify::classify_learner(value, thresholds));
    let trend = trend::trend_of_scores(scores, thresholds.trend_tolerance);
    let risk = average.map(|value| predict_risk(value, trend, thresholds));

    let attendance = attendance::aggregate_attendance(attendance_records);
    let attendance_band = attendance
        .percentage
        .map(|value| attendance::classify_attendance(value, thresholds));

    StudentAssessment {
        context,
        average,
        band,
        trend,
        risk,
        attendance,
        attendance_band,
    }
}
