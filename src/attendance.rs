use serde::Serialize;

use crate::config::Thresholds;
use crate::models::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    /// None when there are no records, which is distinct from 0%.
    pub percentage: Option<f64>,
}

pub fn aggregate_attendance(records: &[AttendanceRecord]) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();

    for record in records {
        summary.total += 1;
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::Excused => summary.excused += 1,
        }
    }

    if summary.total > 0 {
        // Late arrivals still count as attended; excused absences do not.
        let attended = summary.present + summary.late;
        summary.percentage = Some(attended as f64 / summary.total as f64 * 100.0);
    }

    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceBand {
    Good,
    Low,
    Critical,
}

impl AttendanceBand {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceBand::Good => "Good",
            AttendanceBand::Low => "Low",
            AttendanceBand::Critical => "Critical",
        }
    }

    pub fn below_threshold(self) -> bool {
        !matches!(self, AttendanceBand::Good)
    }
}

pub fn classify_attendance(percentage: f64, thresholds: &Thresholds) -> AttendanceBand {
    if percentage >= thresholds.attendance_threshold {
        AttendanceBand::Good
    } else if percentage >= thresholds.attendance_low_cut {
        AttendanceBand::Low
    } else {
        AttendanceBand::Critical
    }
}
