pub const ATTENDANCE_THRESHOLD: f64 = 75.0;
pub const ATTENDANCE_LOW_CUT: f64 = 60.0;

pub const EXCELLENT_CUT: f64 = 75.0;
pub const GOOD_CUT: f64 = 60.0;
pub const AVERAGE_CUT: f64 = 40.0;

pub const TREND_TOLERANCE: f64 = 5.0;

/// Cut points shared by every classifier in the engine. Call sites receive
/// this as a value instead of importing module-level constants, so a caller
/// can override a single cut without touching global state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum attendance percentage that meets the eligibility requirement.
    pub attendance_threshold: f64,
    /// Attendance under the requirement but at or above this cut is Low;
    /// anything under it is Critical.
    pub attendance_low_cut: f64,
    pub excellent_cut: f64,
    pub good_cut: f64,
    /// Doubles as the passing cut for risk prediction.
    pub average_cut: f64,
    /// Gap in percentage points between the earlier and later half means
    /// before a score sequence counts as moving.
    pub trend_tolerance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            attendance_threshold: ATTENDANCE_THRESHOLD,
            attendance_low_cut: ATTENDANCE_LOW_CUT,
            excellent_cut: EXCELLENT_CUT,
            good_cut: GOOD_CUT,
            average_cut: AVERAGE_CUT,
            trend_tolerance: TREND_TOLERANCE,
        }
    }
}
