use serde::Serialize;

use crate::models::ScoreRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Improving => "Improving",
            TrendDirection::Declining => "Declining",
            TrendDirection::Stable => "Stable",
        }
    }
}

/// Compares the mean of the later half of the sequence against the mean of
/// the earlier half (the middle value of an odd-length sequence joins the
/// later half). Fewer than two points is not enough signal and reads Stable.
pub fn detect_trend(percentages_oldest_first: &[f64], tolerance: f64) -> TrendDirection {
    if percentages_oldest_first.len() < 2 {
        return TrendDirection::Stable;
    }

    let split = percentages_oldest_first.len() / 2;
    let earlier = mean(&percentages_oldest_first[..split]);
    let later = mean(&percentages_oldest_first[split..]);
    let delta = later - earlier;

    if delta > tolerance {
        TrendDirection::Improving
    } else if delta < -tolerance {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

/// Orders the scores by exam date internally, so callers cannot get the
/// direction wrong by passing a newest-first fetch. Records without a usable
/// maximum carry no percentage and are skipped.
pub fn trend_of_scores(records: &[ScoreRecord], tolerance: f64) -> TrendDirection {
    let mut dated: Vec<(chrono::NaiveDate, f64)> = records
        .iter()
        .filter_map(|record| record.percentage().map(|value| (record.exam_date, value)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let series: Vec<f64> = dated.into_iter().map(|(_, value)| value).collect();
    detect_trend(&series, tolerance)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TREND_TOLERANCE;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn dated_score(year: i32, month: u32, day: u32, marks: f64) -> ScoreRecord {
        ScoreRecord {
            student_id: Uuid::new_v4(),
            subject_code: "CS301".to_string(),
            exam_type: "internal".to_string(),
            max_marks: Some(100.0),
            marks_obtained: marks,
            exam_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        }
    }

    #[test]
    fn constant_sequence_is_stable() {
        assert_eq!(
            detect_trend(&[70.0, 70.0, 70.0, 70.0], TREND_TOLERANCE),
            TrendDirection::Stable
        );
    }

    #[test]
    fn clear_improvement_is_detected() {
        assert_eq!(
            detect_trend(&[40.0, 45.0, 50.0, 80.0, 85.0], TREND_TOLERANCE),
            TrendDirection::Improving
        );
    }

    #[test]
    fn reversed_improvement_reads_as_decline() {
        assert_eq!(
            detect_trend(&[85.0, 80.0, 50.0, 45.0, 40.0], TREND_TOLERANCE),
            TrendDirection::Declining
        );
    }

    #[test]
    fn short_sequences_are_stable() {
        assert_eq!(detect_trend(&[], TREND_TOLERANCE), TrendDirection::Stable);
        assert_eq!(detect_trend(&[35.0], TREND_TOLERANCE), TrendDirection::Stable);
    }

    #[test]
    fn movement_within_tolerance_is_stable() {
        assert_eq!(
            detect_trend(&[70.0, 70.0, 74.0], TREND_TOLERANCE),
            TrendDirection::Stable
        );
        assert_eq!(
            detect_trend(&[70.0, 70.0, 66.0], TREND_TOLERANCE),
            TrendDirection::Stable
        );
    }

    #[test]
    fn scores_are_ordered_by_date_not_by_caller() {
        // Newest-first fetch order; the dates still describe an improvement.
        let records = vec![
            dated_score(2026, 5, 1, 85.0),
            dated_score(2026, 4, 1, 80.0),
            dated_score(2026, 3, 1, 50.0),
            dated_score(2026, 2, 1, 45.0),
            dated_score(2026, 1, 1, 40.0),
        ];
        assert_eq!(
            trend_of_scores(&records, TREND_TOLERANCE),
            TrendDirection::Improving
        );
    }

    #[test]
    fn records_without_a_maximum_do_not_shape_the_trend() {
        let mut records = vec![
            dated_score(2026, 1, 1, 70.0),
            dated_score(2026, 2, 1, 70.0),
        ];
        let mut stray = dated_score(2026, 3, 1, 5.0);
        stray.max_marks = None;
        records.push(stray);

        assert_eq!(
            trend_of_scores(&records, TREND_TOLERANCE),
            TrendDirection::Stable
        );
    }
}
