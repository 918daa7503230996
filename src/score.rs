use crate::models::ScoreRecord;

/// A score with no usable maximum has no percentage; callers exclude such
/// records instead of treating them as zero.
pub fn percentage(marks_obtained: f64, max_marks: f64) -> Option<f64> {
    if !marks_obtained.is_finite() || !max_marks.is_finite() || max_marks <= 0.0 {
        return None;
    }
    Some(marks_obtained / max_marks * 100.0)
}

pub fn valid_percentages(records: &[ScoreRecord]) -> impl Iterator<Item = f64> + '_ {
    records.iter().filter_map(|record| record.percentage())
}

pub fn average_percentage(records: &[ScoreRecord]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in valid_percentages(records) {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
