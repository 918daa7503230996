use std::collections::HashMap;
use std::fmt::Write;

use uuid::Uuid;

use crate::aggregate;
use crate::classify::LearnerBand;
use crate::config::Thresholds;
use crate::models::{AttendanceRecord, ScoreRecord, StudentContext};
use crate::risk::{self, RiskLevel, StudentAssessment};
use crate::score;

pub fn assess_all(
    students: &[StudentContext],
    scores: &[ScoreRecord],
    attendance_records: &[AttendanceRecord],
    thresholds: &Thresholds,
) -> Vec<StudentAssessment> {
    let mut scores_by_student: HashMap<Uuid, Vec<ScoreRecord>> = HashMap::new();
    for record in scores {
        scores_by_student
            .entry(record.student_id)
            .or_default()
            .push(record.clone());
    }

    let mut attendance_by_student: HashMap<Uuid, Vec<AttendanceRecord>> = HashMap::new();
    for record in attendance_records {
        attendance_by_student
            .entry(record.student_id)
            .or_default()
            .push(record.clone());
    }

    students
        .iter()
        .map(|context| {
            let scores = scores_by_student
                .get(&context.student_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let attendance = attendance_by_student
                .get(&context.student_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            risk::assess_student(context.clone(), scores, attendance, thresholds)
        })
        .collect()
}

pub fn build_report(
    scope_label: Option<&str>,
    students: &[StudentContext],
    scores: &[ScoreRecord],
    attendance_records: &[AttendanceRecord],
    thresholds: &Thresholds,
) -> String {
    let assessments = assess_all(students, scores, attendance_records, thresholds);

    let mut output = String::new();
    let label = scope_label.unwrap_or("all departments");

    let _ = writeln!(output, "# Academic Performance Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} students on record)",
        label,
        students.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Cohort Overview");

    let scored: Vec<f64> = score::valid_percentages(scores).collect();
    if scored.is_empty() {
        let _ = writeln!(output, "No scored exams in scope.");
    } else {
        let mean = scored.iter().sum::<f64>() / scored.len() as f64;
        let counts = aggregate::distribution(scored.iter().copied(), thresholds);
        let _ = writeln!(
            output,
            "Average {:.1}% across {} scored exams ({} records lacked a usable maximum).",
            mean,
            scored.len(),
            scores.len() - scored.len()
        );
        let _ = writeln!(
            output,
            "Distribution: {} excellent, {} good, {} average, {} poor.",
            counts.excellent, counts.good, counts.average, counts.poor
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Department Standings");

    let departments: HashMap<Uuid, String> = students
        .iter()
        .map(|s| (s.student_id, s.department_id.clone()))
        .collect();
    let buckets = aggregate::aggregate_by(scores, thresholds, |record| {
        departments
            .get(&record.student_id)
            .cloned()
            .unwrap_or_else(|| "unassigned".to_string())
    });
    let ranked = aggregate::rank_by_mean(buckets);

    if ranked.is_empty() {
        let _ = writeln!(output, "No departments with exam records in scope.");
    } else {
        for entry in &ranked {
            match (entry.rank, entry.bucket.mean) {
                (Some(rank), Some(mean)) => {
                    let _ = writeln!(
                        output,
                        "{}. {}: {:.1}% across {} scored exams",
                        rank, entry.bucket.key, mean, entry.bucket.count
                    );
                }
                _ => {
                    let _ = writeln!(
                        output,
                        "- {}: no scored exams ({} records)",
                        entry.bucket.key, entry.bucket.records
                    );
                }
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students At Risk");

    let mut flagged: Vec<&StudentAssessment> = assessments
        .iter()
        .filter(|a| matches!(a.risk, Some(RiskLevel::AtRisk | RiskLevel::HighRisk)))
        .collect();
    flagged.sort_by(|a, b| {
        b.risk
            .cmp(&a.risk)
            .then_with(|| {
                let worse = |band: Option<LearnerBand>| band.map(LearnerBand::severity_rank);
                worse(b.band).cmp(&worse(a.band))
            })
            .then_with(|| {
                a.average
                    .partial_cmp(&b.average)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    if flagged.is_empty() {
        let _ = writeln!(output, "No students below the passing average.");
    } else {
        for assessment in &flagged {
            let _ = writeln!(
                output,
                "- {} ({}): {}, average {:.1}%, trend {}",
                assessment.context.full_name,
                assessment.context.registration_no,
                assessment.risk.map(RiskLevel::label).unwrap_or("Safe"),
                assessment.average.unwrap_or(0.0),
                assessment.trend.label()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance Concerns");

    let mut wrote_concern = false;
    for assessment in &assessments {
        if let (Some(percentage), Some(band)) =
            (assessment.attendance.percentage, assessment.attendance_band)
        {
            if band.below_threshold() {
                let _ = writeln!(
                    output,
                    "- {} ({}): {:.1}% attendance ({})",
                    assessment.context.full_name,
                    assessment.context.registration_no,
                    percentage,
                    band.label()
                );
                wrote_concern = true;
            }
        } else {
            let _ = writeln!(
                output,
                "- {} ({}): no attendance recorded",
                assessment.context.full_name, assessment.context.registration_no
            );
            wrote_concern = true;
        }
    }
    if !wrote_concern {
        let _ = writeln!(output, "All students meet the attendance requirement.");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;
    use chrono::NaiveDate;

    fn context(name: &str, registration: &str, department: &str) -> StudentContext {
        StudentContext {
            student_id: Uuid::new_v4(),
            registration_no: registration.to_string(),
            full_name: name.to_string(),
            department_id: department.to_string(),
            semester: 4,
            batch: "2024".to_string(),
        }
    }

    fn score(student_id: Uuid, month: u32, marks: f64) -> ScoreRecord {
        ScoreRecord {
            student_id,
            subject_code: "CS301".to_string(),
            exam_type: "internal".to_string(),
            max_marks: Some(100.0),
            marks_obtained: marks,
            exam_date: NaiveDate::from_ymd_opt(2026, month, 10).unwrap(),
        }
    }

    fn attendance(student_id: Uuid, day: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            student_id,
            subject_code: "CS301".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            status,
        }
    }

    #[test]
    fn empty_scope_renders_no_data_lines() {
        let report = build_report(None, &[], &[], &[], &Thresholds::default());
        assert!(report.contains("No scored exams in scope."));
        assert!(report.contains("No departments with exam records in scope."));
        assert!(report.contains("No students below the passing average."));
        assert!(report.contains("All students meet the attendance requirement."));
    }

    #[test]
    fn declining_failing_student_appears_under_risk() {
        let student = context("Rohan Das", "REG-2024-031", "CSE");
        let id = student.student_id;
        let scores = vec![
            score(id, 1, 55.0),
            score(id, 2, 40.0),
            score(id, 3, 25.0),
            score(id, 4, 15.0),
        ];

        let report = build_report(
            Some("CSE"),
            &[student],
            &scores,
            &[],
            &Thresholds::default(),
        );
        assert!(report.contains("Rohan Das (REG-2024-031): High Risk"));
        assert!(report.contains("trend Declining"));
    }

    #[test]
    fn attendance_section_separates_low_from_missing() {
        use AttendanceStatus::*;
        let low = context("Asha Rao", "REG-2024-008", "CSE");
        let missing = context("Vikram Shah", "REG-2024-012", "CSE");
        let low_id = low.student_id;

        let attendance_records = vec![
            attendance(low_id, 1, Present),
            attendance(low_id, 2, Absent),
            attendance(low_id, 3, Absent),
            attendance(low_id, 4, Present),
        ];

        let report = build_report(
            None,
            &[low, missing],
            &[],
            &attendance_records,
            &Thresholds::default(),
        );
        assert!(report.contains("Asha Rao (REG-2024-008): 50.0% attendance (Critical)"));
        assert!(report.contains("Vikram Shah (REG-2024-012): no attendance recorded"));
    }

    #[test]
    fn department_standings_rank_by_mean() {
        let cse = context("A", "R1", "CSE");
        let eee = context("B", "R2", "EEE");
        let scores = vec![
            score(cse.student_id, 1, 80.0),
            score(eee.student_id, 1, 60.0),
        ];

        let report = build_report(
            None,
            &[cse, eee],
            &scores,
            &[],
            &Thresholds::default(),
        );
        assert!(report.contains("1. CSE: 80.0% across 1 scored exams"));
        assert!(report.contains("2. EEE: 60.0% across 1 scored exams"));
    }
}
