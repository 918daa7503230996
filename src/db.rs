use anyhow::Context;
use sqlx::{PgPool, Row};

use crate::models::{AttendanceRecord, AttendanceStatus, ScoreRecord, StudentContext};

/// Narrows a fetch to one department or one student, with an optional
/// semester. The store is read-only from here; schema and writes belong to
/// the records application.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    pub department: Option<&'a str>,
    pub registration: Option<&'a str>,
    pub semester: Option<i32>,
}

fn scope_clauses(scope: &Scope<'_>) -> String {
    let mut clauses = String::new();
    let mut next = 1;

    if scope.department.is_some() {
        clauses.push_str(&format!(" AND st.department_id = ${next}"));
        next += 1;
    } else if scope.registration.is_some() {
        clauses.push_str(&format!(" AND st.registration_no = ${next}"));
        next += 1;
    }
    if scope.semester.is_some() {
        clauses.push_str(&format!(" AND st.semester = ${next}"));
    }

    clauses
}

pub async fn fetch_students(
    pool: &PgPool,
    scope: &Scope<'_>,
) -> anyhow::Result<Vec<StudentContext>> {
    let mut query = String::from(
        "SELECT st.id AS student_id, st.registration_no, st.full_name, \
         st.department_id, st.semester, st.batch \
         FROM academics.students st \
         WHERE 1 = 1",
    );
    query.push_str(&scope_clauses(scope));
    query.push_str(" ORDER BY st.registration_no");

    let mut rows = sqlx::query(&query);
    if let Some(value) = scope.department {
        rows = rows.bind(value);
    } else if let Some(value) = scope.registration {
        rows = rows.bind(value);
    }
    if let Some(value) = scope.semester {
        rows = rows.bind(value);
    }

    let records = rows
        .fetch_all(pool)
        .await
        .context("failed to fetch students")?;
    let mut students = Vec::new();

    for row in records {
        students.push(StudentContext {
            student_id: row.get("student_id"),
            registration_no: row.get("registration_no"),
            full_name: row.get("full_name"),
            department_id: row.get("department_id"),
            semester: row.get("semester"),
            batch: row.get("batch"),
        });
    }

    Ok(students)
}

pub async fn fetch_score_records(
    pool: &PgPool,
    scope: &Scope<'_>,
) -> anyhow::Result<Vec<ScoreRecord>> {
    let mut query = String::from(
        "SELECT es.student_id, es.subject_code, es.exam_type, \
         es.max_marks, es.marks_obtained, es.exam_date \
         FROM academics.exam_scores es \
         JOIN academics.students st ON st.id = es.student_id \
         WHERE 1 = 1",
    );
    query.push_str(&scope_clauses(scope));
    query.push_str(" ORDER BY es.exam_date");

    let mut rows = sqlx::query(&query);
    if let Some(value) = scope.department {
        rows = rows.bind(value);
    } else if let Some(value) = scope.registration {
        rows = rows.bind(value);
    }
    if let Some(value) = scope.semester {
        rows = rows.bind(value);
    }

    let records = rows
        .fetch_all(pool)
        .await
        .context("failed to fetch exam scores")?;
    let mut scores = Vec::new();

    for row in records {
        scores.push(ScoreRecord {
            student_id: row.get("student_id"),
            subject_code: row.get("subject_code"),
            exam_type: row.get("exam_type"),
            max_marks: row.get("max_marks"),
            marks_obtained: row.get("marks_obtained"),
            exam_date: row.get("exam_date"),
        });
    }

    Ok(scores)
}

pub async fn fetch_attendance_records(
    pool: &PgPool,
    scope: &Scope<'_>,
) -> anyhow::Result<Vec<AttendanceRecord>> {
    let mut query = String::from(
        "SELECT a.student_id, a.subject_code, a.date, a.status \
         FROM academics.attendance a \
         JOIN academics.students st ON st.id = a.student_id \
         WHERE 1 = 1",
    );
    query.push_str(&scope_clauses(scope));
    query.push_str(" ORDER BY a.date");

    let mut rows = sqlx::query(&query);
    if let Some(value) = scope.department {
        rows = rows.bind(value);
    } else if let Some(value) = scope.registration {
        rows = rows.bind(value);
    }
    if let Some(value) = scope.semester {
        rows = rows.bind(value);
    }

    let records = rows
        .fetch_all(pool)
        .await
        .context("failed to fetch attendance")?;
    let mut attendance = Vec::new();

    for row in records {
        let status: String = row.get("status");
        let status = AttendanceStatus::parse(&status)
            .with_context(|| format!("unknown attendance status '{status}'"))?;

        attendance.push(AttendanceRecord {
            student_id: row.get("student_id"),
            subject_code: row.get("subject_code"),
            date: row.get("date"),
            status,
        });
    }

    Ok(attendance)
}
