use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "late" => Some(Self::Late),
            "excused" => Some(Self::Excused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub student_id: Uuid,
    pub subject_code: String,
    pub exam_type: String,
    pub max_marks: Option<f64>,
    pub marks_obtained: f64,
    pub exam_date: NaiveDate,
}

impl ScoreRecord {
    pub fn percentage(&self) -> Option<f64> {
        crate::score::percentage(self.marks_obtained, self.max_marks?)
    }
}

#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub student_id: Uuid,
    pub subject_code: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentContext {
    pub student_id: Uuid,
    pub registration_no: String,
    pub full_name: String,
    pub department_id: String,
    pub semester: i32,
    pub batch: String,
}
