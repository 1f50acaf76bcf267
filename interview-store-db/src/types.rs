// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Database row types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use interview_core::{Actor, Question, QuestionId, QuestionKind, ValidationError};
use serde::{Deserialize, Serialize};

/// Profile of a student as entered by staff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRecord {
    pub student_id: String,
    pub student_name: String,
    pub program: String,
    pub faculty: String,
    pub campus: String,
    pub level: String,
    pub phone: Option<String>,
    pub scholarship: Option<String>,
    pub graduated_school: Option<String>,
    pub hometown: Option<String>,
}

impl StudentRecord {
    /// Check that every required field is present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (value, field) in [
            (&self.student_id, "student_id"),
            (&self.student_name, "student_name"),
            (&self.program, "program"),
            (&self.faculty, "faculty"),
            (&self.campus, "campus"),
            (&self.level, "level"),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// A student row with its derived interview status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    #[serde(flatten)]
    pub record: StudentRecord,
    /// Whether an interview references this student, computed on read
    pub interviewed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interviewer {
    pub staff_id: String,
    pub staff_name: String,
    pub staff_faculty: String,
}

impl Interviewer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (value, field) in [
            (&self.staff_id, "staff_id"),
            (&self.staff_name, "staff_name"),
            (&self.staff_faculty, "staff_faculty"),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }
}

impl From<Interviewer> for Actor {
    fn from(i: Interviewer) -> Self {
        Actor {
            staff_id: i.staff_id,
            name: i.staff_name,
            faculty: i.staff_faculty,
        }
    }
}

/// One row of the interview listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewSummary {
    pub interview_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub program: String,
    pub faculty: String,
    pub interviewer_id: String,
    pub interviewer_name: String,
    pub interview_date: DateTime<Utc>,
    pub completed: bool,
}

/// A recorded answer joined with its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRow {
    pub answer_id: i64,
    pub question_id: QuestionId,
    pub question_text: String,
    pub question_type: QuestionKind,
    pub answer_options: Option<String>,
    pub answer_text: String,
}

/// An interview with the student profile, interviewer and answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewDetail {
    pub interview_id: i64,
    #[serde(flatten)]
    pub student: StudentRecord,
    pub interviewer_id: String,
    pub interviewer_name: String,
    pub interviewer_faculty: String,
    pub interview_date: DateTime<Utc>,
    pub completed: bool,
    pub answers: Vec<AnswerRow>,
}

/// Interview progress of one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub faculty: String,
    pub program: String,
    pub total_students: u64,
    pub interviewed_count: u64,
    pub not_interviewed_count: u64,
}

/// A group label with the number of interviews in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

/// Aggregate interview progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewStatistics {
    pub total_students: u64,
    pub interviewed: u64,
    pub not_interviewed: u64,
    /// Percentage of students interviewed, 0 when there are no students
    pub completion_rate: f64,
    pub by_faculty: Vec<GroupCount>,
    pub by_program: Vec<GroupCount>,
    /// Keyed by UTC day, `YYYY-MM-DD`
    pub by_day: Vec<GroupCount>,
}

/// One interview flattened for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub interview_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub program: String,
    pub faculty: String,
    pub campus: String,
    pub level: String,
    pub interviewer_name: String,
    pub interview_date: DateTime<Utc>,
    pub answers: BTreeMap<QuestionId, String>,
}

/// Everything needed to render an export: the question columns and one row
/// per interview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportData {
    pub questions: Vec<Question>,
    pub rows: Vec<ExportRow>,
}

/// Convert a stored Unix timestamp.
pub(crate) fn unix_to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_default()
}
