// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Read query operations.

use interview_core::{Catalog, Condition, FacultyLookup, Question, QuestionId, QuestionKind, Scope};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, Row, params};

use crate::connection::InterviewDb;
use crate::error::{Error, Result};
use crate::types::{
    AnswerRow, InterviewDetail, InterviewSummary, Interviewer, Student, StudentRecord,
    unix_to_datetime,
};

const STUDENT_SELECT: &str = r#"
    SELECT s.student_id, s.student_name, s.program, s.faculty, s.campus, s.level,
           s.phone, s.scholarship, s.graduated_school, s.hometown,
           EXISTS (SELECT 1 FROM interview i WHERE i.student_id = s.student_id) AS interviewed
    FROM student s
"#;

const QUESTION_SELECT: &str = r#"
    SELECT question_root, question_sub, question_text, question_type,
           answer_options, condition_logic, condition_display
    FROM question
"#;

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn student_record_from_row(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
    Ok(StudentRecord {
        student_id: row.get("student_id")?,
        student_name: row.get("student_name")?,
        program: row.get("program")?,
        faculty: row.get("faculty")?,
        campus: row.get("campus")?,
        level: row.get("level")?,
        phone: row.get("phone")?,
        scholarship: row.get("scholarship")?,
        graduated_school: row.get("graduated_school")?,
        hometown: row.get("hometown")?,
    })
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        record: student_record_from_row(row)?,
        interviewed: row.get("interviewed")?,
    })
}

fn interviewer_from_row(row: &Row<'_>) -> rusqlite::Result<Interviewer> {
    Ok(Interviewer {
        staff_id: row.get("staff_id")?,
        staff_name: row.get("staff_name")?,
        staff_faculty: row.get("staff_faculty")?,
    })
}

fn kind_from_row(row: &Row<'_>, column: &str) -> rusqlite::Result<QuestionKind> {
    let idx = row.as_ref().column_index(column)?;
    let kind: String = row.get(idx)?;
    kind.parse().map_err(|e| conversion_error(idx, e))
}

pub(crate) fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    let logic: Option<String> = row.get("condition_logic")?;
    Ok(Question {
        question_id: QuestionId::follow_up(row.get("question_root")?, row.get("question_sub")?),
        question_text: row.get("question_text")?,
        question_type: kind_from_row(row, "question_type")?,
        answer_options: row.get("answer_options")?,
        condition: logic.as_deref().and_then(Condition::parse),
        condition_display: row.get("condition_display")?,
    })
}

fn answer_from_row(row: &Row<'_>) -> rusqlite::Result<AnswerRow> {
    let idx = row.as_ref().column_index("question_id")?;
    let question_id: String = row.get(idx)?;
    Ok(AnswerRow {
        answer_id: row.get("answer_id")?,
        question_id: question_id.parse().map_err(|e| conversion_error(idx, e))?,
        question_text: row.get("question_text")?,
        question_type: kind_from_row(row, "question_type")?,
        answer_options: row.get("answer_options")?,
        answer_text: row.get("answer_text")?,
    })
}

fn interview_summary_from_row(row: &Row<'_>) -> rusqlite::Result<InterviewSummary> {
    Ok(InterviewSummary {
        interview_id: row.get("interview_id")?,
        student_id: row.get("student_id")?,
        student_name: row.get("student_name")?,
        program: row.get("program")?,
        faculty: row.get("faculty")?,
        interviewer_id: row.get("interviewer_id")?,
        interviewer_name: row.get("interviewer_name")?,
        interview_date: unix_to_datetime(row.get("interview_date")?),
        completed: row.get("completed")?,
    })
}

pub(crate) fn student_exists(conn: &Connection, student_id: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM student WHERE student_id = ?1")?;
    Ok(stmt.exists(params![student_id])?)
}

pub(crate) fn interviewer_exists(conn: &Connection, staff_id: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM interviewer WHERE staff_id = ?1")?;
    Ok(stmt.exists(params![staff_id])?)
}

pub(crate) fn question_exists(conn: &Connection, id: QuestionId) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM question WHERE question_id = ?1")?;
    Ok(stmt.exists(params![id.to_string()])?)
}

pub(crate) fn interview_exists(conn: &Connection, interview_id: i64) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM interview WHERE interview_id = ?1")?;
    Ok(stmt.exists(params![interview_id])?)
}

pub(crate) fn interview_id_of_student(conn: &Connection, student_id: &str) -> Result<Option<i64>> {
    let mut stmt = conn.prepare_cached("SELECT interview_id FROM interview WHERE student_id = ?1")?;
    match stmt.query_row(params![student_id], |row| row.get(0)) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn list_questions(conn: &Connection) -> Result<Vec<Question>> {
    let mut stmt =
        conn.prepare_cached(&format!("{QUESTION_SELECT} ORDER BY question_root, question_sub"))?;
    let questions = stmt
        .query_map([], question_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(questions)
}

/// Answers of an interview in question order.
pub(crate) fn answers_of(conn: &Connection, interview_id: i64) -> Result<Vec<AnswerRow>> {
    let mut stmt = conn.prepare_cached(
        r#"
        SELECT a.answer_id, a.question_id, q.question_text, q.question_type,
               q.answer_options, a.answer_text
        FROM interview_answer a
        JOIN question q ON a.question_id = q.question_id
        WHERE a.interview_id = ?1
        ORDER BY q.question_root, q.question_sub
        "#,
    )?;
    let answers = stmt
        .query_map(params![interview_id], answer_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(answers)
}

/// Interview detail selected by `filter`, a condition on `i` with one
/// parameter.
pub(crate) fn interview_detail(
    conn: &Connection,
    filter: &str,
    param: &dyn ToSql,
) -> Result<Option<InterviewDetail>> {
    let mut stmt = conn.prepare_cached(&format!(
        r#"
        SELECT i.interview_id, i.interviewer_id, i.interview_date, i.completed,
               s.student_id, s.student_name, s.program, s.faculty, s.campus, s.level,
               s.phone, s.scholarship, s.graduated_school, s.hometown,
               t.staff_name AS interviewer_name, t.staff_faculty AS interviewer_faculty
        FROM interview i
        JOIN student s ON i.student_id = s.student_id
        JOIN interviewer t ON i.interviewer_id = t.staff_id
        WHERE {filter}
        "#
    ))?;

    let detail = stmt.query_row([param], |row| {
        Ok(InterviewDetail {
            interview_id: row.get("interview_id")?,
            student: student_record_from_row(row)?,
            interviewer_id: row.get("interviewer_id")?,
            interviewer_name: row.get("interviewer_name")?,
            interviewer_faculty: row.get("interviewer_faculty")?,
            interview_date: unix_to_datetime(row.get("interview_date")?),
            completed: row.get("completed")?,
            answers: Vec::new(),
        })
    });

    match detail {
        Ok(mut detail) => {
            detail.answers = answers_of(conn, detail.interview_id)?;
            Ok(Some(detail))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl InterviewDb {
    /// Query a student by id.
    ///
    /// Returns `None` if the student is not in the database.
    pub fn query_student(&self, student_id: &str) -> Result<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{STUDENT_SELECT} WHERE s.student_id = ?1"))?;
        match stmt.query_row(params![student_id], student_from_row) {
            Ok(student) => Ok(Some(student)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Faculty owning a student, `None` if the student does not exist.
    pub fn student_faculty(&self, student_id: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT faculty FROM student WHERE student_id = ?1")?;
        match stmt.query_row(params![student_id], |row| row.get(0)) {
            Ok(faculty) => Ok(Some(faculty)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Students visible in `scope`, ordered by id.
    pub fn list_students(&self, scope: Scope<'_>) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{STUDENT_SELECT} WHERE (?1 IS NULL OR s.faculty = ?1) ORDER BY s.student_id"
        ))?;
        let students = stmt
            .query_map(params![scope.faculty()], student_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    /// Students of one faculty. The caller checks that the faculty is in
    /// scope.
    pub fn list_students_by_faculty(&self, faculty: &str) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{STUDENT_SELECT} WHERE s.faculty = ?1 ORDER BY s.program, s.student_id"
        ))?;
        let students = stmt
            .query_map(params![faculty], student_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    pub fn list_students_by_program(
        &self,
        scope: Scope<'_>,
        program: &str,
    ) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{STUDENT_SELECT} WHERE s.program = ?1 AND (?2 IS NULL OR s.faculty = ?2) ORDER BY s.student_id"
        ))?;
        let students = stmt
            .query_map(params![program, scope.faculty()], student_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    /// Students in `scope` without an interview, ordered by faculty, program
    /// and id.
    pub fn list_not_interviewed(&self, scope: Scope<'_>) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            r#"{STUDENT_SELECT}
            WHERE NOT EXISTS (SELECT 1 FROM interview i WHERE i.student_id = s.student_id)
              AND (?1 IS NULL OR s.faculty = ?1)
            ORDER BY s.faculty, s.program, s.student_id"#
        ))?;
        let students = stmt
            .query_map(params![scope.faculty()], student_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    pub fn query_interviewer(&self, staff_id: &str) -> Result<Option<Interviewer>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT staff_id, staff_name, staff_faculty FROM interviewer WHERE staff_id = ?1",
        )?;
        match stmt.query_row(params![staff_id], interviewer_from_row) {
            Ok(interviewer) => Ok(Some(interviewer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_interviewers(&self) -> Result<Vec<Interviewer>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT staff_id, staff_name, staff_faculty FROM interviewer ORDER BY staff_id",
        )?;
        let interviewers = stmt
            .query_map([], interviewer_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(interviewers)
    }

    pub fn query_question(&self, id: QuestionId) -> Result<Option<Question>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{QUESTION_SELECT} WHERE question_id = ?1"))?;
        match stmt.query_row(params![id.to_string()], question_from_row) {
            Ok(question) => Ok(Some(question)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All questions in presentation order.
    pub fn list_questions(&self) -> Result<Vec<Question>> {
        list_questions(&self.conn)
    }

    /// The current question catalog, read fresh from the database.
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::new(self.list_questions()?))
    }

    pub fn count_questions(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM question", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Interviews of students in `scope`, newest first.
    pub fn list_interviews(&self, scope: Scope<'_>) -> Result<Vec<InterviewSummary>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT i.interview_id, i.student_id, s.student_name, s.program, s.faculty,
                   i.interviewer_id, t.staff_name AS interviewer_name,
                   i.interview_date, i.completed
            FROM interview i
            JOIN student s ON i.student_id = s.student_id
            JOIN interviewer t ON i.interviewer_id = t.staff_id
            WHERE (?1 IS NULL OR s.faculty = ?1)
            ORDER BY i.interview_date DESC, i.interview_id DESC
            "#,
        )?;
        let interviews = stmt
            .query_map(params![scope.faculty()], interview_summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(interviews)
    }

    /// Query an interview with its answers.
    pub fn query_interview(&self, interview_id: i64) -> Result<Option<InterviewDetail>> {
        interview_detail(&self.conn, "i.interview_id = ?1", &interview_id)
    }

    pub fn query_interview_by_student(&self, student_id: &str) -> Result<Option<InterviewDetail>> {
        interview_detail(&self.conn, "i.student_id = ?1", &student_id)
    }

    /// Student owning an interview.
    pub fn interview_student(&self, interview_id: i64) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT student_id FROM interview WHERE interview_id = ?1")?;
        match stmt.query_row(params![interview_id], |row| row.get(0)) {
            Ok(student_id) => Ok(Some(student_id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Answers of an interview in question order.
    pub fn query_answers(&self, interview_id: i64) -> Result<Vec<AnswerRow>> {
        if !interview_exists(&self.conn, interview_id)? {
            return Err(Error::not_found("interview", interview_id));
        }
        answers_of(&self.conn, interview_id)
    }
}

impl FacultyLookup for InterviewDb {
    type Error = Error;

    fn student_faculty(&self, student_id: &str) -> Result<Option<String>> {
        InterviewDb::student_faculty(self, student_id)
    }
}
