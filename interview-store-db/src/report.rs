// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Aggregate reports and export data.

use std::collections::BTreeMap;

use interview_core::{QuestionId, Scope};
use rusqlite::params;

use crate::connection::InterviewDb;
use crate::error::Result;
use crate::query::list_questions;
use crate::types::{
    ExportData, ExportRow, GroupCount, InterviewStatistics, StatusSummary, unix_to_datetime,
};

impl InterviewDb {
    /// Interviewed and outstanding students per faculty and program.
    pub fn interview_status_summary(&self, scope: Scope<'_>) -> Result<Vec<StatusSummary>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT s.faculty, s.program,
                   COUNT(*) AS total_students,
                   COUNT(i.interview_id) AS interviewed_count
            FROM student s
            LEFT JOIN interview i ON s.student_id = i.student_id
            WHERE (?1 IS NULL OR s.faculty = ?1)
            GROUP BY s.faculty, s.program
            ORDER BY s.faculty, s.program
            "#,
        )?;

        let summary = stmt
            .query_map(params![scope.faculty()], |row| {
                let total: i64 = row.get("total_students")?;
                let interviewed: i64 = row.get("interviewed_count")?;
                Ok(StatusSummary {
                    faculty: row.get("faculty")?,
                    program: row.get("program")?,
                    total_students: total as u64,
                    interviewed_count: interviewed as u64,
                    not_interviewed_count: (total - interviewed) as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summary)
    }

    fn interview_counts(&self, scope: Scope<'_>, key: &str) -> Result<Vec<GroupCount>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            r#"
            SELECT {key} AS group_key, COUNT(*) AS group_count
            FROM interview i
            JOIN student s ON i.student_id = s.student_id
            WHERE (?1 IS NULL OR s.faculty = ?1)
            GROUP BY 1
            ORDER BY 1
            "#
        ))?;
        let counts = stmt
            .query_map(params![scope.faculty()], |row| {
                Ok(GroupCount {
                    key: row.get("group_key")?,
                    count: row.get::<_, i64>("group_count")? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    /// Completion totals and interview counts by faculty, program and day.
    pub fn interview_statistics(&self, scope: Scope<'_>) -> Result<InterviewStatistics> {
        let (total, interviewed): (i64, i64) = self.conn.query_row(
            r#"
            SELECT COUNT(*), COUNT(i.interview_id)
            FROM student s
            LEFT JOIN interview i ON s.student_id = i.student_id
            WHERE (?1 IS NULL OR s.faculty = ?1)
            "#,
            params![scope.faculty()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let completion_rate = if total == 0 {
            0.0
        } else {
            (interviewed as f64 * 10_000.0 / total as f64).round() / 100.0
        };

        Ok(InterviewStatistics {
            total_students: total as u64,
            interviewed: interviewed as u64,
            not_interviewed: (total - interviewed) as u64,
            completion_rate,
            by_faculty: self.interview_counts(scope, "s.faculty")?,
            by_program: self.interview_counts(scope, "s.program")?,
            by_day: self.interview_counts(scope, "date(i.interview_date, 'unixepoch')")?,
        })
    }

    /// Interviews in `scope` with their answers, oldest first, plus the
    /// question columns.
    pub fn export_rows(&self, scope: Scope<'_>) -> Result<ExportData> {
        let questions = list_questions(&self.conn)?;

        let mut answers: BTreeMap<i64, BTreeMap<QuestionId, String>> = BTreeMap::new();
        {
            let mut stmt = self.conn.prepare_cached(
                r#"
                SELECT a.interview_id, q.question_root, q.question_sub, a.answer_text
                FROM interview_answer a
                JOIN question q ON a.question_id = q.question_id
                JOIN interview i ON a.interview_id = i.interview_id
                JOIN student s ON i.student_id = s.student_id
                WHERE (?1 IS NULL OR s.faculty = ?1)
                "#,
            )?;
            let mut rows = stmt.query(params![scope.faculty()])?;
            while let Some(row) = rows.next()? {
                let id = QuestionId::follow_up(row.get(1)?, row.get(2)?);
                answers
                    .entry(row.get(0)?)
                    .or_default()
                    .insert(id, row.get(3)?);
            }
        }

        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT i.interview_id, i.interview_date,
                   s.student_id, s.student_name, s.program, s.faculty, s.campus, s.level,
                   t.staff_name
            FROM interview i
            JOIN student s ON i.student_id = s.student_id
            JOIN interviewer t ON i.interviewer_id = t.staff_id
            WHERE (?1 IS NULL OR s.faculty = ?1)
            ORDER BY i.interview_date, i.interview_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![scope.faculty()], |row| {
                let interview_id: i64 = row.get("interview_id")?;
                Ok(ExportRow {
                    interview_id,
                    student_id: row.get("student_id")?,
                    student_name: row.get("student_name")?,
                    program: row.get("program")?,
                    faculty: row.get("faculty")?,
                    campus: row.get("campus")?,
                    level: row.get("level")?,
                    interviewer_name: row.get("staff_name")?,
                    interview_date: unix_to_datetime(row.get("interview_date")?),
                    answers: answers.remove(&interview_id).unwrap_or_default(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ExportData { questions, rows })
    }
}
