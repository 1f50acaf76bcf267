// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Interview create, answer update and delete.
//!
//! Each operation runs in one IMMEDIATE transaction: either every row of the
//! call is written or none is. A failed check returns before commit and the
//! dropped transaction rolls back.

use chrono::{DateTime, Utc};
use interview_core::{AnswerEntry, NewInterview};
use rusqlite::{Connection, TransactionBehavior, params};
use tracing::{debug, info};

use crate::connection::InterviewDb;
use crate::error::{Error, Result, is_unique_violation};
use crate::query::{
    answers_of, interview_detail, interview_exists, interview_id_of_student, interviewer_exists,
    question_exists, student_exists,
};
use crate::types::{AnswerRow, InterviewDetail};

/// Insert or overwrite one answer.
fn upsert_answer(conn: &Connection, interview_id: i64, entry: &AnswerEntry) -> Result<()> {
    conn.prepare_cached(
        r#"
        INSERT INTO interview_answer (interview_id, question_id, answer_text)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (interview_id, question_id) DO UPDATE SET answer_text = excluded.answer_text
        "#,
    )?
    .execute(params![
        interview_id,
        entry.question_id.to_string(),
        entry.answer_text
    ])?;
    Ok(())
}

fn check_questions(conn: &Connection, answers: &[AnswerEntry]) -> Result<()> {
    for entry in answers {
        if !question_exists(conn, entry.question_id)? {
            return Err(Error::not_found("question", entry.question_id));
        }
    }
    Ok(())
}

/// Remove an interview and its answers, children first.
pub(crate) fn delete_interview_rows(conn: &Connection, interview_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM interview_answer WHERE interview_id = ?1",
        params![interview_id],
    )?;
    Ok(conn.execute(
        "DELETE FROM interview WHERE interview_id = ?1",
        params![interview_id],
    )?)
}

impl InterviewDb {
    /// Record a validated interview, timestamped now.
    pub fn create_interview(&mut self, interview: &NewInterview) -> Result<InterviewDetail> {
        self.create_interview_at(interview, Utc::now())
    }

    /// Record a validated interview with an explicit timestamp.
    ///
    /// Fails with [`Error::AlreadyInterviewed`] if the student already has an
    /// interview, and with [`Error::NotFound`] if the student, the
    /// interviewer or any answered question does not exist.
    pub fn create_interview_at(
        &mut self,
        interview: &NewInterview,
        at: DateTime<Utc>,
    ) -> Result<InterviewDetail> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !student_exists(&tx, &interview.student_id)? {
            return Err(Error::not_found("student", &interview.student_id));
        }
        if !interviewer_exists(&tx, &interview.interviewer_id)? {
            return Err(Error::not_found("interviewer", &interview.interviewer_id));
        }
        if interview_id_of_student(&tx, &interview.student_id)?.is_some() {
            return Err(Error::AlreadyInterviewed(interview.student_id.clone()));
        }
        check_questions(&tx, &interview.answers)?;

        tx.execute(
            r#"
            INSERT INTO interview (student_id, interviewer_id, interview_date, completed)
            VALUES (?1, ?2, ?3, 1)
            "#,
            params![
                interview.student_id,
                interview.interviewer_id,
                at.timestamp()
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyInterviewed(interview.student_id.clone())
            } else {
                e.into()
            }
        })?;
        let interview_id = tx.last_insert_rowid();

        for entry in &interview.answers {
            upsert_answer(&tx, interview_id, entry)?;
        }

        let detail = interview_detail(&tx, "i.interview_id = ?1", &interview_id)?
            .ok_or_else(|| Error::not_found("interview", interview_id))?;
        tx.commit()?;

        info!(
            "Recorded interview {interview_id} of student {} by {} ({} answers)",
            interview.student_id,
            interview.interviewer_id,
            interview.answers.len()
        );
        Ok(detail)
    }

    /// Update or insert answers of an existing interview.
    ///
    /// Returns every answer of the interview afterwards, in question order.
    pub fn update_answers(
        &mut self,
        interview_id: i64,
        answers: &[AnswerEntry],
    ) -> Result<Vec<AnswerRow>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !interview_exists(&tx, interview_id)? {
            return Err(Error::not_found("interview", interview_id));
        }
        check_questions(&tx, answers)?;
        for entry in answers {
            upsert_answer(&tx, interview_id, entry)?;
        }

        let rows = answers_of(&tx, interview_id)?;
        tx.commit()?;
        debug!("Updated {} answers of interview {interview_id}", answers.len());
        Ok(rows)
    }

    /// Delete an interview and its answers. The student returns to the
    /// not-interviewed state.
    pub fn delete_interview(&mut self, interview_id: i64) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if delete_interview_rows(&tx, interview_id)? == 0 {
            return Err(Error::not_found("interview", interview_id));
        }

        tx.commit()?;
        info!("Deleted interview {interview_id}");
        Ok(())
    }
}
