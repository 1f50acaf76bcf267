// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Write operations for students, interviewers and questions.

use interview_core::{Question, QuestionId};
use rusqlite::{Connection, TransactionBehavior, params};
use tracing::{debug, info};

use crate::connection::InterviewDb;
use crate::error::{Error, Result, is_unique_violation};
use crate::query::interview_id_of_student;
use crate::submission::delete_interview_rows;
use crate::types::{Interviewer, StudentRecord};

fn insert_question(conn: &Connection, question: &Question) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO question (question_id, question_root, question_sub, question_text,
                              question_type, answer_options, condition_logic, condition_display)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            question.question_id.to_string(),
            question.question_id.root(),
            question.question_id.sub(),
            question.question_text,
            question.question_type.as_str(),
            question.answer_options,
            question.condition.as_ref().map(|c| c.source()),
            question.condition_display,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            Error::duplicate("question", question.question_id)
        } else {
            e.into()
        }
    })?;
    Ok(())
}

impl InterviewDb {
    /// Insert a new student.
    pub fn create_student(&self, student: &StudentRecord) -> Result<()> {
        student.validate()?;
        self.conn
            .execute(
                r#"
                INSERT INTO student (student_id, student_name, program, faculty, campus, level,
                                     phone, scholarship, graduated_school, hometown)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    student.student_id,
                    student.student_name,
                    student.program,
                    student.faculty,
                    student.campus,
                    student.level,
                    student.phone,
                    student.scholarship,
                    student.graduated_school,
                    student.hometown,
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::duplicate("student", &student.student_id)
                } else {
                    e.into()
                }
            })?;
        debug!("Created student {}", student.student_id);
        Ok(())
    }

    /// Replace the profile of the student `student.student_id`.
    pub fn update_student(&self, student: &StudentRecord) -> Result<()> {
        student.validate()?;
        let rows = self.conn.execute(
            r#"
            UPDATE student
            SET student_name = ?2, program = ?3, faculty = ?4, campus = ?5, level = ?6,
                phone = ?7, scholarship = ?8, graduated_school = ?9, hometown = ?10
            WHERE student_id = ?1
            "#,
            params![
                student.student_id,
                student.student_name,
                student.program,
                student.faculty,
                student.campus,
                student.level,
                student.phone,
                student.scholarship,
                student.graduated_school,
                student.hometown,
            ],
        )?;
        if rows == 0 {
            return Err(Error::not_found("student", &student.student_id));
        }
        Ok(())
    }

    /// Delete a student together with its interview and answers.
    pub fn delete_student(&mut self, student_id: &str) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(interview_id) = interview_id_of_student(&tx, student_id)? {
            delete_interview_rows(&tx, interview_id)?;
        }
        let rows = tx.execute(
            "DELETE FROM student WHERE student_id = ?1",
            params![student_id],
        )?;
        if rows == 0 {
            return Err(Error::not_found("student", student_id));
        }

        tx.commit()?;
        info!("Deleted student {student_id}");
        Ok(())
    }

    pub fn create_interviewer(&self, interviewer: &Interviewer) -> Result<()> {
        interviewer.validate()?;
        self.conn
            .execute(
                "INSERT INTO interviewer (staff_id, staff_name, staff_faculty) VALUES (?1, ?2, ?3)",
                params![
                    interviewer.staff_id,
                    interviewer.staff_name,
                    interviewer.staff_faculty
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::duplicate("interviewer", &interviewer.staff_id)
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    pub fn update_interviewer(&self, interviewer: &Interviewer) -> Result<()> {
        interviewer.validate()?;
        let rows = self.conn.execute(
            "UPDATE interviewer SET staff_name = ?2, staff_faculty = ?3 WHERE staff_id = ?1",
            params![
                interviewer.staff_id,
                interviewer.staff_name,
                interviewer.staff_faculty
            ],
        )?;
        if rows == 0 {
            return Err(Error::not_found("interviewer", &interviewer.staff_id));
        }
        Ok(())
    }

    /// Delete an interviewer that has not recorded any interview.
    pub fn delete_interviewer(&mut self, staff_id: &str) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let in_use = tx
            .prepare_cached("SELECT 1 FROM interview WHERE interviewer_id = ?1")?
            .exists(params![staff_id])?;
        if in_use {
            return Err(Error::InUse {
                kind: "interviewer",
                id: staff_id.to_string(),
                referenced_by: "interviews",
            });
        }
        let rows = tx.execute(
            "DELETE FROM interviewer WHERE staff_id = ?1",
            params![staff_id],
        )?;
        if rows == 0 {
            return Err(Error::not_found("interviewer", staff_id));
        }

        tx.commit()?;
        Ok(())
    }

    /// Add a question to the catalog.
    ///
    /// The question is normalized first and its condition may only refer to
    /// questions that come before it.
    pub fn create_question(&mut self, question: Question) -> Result<Question> {
        let question = question.normalize()?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        question.check_references()?;
        insert_question(&tx, &question)?;

        tx.commit()?;
        debug!("Created question {}", question.question_id);
        Ok(question)
    }

    /// Replace the question with the same id.
    pub fn update_question(&mut self, question: Question) -> Result<Question> {
        let question = question.normalize()?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        question.check_references()?;
        let rows = tx.execute(
            r#"
            UPDATE question
            SET question_text = ?2, question_type = ?3, answer_options = ?4,
                condition_logic = ?5, condition_display = ?6
            WHERE question_id = ?1
            "#,
            params![
                question.question_id.to_string(),
                question.question_text,
                question.question_type.as_str(),
                question.answer_options,
                question.condition.as_ref().map(|c| c.source()),
                question.condition_display,
            ],
        )?;
        if rows == 0 {
            return Err(Error::not_found("question", question.question_id));
        }

        tx.commit()?;
        Ok(question)
    }

    /// Delete a question that has no recorded answers.
    pub fn delete_question(&mut self, id: QuestionId) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let in_use = tx
            .prepare_cached("SELECT 1 FROM interview_answer WHERE question_id = ?1")?
            .exists(params![id.to_string()])?;
        if in_use {
            return Err(Error::InUse {
                kind: "question",
                id: id.to_string(),
                referenced_by: "answers",
            });
        }
        let rows = tx.execute(
            "DELETE FROM question WHERE question_id = ?1",
            params![id.to_string()],
        )?;
        if rows == 0 {
            return Err(Error::not_found("question", id));
        }

        tx.commit()?;
        Ok(())
    }

    /// Insert every question of `questions` in one transaction, skipping
    /// validation of forward references. Used to seed an empty catalog.
    pub fn seed_questions(&mut self, questions: Vec<Question>) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut count = 0;
        for question in questions {
            insert_question(&tx, &question.normalize()?)?;
            count += 1;
        }
        tx.commit()?;
        info!("Seeded {count} questions");
        Ok(count)
    }
}
