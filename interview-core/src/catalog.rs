// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! The ordered question catalog and visibility evaluation.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::ValidationError;
use crate::question::{Question, QuestionId};

/// Answers given so far, keyed by question. Absent key means unanswered.
pub type AnswerMap = BTreeMap<QuestionId, String>;

/// A condition clause that looks at a question not presented before its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardReference {
    pub question: QuestionId,
    pub referenced: QuestionId,
}

impl From<ForwardReference> for ValidationError {
    fn from(r: ForwardReference) -> Self {
        ValidationError::ForwardReference {
            question: r.question,
            referenced: r.referenced,
        }
    }
}

/// Questions in presentation order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    pub fn new(mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| q.question_id);
        let catalog = Self { questions };
        for r in catalog.forward_references() {
            warn!(
                "condition of question {} refers to question {}, which is not asked before it",
                r.question, r.referenced
            );
        }
        catalog
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions
            .binary_search_by_key(&id, |q| q.question_id)
            .ok()
            .map(|idx| &self.questions[idx])
    }

    /// Questions currently visible for `answers`, in presentation order.
    ///
    /// Questions without a condition are always visible. Recomputed from
    /// scratch on every call.
    pub fn visible(&self, answers: &AnswerMap) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.condition.as_ref().is_none_or(|c| c.evaluate(answers)))
            .collect()
    }

    /// Clauses referencing a question that does not sort before the question
    /// owning the condition. Such conditions cannot be decided in one pass.
    pub fn forward_references(&self) -> Vec<ForwardReference> {
        self.questions
            .iter()
            .flat_map(Question::forward_references)
            .collect()
    }
}

impl Question {
    /// Clauses of this question's condition that reference a question not
    /// sorting before it.
    pub fn forward_references(&self) -> Vec<ForwardReference> {
        let Some(condition) = &self.condition else {
            return Vec::new();
        };
        condition
            .clauses()
            .iter()
            .filter_map(|c| c.referenced())
            .filter(|referenced| *referenced >= self.question_id)
            .map(|referenced| ForwardReference {
                question: self.question_id,
                referenced,
            })
            .collect()
    }

    pub fn check_references(&self) -> Result<(), ValidationError> {
        match self.forward_references().into_iter().next() {
            Some(r) => Err(r.into()),
            None => Ok(()),
        }
    }
}
