// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Validation errors raised before anything reaches storage.

use thiserror::Error;

use crate::question::QuestionId;

/// A question id that is not of the form `N` or `N.M`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a question id, expected '<number>' or '<number>.<number>'")]
pub struct ParseQuestionIdError(pub String);

/// Missing or malformed input. Never partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An answer entry lacked `question_id` or `answer_text`
    #[error("answer #{index} is missing {field}")]
    MalformedAnswer { index: usize, field: &'static str },

    /// A submission carried no answers
    #[error("an interview needs at least one answer")]
    EmptyAnswers,

    /// The same question was answered twice in one submission
    #[error("question {0} is answered more than once")]
    DuplicateAnswer(QuestionId),

    /// Unparsable question id
    #[error(transparent)]
    InvalidQuestionId(#[from] ParseQuestionIdError),

    /// Unknown `question_type`
    #[error("unknown question type: {0}")]
    UnknownQuestionKind(String),

    /// Choice question without answer options
    #[error("question {0} is a choice question and needs answer options")]
    MissingOptions(QuestionId),

    /// Condition refers to a question that is not presented earlier
    #[error("condition of question {question} refers to question {referenced} which does not come before it")]
    ForwardReference {
        question: QuestionId,
        referenced: QuestionId,
    },
}
