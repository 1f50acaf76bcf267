// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Validation of submitted interviews and answer updates.
//!
//! Everything here runs before storage is touched, so a rejected submission
//! never writes anything.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::question::QuestionId;

/// One answer as it arrives over the wire. Both fields may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnswerInput {
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    /// Empty text is a valid answer, absence is not
    #[serde(default)]
    pub answer_text: Option<String>,
}

/// A validated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer_text: String,
}

impl AnswerEntry {
    pub fn new(question_id: QuestionId, answer_text: impl Into<String>) -> Self {
        Self {
            question_id,
            answer_text: answer_text.into(),
        }
    }
}

/// Body of an interview submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub interviewer_id: Option<String>,
    #[serde(default)]
    pub answers: Option<Vec<AnswerInput>>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInterview {
    pub student_id: String,
    pub interviewer_id: String,
    pub answers: Vec<AnswerEntry>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

impl SubmissionInput {
    pub fn validate(self) -> Result<NewInterview, ValidationError> {
        let student_id = required(self.student_id, "student_id")?;
        let interviewer_id = required(self.interviewer_id, "interviewer_id")?;
        let answers = self
            .answers
            .ok_or(ValidationError::MissingField("answers"))?;
        let answers = validate_answers(answers)?;
        if answers.is_empty() {
            return Err(ValidationError::EmptyAnswers);
        }

        let mut seen = BTreeSet::new();
        for entry in &answers {
            if !seen.insert(entry.question_id) {
                return Err(ValidationError::DuplicateAnswer(entry.question_id));
            }
        }

        Ok(NewInterview {
            student_id,
            interviewer_id,
            answers,
        })
    }
}

/// Check that every entry carries both `question_id` and `answer_text`.
///
/// Entries are numbered from 1 in the error, matching what a user sees.
pub fn validate_answers(inputs: Vec<AnswerInput>) -> Result<Vec<AnswerEntry>, ValidationError> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(idx, input)| {
            let index = idx + 1;
            let question_id = input.question_id.ok_or(ValidationError::MalformedAnswer {
                index,
                field: "question_id",
            })?;
            let answer_text = input.answer_text.ok_or(ValidationError::MalformedAnswer {
                index,
                field: "answer_text",
            })?;
            Ok(AnswerEntry {
                question_id,
                answer_text,
            })
        })
        .collect()
}

/// Accept ids sent as JSON strings or numbers.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or an integer")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }
    }

    deserializer.deserialize_option(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> SubmissionInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn valid_submission() {
        let sub = input(
            r#"{"student_id": 6401001, "interviewer_id": "S01",
                "answers": [{"question_id": 1, "answer_text": "มี"},
                            {"question_id": "1.1", "answer_text": ""}]}"#,
        )
        .validate()
        .unwrap();
        assert_eq!(sub.student_id, "6401001");
        assert_eq!(sub.interviewer_id, "S01");
        assert_eq!(
            sub.answers,
            [
                AnswerEntry::new(QuestionId::top(1), "มี"),
                AnswerEntry::new(QuestionId::follow_up(1, 1), ""),
            ]
        );
    }

    #[test]
    fn missing_identities() {
        assert_eq!(
            input(r#"{"interviewer_id": "S01", "answers": []}"#).validate(),
            Err(ValidationError::MissingField("student_id"))
        );
        assert_eq!(
            input(r#"{"student_id": "6401", "interviewer_id": "  ", "answers": []}"#).validate(),
            Err(ValidationError::MissingField("interviewer_id"))
        );
        assert_eq!(
            input(r#"{"student_id": "6401", "interviewer_id": "S01"}"#).validate(),
            Err(ValidationError::MissingField("answers"))
        );
    }

    #[test]
    fn empty_answers_rejected() {
        assert_eq!(
            input(r#"{"student_id": "6401", "interviewer_id": "S01", "answers": []}"#).validate(),
            Err(ValidationError::EmptyAnswers)
        );
    }

    #[test]
    fn missing_answer_text_rejected() {
        let err = input(
            r#"{"student_id": "6401", "interviewer_id": "S01", "answers": [
                {"question_id": 1, "answer_text": "a"},
                {"question_id": 2, "answer_text": "b"},
                {"question_id": 3},
                {"question_id": 4, "answer_text": "d"}]}"#,
        )
        .validate();
        assert_eq!(
            err,
            Err(ValidationError::MalformedAnswer {
                index: 3,
                field: "answer_text"
            })
        );
    }

    #[test]
    fn null_answer_text_is_missing() {
        let err = validate_answers(vec![AnswerInput {
            question_id: Some(QuestionId::top(1)),
            answer_text: None,
        }]);
        assert!(matches!(
            err,
            Err(ValidationError::MalformedAnswer { index: 1, .. })
        ));
    }

    #[test]
    fn duplicate_question_rejected() {
        let err = input(
            r#"{"student_id": "6401", "interviewer_id": "S01", "answers": [
                {"question_id": 1, "answer_text": "a"},
                {"question_id": "1", "answer_text": "b"}]}"#,
        )
        .validate();
        assert_eq!(err, Err(ValidationError::DuplicateAnswer(QuestionId::top(1))));
    }
}
