// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Question identities, kinds and catalog records.

use std::fmt;
use std::str::FromStr;

#[cfg(any(test, feature = "test"))]
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::{ParseQuestionIdError, ValidationError};

/// Identity and presentation position of a question.
///
/// Top-level questions have `sub == 0` and print as `"3"`. Follow-ups print as
/// `"3.1"`, `"3.2"`, ... and belong to the top-level question with the same
/// root. Ordering is `(root, sub)`, so `1 < 1.1 < 1.2 < 1.10 < 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionId {
    root: u32,
    sub: u32,
}

impl QuestionId {
    pub const fn top(root: u32) -> Self {
        Self { root, sub: 0 }
    }

    /// A follow-up of `root`. `sub == 0` yields the top-level question itself.
    pub const fn follow_up(root: u32, sub: u32) -> Self {
        Self { root, sub }
    }

    pub fn root(&self) -> u32 {
        self.root
    }

    pub fn sub(&self) -> u32 {
        self.sub
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub == 0 {
            write!(f, "{}", self.root)
        } else {
            write!(f, "{}.{}", self.root, self.sub)
        }
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for QuestionId {
    type Err = ParseQuestionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseQuestionIdError(s.to_string());
        match trimmed.split_once('.') {
            None => parse_digits(trimmed).map(QuestionId::top).ok_or_else(err),
            Some((root, sub)) => {
                let root = parse_digits(root).ok_or_else(err)?;
                // "1.0" is the top-level question, "1.01" is ambiguous
                if sub.len() > 1 && sub.starts_with('0') {
                    return Err(err());
                }
                let sub = parse_digits(sub).ok_or_else(err)?;
                Ok(QuestionId::follow_up(root, sub))
            }
        }
    }
}

impl Serialize for QuestionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = QuestionId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a question id such as \"2\" or \"2.1\"")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<QuestionId, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<QuestionId, E> {
                u32::try_from(v)
                    .map(QuestionId::top)
                    .map_err(|_| E::custom(ParseQuestionIdError(v.to_string())))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<QuestionId, E> {
                u32::try_from(v)
                    .map(QuestionId::top)
                    .map_err(|_| E::custom(ParseQuestionIdError(v.to_string())))
            }

            // Older clients send follow-up ids as JSON numbers (1.1)
            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<QuestionId, E> {
                v.to_string().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

#[cfg(any(test, feature = "test"))]
impl Arbitrary for QuestionId {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (1u32..50, prop_oneof![Just(0u32), 1u32..12])
            .prop_map(|(root, sub)| QuestionId::follow_up(root, sub))
            .boxed()
    }
}

/// Input widget of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Textarea,
    Radio,
    Checkbox,
    Select,
    Number,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Text => "text",
            QuestionKind::Textarea => "textarea",
            QuestionKind::Radio => "radio",
            QuestionKind::Checkbox => "checkbox",
            QuestionKind::Select => "select",
            QuestionKind::Number => "number",
        }
    }

    /// Choice kinds take their answer from `answer_options`.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionKind::Radio | QuestionKind::Checkbox | QuestionKind::Select
        )
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(QuestionKind::Text),
            "textarea" => Ok(QuestionKind::Textarea),
            "radio" => Ok(QuestionKind::Radio),
            "checkbox" => Ok(QuestionKind::Checkbox),
            "select" => Ok(QuestionKind::Select),
            "number" => Ok(QuestionKind::Number),
            other => Err(ValidationError::UnknownQuestionKind(other.to_string())),
        }
    }
}

/// A catalog entry with its condition already parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub question_id: QuestionId,
    pub question_text: String,
    pub question_type: QuestionKind,
    /// Comma-separated choices, only kept for choice kinds
    pub answer_options: Option<String>,
    #[serde(rename = "condition_logic")]
    pub condition: Option<Condition>,
    /// Human explanation of the condition, never evaluated
    pub condition_display: Option<String>,
}

impl Question {
    pub fn new(question_id: QuestionId, text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            question_id,
            question_text: text.into(),
            question_type: kind,
            answer_options: None,
            condition: None,
            condition_display: None,
        }
    }

    pub fn with_options(mut self, options: &str) -> Self {
        self.answer_options = Some(options.to_string());
        self
    }

    pub fn with_condition(mut self, logic: &str) -> Self {
        self.condition = Condition::parse(logic);
        self
    }

    pub fn with_condition_display(mut self, display: &str) -> Self {
        self.condition_display = Some(display.to_string());
        self
    }

    /// Individual choices of a choice question.
    pub fn options(&self) -> Vec<&str> {
        self.answer_options
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check the record on its own, independent of the rest of the catalog.
    ///
    /// Choice questions need at least one option; other kinds drop whatever
    /// options were supplied.
    pub fn normalize(mut self) -> Result<Self, ValidationError> {
        if self.question_text.trim().is_empty() {
            return Err(ValidationError::MissingField("question_text"));
        }
        if self.question_type.is_choice() {
            if self.options().is_empty() {
                return Err(ValidationError::MissingOptions(self.question_id));
            }
        } else {
            self.answer_options = None;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", QuestionId::top(1))]
    #[case("  12 ", QuestionId::top(12))]
    #[case("1.1", QuestionId::follow_up(1, 1))]
    #[case("1.10", QuestionId::follow_up(1, 10))]
    #[case("4.0", QuestionId::top(4))]
    fn parse_question_id(#[case] text: &str, #[case] expected: QuestionId) {
        assert_eq!(text.parse::<QuestionId>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("-1")]
    #[case("+1")]
    #[case("1.")]
    #[case(".1")]
    #[case("1.1.1")]
    #[case("1.01")]
    fn reject_bad_question_id(#[case] text: &str) {
        assert!(text.parse::<QuestionId>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        assert_eq!(QuestionId::top(3).to_string(), "3");
        assert_eq!(QuestionId::follow_up(3, 2).to_string(), "3.2");
    }

    #[test]
    fn follow_ups_sort_between_parents() {
        let mut ids: Vec<QuestionId> = ["2.1", "2", "1.10", "1", "1.2", "1.1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1", "1.1", "1.2", "1.10", "2", "2.1"]);
    }

    #[test]
    fn deserialize_from_string_and_number() {
        let from_str: QuestionId = serde_json::from_str("\"2.1\"").unwrap();
        let from_float: QuestionId = serde_json::from_str("2.1").unwrap();
        let from_int: QuestionId = serde_json::from_str("2").unwrap();
        assert_eq!(from_str, QuestionId::follow_up(2, 1));
        assert_eq!(from_float, QuestionId::follow_up(2, 1));
        assert_eq!(from_int, QuestionId::top(2));
        assert!(serde_json::from_str::<QuestionId>("-3").is_err());
    }

    #[test]
    fn choice_question_needs_options() {
        let q = Question::new(QuestionId::top(1), "Any problems?", QuestionKind::Radio);
        assert_eq!(
            q.normalize(),
            Err(ValidationError::MissingOptions(QuestionId::top(1)))
        );

        let q = Question::new(QuestionId::top(1), "Any problems?", QuestionKind::Radio)
            .with_options("มี, ไม่มี,");
        assert_eq!(q.normalize().unwrap().options(), ["มี", "ไม่มี"]);
    }

    #[test]
    fn non_choice_question_drops_options() {
        let q = Question::new(QuestionId::top(1), "Age", QuestionKind::Number).with_options("1,2");
        assert_eq!(q.normalize().unwrap().answer_options, None);
    }

    #[rstest]
    #[case("radio", QuestionKind::Radio)]
    #[case("textarea", QuestionKind::Textarea)]
    #[case(" number", QuestionKind::Number)]
    fn parse_kind(#[case] text: &str, #[case] kind: QuestionKind) {
        assert_eq!(text.parse::<QuestionKind>().unwrap(), kind);
    }

    #[test]
    fn unknown_kind() {
        assert_eq!(
            "slider".parse::<QuestionKind>(),
            Err(ValidationError::UnknownQuestionKind("slider".into()))
        );
    }
}
