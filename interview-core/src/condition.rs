// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! The question visibility language.
//!
//! A condition is a comma-separated conjunction of clauses of the form
//! `questionId:operator:expectedValue`, e.g. `1:eq:มี,2:neq:ไม่มี`. Clauses
//! are parsed once into [`Clause`] values when a catalog is built.
//!
//! Evaluation is fail-open: a clause that cannot be understood, or whose
//! numeric comparison cannot be carried out, counts as satisfied so that a
//! broken condition never blocks an interview.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::AnswerMap;
use crate::question::QuestionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Contains,
    Gt,
    Lt,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Contains => "contains",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
        }
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Operator::Eq),
            "neq" => Ok(Operator::Neq),
            "contains" => Ok(Operator::Contains),
            "gt" => Ok(Operator::Gt),
            "lt" => Ok(Operator::Lt),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a clause could not be understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueReason {
    /// Not exactly three `:`-separated parts
    Shape,
    /// Operator other than eq, neq, contains, gt, lt
    Operator,
    /// First part is not a question id
    QuestionId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Compare {
        question: QuestionId,
        operator: Operator,
        expected: String,
    },
    /// Unparsable clause, always satisfied
    Opaque { raw: String, reason: OpaqueReason },
}

impl Clause {
    fn parse(raw: &str) -> Clause {
        let opaque = |reason| Clause::Opaque {
            raw: raw.to_string(),
            reason,
        };

        let parts: Vec<&str> = raw.split(':').collect();
        let [question, operator, expected] = parts.as_slice() else {
            return opaque(OpaqueReason::Shape);
        };
        let Ok(question) = question.parse::<QuestionId>() else {
            return opaque(OpaqueReason::QuestionId);
        };
        let Ok(operator) = operator.parse::<Operator>() else {
            return opaque(OpaqueReason::Operator);
        };

        Clause::Compare {
            question,
            operator,
            expected: (*expected).to_string(),
        }
    }

    /// The question whose answer this clause inspects.
    pub fn referenced(&self) -> Option<QuestionId> {
        match self {
            Clause::Compare { question, .. } => Some(*question),
            Clause::Opaque { .. } => None,
        }
    }

    pub fn evaluate(&self, answers: &AnswerMap) -> bool {
        let Clause::Compare {
            question,
            operator,
            expected,
        } = self
        else {
            return true;
        };

        let actual = answers.get(question).map(String::as_str).unwrap_or("");
        match operator {
            Operator::Eq => actual == expected,
            Operator::Neq => actual != expected,
            Operator::Contains => actual.contains(expected.as_str()),
            Operator::Gt | Operator::Lt => {
                match (parse_number(actual), parse_number(expected)) {
                    (Some(a), Some(e)) if *operator == Operator::Gt => a > e,
                    (Some(a), Some(e)) => a < e,
                    _ => {
                        if actual.trim().is_empty() {
                            debug!(
                                "question {question} unanswered, treating '{self}' as satisfied"
                            );
                        } else {
                            warn!(
                                "cannot compare '{actual}' with '{expected}' numerically, treating '{self}' as satisfied"
                            );
                        }
                        true
                    }
                }
            }
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Compare {
                question,
                operator,
                expected,
            } => write!(f, "{question}:{operator}:{expected}"),
            Clause::Opaque { raw, .. } => f.write_str(raw),
        }
    }
}

/// A parsed condition. All clauses must hold (logical AND).
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    clauses: Vec<Clause>,
}

impl Condition {
    /// Parse condition logic. Returns `None` for an empty condition, which
    /// means the question is always visible.
    pub fn parse(logic: &str) -> Option<Condition> {
        let source = logic.trim();
        if source.is_empty() {
            return None;
        }

        let clauses: Vec<Clause> = source.split(',').map(|c| Clause::parse(c.trim())).collect();
        for clause in &clauses {
            if let Clause::Opaque { raw, reason } = clause {
                warn!("ignoring unusable condition clause '{raw}' in '{source}': {reason:?}");
            }
        }

        Some(Condition {
            source: source.to_string(),
            clauses,
        })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Condition text as it was written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn evaluate(&self, answers: &AnswerMap) -> bool {
        self.clauses.iter().all(|c| c.evaluate(answers))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}
