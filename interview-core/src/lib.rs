// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Core interview semantics.
//!
//! This crate provides the domain types and pure decision logic of the
//! interview desk. It is intentionally IO-free: the storage layer
//! (`interview-store-db`) and the HTTP service (`interview-server`) build on
//! these values.
//!
//! # Key Modules
//!
//! - `question` - Question identities (`1`, `1.1`, ...), kinds and records
//! - `condition` - The `questionId:operator:value` visibility language
//! - `catalog` - Ordered question catalog and visibility evaluation
//! - `access` - Faculty-scoped access guard and the acting interviewer
//! - `submission` - Validation of submitted answer sets
//!
//! # Example
//!
//! ```
//! use interview_core::{AnswerMap, Catalog, Question, QuestionId, QuestionKind};
//!
//! let catalog = Catalog::new(vec![
//!     Question::new(QuestionId::top(1), "Any study problems?", QuestionKind::Radio)
//!         .with_options("มี,ไม่มี"),
//!     Question::new(QuestionId::follow_up(1, 1), "Describe them", QuestionKind::Text)
//!         .with_condition("1:eq:มี"),
//! ]);
//!
//! let mut answers = AnswerMap::new();
//! answers.insert(QuestionId::top(1), "ไม่มี".to_string());
//! assert_eq!(catalog.visible(&answers).len(), 1);
//! ```

pub mod access;
pub mod catalog;
pub mod condition;
mod error;
pub mod question;
pub mod submission;

pub use access::{Access, Actor, EXECUTIVE_FACULTY, FacultyLookup, Scope, check_student};
pub use catalog::{AnswerMap, Catalog, ForwardReference};
pub use condition::{Clause, Condition, Operator, OpaqueReason};
pub use error::{ParseQuestionIdError, ValidationError};
pub use question::{Question, QuestionId, QuestionKind};
pub use submission::{AnswerEntry, AnswerInput, NewInterview, SubmissionInput, validate_answers};
