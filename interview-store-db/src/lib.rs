// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! SQLite storage for the interview desk.
//!
//! This crate provides read and write access to the database of students,
//! interviewers, questions, interviews and their answers.
//!
//! **Architecture**: This is the Database Layer. Domain decisions (which
//! questions are visible, who may see which student) live in
//! `interview-core`; this crate stores and retrieves rows and keeps every
//! multi-row write atomic.
//!
//! # Key Features
//!
//! - Schema with `PRAGMA user_version` stamping
//! - Faculty-scoped listings and reports
//! - Transactional interview create, answer update and cascade deletes
//! - In-memory database for testing
//!
//! # Example
//!
//! ```ignore
//! use interview_store_db::{InterviewDb, OpenMode};
//!
//! let mut db = InterviewDb::open("interviews.sqlite", OpenMode::Create)?;
//! if !db.has_schema()? {
//!     db.create_schema()?;
//! }
//! for q in db.list_questions()? {
//!     println!("{} {}", q.question_id, q.question_text);
//! }
//! ```

mod connection;
mod error;
mod query;
mod report;
mod schema;
mod submission;
mod types;
mod write;

pub use connection::{InterviewDb, OpenMode};
pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
pub use types::*;
