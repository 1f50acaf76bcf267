// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Error types for interview database operations.

use std::path::PathBuf;

use interview_core::ValidationError;
use thiserror::Error;

/// Result type for interview database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during interview database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: i32, found: i32 },

    /// Input rejected before any write
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The student already has an interview
    #[error("student {0} has already been interviewed")]
    AlreadyInterviewed(String),

    /// A referenced row does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A row with the same key exists
    #[error("{kind} already exists: {id}")]
    Duplicate { kind: &'static str, id: String },

    /// The row is still referenced and cannot be deleted
    #[error("{kind} {id} is still referenced by {referenced_by}")]
    InUse {
        kind: &'static str,
        id: String,
        referenced_by: &'static str,
    },
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn duplicate(kind: &'static str, id: impl ToString) -> Self {
        Error::Duplicate {
            kind,
            id: id.to_string(),
        }
    }

    /// The request clashes with existing data.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::AlreadyInterviewed(_) | Error::Duplicate { .. } | Error::InUse { .. }
        )
    }
}

/// Whether `err` is a UNIQUE or PRIMARY KEY constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
