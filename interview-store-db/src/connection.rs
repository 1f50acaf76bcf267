// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{SCHEMA_SQL, SCHEMA_VERSION};

/// How long a writer waits for a competing IMMEDIATE transaction.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access (reporting tools)
    ReadOnly,
    /// Read-write access to an existing database
    ReadWrite,
    /// Create new database if it doesn't exist
    Create,
}

/// SQLite database holding students, interviewers, questions and interviews.
pub struct InterviewDb {
    pub(crate) conn: Connection,
}

impl InterviewDb {
    /// Open or create a database at `path`.
    ///
    /// An existing schema must carry [`SCHEMA_VERSION`]. A fresh database is
    /// left empty; call [`InterviewDb::create_schema`] to initialize it.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let flags = match mode {
            OpenMode::ReadOnly => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_ONLY
            }
            OpenMode::ReadWrite => {
                if !path.exists() {
                    return Err(Error::DatabaseNotFound(path.to_owned()));
                }
                OpenFlags::SQLITE_OPEN_READ_WRITE
            }
            OpenMode::Create => OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        };

        let conn = Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };

        if mode != OpenMode::ReadOnly {
            db.configure_pragmas()?;
        }
        if db.has_schema()? {
            db.check_schema_version()?;
        }

        debug!("Opened database at {} ({:?})", path.display(), mode);
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the full schema.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure_pragmas()?;
        db.create_schema()?;
        debug!("Created in-memory database");
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;
        Ok(())
    }

    /// Create the database schema and stamp its version.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        debug!("Created database schema (version {SCHEMA_VERSION})");
        Ok(())
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Check if the database has the expected schema tables.
    pub fn has_schema(&self) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='interview'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Version recorded by [`InterviewDb::create_schema`].
    pub fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    fn check_schema_version(&self) -> Result<()> {
        let found = self.schema_version()?;
        if found != SCHEMA_VERSION {
            return Err(Error::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }
        Ok(())
    }
}
