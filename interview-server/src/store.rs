use std::path::Path;
use std::sync::Arc;

use interview_core::{Access, Actor, Question, check_student};
use interview_store_db::{InterviewDb, OpenMode};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{ApiError, Result};

/// Shared handle on the interview database.
///
/// Every operation runs on the blocking pool while holding the mutex, so
/// a transaction never interleaves with another request's statements.
#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<InterviewDb>>,
}

impl Store {
    pub fn new(db: InterviewDb) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let db = InterviewDb::open(path, OpenMode::Create)?;
        if !db.has_schema()? {
            info!("Creating schema in {}", path.display());
            db.create_schema()?;
        }
        Ok(Self::new(db))
    }

    /// Seed `questions` unless the catalog already has entries.
    pub async fn seed_catalog(&self, questions: Vec<Question>) -> Result<usize> {
        self.db_operation(move |db| {
            if db.count_questions()? > 0 {
                return Ok(0);
            }
            Ok(db.seed_questions(questions)?)
        })
        .await
    }

    pub async fn db_operation<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut InterviewDb) -> Result<T> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut db = db.blocking_lock();
            f(&mut db)
        })
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
    }
}

/// Require that `actor` may touch `student_id`: 404 if the student does not
/// exist, 403 if it belongs to another faculty.
pub(crate) fn guard_student(db: &InterviewDb, actor: &Actor, student_id: &str) -> Result<()> {
    match check_student(actor, db, student_id)? {
        Access::Granted => Ok(()),
        Access::Denied => Err(ApiError::Forbidden),
        Access::Missing => Err(ApiError::NotFound(format!("student {student_id}"))),
    }
}

/// Require that `actor` may touch data of `faculty`.
pub(crate) fn guard_faculty(actor: &Actor, faculty: &str) -> Result<()> {
    if actor.can_access(faculty) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
