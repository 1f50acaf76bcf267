// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Faculty-scoped access control.
//!
//! Every interviewer belongs to a faculty and may only see students of that
//! faculty. Members of [`EXECUTIVE_FACULTY`] see everything. The checks are
//! plain predicates and are evaluated fresh on every request.

use serde::{Deserialize, Serialize};

/// Faculty value of the administrator role.
pub const EXECUTIVE_FACULTY: &str = "ผู้บริหาร";

/// The interviewer performing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub staff_id: String,
    pub name: String,
    pub faculty: String,
}

/// Rows an actor may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    All,
    Faculty(&'a str),
}

impl Scope<'_> {
    /// Faculty filter to apply, `None` for unrestricted.
    pub fn faculty(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::Faculty(f) => Some(*f),
        }
    }
}

/// Outcome of checking access to a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
    /// The student does not exist
    Missing,
}

/// Resolves the faculty owning a student.
pub trait FacultyLookup {
    type Error;

    fn student_faculty(&self, student_id: &str) -> Result<Option<String>, Self::Error>;
}

impl Actor {
    pub fn is_executive(&self) -> bool {
        self.faculty == EXECUTIVE_FACULTY
    }

    pub fn can_access(&self, faculty: &str) -> bool {
        self.is_executive() || self.faculty == faculty
    }

    /// Whether `actor` may record work under the staff id `staff_id`.
    /// Executives may record for anyone, everyone else only for themselves.
    pub fn can_act_for(&self, staff_id: &str) -> bool {
        self.is_executive() || self.staff_id == staff_id
    }

    pub fn scope(&self) -> Scope<'_> {
        if self.is_executive() {
            Scope::All
        } else {
            Scope::Faculty(&self.faculty)
        }
    }
}

/// Check whether `actor` may touch the student `student_id`.
///
/// Absence is reported as [`Access::Missing`] rather than an error so the
/// caller decides how to surface it.
pub fn check_student<L: FacultyLookup>(
    actor: &Actor,
    lookup: &L,
    student_id: &str,
) -> Result<Access, L::Error> {
    Ok(match lookup.student_faculty(student_id)? {
        None => Access::Missing,
        Some(faculty) if actor.can_access(&faculty) => Access::Granted,
        Some(_) => Access::Denied,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::convert::Infallible;

    use rstest::rstest;

    use super::*;

    struct Students(HashMap<&'static str, &'static str>);

    impl FacultyLookup for Students {
        type Error = Infallible;

        fn student_faculty(&self, student_id: &str) -> Result<Option<String>, Infallible> {
            Ok(self.0.get(student_id).map(|f| f.to_string()))
        }
    }

    fn actor(faculty: &str) -> Actor {
        Actor {
            staff_id: "S001".into(),
            name: "Somchai".into(),
            faculty: faculty.into(),
        }
    }

    #[rstest]
    #[case("Engineering", "Engineering", true)]
    #[case("Engineering", "Medicine", false)]
    #[case(EXECUTIVE_FACULTY, "Medicine", true)]
    #[case(EXECUTIVE_FACULTY, EXECUTIVE_FACULTY, true)]
    fn faculty_predicate(#[case] own: &str, #[case] target: &str, #[case] allowed: bool) {
        assert_eq!(actor(own).can_access(target), allowed);
    }

    #[rstest]
    #[case("Engineering", "S001", true)]
    #[case("Engineering", "S002", false)]
    #[case(EXECUTIVE_FACULTY, "S002", true)]
    fn recording_on_behalf(#[case] own: &str, #[case] staff_id: &str, #[case] allowed: bool) {
        assert_eq!(actor(own).can_act_for(staff_id), allowed);
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(actor(EXECUTIVE_FACULTY).scope(), Scope::All);
        let engineer = actor("Engineering");
        assert_eq!(engineer.scope(), Scope::Faculty("Engineering"));
        assert_eq!(engineer.scope().faculty(), Some("Engineering"));
    }

    #[test]
    fn student_checks() {
        let students = Students(HashMap::from([("6401", "Medicine")]));
        assert_eq!(
            check_student(&actor("Engineering"), &students, "6401"),
            Ok(Access::Denied)
        );
        assert_eq!(
            check_student(&actor(EXECUTIVE_FACULTY), &students, "6401"),
            Ok(Access::Granted)
        );
        assert_eq!(
            check_student(&actor("Medicine"), &students, "6401"),
            Ok(Access::Granted)
        );
        assert_eq!(
            check_student(&actor("Engineering"), &students, "9999"),
            Ok(Access::Missing)
        );
    }
}
