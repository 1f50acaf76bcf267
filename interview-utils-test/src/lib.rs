// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Test utilities for the interview desk.
//!
//! This crate provides proptest strategies and the sample question catalog
//! shared by the tests of the other crates.

use std::path::{Path, PathBuf};

use interview_core::{AnswerMap, Catalog, Question, QuestionId, QuestionKind};
use proptest::prelude::*;
use tempfile::TempDir;

/// A wrapper around TempDir that provides a canonicalized path.
/// This resolves symlinks like /var -> /private/var on macOS.
pub struct CanonicalTempDir {
    _inner: TempDir,
    path: PathBuf,
}

impl CanonicalTempDir {
    pub fn new() -> std::io::Result<Self> {
        let inner = TempDir::new()?;
        let path = inner.path().canonicalize()?;
        Ok(Self {
            _inner: inner,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a database file inside the directory. The file is not created.
    pub fn db_path(&self) -> PathBuf {
        self.path.join("interviews.sqlite")
    }
}

/// The yes/no questionnaire used across tests: six radio questions, four of
/// which open a free-text follow-up when answered "มี".
pub fn sample_questions() -> Vec<Question> {
    let yes_no = |root: u32, text: &str| {
        Question::new(QuestionId::top(root), text, QuestionKind::Radio).with_options("มี,ไม่มี")
    };
    let follow_up = |root: u32, text: &str, kind: QuestionKind| {
        Question::new(QuestionId::follow_up(root, 1), text, kind)
            .with_condition(&format!("{root}:eq:มี"))
            .with_condition_display(&format!("แสดงเมื่อตอบข้อ {root} ว่า \"มี\""))
    };

    vec![
        yes_no(1, "นักศึกษามีปัญหาด้านการเรียนหรือไม่?"),
        yes_no(2, "นักศึกษามีปัญหาด้านการเงินหรือไม่?"),
        yes_no(3, "นักศึกษามีปัญหาด้านที่พักอาศัยหรือไม่?"),
        yes_no(4, "นักศึกษามีปัญหาด้านสุขภาพหรือไม่?"),
        yes_no(5, "นักศึกษาคิดว่าตนเองมีความเครียดหรือไม่?"),
        yes_no(6, "นักศึกษามีความสนใจเข้าร่วมกิจกรรมของมหาวิทยาลัยหรือไม่?"),
        follow_up(1, "กรุณาระบุปัญหาด้านการเรียนที่พบ", QuestionKind::Text),
        follow_up(2, "กรุณาระบุปัญหาด้านการเงินที่พบ", QuestionKind::Text),
        follow_up(3, "กรุณาระบุปัญหาด้านที่พักอาศัยที่พบ", QuestionKind::Text),
        follow_up(4, "กรุณาระบุปัญหาด้านสุขภาพที่พบ", QuestionKind::Textarea),
    ]
}

pub fn sample_catalog() -> Catalog {
    Catalog::new(sample_questions())
}

pub fn arb_answer_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("มี".to_string()),
        Just("ไม่มี".to_string()),
        Just(String::new()),
        (-1000i32..1000).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9 ,.:]{0,16}",
    ]
}

pub fn arb_answer_map() -> impl Strategy<Value = AnswerMap> {
    proptest::collection::btree_map(any::<QuestionId>(), arb_answer_text(), 0..16)
}

/// Condition logic, well-formed or not.
pub fn arb_condition_logic() -> impl Strategy<Value = String> {
    let operator = prop_oneof![
        Just("eq"),
        Just("neq"),
        Just("contains"),
        Just("gt"),
        Just("lt"),
        Just("between"),
    ];
    let clause = prop_oneof![
        4 => (any::<QuestionId>(), operator, arb_answer_text())
            .prop_map(|(id, op, value)| format!("{id}:{op}:{}", value.replace([',', ':'], ""))),
        1 => "[a-z0-9:]{0,10}",
    ];
    proptest::collection::vec(clause, 0..4).prop_map(|clauses| clauses.join(","))
}

prop_compose! {
    pub fn arb_question()(
        id in any::<QuestionId>(),
        text in "[a-zA-Z ?]{1,24}",
        logic in arb_condition_logic(),
    ) -> Question {
        Question::new(id, text, QuestionKind::Text).with_condition(&logic)
    }
}

/// A catalog with unique question ids.
pub fn arb_catalog() -> impl Strategy<Value = Catalog> {
    proptest::collection::btree_map(any::<QuestionId>(), arb_question(), 0..12).prop_map(|qs| {
        Catalog::new(
            qs.into_iter()
                .map(|(id, mut q)| {
                    q.question_id = id;
                    q
                })
                .collect(),
        )
    })
}
