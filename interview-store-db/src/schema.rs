// SPDX-FileCopyrightText: 2026 Interview Desk contributors
// SPDX-License-Identifier: MIT

//! Database schema definitions.

/// Tables for students, interviewers, questions, interviews and answers.
///
/// Question ids are stored in their text form (`"1"`, `"1.1"`) together with
/// the numeric parts every ordered read sorts on.
pub const SCHEMA_SQL: &str = r#"
create table if not exists student (
    student_id       text primary key not null,
    student_name     text not null,
    program          text not null,
    faculty          text not null,
    campus           text not null,
    level            text not null,
    phone            text,
    scholarship      text,
    graduated_school text,
    hometown         text
);

create index if not exists IndexStudentFaculty on student(faculty, program);

create table if not exists interviewer (
    staff_id      text primary key not null,
    staff_name    text not null,
    staff_faculty text not null
);

create table if not exists question (
    question_id       text primary key not null,
    question_root     integer not null,
    question_sub      integer not null,
    question_text     text not null,
    question_type     text not null,
    answer_options    text,
    condition_logic   text,
    condition_display text,
    unique (question_root, question_sub)
);

create table if not exists interview (
    interview_id   integer primary key autoincrement not null,
    student_id     text unique not null,
    interviewer_id text not null,
    interview_date integer not null,
    completed      integer not null default 1,
    foreign key (student_id) references student(student_id),
    foreign key (interviewer_id) references interviewer(staff_id)
);

create index if not exists IndexInterviewInterviewer on interview(interviewer_id);

create table if not exists interview_answer (
    answer_id    integer primary key autoincrement not null,
    interview_id integer not null,
    question_id  text not null,
    answer_text  text not null,
    unique (interview_id, question_id),
    foreign key (interview_id) references interview(interview_id),
    foreign key (question_id) references question(question_id)
);

create index if not exists IndexAnswerQuestion on interview_answer(question_id);
"#;

/// Schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;
