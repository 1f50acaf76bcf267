use actix_web::web;
use interview_core::{AnswerInput, SubmissionInput, ValidationError, validate_answers};
use serde::Deserialize;

use crate::ApiResult;
use crate::error::ApiError;
use crate::response;
use crate::session::Session;
use crate::store::{Store, guard_faculty, guard_student};

#[derive(Deserialize)]
pub(crate) struct AnswerUpdate {
    #[serde(default)]
    answers: Option<Vec<AnswerInput>>,
}

pub(crate) async fn list(store: web::Data<Store>, Session(actor): Session) -> ApiResult {
    let interviews = store
        .db_operation(move |db| Ok(db.list_interviews(actor.scope())?))
        .await?;
    Ok(response::list(interviews))
}

pub(crate) async fn statistics(store: web::Data<Store>, Session(actor): Session) -> ApiResult {
    let statistics = store
        .db_operation(move |db| Ok(db.interview_statistics(actor.scope())?))
        .await?;
    Ok(response::ok(statistics))
}

pub(crate) async fn by_student(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
) -> ApiResult {
    let student_id = path.into_inner();
    let detail = store
        .db_operation(move |db| {
            guard_student(db, &actor, &student_id)?;
            db.query_interview_by_student(&student_id)?
                .ok_or_else(|| ApiError::NotFound(format!("interview of student {student_id}")))
        })
        .await?;
    Ok(response::ok(detail))
}

pub(crate) async fn get(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<i64>,
) -> ApiResult {
    let interview_id = path.into_inner();
    let detail = store
        .db_operation(move |db| {
            let detail = db
                .query_interview(interview_id)?
                .ok_or_else(|| ApiError::NotFound(format!("interview {interview_id}")))?;
            guard_faculty(&actor, &detail.student.faculty)?;
            Ok(detail)
        })
        .await?;
    Ok(response::ok(detail))
}

/// Record a new interview with its answers.
///
/// The interviewer defaults to the session's staff id. Validation, the scope
/// check and every insert happen before anything is committed; any failure
/// leaves the database untouched.
pub(crate) async fn create(
    store: web::Data<Store>,
    Session(actor): Session,
    body: web::Json<SubmissionInput>,
) -> ApiResult {
    let mut input = body.into_inner();
    let interviewer_id = input
        .interviewer_id
        .take()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| actor.staff_id.clone());
    if !actor.can_act_for(&interviewer_id) {
        return Err(ApiError::Forbidden);
    }
    input.interviewer_id = Some(interviewer_id);
    let interview = input.validate()?;
    let detail = store
        .db_operation(move |db| {
            guard_student(db, &actor, &interview.student_id)?;
            Ok(db.create_interview(&interview)?)
        })
        .await?;
    Ok(response::created(detail, "interview recorded"))
}

pub(crate) async fn update(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<i64>,
    body: web::Json<AnswerUpdate>,
) -> ApiResult {
    let interview_id = path.into_inner();
    let answers = body
        .into_inner()
        .answers
        .ok_or(ValidationError::MissingField("answers"))?;
    let answers = validate_answers(answers)?;
    let rows = store
        .db_operation(move |db| {
            let student_id = db
                .interview_student(interview_id)?
                .ok_or_else(|| ApiError::NotFound(format!("interview {interview_id}")))?;
            guard_student(db, &actor, &student_id)?;
            Ok(db.update_answers(interview_id, &answers)?)
        })
        .await?;
    Ok(response::updated(rows, "answers updated"))
}

pub(crate) async fn delete(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<i64>,
) -> ApiResult {
    let interview_id = path.into_inner();
    store
        .db_operation(move |db| {
            let student_id = db
                .interview_student(interview_id)?
                .ok_or_else(|| ApiError::NotFound(format!("interview {interview_id}")))?;
            guard_student(db, &actor, &student_id)?;
            Ok(db.delete_interview(interview_id)?)
        })
        .await?;
    Ok(response::message("interview deleted"))
}
