use actix_web::web;
use interview_store_db::StudentRecord;

use crate::ApiResult;
use crate::error::ApiError;
use crate::response;
use crate::session::Session;
use crate::store::{Store, guard_faculty, guard_student};

pub(crate) async fn list(store: web::Data<Store>, Session(actor): Session) -> ApiResult {
    let students = store
        .db_operation(move |db| Ok(db.list_students(actor.scope())?))
        .await?;
    Ok(response::list(students))
}

pub(crate) async fn by_faculty(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
) -> ApiResult {
    let faculty = path.into_inner();
    guard_faculty(&actor, &faculty)?;
    let students = store
        .db_operation(move |db| Ok(db.list_students_by_faculty(&faculty)?))
        .await?;
    Ok(response::list(students))
}

pub(crate) async fn by_program(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
) -> ApiResult {
    let program = path.into_inner();
    let students = store
        .db_operation(move |db| Ok(db.list_students_by_program(actor.scope(), &program)?))
        .await?;
    Ok(response::list(students))
}

pub(crate) async fn not_interviewed(
    store: web::Data<Store>,
    Session(actor): Session,
) -> ApiResult {
    let students = store
        .db_operation(move |db| Ok(db.list_not_interviewed(actor.scope())?))
        .await?;
    Ok(response::list(students))
}

pub(crate) async fn summary(store: web::Data<Store>, Session(actor): Session) -> ApiResult {
    let summary = store
        .db_operation(move |db| Ok(db.interview_status_summary(actor.scope())?))
        .await?;
    Ok(response::list(summary))
}

pub(crate) async fn get(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
) -> ApiResult {
    let student_id = path.into_inner();
    let student = store
        .db_operation(move |db| {
            guard_student(db, &actor, &student_id)?;
            db.query_student(&student_id)?
                .ok_or_else(|| ApiError::NotFound(format!("student {student_id}")))
        })
        .await?;
    Ok(response::ok(student))
}

pub(crate) async fn create(
    store: web::Data<Store>,
    Session(actor): Session,
    body: web::Json<StudentRecord>,
) -> ApiResult {
    let student = body.into_inner();
    guard_faculty(&actor, &student.faculty)?;
    let student = store
        .db_operation(move |db| {
            db.create_student(&student)?;
            Ok(student)
        })
        .await?;
    Ok(response::created(student, "student created"))
}

pub(crate) async fn update(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
    body: web::Json<StudentRecord>,
) -> ApiResult {
    let student = StudentRecord {
        student_id: path.into_inner(),
        ..body.into_inner()
    };
    guard_faculty(&actor, &student.faculty)?;
    let student = store
        .db_operation(move |db| {
            guard_student(db, &actor, &student.student_id)?;
            db.update_student(&student)?;
            Ok(student)
        })
        .await?;
    Ok(response::updated(student, "student updated"))
}

pub(crate) async fn delete(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
) -> ApiResult {
    let student_id = path.into_inner();
    store
        .db_operation(move |db| {
            guard_student(db, &actor, &student_id)?;
            Ok(db.delete_student(&student_id)?)
        })
        .await?;
    Ok(response::message("student deleted"))
}
