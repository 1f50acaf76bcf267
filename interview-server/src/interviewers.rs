use actix_web::web;
use interview_store_db::Interviewer;

use crate::ApiResult;
use crate::error::ApiError;
use crate::response;
use crate::session::Session;
use crate::store::{Store, guard_faculty};

pub(crate) async fn list(store: web::Data<Store>, _session: Session) -> ApiResult {
    let interviewers = store
        .db_operation(|db| Ok(db.list_interviewers()?))
        .await?;
    Ok(response::list(interviewers))
}

pub(crate) async fn get(
    store: web::Data<Store>,
    _session: Session,
    path: web::Path<String>,
) -> ApiResult {
    let staff_id = path.into_inner();
    let interviewer = store
        .db_operation(move |db| {
            db.query_interviewer(&staff_id)?
                .ok_or_else(|| ApiError::NotFound(format!("interviewer {staff_id}")))
        })
        .await?;
    Ok(response::ok(interviewer))
}

pub(crate) async fn create(
    store: web::Data<Store>,
    Session(actor): Session,
    body: web::Json<Interviewer>,
) -> ApiResult {
    let interviewer = body.into_inner();
    guard_faculty(&actor, &interviewer.staff_faculty)?;
    let interviewer = store
        .db_operation(move |db| {
            db.create_interviewer(&interviewer)?;
            Ok(interviewer)
        })
        .await?;
    Ok(response::created(interviewer, "interviewer created"))
}

pub(crate) async fn update(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
    body: web::Json<Interviewer>,
) -> ApiResult {
    let interviewer = Interviewer {
        staff_id: path.into_inner(),
        ..body.into_inner()
    };
    guard_faculty(&actor, &interviewer.staff_faculty)?;
    let interviewer = store
        .db_operation(move |db| {
            let current = db.query_interviewer(&interviewer.staff_id)?.ok_or_else(|| {
                ApiError::NotFound(format!("interviewer {}", interviewer.staff_id))
            })?;
            guard_faculty(&actor, &current.staff_faculty)?;
            db.update_interviewer(&interviewer)?;
            Ok(interviewer)
        })
        .await?;
    Ok(response::updated(interviewer, "interviewer updated"))
}

pub(crate) async fn delete(
    store: web::Data<Store>,
    Session(actor): Session,
    path: web::Path<String>,
) -> ApiResult {
    let staff_id = path.into_inner();
    store
        .db_operation(move |db| {
            let current = db
                .query_interviewer(&staff_id)?
                .ok_or_else(|| ApiError::NotFound(format!("interviewer {staff_id}")))?;
            guard_faculty(&actor, &current.staff_faculty)?;
            Ok(db.delete_interviewer(&staff_id)?)
        })
        .await?;
    Ok(response::message("interviewer deleted"))
}
