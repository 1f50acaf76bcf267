use actix_web::web;
use serde::Deserialize;
use tracing::info;

use crate::ApiResult;
use crate::error::ApiError;
use crate::response;
use crate::store::Store;

#[derive(Deserialize)]
pub(crate) struct Login {
    #[serde(default, deserialize_with = "interview_core::submission::lenient_string")]
    staff_id: Option<String>,
}

/// Look up the staff id. There is no credential; knowing an id is enough.
pub(crate) async fn login(store: web::Data<Store>, body: web::Json<Login>) -> ApiResult {
    let staff_id = body
        .into_inner()
        .staff_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let interviewer = store
        .db_operation(move |db| Ok(db.query_interviewer(&staff_id)?))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    info!(
        "Login by {} ({})",
        interviewer.staff_id, interviewer.staff_faculty
    );
    Ok(response::ok(interviewer))
}
