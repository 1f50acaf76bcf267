//! Request session: the interviewer named by the `x-user-id` header.

use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use interview_core::Actor;

use crate::error::{ApiError, Result};
use crate::store::Store;

pub const USER_HEADER: &str = "x-user-id";

/// The interviewer performing the request.
///
/// Resolved fresh from the database on every request, so a deleted or
/// moved interviewer loses access immediately.
#[derive(Debug, Clone)]
pub struct Session(pub Actor);

impl FromRequest for Session {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let staff_id = req
            .headers()
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);
        let store = req.app_data::<web::Data<Store>>().cloned();

        Box::pin(async move {
            let staff_id = staff_id.ok_or(ApiError::Unauthorized)?;
            let store = store.ok_or_else(|| ApiError::Startup {
                reason: "store is not registered as app data".to_string(),
            })?;
            let interviewer = store
                .db_operation(move |db| Ok(db.query_interviewer(&staff_id)?))
                .await?
                .ok_or(ApiError::Unauthorized)?;
            Ok(Session(interviewer.into()))
        })
    }
}
