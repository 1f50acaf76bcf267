use actix_web::{HttpResponse, web};

use crate::ApiResult;
use crate::store::Store;

/// Liveness: the database answers a trivial query.
pub(crate) async fn get(store: web::Data<Store>) -> ApiResult {
    store.db_operation(|db| Ok(db.schema_version()?)).await?;
    Ok(HttpResponse::Ok().content_type(mime::TEXT_PLAIN_UTF_8).body("OK"))
}
