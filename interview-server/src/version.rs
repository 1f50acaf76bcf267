use actix_web::HttpResponse;

use crate::{CARGO_NAME, CARGO_VERSION};

pub(crate) async fn get() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_PLAIN_UTF_8)
        .body(format!("{CARGO_NAME} {CARGO_VERSION}"))
}
