#![warn(clippy::dbg_macro)]

//! HTTP service of the interview desk.
//!
//! Every `/api` route except login resolves the acting interviewer from the
//! `x-user-id` header and scopes its data to that interviewer's faculty.

use actix_web::{HttpResponse, web};

use error::ApiError;

mod auth;
pub mod catalog;
pub mod config;
pub mod error;
mod export;
mod health;
mod interviewers;
mod interviews;
pub mod prometheus;
mod questions;
pub mod response;
pub mod session;
pub mod store;
mod students;
mod version;

pub(crate) const CARGO_NAME: &str = env!("CARGO_PKG_NAME");
pub(crate) const CARGO_VERSION: &str = env!("CARGO_PKG_VERSION");

pub type ApiResult = std::result::Result<HttpResponse, ApiError>;

/// Register every route. Expects a `web::Data<store::Store>` app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .route("/api/auth/login", web::post().to(auth::login))
    .service(
        web::resource("/api/interviewers")
            .route(web::get().to(interviewers::list))
            .route(web::post().to(interviewers::create)),
    )
    .service(
        web::resource("/api/interviewers/{id}")
            .route(web::get().to(interviewers::get))
            .route(web::put().to(interviewers::update))
            .route(web::delete().to(interviewers::delete)),
    )
    .service(
        web::resource("/api/students")
            .route(web::get().to(students::list))
            .route(web::post().to(students::create)),
    )
    .route(
        "/api/students/faculty/{faculty}",
        web::get().to(students::by_faculty),
    )
    .route(
        "/api/students/program/{program}",
        web::get().to(students::by_program),
    )
    .route(
        "/api/students/not-interviewed",
        web::get().to(students::not_interviewed),
    )
    .route("/api/students/summary", web::get().to(students::summary))
    .service(
        web::resource("/api/students/{id}")
            .route(web::get().to(students::get))
            .route(web::put().to(students::update))
            .route(web::delete().to(students::delete)),
    )
    .service(
        web::resource("/api/questions")
            .route(web::get().to(questions::list))
            .route(web::post().to(questions::create)),
    )
    .route("/api/questions/visible", web::post().to(questions::visible))
    .service(
        web::resource("/api/questions/{id}")
            .route(web::get().to(questions::get))
            .route(web::put().to(questions::update))
            .route(web::delete().to(questions::delete)),
    )
    .service(
        web::resource("/api/interviews")
            .route(web::get().to(interviews::list))
            .route(web::post().to(interviews::create)),
    )
    .route("/api/interviews/export", web::get().to(export::get))
    .route(
        "/api/interviews/statistics",
        web::get().to(interviews::statistics),
    )
    .route(
        "/api/interviews/student/{id}",
        web::get().to(interviews::by_student),
    )
    .service(
        web::resource("/api/interviews/{id}")
            .route(web::get().to(interviews::get))
            .route(web::put().to(interviews::update))
            .route(web::delete().to(interviews::delete)),
    )
    .route("/health", web::get().to(health::get))
    .route("/version", web::get().to(version::get));
}
