//! The `{success, count, message, data}` envelope of every `/api` response.

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            count: None,
            message: Some(message.into()),
            data: None,
        }
    }

    fn success(data: Option<T>) -> Self {
        Envelope {
            success: true,
            count: None,
            message: None,
            data,
        }
    }
}

pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::success(Some(data)))
}

pub(crate) fn list<T: Serialize>(data: Vec<T>) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        count: Some(data.len()),
        ..Envelope::success(Some(data))
    })
}

pub(crate) fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Created().json(Envelope {
        message: Some(message.to_string()),
        ..Envelope::success(Some(data))
    })
}

pub(crate) fn updated<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(Envelope {
        message: Some(message.to_string()),
        ..Envelope::success(Some(data))
    })
}

pub(crate) fn message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::<()> {
        message: Some(message.to_string()),
        ..Envelope::success(None)
    })
}
