use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use interview_core::ValidationError;
use thiserror::Error;

use crate::response::Envelope;

/// Shown when the actor's faculty does not own the requested data.
pub const ACCESS_DENIED: &str = "ข้อมูลถูกจำกัดการเข้าถึงตามสิทธิ์ที่ได้รับ";

const INTERNAL_ERROR: &str = "internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server startup failed: {reason}")]
    Startup { reason: String },

    #[error(transparent)]
    Store(#[from] interview_store_db::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request body or path that could not be decoded
    #[error("{0}")]
    BadRequest(String),

    #[error("missing or unknown x-user-id")]
    Unauthorized,

    #[error("{}", ACCESS_DENIED)]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to render metrics: {0}")]
    Metrics(String),

    #[error("Task join error: {0}")]
    Task(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to read question catalog {path}: {reason}")]
    Catalog { path: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Extension trait for adding context to IO errors
pub trait IoErrorContext<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> IoErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn io_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ApiError::Io {
            context: context.into(),
            source: e,
        })
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        use interview_store_db::Error as StoreError;
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(e) if e.is_conflict() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{self}");
            INTERNAL_ERROR.to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(Envelope::<()>::failure(message))
    }
}
