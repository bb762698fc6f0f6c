use std::io::Error as IoError;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use sitewatch::{AddError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to start monitoring: {0:#}")]
    Monitoring(#[from] anyhow::Error),
}

/// Client-facing request errors, rendered as `400 {"error": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    DuplicateUrl(String),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<AddError> for ApiError {
    fn from(error: AddError) -> Self {
        match error {
            AddError::InvalidInput(_) => ApiError::InvalidInput(error.to_string()),
            AddError::DuplicateUrl(_) => ApiError::DuplicateUrl(error.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody { error: self.to_string() })
    }
}
