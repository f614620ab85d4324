use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

// Error shared by the CRUD handlers. The response body only ever carries
// the Display text, the cause chain goes to the logs through Debug.
#[derive(Error)]
pub enum ApiError{
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("Unexpected error occurred")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        error_body(self.status_code(), self)
    }
}

// Appends every `source()` below an error, one cause per line
pub fn error_fmt_chain(f: &mut std::fmt::Formatter<'_>, source: &Option<impl Error>) -> std::fmt::Result{
    match source {
        Some(error) => {
            write!(f, "\n\tCaused By:\n\t{:?}", error)?;
            error_fmt_chain(f, &error.source())
        },
        None => Ok(())
    }
}

pub fn error_body(status: StatusCode, error: &impl std::fmt::Display) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "message": error.to_string() }))
}
