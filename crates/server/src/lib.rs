use api_types::{FieldError, ValidationError};
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{AllowedOrigins, router, run_with_listener};

mod server;
mod transactions;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{Transaction, TransactionNew};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Validation(ValidationError),
    Json(JsonRejection),
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl Error {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Error::message("internal server error"),
                )
            }
            ServerError::Validation(err) => {
                tracing::debug!("rejected payload: {err}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Error {
                        error: "validation failed".to_string(),
                        details: err.errors,
                    },
                )
            }
            ServerError::Json(rejection) => {
                (rejection.status(), Error::message(rejection.body_text()))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<ValidationError> for ServerError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Json(value)
    }
}
