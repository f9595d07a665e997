//! Types for reporting errors that happened during a request.
//!
//! If your function interacts with the database or validates user input,
//! you likely want to return an [`ApiResult`].

use super::extract::Json;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::IntoResponse,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::ResponseForPanic;
use utoipa::ToSchema;

/// A generic error response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// A description of the error.
    error: String,
}

impl ErrorBody {
    pub(crate) fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// The error message.
    pub fn error(&self) -> &str {
        self.error.as_ref()
    }
}

/// One violated input rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationError {
    /// The offending input field.
    #[schema(example = "price")]
    pub field: String,
    /// Why the field was rejected.
    #[schema(example = "Field \"price\" is required")]
    pub message: String,
}

impl ValidationError {
    /// The error for a field that is missing or has the wrong shape.
    pub fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("Field \"{field}\" is required"),
        }
    }

    /// The error for a numeric field that must not be negative.
    pub fn negative(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("Field \"{field}\" cannot be negative"),
        }
    }
}

/// The body of a validation failure response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorBody {
    /// All violated rules, in field declaration order.
    pub errors: Vec<ValidationError>,
}

/// An error from our API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An error caused by the client.
    #[error("{0}")]
    ClientError(#[from] ClientError),
    /// An internal error.
    #[error("{0}")]
    InternalError(#[from] InternalError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::ClientError(e) => e.into_response(),
            ApiError::InternalError(e) => {
                tracing::error!("internal error: {}", e);
                e.into_response()
            }
        }
    }
}

/// The result of calling API-related functions.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::ClientError(ClientError::NotFound),
            e => ApiError::InternalError(InternalError::SqlxError(e)),
        }
    }
}

/// Errors caused by the client.
/// The client can do something to fix these.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input validation failed.
    #[error("validation failed")]
    Validation(Vec<ValidationError>),
    /// Some illegal operation was attempted.
    #[error("{0}")]
    BadRequest(String),
    /// The resource was not found.
    #[error("not found")]
    NotFound,
    /// Custom error.
    #[error("{1}")]
    Custom(StatusCode, String),
}

impl Default for ClientError {
    fn default() -> Self {
        Self::BadRequest("Bad Request".to_string())
    }
}

impl From<JsonRejection> for ClientError {
    fn from(value: JsonRejection) -> Self {
        ClientError::Custom(value.status(), value.body_text())
    }
}

impl From<PathRejection> for ClientError {
    fn from(value: PathRejection) -> Self {
        ClientError::Custom(value.status(), value.body_text())
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> axum::response::Response {
        match self {
            // Not-found responses carry no body.
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorBody { errors }),
            )
                .into_response(),
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(msg))).into_response()
            }
            Self::Custom(status, msg) => (status, Json(ErrorBody::new(msg))).into_response(),
        }
    }
}

/// An internal error.
/// The client cannot do anything about this.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    /// An [`sqlx`] error.
    #[error("{0}")]
    SqlxError(#[from] sqlx::Error),
    /// Other miscellaneous errors.
    #[error("{0}")]
    Other(String),
}

impl IntoResponse for InternalError {
    fn into_response(self) -> axum::response::Response {
        // The real cause is logged, never leaked to the client.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("Internal Server Error")),
        )
            .into_response()
    }
}

/// A handler for converting panics into proper responses for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanicHandler;

impl ResponseForPanic for PanicHandler {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        _: Box<dyn std::any::Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        ApiError::InternalError(InternalError::Other("Panic".to_string())).into_response()
    }
}
