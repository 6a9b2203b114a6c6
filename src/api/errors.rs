//! # HTTP error handling
//!
//! [`AppError`] is what every handler returns on failure. It wraps the
//! library's errors with the context the HTTP layer needs (status code, field,
//! trace id) and renders them as an [`ErrorResponse`].

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

use crate::newsletter::NewsletterError;
use crate::reservation::{ReservationError, SubmissionError, ValidationError};

/// Errors of the HTTP surface
#[derive(Error, Debug)]
pub enum AppError {
    /// A form field failed local validation; never reached the backend
    #[error("Validation error in field '{}': {source}", .source.field())]
    Validation {
        #[source]
        source: ValidationError,
    },

    /// Malformed JSON body or query string
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The reservation backend refused the request or could not be reached
    ///
    /// `trace_id` ties the log line to the response the guest sees.
    #[error("Backend error during '{operation}' (trace: {trace_id}): {source}")]
    Backend {
        operation: String,
        trace_id: String,
        #[source]
        source: SubmissionError,
    },

    /// A submission for this form is already in flight
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Backend error with a fresh trace id
    pub fn backend(operation: &str, source: SubmissionError) -> Self {
        Self::Backend {
            operation: operation.to_string(),
            trace_id: uuid::Uuid::new_v4().to_string(),
            source,
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(source: ValidationError) -> Self {
        Self::Validation { source }
    }
}

impl From<ReservationError> for AppError {
    fn from(error: ReservationError) -> Self {
        match error {
            ReservationError::Validation(source) => Self::Validation { source },
            ReservationError::Submission(source) => Self::backend("create_reservation", source),
            ReservationError::AlreadySubmitting => {
                Self::Conflict(ReservationError::AlreadySubmitting.to_string())
            }
            ReservationError::AlreadyConfirmed => {
                Self::Conflict(ReservationError::AlreadyConfirmed.to_string())
            }
        }
    }
}

impl From<NewsletterError> for AppError {
    fn from(error: NewsletterError) -> Self {
        match error {
            NewsletterError::Validation(source) => Self::Validation { source },
            NewsletterError::Submission(source) => Self::backend("newsletter_signup", source),
            NewsletterError::AlreadySubmitting => {
                Self::Conflict(NewsletterError::AlreadySubmitting.to_string())
            }
            NewsletterError::AlreadySubscribed => {
                Self::Conflict(NewsletterError::AlreadySubscribed.to_string())
            }
        }
    }
}

/// Status for a backend failure
///
/// Client errors from the backend (409 table taken, 400 bad data) are passed
/// through; a 2xx with `success: false` becomes 422; anything else is a
/// gateway problem.
fn backend_status(error: &SubmissionError) -> StatusCode {
    match error {
        SubmissionError::Rejected { status: Some(code), .. } if (400..500).contains(code) => {
            StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        SubmissionError::Rejected { status: Some(code), .. } if (200..300).contains(code) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SubmissionError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Backend { source, .. } => backend_status(source),
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            Self::Validation { source } => {
                tracing::warn!(
                    field = source.field(),
                    message = %source,
                    "Validation error"
                );
                ErrorResponse {
                    error: "Validation error".to_string(),
                    message: source.to_string(),
                    field: Some(source.field().to_string()),
                    trace_id: None,
                }
            }
            Self::BadRequest(message) => {
                tracing::warn!(message = %message, "Bad request");
                ErrorResponse {
                    error: "Bad request".to_string(),
                    message: message.clone(),
                    field: None,
                    trace_id: None,
                }
            }
            Self::Backend {
                operation,
                trace_id,
                source,
            } => {
                tracing::error!(
                    operation = %operation,
                    trace_id = %trace_id,
                    status = status.as_u16(),
                    error = ?source,
                    error_chain = ?self.source(),
                    "Reservation backend error"
                );
                ErrorResponse {
                    error: "Reservation service error".to_string(),
                    message: source.to_string(),
                    field: None,
                    trace_id: Some(trace_id.clone()),
                }
            }
            Self::Conflict(message) => {
                tracing::info!(message = %message, "Duplicate submission refused");
                ErrorResponse {
                    error: "Conflict".to_string(),
                    message: message.clone(),
                    field: None,
                    trace_id: None,
                }
            }
        };

        HttpResponse::build(status).json(body)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trace_id: Option<String>,
}

pub type AppResult<T> = Result<T, AppError>;

pub trait ResultExt<T> {
    /// Wraps a backend failure with the name of the operation that hit it
    fn map_err_backend(self, operation: &str) -> AppResult<T>;
}

impl<T> ResultExt<T> for Result<T, SubmissionError> {
    fn map_err_backend(self, operation: &str) -> AppResult<T> {
        self.map_err(|e| AppError::backend(operation, e))
    }
}
