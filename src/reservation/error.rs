//! # Reservation errors
//!
//! Two kinds only: [`ValidationError`] (detected locally, never reaches the
//! network) and [`SubmissionError`] (reported by the remote service or by the
//! transport). Neither is fatal: the form always returns to an interactive
//! state.

use thiserror::Error;

/// Message shown when the remote service rejects without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to submit reservation. Please try again.";

/// Same, for the newsletter signup
pub const NEWSLETTER_FAILURE_MESSAGE: &str = "Failed to subscribe. Please try again.";

/// Message shown when the remote service cannot be reached at all
pub const CONNECTIVITY_MESSAGE: &str =
    "We couldn't reach the reservation service. Please check your connection and try again.";

/// A draft field that failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One of `name`, `email`, `phone`, `date`, `time` is empty
    #[error("Please fill in all required fields")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Please choose a date from today onwards")]
    DateInPast,

    #[error("Please enter a valid date (YYYY-MM-DD)")]
    InvalidDate,

    /// The slot is not offered on the chosen date
    #[error("That time is not available on the selected date")]
    UnavailableTime,

    #[error("Number of guests must be between 1 and 9")]
    InvalidGuests,
}

impl ValidationError {
    /// Name of the offending form field, when there is one
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) => field,
            Self::InvalidEmail => "email",
            Self::InvalidPhone => "phone",
            Self::DateInPast | Self::InvalidDate => "date",
            Self::UnavailableTime => "time",
            Self::InvalidGuests => "guests",
        }
    }
}

/// The remote call did not produce a confirmation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Non-2xx status or a `success: false` body
    #[error("{message}")]
    Rejected {
        /// HTTP status, when the service answered
        status: Option<u16>,
        message: String,
    },

    /// No response at all (DNS, refused connection, transport timeout...)
    #[error("{}", CONNECTIVITY_MESSAGE)]
    Connectivity(String),

    /// A 2xx response whose body could not be read
    #[error("{}", GENERIC_FAILURE_MESSAGE)]
    InvalidResponse(String),
}

impl SubmissionError {
    /// Rejection carrying the server-supplied message, or the generic fallback
    pub fn rejected(status: Option<u16>, message: Option<String>) -> Self {
        Self::rejected_or(status, message, GENERIC_FAILURE_MESSAGE)
    }

    pub fn rejected_or(status: Option<u16>, message: Option<String>, fallback: &str) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Self::Rejected { status, message }
    }
}

/// Everything [`ReservationForm::submit`](super::ReservationForm::submit) can return
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// Single-flight guard: a submission is already in progress
    #[error("A reservation is already being submitted")]
    AlreadySubmitting,

    /// The form still shows a confirmation; it takes new input after reset
    #[error("This reservation has already been confirmed")]
    AlreadyConfirmed,
}
