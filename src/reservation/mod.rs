//! # Reservations
//!
//! The reservation form's logic: the draft and its date/time invariant,
//! local validation, and the submission state machine that talks to the
//! remote backend.

mod draft;
mod error;
mod validation;
mod workflow;

pub use draft::{Occasion, PartySize, ReservationRequest};
pub use error::{
    ReservationError, SubmissionError, ValidationError, CONNECTIVITY_MESSAGE,
    GENERIC_FAILURE_MESSAGE, NEWSLETTER_FAILURE_MESSAGE,
};
pub use validation::{check_contact, is_valid_email, is_valid_phone, require, validate};
pub use workflow::{ReservationForm, SubmissionState, RESET_DELAY};
