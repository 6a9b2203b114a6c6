//! # Submission workflow
//!
//! ```text
//!            submit()                      Ok
//!   Idle ───────────────▶ Submitting ───────────────▶ Confirmed ──(RESET_DELAY)──▶ Idle
//!    ▲                        │  Err
//!    │                        ▼
//!    └──────reset()──────  Failed ──submit()──▶ Submitting
//! ```
//!
//! A new submission is only accepted from `Idle` or `Failed`. While
//! `Submitting` every other attempt is refused with
//! [`ReservationError::AlreadySubmitting`], and a confirmed form refuses with
//! [`ReservationError::AlreadyConfirmed`] until it is reset.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::time::{Duration, Instant};

use super::draft::ReservationRequest;
use super::error::{ReservationError, SubmissionError};
use super::validation::validate;
use crate::availability::today_in;
use crate::remote::{Confirmation, NewReservation, ReservationService};

/// How long the confirmation stays on screen before the form clears itself
pub const RESET_DELAY: Duration = Duration::from_secs(5);

/// Where one form is in its submission lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState<C = Confirmation> {
    Idle,
    Submitting,
    Confirmed(C),
    Failed(String),
}

impl<C> SubmissionState<C> {
    /// Single-flight guard: only `Idle` and `Failed` take a new submission
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn confirmation(&self) -> Option<&C> {
        match self {
            Self::Confirmed(confirmation) => Some(confirmation),
            _ => None,
        }
    }
}

/// The reservation form: one draft, one state, one remote service
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> Result<(), cafe_fausse::reservation::ReservationError> {
/// use cafe_fausse::remote::HttpBackend;
/// use cafe_fausse::reservation::ReservationForm;
/// use std::time::Duration;
///
/// let backend = HttpBackend::new("http://localhost:5000/api", Duration::from_secs(30))
///     .expect("http client");
/// let mut form = ReservationForm::new(backend);
/// form.draft_mut().name = "Ada Lovelace".into();
/// // ... email, phone, date, time
/// let confirmation = form.submit().await?;
/// println!("table {:?}", confirmation.table_number);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ReservationForm<S> {
    service: S,
    draft: ReservationRequest,
    state: SubmissionState,
    utc_offset: FixedOffset,
    reset_at: Option<Instant>,
}

impl<S: ReservationService> ReservationForm<S> {
    /// Blank form; "today" is evaluated in UTC until [`with_utc_offset`](Self::with_utc_offset)
    pub fn new(service: S) -> Self {
        Self {
            service,
            draft: ReservationRequest::default(),
            state: SubmissionState::Idle,
            utc_offset: Utc.fix(),
            reset_at: None,
        }
    }

    /// Anchors "today" to the restaurant's UTC offset
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_draft(mut self, draft: ReservationRequest) -> Self {
        self.draft = draft;
        self
    }

    pub fn draft(&self) -> &ReservationRequest {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ReservationRequest {
        &mut self.draft
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.utc_offset)
    }

    /// When the pending automatic reset is due, if one is scheduled
    pub fn reset_deadline(&self) -> Option<Instant> {
        self.reset_at
    }

    /// Guard, validate and move to `Submitting`
    ///
    /// Returns the request body to send. On a validation error the state
    /// becomes `Failed` with the error text and nothing is sent.
    ///
    /// # Errors
    ///
    /// - `AlreadySubmitting` if a submission is in flight (state untouched)
    /// - `AlreadyConfirmed` until the confirmed form is reset
    /// - `Validation` for the first invalid field
    pub fn begin_submit(&mut self) -> Result<NewReservation, ReservationError> {
        match self.state {
            SubmissionState::Submitting => {
                tracing::warn!("Submit ignored, reservation already in flight");
                return Err(ReservationError::AlreadySubmitting);
            }
            SubmissionState::Confirmed(_) => {
                tracing::warn!("Submit ignored, reservation already confirmed");
                return Err(ReservationError::AlreadyConfirmed);
            }
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
        }

        match validate(&self.draft, self.today()) {
            Ok(body) => {
                self.state = SubmissionState::Submitting;
                self.reset_at = None;
                Ok(body)
            }
            Err(error) => {
                tracing::info!(field = error.field(), error = %error, "Reservation draft rejected");
                self.state = SubmissionState::Failed(error.to_string());
                Err(error.into())
            }
        }
    }

    /// Applies the remote outcome of the submission started by
    /// [`begin_submit`](Self::begin_submit)
    ///
    /// A confirmation schedules the automatic reset at `now + RESET_DELAY`.
    /// A failure keeps the draft untouched so the guest can retry.
    pub fn finish_submit(
        &mut self,
        outcome: Result<Confirmation, SubmissionError>,
        now: Instant,
    ) -> Result<Confirmation, ReservationError> {
        if !self.state.is_submitting() {
            // The form was reset while the call was in flight.
            tracing::debug!(state = ?self.state, "Discarding stale submission outcome");
            return outcome.map_err(ReservationError::from);
        }

        match outcome {
            Ok(confirmation) => {
                tracing::info!(
                    reservation_id = ?confirmation.reservation_id,
                    table_number = ?confirmation.table_number,
                    "Reservation confirmed"
                );
                self.state = SubmissionState::Confirmed(confirmation.clone());
                self.reset_at = Some(now + RESET_DELAY);
                Ok(confirmation)
            }
            Err(error) => {
                tracing::warn!(error = ?error, "Reservation submission failed");
                self.state = SubmissionState::Failed(error.to_string());
                Err(error.into())
            }
        }
    }

    /// Validates the draft, sends it and waits for the single answer
    pub async fn submit(&mut self) -> Result<Confirmation, ReservationError> {
        let body = self.begin_submit()?;
        let outcome = self.service.submit_reservation(&body).await;
        self.finish_submit(outcome, Instant::now())
    }

    /// Runs the automatic reset once its deadline has passed
    ///
    /// Returns `true` if the form was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.reset_at {
            Some(deadline) if now >= deadline => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Clears the draft and returns to `Idle`
    pub fn reset(&mut self) {
        self.draft.reset();
        self.state = SubmissionState::Idle;
        self.reset_at = None;
    }
}
