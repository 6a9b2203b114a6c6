//! Submission workflow against an in-process fake backend

use async_trait::async_trait;
use cafe_fausse::remote::{Confirmation, NewReservation, ReservationService, TableAvailability};
use cafe_fausse::reservation::{
    PartySize, ReservationError, ReservationForm, ReservationRequest, SubmissionError,
    SubmissionState, ValidationError, CONNECTIVITY_MESSAGE, RESET_DELAY,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio_test::{assert_err, assert_ok};

/// Answers with whatever was queued and remembers every request
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<Vec<Result<Confirmation, SubmissionError>>>,
    received: Mutex<Vec<NewReservation>>,
}

impl ScriptedBackend {
    fn replying(replies: Vec<Result<Confirmation, SubmissionError>>) -> Arc<Self> {
        let mut replies = replies;
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            received: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl ReservationService for ScriptedBackend {
    async fn submit_reservation(
        &self,
        request: &NewReservation,
    ) -> Result<Confirmation, SubmissionError> {
        self.received.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(SubmissionError::Connectivity("no scripted reply".into())))
    }

    async fn table_availability(
        &self,
        _timeslot: NaiveDateTime,
    ) -> Result<TableAvailability, SubmissionError> {
        Err(SubmissionError::Connectivity("not scripted".into()))
    }
}

fn confirmed(id: &str, table: &str) -> Result<Confirmation, SubmissionError> {
    Ok(Confirmation {
        reservation_id: Some(id.to_string()),
        table_number: Some(table.to_string()),
        message: None,
    })
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, 1).unwrap()
}

fn well_formed_draft() -> ReservationRequest {
    let mut draft = ReservationRequest::new();
    draft.name = "Ada Lovelace".into();
    draft.email = "ada@example.com".into();
    draft.phone = "202-555-1234".into();
    draft.set_date(Some(monday()));
    draft.set_time("19:00".parse().unwrap()).unwrap();
    draft.guests = PartySize::new(4).unwrap();
    draft.special_requests = "Window table, please".into();
    draft
}

#[tokio::test]
async fn successful_submission_carries_server_identifiers() {
    let backend = ScriptedBackend::replying(vec![confirmed("R1", "4")]);
    let mut form = ReservationForm::new(backend.clone()).with_draft(well_formed_draft());

    let confirmation = assert_ok!(form.submit().await);
    assert_eq!(confirmation.reservation_id.as_deref(), Some("R1"));
    assert_eq!(confirmation.table_number.as_deref(), Some("4"));
    assert_eq!(form.state(), &SubmissionState::Confirmed(confirmation));

    let sent = backend.received.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let body = serde_json::to_value(&sent[0]).unwrap();
    assert_eq!(body["timeslot"], "2099-06-01T19:00:00");
    assert_eq!(body["guests"], 4);
    assert_eq!(body["specialRequests"], "Window table, please");
}

#[tokio::test]
async fn rejection_keeps_the_draft_and_surfaces_the_message() {
    let backend = ScriptedBackend::replying(vec![Err(SubmissionError::rejected(
        Some(200),
        Some("Table unavailable".into()),
    ))]);
    let draft = well_formed_draft();
    let mut form = ReservationForm::new(backend).with_draft(draft.clone());

    let err = assert_err!(form.submit().await);
    assert!(matches!(err, ReservationError::Submission(_)));
    assert_eq!(form.state(), &SubmissionState::Failed("Table unavailable".into()));
    assert_eq!(form.draft(), &draft);
    assert_eq!(form.reset_deadline(), None);
}

#[tokio::test]
async fn invalid_email_never_calls_the_backend() {
    let backend = ScriptedBackend::replying(vec![confirmed("R1", "4")]);
    let mut draft = well_formed_draft();
    draft.email = "not-an-email".into();
    let mut form = ReservationForm::new(backend.clone()).with_draft(draft);

    let err = assert_err!(form.submit().await);
    assert_eq!(err, ReservationError::Validation(ValidationError::InvalidEmail));
    assert_eq!(backend.calls(), 0);
    assert_eq!(
        form.state().error_message(),
        Some("Please enter a valid email address")
    );
}

#[tokio::test]
async fn short_phone_is_a_validation_error() {
    let backend = ScriptedBackend::replying(vec![]);
    let mut draft = well_formed_draft();
    draft.phone = "12345".into();
    let mut form = ReservationForm::new(backend.clone()).with_draft(draft);

    let err = assert_err!(form.submit().await);
    assert_eq!(err, ReservationError::Validation(ValidationError::InvalidPhone));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn second_submit_while_submitting_is_refused() {
    let backend = ScriptedBackend::replying(vec![confirmed("R1", "4")]);
    let mut form = ReservationForm::new(backend.clone()).with_draft(well_formed_draft());

    let body = assert_ok!(form.begin_submit());
    assert!(form.state().is_submitting());

    let err = assert_err!(form.submit().await);
    assert_eq!(err, ReservationError::AlreadySubmitting);
    assert!(form.state().is_submitting());
    assert_eq!(backend.calls(), 0);

    let outcome = backend.submit_reservation(&body).await;
    assert_ok!(form.finish_submit(outcome, Instant::now()));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn confirmed_form_refuses_a_new_submit_until_reset() {
    let backend = ScriptedBackend::replying(vec![confirmed("R1", "4"), confirmed("R2", "5")]);
    let mut form = ReservationForm::new(backend.clone()).with_draft(well_formed_draft());

    assert_ok!(form.submit().await);
    let err = assert_err!(form.submit().await);
    assert_eq!(err, ReservationError::AlreadyConfirmed);
    assert_eq!(err.to_string(), "This reservation has already been confirmed");
    assert!(form.state().confirmation().is_some());
    assert_eq!(backend.calls(), 1);

    form.reset();
    *form.draft_mut() = well_formed_draft();
    let confirmation = assert_ok!(form.submit().await);
    assert_eq!(confirmation.reservation_id.as_deref(), Some("R2"));
}

#[tokio::test]
async fn retry_from_failed_goes_straight_back_to_submitting() {
    let backend = ScriptedBackend::replying(vec![
        Err(SubmissionError::Connectivity("connection refused".into())),
        confirmed("R2", "11"),
    ]);
    let mut form = ReservationForm::new(backend.clone()).with_draft(well_formed_draft());

    assert_err!(form.submit().await);
    assert_eq!(form.state().error_message(), Some(CONNECTIVITY_MESSAGE));
    assert!(form.state().accepts_submit());

    let confirmation = assert_ok!(form.submit().await);
    assert_eq!(confirmation.table_number.as_deref(), Some("11"));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn confirmation_resets_the_form_after_the_delay() {
    let backend = ScriptedBackend::replying(vec![confirmed("R1", "4")]);
    let mut form = ReservationForm::new(backend).with_draft(well_formed_draft());

    assert_ok!(form.begin_submit());
    let confirmed_at = Instant::now();
    assert_ok!(form.finish_submit(confirmed("R1", "4"), confirmed_at));

    assert_eq!(form.reset_deadline(), Some(confirmed_at + RESET_DELAY));
    assert!(!form.tick(confirmed_at + RESET_DELAY / 2));
    assert!(form.state().confirmation().is_some());

    assert!(form.tick(confirmed_at + RESET_DELAY));
    assert_eq!(form.state(), &SubmissionState::Idle);
    assert_eq!(form.draft(), &ReservationRequest::default());
    assert_eq!(form.reset_deadline(), None);
}

#[tokio::test]
async fn outcome_arriving_after_a_manual_reset_is_ignored() {
    let backend = ScriptedBackend::replying(vec![]);
    let mut form = ReservationForm::new(backend).with_draft(well_formed_draft());

    assert_ok!(form.begin_submit());
    form.reset();

    assert_ok!(form.finish_submit(confirmed("R9", "2"), Instant::now()));
    assert_eq!(form.state(), &SubmissionState::Idle);
    assert_eq!(form.reset_deadline(), None);
}

#[tokio::test]
async fn past_dates_are_rejected_in_the_restaurant_timezone() {
    let backend = ScriptedBackend::replying(vec![]);
    let mut draft = well_formed_draft();
    draft.set_date(NaiveDate::from_ymd_opt(2020, 1, 6));
    draft.set_time("18:00".parse().unwrap()).unwrap();
    let mut form = ReservationForm::new(backend.clone()).with_draft(draft);

    let err = assert_err!(form.submit().await);
    assert_eq!(err, ReservationError::Validation(ValidationError::DateInPast));
    assert_eq!(backend.calls(), 0);
}
