//! # Remote backend
//!
//! The reservation store, table assignment and confirmation ids live in a
//! backend outside this repository. The forms only see it through the
//! [`ReservationService`] and [`NewsletterService`] traits, so tests can swap
//! in a fake without a network.
//!
//! [`HttpBackend`] is the real implementation over HTTP/JSON.

mod http;
mod models;

pub use http::{decode_confirmation, decode_reply, HttpBackend};
pub use models::{Confirmation, NewReservation, NewsletterSignup, Subscription, TableAvailability};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::reservation::SubmissionError;

/// Remote capability used by [`ReservationForm`](crate::reservation::ReservationForm)
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Sends one reservation and waits for exactly one answer
    async fn submit_reservation(
        &self,
        request: &NewReservation,
    ) -> Result<Confirmation, SubmissionError>;

    /// How many tables are still free at `timeslot`
    async fn table_availability(
        &self,
        timeslot: NaiveDateTime,
    ) -> Result<TableAvailability, SubmissionError>;
}

/// Remote capability used by [`NewsletterForm`](crate::newsletter::NewsletterForm)
#[async_trait]
pub trait NewsletterService: Send + Sync {
    async fn subscribe(&self, signup: &NewsletterSignup) -> Result<Subscription, SubmissionError>;
}

#[async_trait]
impl<T: ReservationService + ?Sized> ReservationService for Arc<T> {
    async fn submit_reservation(
        &self,
        request: &NewReservation,
    ) -> Result<Confirmation, SubmissionError> {
        (**self).submit_reservation(request).await
    }

    async fn table_availability(
        &self,
        timeslot: NaiveDateTime,
    ) -> Result<TableAvailability, SubmissionError> {
        (**self).table_availability(timeslot).await
    }
}

#[async_trait]
impl<T: NewsletterService + ?Sized> NewsletterService for Arc<T> {
    async fn subscribe(&self, signup: &NewsletterSignup) -> Result<Subscription, SubmissionError> {
        (**self).subscribe(signup).await
    }
}
