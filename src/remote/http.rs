use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{
    Confirmation, NewReservation, NewsletterService, NewsletterSignup, ReservationService,
    Subscription, TableAvailability,
};
use crate::reservation::{SubmissionError, GENERIC_FAILURE_MESSAGE, NEWSLETTER_FAILURE_MESSAGE};

/// Fields every backend reply may carry besides its payload
#[derive(Deserialize, Default)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl Envelope {
    fn reason(self) -> Option<String> {
        self.error.or(self.message).and_then(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        })
    }
}

// Non-2xx status, or `"success": false` in the body.
fn check_rejection(status: u16, body: &str, fallback: &str) -> Result<(), SubmissionError> {
    let envelope: Envelope = serde_json::from_str(body).unwrap_or_default();

    if !(200..300).contains(&status) || envelope.success == Some(false) {
        return Err(SubmissionError::rejected_or(Some(status), envelope.reason(), fallback));
    }
    Ok(())
}

/// Turns one backend answer into a payload or a [`SubmissionError`]
///
/// - non-2xx status, or `"success": false` in the body: `Rejected` with the
///   body's `error` (or `message`) text, or `fallback` when there is none
/// - 2xx whose body does not match `T`: `InvalidResponse`
pub fn decode_reply<T: DeserializeOwned>(
    status: u16,
    body: &str,
    fallback: &str,
) -> Result<T, SubmissionError> {
    check_rejection(status, body, fallback)?;
    serde_json::from_str(body).map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
}

/// Like [`decode_reply`], but any accepted reservation is a [`Confirmation`]
///
/// Once the backend has said yes the table is booked, so a 2xx body that
/// cannot be read confirms with no identifiers instead of failing.
pub fn decode_confirmation(
    status: u16,
    body: &str,
    fallback: &str,
) -> Result<Confirmation, SubmissionError> {
    check_rejection(status, body, fallback)?;
    Ok(serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::warn!(status, error = %e, "Unreadable confirmation body, confirming without identifiers");
        Confirmation::default()
    }))
}

/// HTTP client for the reservation backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// `timeout` is the transport's own limit; the forms add none of their own.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Uses an already configured client (proxy, TLS, timeout)
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends one request and returns the status and raw body
    async fn exchange(&self, request: RequestBuilder) -> Result<(u16, String), SubmissionError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Reservation backend unreachable");
            SubmissionError::Connectivity(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Connectivity(e.to_string()))?;

        tracing::debug!(status, "Reservation backend replied");
        Ok((status, body))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, SubmissionError> {
        let (status, body) = self.exchange(request).await?;
        decode_reply(status, &body, fallback)
    }
}

#[async_trait]
impl ReservationService for HttpBackend {
    async fn submit_reservation(
        &self,
        request: &NewReservation,
    ) -> Result<Confirmation, SubmissionError> {
        let url = self.url("reservations");
        tracing::info!(url = %url, timeslot = %request.timeslot, guests = request.guests, "Forwarding reservation");
        let (status, body) = self.exchange(self.client.post(&url).json(request)).await?;
        decode_confirmation(status, &body, GENERIC_FAILURE_MESSAGE)
    }

    async fn table_availability(
        &self,
        timeslot: NaiveDateTime,
    ) -> Result<TableAvailability, SubmissionError> {
        let url = self.url("reservations/availability");
        let timeslot = timeslot.format("%Y-%m-%dT%H:%M:00").to_string();
        self.send(
            self.client.get(&url).query(&[("timeslot", timeslot)]),
            GENERIC_FAILURE_MESSAGE,
        )
        .await
    }
}

#[async_trait]
impl NewsletterService for HttpBackend {
    async fn subscribe(&self, signup: &NewsletterSignup) -> Result<Subscription, SubmissionError> {
        let url = self.url("newsletter/signup");
        self.send(self.client.post(&url).json(signup), NEWSLETTER_FAILURE_MESSAGE)
            .await
    }
}
