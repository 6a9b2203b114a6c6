//! # Newsletter signup
//!
//! The Home page's email box. Same lifecycle as the reservation form, with a
//! single field: validate the email locally, call the backend once, clear
//! the box on success.

use std::time::Instant;
use thiserror::Error;

use crate::remote::{NewsletterService, NewsletterSignup, Subscription};
use crate::reservation::{is_valid_email, SubmissionError, SubmissionState, ValidationError, RESET_DELAY};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsletterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("A subscription is already being submitted")]
    AlreadySubmitting,

    #[error("This email has already been subscribed")]
    AlreadySubscribed,
}

#[derive(Debug)]
pub struct NewsletterForm<S> {
    service: S,
    pub email: String,
    pub name: String,
    state: SubmissionState<Subscription>,
    reset_at: Option<Instant>,
}

impl<S: NewsletterService> NewsletterForm<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            email: String::new(),
            name: String::new(),
            state: SubmissionState::Idle,
            reset_at: None,
        }
    }

    pub fn state(&self) -> &SubmissionState<Subscription> {
        &self.state
    }

    /// Guard, validate and move to `Submitting`
    ///
    /// # Errors
    ///
    /// - `AlreadySubmitting` while a call is in flight
    /// - `AlreadySubscribed` until the thank-you message is reset
    /// - `Validation(InvalidEmail)`; the state becomes `Failed`
    pub fn begin_subscribe(&mut self) -> Result<NewsletterSignup, NewsletterError> {
        match self.state {
            SubmissionState::Submitting => return Err(NewsletterError::AlreadySubmitting),
            SubmissionState::Confirmed(_) => return Err(NewsletterError::AlreadySubscribed),
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
        }

        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            self.state = SubmissionState::Failed(ValidationError::InvalidEmail.to_string());
            return Err(ValidationError::InvalidEmail.into());
        }

        let name = self.name.trim();
        self.state = SubmissionState::Submitting;
        self.reset_at = None;
        Ok(NewsletterSignup {
            email,
            name: (!name.is_empty()).then(|| name.to_string()),
        })
    }

    /// Applies the backend's answer to the signup started by
    /// [`begin_subscribe`](Self::begin_subscribe)
    ///
    /// Success clears the box and schedules the reset at `now + RESET_DELAY`;
    /// failure keeps the email for a retry.
    pub fn finish_subscribe(
        &mut self,
        outcome: Result<Subscription, SubmissionError>,
        now: Instant,
    ) -> Result<Subscription, NewsletterError> {
        if !self.state.is_submitting() {
            return outcome.map_err(NewsletterError::from);
        }

        match outcome {
            Ok(subscription) => {
                tracing::info!(email = ?subscription.email, "Newsletter subscription accepted");
                self.email.clear();
                self.name.clear();
                self.state = SubmissionState::Confirmed(subscription.clone());
                self.reset_at = Some(now + RESET_DELAY);
                Ok(subscription)
            }
            Err(error) => {
                tracing::warn!(error = ?error, "Newsletter subscription failed");
                self.state = SubmissionState::Failed(error.to_string());
                Err(error.into())
            }
        }
    }

    /// Validates the email and subscribes it
    ///
    /// # Errors
    ///
    /// Those of [`begin_subscribe`](Self::begin_subscribe), plus `Submission`
    /// when the backend refuses or cannot be reached.
    pub async fn subscribe(&mut self) -> Result<Subscription, NewsletterError> {
        let signup = self.begin_subscribe()?;
        let outcome = self.service.subscribe(&signup).await;
        self.finish_subscribe(outcome, Instant::now())
    }

    /// Hides the thank-you message once [`RESET_DELAY`] has elapsed
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.reset_at {
            Some(deadline) if now >= deadline => {
                self.state = SubmissionState::Idle;
                self.reset_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeNewsletter {
        calls: AtomicUsize,
        refuse: bool,
    }

    #[async_trait]
    impl NewsletterService for FakeNewsletter {
        async fn subscribe(&self, signup: &NewsletterSignup) -> Result<Subscription, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.refuse {
                return Err(SubmissionError::rejected(Some(400), Some("Already subscribed".into())));
            }
            Ok(Subscription {
                email: Some(signup.email.clone()),
                message: Some("Successfully subscribed to newsletter!".into()),
            })
        }
    }

    #[tokio::test]
    async fn invalid_email_never_reaches_the_backend() {
        let backend = Arc::new(FakeNewsletter::default());
        let mut form = NewsletterForm::new(backend.clone());
        form.email = "not-an-email".into();

        let result = form.subscribe().await;
        assert_eq!(result, Err(NewsletterError::Validation(ValidationError::InvalidEmail)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.state().error_message(), Some("Please enter a valid email address"));
    }

    #[tokio::test]
    async fn success_clears_the_box_and_resets_later() {
        let backend = Arc::new(FakeNewsletter::default());
        let mut form = NewsletterForm::new(backend.clone());
        form.email = " guest@example.com ".into();

        let signup = form.begin_subscribe().unwrap();
        assert_eq!(signup.email, "guest@example.com");
        let outcome = backend.subscribe(&signup).await;
        let subscribed_at = Instant::now();
        let subscription = form.finish_subscribe(outcome, subscribed_at).unwrap();

        assert_eq!(subscription.email.as_deref(), Some("guest@example.com"));
        assert!(form.email.is_empty());
        assert!(form.state().confirmation().is_some());

        assert!(!form.tick(subscribed_at + RESET_DELAY / 2));
        assert!(form.tick(subscribed_at + RESET_DELAY));
        assert_eq!(form.state(), &SubmissionState::Idle);
    }

    #[tokio::test]
    async fn confirmed_form_refuses_until_reset() {
        let backend = Arc::new(FakeNewsletter::default());
        let mut form = NewsletterForm::new(backend.clone());
        form.email = "guest@example.com".into();
        let subscribed_at = Instant::now();

        let signup = form.begin_subscribe().unwrap();
        let outcome = backend.subscribe(&signup).await;
        form.finish_subscribe(outcome, subscribed_at).unwrap();

        form.email = "friend@example.com".into();
        assert_eq!(form.subscribe().await, Err(NewsletterError::AlreadySubscribed));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        assert!(form.tick(subscribed_at + RESET_DELAY));
        assert!(form.subscribe().await.is_ok());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_subscribe_while_in_flight_is_refused() {
        let backend = Arc::new(FakeNewsletter::default());
        let mut form = NewsletterForm::new(backend.clone());
        form.email = "guest@example.com".into();

        form.begin_subscribe().unwrap();
        assert_eq!(form.subscribe().await, Err(NewsletterError::AlreadySubmitting));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refusal_keeps_the_email() {
        let backend = Arc::new(FakeNewsletter {
            refuse: true,
            ..Default::default()
        });
        let mut form = NewsletterForm::new(backend);
        form.email = "guest@example.com".into();

        assert!(form.subscribe().await.is_err());
        assert_eq!(form.email, "guest@example.com");
        assert_eq!(form.state().error_message(), Some("Already subscribed"));
    }
}
