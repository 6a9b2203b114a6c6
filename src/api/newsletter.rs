//! # Newsletter API

use actix_web::{post, web, HttpResponse, Responder};
use serde::Deserialize;

use super::{AppResult, AppState};
use crate::newsletter::NewsletterForm;

#[derive(Deserialize)]
struct SignupRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
}

/// Subscribes an email to the newsletter
///
/// # Response (201)
/// ```json
/// {
///   "message": "Successfully subscribed to newsletter!",
///   "email": "guest@example.com"
/// }
/// ```
///
/// # Errors
/// - `400 Bad Request`: invalid email
/// - `4xx`/`502`/`503`: backend refusal or failure
#[post("/newsletter/signup")]
async fn newsletter_signup(
    state: web::Data<AppState>,
    data: web::Json<SignupRequest>,
) -> AppResult<impl Responder> {
    let SignupRequest { email, name } = data.into_inner();

    let mut form = NewsletterForm::new(state.newsletter.clone());
    form.email = email;
    form.name = name;

    let requested = form.email.trim().to_string();
    let subscription = form.subscribe().await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": subscription
            .message
            .unwrap_or_else(|| "Thank you for subscribing!".to_string()),
        "email": subscription.email.unwrap_or(requested),
    })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(newsletter_signup);
}
