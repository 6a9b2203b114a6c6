//! # Reservations API
//!
//! Receives the reservation form, runs it through
//! [`ReservationForm`](crate::reservation::ReservationForm) and forwards it to
//! the reservation backend:
//! - Create a reservation
//! - Check how many tables are free for a slot

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Deserializer, Serialize};

use super::availability::parse_date;
use super::middleware::ErrorLogExt;
use super::{AppResult, AppState, ResultExt};
use crate::availability::TimeSlot;
use crate::remote::Confirmation;
use crate::reservation::{
    check_contact, require, Occasion, PartySize, ReservationForm, ReservationRequest,
    ValidationError,
};

/// Reservation form as posted by the page
///
/// Every field is a string in the HTML form; `guests` may also arrive as a
/// number.
#[derive(Deserialize)]
struct MakeReservation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    date: String,
    /// `HH:MM`, one of the slots offered for `date`
    #[serde(default)]
    time: String,
    #[serde(default, deserialize_with = "deserialize_guests")]
    guests: Option<u8>,
    /// Empty string means no occasion
    #[serde(default, deserialize_with = "deserialize_occasion")]
    occasion: Option<Occasion>,
    #[serde(default, rename = "specialRequests")]
    special_requests: String,
    #[serde(default)]
    newsletter_signup: bool,
}

fn deserialize_guests<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawGuests {
        Number(u64),
        Text(String),
    }

    let parsed = match Option::<RawGuests>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawGuests::Number(n)) => Some(n),
        Some(RawGuests::Text(text)) => text.trim().trim_end_matches('+').parse::<u64>().ok(),
    };
    // Out of range values are kept as 0 so validation reports them.
    Ok(Some(parsed.and_then(|n| u8::try_from(n).ok()).unwrap_or(0)))
}

fn deserialize_occasion<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Occasion>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(tag) if !tag.trim().is_empty() => {
            serde_json::from_value(serde_json::Value::String(tag.trim().to_string()))
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

impl MakeReservation {
    /// Builds the draft through its setters so the date/time invariant holds
    ///
    /// Blank fields and the contact details are checked on the raw input
    /// first, in the same order as [`validate`](crate::reservation::validate).
    ///
    /// # Errors
    /// - `MissingField`, `InvalidEmail`, `InvalidPhone`: as for `validate`
    /// - `InvalidGuests`: outside 1..=9
    /// - `InvalidDate`: `date` is not `YYYY-MM-DD`
    /// - `UnavailableTime`: `time` is not offered on `date`
    fn into_draft(self) -> Result<ReservationRequest, ValidationError> {
        require(&self.name, "name")?;
        require(&self.email, "email")?;
        require(&self.phone, "phone")?;
        require(&self.date, "date")?;
        require(&self.time, "time")?;
        check_contact(&self.email, &self.phone)?;

        let mut draft = ReservationRequest::new();
        draft.name = self.name;
        draft.email = self.email;
        draft.phone = self.phone;
        draft.occasion = self.occasion;
        draft.special_requests = self.special_requests;
        draft.newsletter_signup = self.newsletter_signup;

        if let Some(guests) = self.guests {
            draft.guests = PartySize::new(guests)?;
        }

        draft.set_date(parse_date(Some(self.date.as_str()))?);

        let slot: TimeSlot = self
            .time
            .parse()
            .map_err(|_| ValidationError::UnavailableTime)?;
        draft.set_time(slot)?;

        Ok(draft)
    }
}

/// Answer sent to the page after a confirmed reservation
#[derive(Serialize)]
struct ReservationResponse {
    message: String,
    reservation_id: Option<String>,
    table_number: Option<String>,
    /// `YYYY-MM-DDTHH:MM:00`
    timeslot: String,
    guests: u8,
    customer_name: String,
    email: String,
}

impl ReservationResponse {
    fn new(confirmation: Confirmation, draft: &ReservationRequest) -> Self {
        let timeslot = match (draft.date(), draft.time()) {
            (Some(date), Some(time)) => format!("{}T{}:00", date.format("%Y-%m-%d"), time),
            _ => String::new(),
        };

        Self {
            message: confirmation
                .message
                .unwrap_or_else(|| "Reservation confirmed successfully!".to_string()),
            reservation_id: confirmation.reservation_id,
            table_number: confirmation.table_number,
            timeslot,
            guests: draft.guests.get(),
            customer_name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TableAvailabilityQuery {
    date: Option<String>,
    time: Option<String>,
}

/// Creates a reservation
///
/// # Validations (local, before contacting the backend)
/// - `name`, `email`, `phone`, `date`, `time` are required
/// - `email` must look like `local@domain.tld`
/// - `phone` must have at least 10 digits/spaces/`-+()`
/// - `date` must be today or later (restaurant timezone)
/// - `time` must be one of the slots for `date`
/// - `guests` between 1 and 9
///
/// # Response (201)
/// ```json
/// {
///   "message": "Reservation confirmed successfully!",
///   "reservation_id": "R1",
///   "table_number": "4",
///   "timeslot": "2099-06-01T19:30:00",
///   "guests": 4,
///   "customer_name": "Ada Lovelace",
///   "email": "ada@example.com"
/// }
/// ```
///
/// # Errors
/// - `400 Bad Request`: validation failed (`field` names the input)
/// - `4xx`: the backend refused (its message is passed on, e.g. 409 when full)
/// - `422 Unprocessable Entity`: the backend answered `success: false`
/// - `502 Bad Gateway`: the backend failed or answered nonsense
/// - `503 Service Unavailable`: the backend could not be reached
#[post("/reservations")]
async fn make_reservation(
    state: web::Data<AppState>,
    data: web::Json<MakeReservation>,
) -> AppResult<impl Responder> {
    let draft = data.into_inner().into_draft()?;

    let mut form = ReservationForm::new(state.reservations.clone())
        .with_utc_offset(state.utc_offset)
        .with_draft(draft);

    let confirmation = form.submit().await?;

    Ok(HttpResponse::Created().json(ReservationResponse::new(confirmation, form.draft())))
}

/// Free tables for one slot, as reported by the backend
///
/// # Response
/// ```json
/// {
///   "timeslot": "2099-06-01T19:30:00",
///   "total_tables": 30,
///   "booked_tables": 12,
///   "available_tables": 18,
///   "is_available": true
/// }
/// ```
///
/// # Errors
/// - `400 Bad Request`: missing/invalid `date`, or `time` not offered that day
/// - `502`/`503`: backend failure
#[get("/reservations/availability")]
async fn get_table_availability(
    state: web::Data<AppState>,
    query: web::Query<TableAvailabilityQuery>,
) -> AppResult<impl Responder> {
    let date = parse_date(query.date.as_deref())?.ok_or(ValidationError::MissingField("date"))?;

    let raw_time = query.time.as_deref().map(str::trim).unwrap_or_default();
    if raw_time.is_empty() {
        return Err(ValidationError::MissingField("time").into());
    }
    let slot: TimeSlot = raw_time.parse().map_err(|_| ValidationError::UnavailableTime)?;

    let mut draft = ReservationRequest::new();
    draft.set_date(Some(date));
    draft.set_time(slot)?;

    let availability = state
        .reservations
        .table_availability(date.and_time(slot.time()))
        .await
        .log_error_context("checking table availability")
        .map_err_backend("table_availability")?;

    Ok(HttpResponse::Ok().json(availability))
}

/// Registers the reservation routes
///
/// - `POST /reservations` - Create a reservation
/// - `GET /reservations/availability` - Free tables for a slot
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(make_reservation);
    cfg.service(get_table_availability);
}
