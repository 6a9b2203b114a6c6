//! # Availability API
//!
//! Feeds the reservation page's time picker and the operating-hours card.

use actix_web::{get, web, HttpResponse, Responder};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::AppResult;
use crate::availability::{hours_for, slots_for, weekly_hours, OperatingHours, TimeSlot};
use crate::reservation::ValidationError;

#[derive(Deserialize)]
struct SlotsQuery {
    /// `YYYY-MM-DD`; absent or empty means "no date picked yet"
    date: Option<String>,
}

#[derive(Serialize)]
struct SlotOption {
    /// Value posted back with the form (`"19:30"`)
    value: String,
    /// Text shown to the guest (`"7:30 PM"`)
    label: String,
}

impl From<TimeSlot> for SlotOption {
    fn from(slot: TimeSlot) -> Self {
        Self {
            value: slot.to_string(),
            label: slot.label(),
        }
    }
}

#[derive(Serialize)]
struct HoursResponse {
    opens: String,
    closes: String,
}

impl From<OperatingHours> for HoursResponse {
    fn from(hours: OperatingHours) -> Self {
        Self {
            opens: format_time(hours.opens),
            closes: format_time(hours.closes),
        }
    }
}

#[derive(Serialize)]
struct SlotsResponse {
    date: Option<NaiveDate>,
    weekday: Option<String>,
    hours: Option<HoursResponse>,
    slots: Vec<SlotOption>,
}

#[derive(Serialize)]
struct DayHours {
    day: String,
    #[serde(flatten)]
    hours: HoursResponse,
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses an optional `YYYY-MM-DD`; blank means no date
///
/// # Errors
/// - `InvalidDate` for anything that is not a calendar date
pub(super) fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::InvalidDate),
    }
}

/// Bookable slots for a date
///
/// # Response
///
/// ```json
/// {
///   "date": "2099-06-07",
///   "weekday": "Sunday",
///   "hours": { "opens": "17:00", "closes": "21:00" },
///   "slots": [ { "value": "17:00", "label": "5:00 PM" }, ... ]
/// }
/// ```
///
/// Without `date` the list is empty.
///
/// # Errors
/// - `400 Bad Request`: `date` is not `YYYY-MM-DD`
#[get("/slots")]
async fn get_slots(query: web::Query<SlotsQuery>) -> AppResult<impl Responder> {
    let date = parse_date(query.date.as_deref())?;

    let slots = slots_for(date);
    tracing::debug!(date = ?date, count = slots.len(), "Computed reservation slots");

    Ok(HttpResponse::Ok().json(SlotsResponse {
        date,
        weekday: date.map(|d| day_name(d.weekday()).to_string()),
        hours: date.map(|d| HoursResponse::from(hours_for(d.weekday()))),
        slots: slots.into_iter().map(SlotOption::from).collect(),
    }))
}

/// Weekly operating hours, Monday first
#[get("/hours")]
async fn get_hours() -> impl Responder {
    let week: Vec<DayHours> = weekly_hours()
        .into_iter()
        .map(|(day, hours)| DayHours {
            day: day_name(day).to_string(),
            hours: hours.into(),
        })
        .collect();

    HttpResponse::Ok().json(week)
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_slots);
    cfg.service(get_hours);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_dates_mean_no_date() {
        assert_eq!(parse_date(None), Ok(None));
        assert_eq!(parse_date(Some("  ")), Ok(None));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert_eq!(parse_date(Some("07/06/2099")), Err(ValidationError::InvalidDate));
        assert_eq!(parse_date(Some("2099-02-30")), Err(ValidationError::InvalidDate));
        assert_eq!(
            parse_date(Some("2099-06-07")),
            Ok(NaiveDate::from_ymd_opt(2099, 6, 7))
        );
    }
}
