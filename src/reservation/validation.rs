//! # Draft validation
//!
//! Runs locally before any network call and stops at the first violation:
//!
//! 1. required fields (`name`, `email`, `phone`, `date`, `time`)
//! 2. email shape
//! 3. phone characters
//! 4. date not before today

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use super::draft::ReservationRequest;
use super::error::ValidationError;
use crate::remote::NewReservation;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

// ASCII digits, spaces, hyphens, plus and parentheses; at least ten of them.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-+()]{10,}$").expect("phone pattern compiles"));

/// `local-part@domain.tld` without whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// `MissingField(field)` when `value` is blank
pub fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Email shape, then phone shape (steps 2 and 3)
pub fn check_contact(email: &str, phone: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(phone.trim()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Validates `draft` against `today` and packages the request body
///
/// `date` and `time` are combined into the `timeslot` (`YYYY-MM-DDTHH:MM:00`).
///
/// # Errors
///
/// The first [`ValidationError`] found, in the order listed in the module docs.
pub fn validate(
    draft: &ReservationRequest,
    today: NaiveDate,
) -> Result<NewReservation, ValidationError> {
    require(&draft.name, "name")?;
    require(&draft.email, "email")?;
    require(&draft.phone, "phone")?;
    let date = draft.date().ok_or(ValidationError::MissingField("date"))?;
    let time = draft.time().ok_or(ValidationError::MissingField("time"))?;

    check_contact(&draft.email, &draft.phone)?;
    let email = draft.email.trim();
    let phone = draft.phone.trim();

    if date < today {
        return Err(ValidationError::DateInPast);
    }

    Ok(NewReservation {
        name: draft.name.trim().to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        timeslot: date.and_time(time.time()),
        guests: u32::from(draft.guests.get()),
        occasion: draft.occasion,
        special_requests: draft.special_requests.trim().to_string(),
        newsletter_signup: draft.newsletter_signup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::{Occasion, PartySize};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 5, 20).unwrap()
    }

    fn valid_draft() -> ReservationRequest {
        let mut draft = ReservationRequest::new();
        draft.name = "Ada Lovelace".into();
        draft.email = "ada@example.com".into();
        draft.phone = "(202) 555-1234".into();
        draft.set_date(NaiveDate::from_ymd_opt(2099, 6, 1));
        draft.set_time("19:30".parse().unwrap()).unwrap();
        draft.guests = PartySize::new(4).unwrap();
        draft.occasion = Some(Occasion::Anniversary);
        draft
    }

    #[test]
    fn accepts_a_complete_draft() {
        let body = validate(&valid_draft(), today()).unwrap();
        assert_eq!(body.name, "Ada Lovelace");
        assert_eq!(body.guests, 4);
        assert_eq!(body.timeslot.to_string(), "2099-06-01 19:30:00");
    }

    #[test]
    fn missing_fields_are_reported_first() {
        let mut draft = valid_draft();
        draft.name = "  ".into();
        draft.email = "not-an-email".into();
        assert_eq!(validate(&draft, today()), Err(ValidationError::MissingField("name")));

        let mut draft = valid_draft();
        draft.clear_time();
        assert_eq!(validate(&draft, today()), Err(ValidationError::MissingField("time")));

        let mut draft = valid_draft();
        draft.set_date(None);
        assert_eq!(validate(&draft, today()), Err(ValidationError::MissingField("date")));
    }

    #[test]
    fn rejects_malformed_email() {
        let mut draft = valid_draft();
        draft.email = "not-an-email".into();
        assert_eq!(validate(&draft, today()), Err(ValidationError::InvalidEmail));

        for bad in ["a@b", "a b@c.com", "@c.com", "a@@c.com"] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
        assert!(is_valid_email("john.doe@example.com"));
    }

    #[test]
    fn rejects_short_or_foreign_phone() {
        let mut draft = valid_draft();
        draft.phone = "12345".into();
        assert_eq!(validate(&draft, today()), Err(ValidationError::InvalidPhone));

        assert!(!is_valid_phone("202-555-CAFE"));
        assert!(!is_valid_phone("٠١٢٣٤٥٦٧٨٩"));
        assert!(!is_valid_phone("２０２５５５１２３４"));
        assert!(is_valid_phone("+1 202 555 4567"));
        assert!(is_valid_phone("2025554567"));
    }

    #[test]
    fn email_is_checked_before_phone() {
        let mut draft = valid_draft();
        draft.email = "nope".into();
        draft.phone = "1".into();
        assert_eq!(validate(&draft, today()), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn today_is_allowed_but_yesterday_is_not() {
        let draft = valid_draft();
        let date = draft.date().unwrap();
        assert!(validate(&draft, date).is_ok());
        assert_eq!(
            validate(&draft, date.succ_opt().unwrap()),
            Err(ValidationError::DateInPast)
        );
    }
}
