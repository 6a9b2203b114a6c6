//! Wire types exchanged with the remote reservation backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::reservation::Occasion;

/// Body of `POST /reservations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReservation {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DDTHH:MM:00`
    #[serde(serialize_with = "serialize_timeslot")]
    pub timeslot: NaiveDateTime,
    pub guests: u32,
    pub occasion: Option<Occasion>,
    #[serde(rename = "specialRequests")]
    pub special_requests: String,
    pub newsletter_signup: bool,
}

fn serialize_timeslot<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:00"))
}

/// What the backend returned for an accepted reservation
///
/// The identifiers are opaque: they are shown to the guest, never interpreted.
/// Whatever JSON scalar the backend sends is kept as display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default, deserialize_with = "deserialize_opaque")]
    pub reservation_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opaque")]
    pub table_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opaque", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// `"R1"`, `17`, `1.5e3` and `"A4"` have all been seen as identifiers.
fn deserialize_opaque<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Answer of `GET /reservations/availability?timeslot=...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAvailability {
    pub timeslot: String,
    pub total_tables: u32,
    pub booked_tables: u32,
    pub available_tables: u32,
    pub is_available: bool,
}

/// Body of `POST /newsletter/signup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsletterSignup {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
