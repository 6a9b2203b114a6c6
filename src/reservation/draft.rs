//! # Reservation draft
//!
//! The in-progress form data. `date` and `time` are private so the draft can
//! hold one invariant: `time` is always a member of `slots_for(date)`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValidationError;
use crate::availability::{slots_for, TimeSlot};

/// Number of guests, 1 to 9 (9 meaning "9 or more")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartySize(u8);

impl PartySize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub fn new(guests: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&guests) {
            Ok(Self(guests))
        } else {
            Err(ValidationError::InvalidGuests)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Text of the guest picker option (`"1 Guest"`, `"4 Guests"`, `"9+ Guests"`)
    pub fn label(self) -> String {
        match self.0 {
            1 => "1 Guest".to_string(),
            Self::MAX => format!("{}+ Guests", Self::MAX),
            n => format!("{} Guests", n),
        }
    }
}

impl Default for PartySize {
    fn default() -> Self {
        Self(2)
    }
}

/// Optional special occasion tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Birthday,
    Anniversary,
    #[serde(rename = "date")]
    DateNight,
    Business,
    Celebration,
    Other,
}

impl Occasion {
    pub fn label(self) -> &'static str {
        match self {
            Self::Birthday => "Birthday",
            Self::Anniversary => "Anniversary",
            Self::DateNight => "Date Night",
            Self::Business => "Business Dinner",
            Self::Celebration => "Celebration",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User-supplied reservation draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,
    pub guests: PartySize,
    pub occasion: Option<Occasion>,
    pub special_requests: String,
    /// Opt into the newsletter along with the booking
    pub newsletter_signup: bool,
}

impl ReservationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<TimeSlot> {
        self.time
    }

    /// Slots offered for the current date, recomputed on every call
    pub fn available_slots(&self) -> Vec<TimeSlot> {
        slots_for(self.date)
    }

    /// Changes the date, clearing `time` when it is not offered on the new date
    ///
    /// Returns `true` if the previously chosen time was cleared.
    pub fn set_date(&mut self, date: Option<NaiveDate>) -> bool {
        self.date = date;
        match self.time {
            Some(slot) if !slots_for(date).contains(&slot) => {
                tracing::debug!(slot = %slot, date = ?date, "Clearing time not offered on new date");
                self.time = None;
                true
            }
            _ => false,
        }
    }

    /// Picks a slot; it must be one of [`available_slots`](Self::available_slots)
    ///
    /// # Errors
    ///
    /// `UnavailableTime` if the slot is not offered on the current date (or no
    /// date is chosen yet). The previous choice is kept.
    pub fn set_time(&mut self, slot: TimeSlot) -> Result<(), ValidationError> {
        if !self.available_slots().contains(&slot) {
            return Err(ValidationError::UnavailableTime);
        }
        self.time = Some(slot);
        Ok(())
    }

    pub fn clear_time(&mut self) {
        self.time = None;
    }

    /// Back to the blank form
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
