//! # Availability Calculator
//!
//! Computes the bookable half-hour slots for a calendar date from the
//! restaurant's weekly operating hours.
//!
//! ## Operating hours
//!
//! | Day               | Opens | Closes | Last slot |
//! |-------------------|-------|--------|-----------|
//! | Monday – Saturday | 17:00 | 23:00  | 22:30     |
//! | Sunday            | 17:00 | 21:00  | 20:30     |
//!
//! The weekday is derived with date-only arithmetic (`NaiveDate::weekday`),
//! so no timezone can shift a `YYYY-MM-DD` onto the neighbouring day.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use std::fmt;
use std::str::FromStr;

/// Minutes between two consecutive slots
pub const SLOT_MINUTES: u32 = 30;

/// Opening and closing time for one day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    /// First bookable time
    pub opens: NaiveTime,
    /// Closing time (exclusive: no slot starts here)
    pub closes: NaiveTime,
}

impl OperatingHours {
    fn new(opens_hour: u32, closes_hour: u32) -> Self {
        Self {
            opens: hm(opens_hour, 0),
            closes: hm(closes_hour, 0),
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Returns the operating hours that apply to `weekday`
pub fn hours_for(weekday: Weekday) -> OperatingHours {
    match weekday {
        Weekday::Sun => OperatingHours::new(17, 21),
        _ => OperatingHours::new(17, 23),
    }
}

/// The whole week, Monday first
pub fn weekly_hours() -> Vec<(Weekday, OperatingHours)> {
    let mut day = Weekday::Mon;
    let mut week = Vec::with_capacity(7);
    for _ in 0..7 {
        week.push((day, hours_for(day)));
        day = day.succ();
    }
    week
}

/// A half-hour aligned clock time at which a reservation may begin
///
/// Displays and parses as `HH:MM` (`"19:30"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Builds a slot, rejecting times that are not on a half-hour mark
    pub fn new(time: NaiveTime) -> Option<Self> {
        let aligned = time.second() == 0
            && time.nanosecond() == 0
            && time.minute() % SLOT_MINUTES == 0;
        aligned.then_some(Self(time))
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// 12-hour label shown in the time picker (`"5:30 PM"`)
    pub fn label(&self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Error returned when a string is not a valid `HH:MM` half-hour slot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a half-hour time slot (HH:MM)")]
pub struct ParseSlotError(pub String);

impl FromStr for TimeSlot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .ok()
            .and_then(TimeSlot::new)
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}

/// Ordered, duplicate-free slots bookable on `date`, earliest first
///
/// Every half-hour mark from opening time up to (but excluding) closing time.
/// No date means no slots.
///
/// # Example
///
/// ```
/// use cafe_fausse::availability::slots_for;
/// use chrono::NaiveDate;
///
/// let monday = NaiveDate::from_ymd_opt(2099, 6, 1);
/// let slots = slots_for(monday);
/// assert_eq!(slots.len(), 12);
/// assert_eq!(slots[0].to_string(), "17:00");
/// assert_eq!(slots[11].to_string(), "22:30");
/// ```
pub fn slots_for(date: Option<NaiveDate>) -> Vec<TimeSlot> {
    let Some(date) = date else {
        return Vec::new();
    };

    let hours = hours_for(date.weekday());
    let step = Duration::minutes(i64::from(SLOT_MINUTES));
    let mut slots = Vec::new();
    let mut current = hours.opens;
    while current < hours.closes {
        slots.push(TimeSlot(current));
        current += step;
    }
    slots
}

/// Whether `slot` is one of the bookable slots for `date`
pub fn is_bookable(date: NaiveDate, slot: TimeSlot) -> bool {
    slots_for(Some(date)).contains(&slot)
}

/// Today's calendar date at the restaurant, given its UTC offset
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}
