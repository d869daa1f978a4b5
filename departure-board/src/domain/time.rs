//! Time-relative classification of departures.
//!
//! Departures carry absolute timestamps. Everything shown to the user
//! (the "in 4m" label, the urgency colour) is derived from the distance to
//! a supplied `now`, so these functions stay pure and the board stays in
//! step with the clock without refetching.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Upper bound (exclusive) of the `Now` bucket, in minutes.
const NOW_BELOW_MINS: i64 = 5;

/// Upper bound (inclusive) of the `Soon` bucket, in minutes.
const SOON_UP_TO_MINS: i64 = 15;

/// How pressing a departure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    /// Leaving in under five minutes, or already gone.
    Now,
    /// Leaving in five to fifteen minutes.
    Soon,
    /// More than fifteen minutes away.
    Later,
}

impl Urgency {
    /// Short lowercase label, used as a style hint by sinks.
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Now => "now",
            Urgency::Soon => "soon",
            Urgency::Later => "later",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole minutes from `now` until `timestamp`, rounded down.
///
/// Negative for departures already in the past: 30 seconds ago is `-1`.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Duration};
/// use departure_board::domain::minutes_until;
///
/// let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
/// assert_eq!(minutes_until(now + Duration::seconds(119), now), 1);
/// assert_eq!(minutes_until(now - Duration::seconds(30), now), -1);
/// ```
pub fn minutes_until(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = timestamp.signed_duration_since(now).num_milliseconds();
    millis.div_euclid(MILLIS_PER_MINUTE)
}

/// Relative label: `"Now"` once the train is due, otherwise `"<n>m"`.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mins = minutes_until(timestamp, now);
    if mins <= 0 {
        "Now".to_string()
    } else {
        format!("{mins}m")
    }
}

/// Classify a departure into an urgency bucket.
pub fn urgency_bucket(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
    let mins = minutes_until(timestamp, now);
    if mins <= 0 || mins < NOW_BELOW_MINS {
        Urgency::Now
    } else if mins <= SOON_UP_TO_MINS {
        Urgency::Soon
    } else {
        Urgency::Later
    }
}

/// Absolute "HH:MM" in the host's local time zone.
pub fn format_clock(timestamp: DateTime<Utc>) -> String {
    format_clock_in(timestamp, &Local)
}

/// Absolute "HH:MM" in the given time zone.
pub fn format_clock_in<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    timestamp.with_timezone(tz).format("%H:%M").to_string()
}
