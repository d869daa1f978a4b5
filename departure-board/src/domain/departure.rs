//! Station snapshot types.

use chrono::{DateTime, Utc};

/// A single scheduled train leaving the station.
///
/// Only the absolute departure time is stored; minutes-until is always
/// derived against the current clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Commuter line letter (e.g. "K")
    pub line: Option<String>,
    /// Destination station name
    pub destination: Option<String>,
    /// Departure track
    pub track: Option<String>,
    /// Scheduled or estimated departure time
    pub departure_time: DateTime<Utc>,
}

impl Departure {
    /// Create a departure with no optional fields set.
    pub fn new(departure_time: DateTime<Utc>) -> Self {
        Self {
            line: None,
            destination: None,
            track: None,
            departure_time,
        }
    }

    /// Set the line.
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = Some(line.into());
        self
    }

    /// Set the destination.
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Set the track.
    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }
}

/// The nearest station and its upcoming departures.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub stop_name: String,
    pub distance_meters: f64,
    /// Ascending by departure time as delivered; never re-sorted here.
    pub departures: Vec<Departure>,
}

/// One response from the departures endpoint.
///
/// Exactly one form is populated per response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// A station was resolved, possibly with no departures.
    Station(Station),
    /// No station data, with an explanation from the server.
    Message(String),
    /// The server reported a failure.
    Error(String),
}

impl ResponseEnvelope {
    /// Returns the station, if this envelope carries one.
    pub fn station(&self) -> Option<&Station> {
        match self {
            ResponseEnvelope::Station(station) => Some(station),
            _ => None,
        }
    }

    /// Returns the server message, if this envelope carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Message(message) => Some(message),
            _ => None,
        }
    }
}
