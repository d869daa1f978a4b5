//! Status line text.
//!
//! Every outcome of a refresh cycle ends in exactly one of these lines.

use chrono::{DateTime, Utc};

use crate::client::ClientError;
use crate::domain::{Departure, ResponseEnvelope, format_relative};
use crate::location::LocationError;

pub const LOCATING: &str = "Getting your location…";
pub const LOADING: &str = "Loading departures…";

pub const LOCATION_UNSUPPORTED: &str = "Location is not available on this device.";
pub const LOCATION_DENIED: &str =
    "Location permission denied. Allow location access to see nearby departures.";
pub const LOCATION_UNAVAILABLE: &str = "Your location is currently unavailable. Please try again.";
pub const LOCATION_TIMEOUT: &str = "Getting your location took too long. Please try again.";
pub const LOCATION_FAILED: &str = "Could not get your location. Please try again.";

/// Server text for a coordinate validation failure.
pub const INVALID_COORDINATES_ERROR: &str = "Invalid lat/lon";
/// Server text for a transient failure, shown verbatim.
pub const TEMPORARY_SERVER_ERROR: &str = "Temporary server error. Please try again.";

pub const INVALID_COORDINATES: &str = "Your location could not be used. Please try again.";
pub const LOAD_FAILED: &str = "Could not load departures. Please try again.";

pub const NO_STATIONS: &str = "No nearby stations found.";
pub const NO_UPCOMING: &str = "No upcoming commuter trains right now.";
pub const NO_UPCOMING_HELSINKI: &str = "No upcoming Helsinki-bound commuter trains right now.";

/// Status for a failed location request.
pub fn location_error_status(error: &LocationError) -> &'static str {
    match error {
        LocationError::Unsupported => LOCATION_UNSUPPORTED,
        LocationError::PermissionDenied => LOCATION_DENIED,
        LocationError::Unavailable => LOCATION_UNAVAILABLE,
        LocationError::Timeout => LOCATION_TIMEOUT,
        LocationError::Unknown(_) => LOCATION_FAILED,
    }
}

/// Status for a failed data load.
pub fn client_error_status(error: &ClientError) -> &'static str {
    match error.server_message() {
        Some(INVALID_COORDINATES_ERROR) => INVALID_COORDINATES,
        Some(TEMPORARY_SERVER_ERROR) => TEMPORARY_SERVER_ERROR,
        _ => LOAD_FAILED,
    }
}

/// Status for a rendered envelope.
///
/// `first_visible` is the first departure left after filtering.
pub fn envelope_status(
    envelope: &ResponseEnvelope,
    first_visible: Option<&Departure>,
    helsinki_only: bool,
    now: DateTime<Utc>,
) -> String {
    if envelope.station().is_none() {
        return envelope.message().unwrap_or(NO_STATIONS).to_string();
    }

    let Some(next) = first_visible else {
        let text = if helsinki_only {
            NO_UPCOMING_HELSINKI
        } else {
            NO_UPCOMING
        };
        return text.to_string();
    };

    next_departure_status(next, now)
}

/// `"Next K in 2m • Helsinki • Track 3"`, skipping absent parts.
pub fn next_departure_status(next: &Departure, now: DateTime<Utc>) -> String {
    let line = next.line.as_deref().unwrap_or("train");
    let mut status = format!("Next {line} in {}", format_relative(next.departure_time, now));
    if let Some(destination) = &next.destination {
        status.push_str(" • ");
        status.push_str(destination);
    }
    if let Some(track) = &next.track {
        status.push_str(" • Track ");
        status.push_str(track);
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Station;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn station(departures: Vec<Departure>) -> ResponseEnvelope {
        ResponseEnvelope::Station(Station {
            stop_name: "Tikkurila".into(),
            distance_meters: 120.0,
            departures,
        })
    }

    #[test]
    fn full_next_status() {
        let dep = Departure::new(now() + Duration::seconds(120))
            .with_line("K")
            .with_destination("Helsinki")
            .with_track("3");
        assert_eq!(
            next_departure_status(&dep, now()),
            "Next K in 2m • Helsinki • Track 3"
        );
    }

    #[test]
    fn absent_parts_are_skipped() {
        let dep = Departure::new(now() - Duration::seconds(10));
        assert_eq!(next_departure_status(&dep, now()), "Next train in Now");

        let dep = Departure::new(now() + Duration::minutes(7)).with_track("2");
        assert_eq!(next_departure_status(&dep, now()), "Next train in 7m • Track 2");
    }

    #[test]
    fn envelope_without_station() {
        let envelope = ResponseEnvelope::Message("No stations within 5 km".into());
        assert_eq!(
            envelope_status(&envelope, None, false, now()),
            "No stations within 5 km"
        );

        let envelope = ResponseEnvelope::Error("boom".into());
        assert_eq!(envelope_status(&envelope, None, false, now()), NO_STATIONS);
    }

    #[test]
    fn empty_departures_respect_filter() {
        let envelope = station(vec![]);
        assert_eq!(envelope_status(&envelope, None, false, now()), NO_UPCOMING);
        assert_eq!(
            envelope_status(&envelope, None, true, now()),
            NO_UPCOMING_HELSINKI
        );
    }

    #[test]
    fn location_errors_have_distinct_text() {
        let all = [
            LocationError::Unsupported,
            LocationError::PermissionDenied,
            LocationError::Unavailable,
            LocationError::Timeout,
            LocationError::Unknown(0),
        ];
        let texts: std::collections::HashSet<_> =
            all.iter().map(location_error_status).collect();
        assert_eq!(texts.len(), all.len());
        assert_eq!(location_error_status(&LocationError::Unknown(99)), LOCATION_FAILED);
    }

    #[test]
    fn client_error_mapping() {
        let err = ClientError::RequestFailed {
            status: 400,
            message: "Invalid lat/lon".into(),
        };
        assert_eq!(client_error_status(&err), INVALID_COORDINATES);

        let err = ClientError::Server {
            status: 503,
            message: "Temporary server error. Please try again.".into(),
        };
        assert_eq!(client_error_status(&err), TEMPORARY_SERVER_ERROR);

        let err = ClientError::Server {
            status: 500,
            message: "Request failed".into(),
        };
        assert_eq!(client_error_status(&err), LOAD_FAILED);

        let err = ClientError::Network("connection refused".into());
        assert_eq!(client_error_status(&err), LOAD_FAILED);

        let err = ClientError::MalformedBody {
            message: "expected value".into(),
        };
        assert_eq!(client_error_status(&err), LOAD_FAILED);
    }
}
