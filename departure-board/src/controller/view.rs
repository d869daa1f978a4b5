//! Station snapshot → board view.

use chrono::{DateTime, Utc};

use crate::domain::{Departure, Station, format_clock, format_relative, urgency_bucket};
use crate::render::{BoardView, DepartureRow, StationSummary};

/// Classify one departure for display.
pub fn departure_row(departure: &Departure, now: DateTime<Utc>) -> DepartureRow {
    DepartureRow {
        urgency: urgency_bucket(departure.departure_time, now),
        relative: format_relative(departure.departure_time, now),
        clock: format_clock(departure.departure_time),
        line: departure.line.clone().unwrap_or_else(|| "train".to_string()),
        destination: departure.destination.clone(),
        track: departure.track.clone(),
    }
}

/// Build the board for already-filtered departures.
///
/// The first visible departure becomes the "next" summary and is left
/// out of the row list.
pub fn build_board(
    station: &Station,
    visible: &[Departure],
    helsinki_only: bool,
    now: DateTime<Utc>,
) -> BoardView {
    let mut rows = visible.iter().map(|d| departure_row(d, now));
    let next = rows.next();

    BoardView {
        station: StationSummary {
            name: station.stop_name.clone(),
            distance_meters: station.distance_meters,
        },
        next,
        rows: rows.collect(),
        helsinki_only,
    }
}
