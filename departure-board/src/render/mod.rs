//! Rendering: the sink abstraction and its implementations.
//!
//! The controller never paints anything itself. It hands view models to a
//! [`RenderSink`], which may be a terminal, a log, or a test recorder.
//! Layout work that depends on rendered geometry (column alignment) is the
//! sink's business and happens at paint time, not while data is rendered.

mod align;
mod recording;
mod terminal;

pub use align::{ColumnAligner, RowMeasure, align_columns};
pub use recording::{RecordingSink, SinkEvent};
pub use terminal::{DEFAULT_WIDTH, RawTerminal, TableLayout, TerminalSink};

use chrono::{DateTime, Utc};

use crate::domain::Urgency;

/// Shown in place of the row list when only the "next" departure exists.
pub const NO_MORE_DEPARTURES: &str = "No additional departures.";

/// Station heading.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub name: String,
    pub distance_meters: f64,
}

/// One classified departure, ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureRow {
    pub urgency: Urgency,
    /// "Now" or "<n>m"
    pub relative: String,
    /// Absolute local "HH:MM"
    pub clock: String,
    /// Line letter, or "train" when unknown
    pub line: String,
    pub destination: Option<String>,
    pub track: Option<String>,
}

/// Everything shown for a station snapshot.
///
/// `next` is the first visible departure; `rows` are the rest, so the
/// first departure never appears twice.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub station: StationSummary,
    pub next: Option<DepartureRow>,
    pub rows: Vec<DepartureRow>,
    pub helsinki_only: bool,
}

/// An output target for the departure board.
pub trait RenderSink {
    /// Show a station snapshot, replacing any previous one.
    fn render_board(&mut self, board: &BoardView);

    /// Hide the station, the "next" summary and the row list.
    fn hide_results(&mut self);

    /// Replace the free-text status line.
    fn set_status(&mut self, status: &str);

    /// Show or hide the "location permission required" notice.
    fn set_permission_required(&mut self, required: bool);

    /// Record when data was last fetched successfully.
    fn set_last_updated(&mut self, at: DateTime<Utc>);

    /// Reflect the Helsinki-only toggle.
    fn set_helsinki_only(&mut self, on: bool);

    /// Update the wall clock display.
    fn set_clock(&mut self, now: DateTime<Utc>);

    /// The viewport changed size.
    fn resize(&mut self, _width: usize) {}

    /// A paint opportunity: flush pending changes to the output.
    fn present(&mut self) {}
}
