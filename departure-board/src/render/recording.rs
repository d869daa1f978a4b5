//! Headless sink that records what the controller asked for.

use chrono::{DateTime, Utc};

use super::{BoardView, RenderSink};

/// One call made on a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Board(BoardView),
    HideResults,
    Status(String),
    PermissionRequired(bool),
    LastUpdated(DateTime<Utc>),
    HelsinkiOnly(bool),
    Clock(DateTime<Utc>),
    Resize(usize),
    Present,
}

/// Records every call and keeps the resulting screen state.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
    /// Board currently shown, `None` while results are hidden
    pub board: Option<BoardView>,
    pub status: String,
    pub permission_required: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub helsinki_only: bool,
    pub clock: Option<DateTime<Utc>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every status line published, oldest first.
    pub fn statuses(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Status(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of boards rendered.
    pub fn board_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Board(_)))
            .count()
    }

    /// Forget recorded events, keeping the screen state.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl RenderSink for RecordingSink {
    fn render_board(&mut self, board: &BoardView) {
        self.board = Some(board.clone());
        self.events.push(SinkEvent::Board(board.clone()));
    }

    fn hide_results(&mut self) {
        self.board = None;
        self.events.push(SinkEvent::HideResults);
    }

    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.events.push(SinkEvent::Status(status.to_string()));
    }

    fn set_permission_required(&mut self, required: bool) {
        self.permission_required = required;
        self.events.push(SinkEvent::PermissionRequired(required));
    }

    fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.last_updated = Some(at);
        self.events.push(SinkEvent::LastUpdated(at));
    }

    fn set_helsinki_only(&mut self, on: bool) {
        self.helsinki_only = on;
        self.events.push(SinkEvent::HelsinkiOnly(on));
    }

    fn set_clock(&mut self, now: DateTime<Utc>) {
        self.clock = Some(now);
        self.events.push(SinkEvent::Clock(now));
    }

    fn resize(&mut self, width: usize) {
        self.events.push(SinkEvent::Resize(width));
    }

    fn present(&mut self) {
        self.events.push(SinkEvent::Present);
    }
}
