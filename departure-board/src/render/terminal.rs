//! Plain-text departure board for a terminal.

use std::io::{self, Write};

use askama::Template;
use chrono::{DateTime, Utc};
use crossterm::style::Print;
use crossterm::{ExecutableCommand, QueueableCommand, cursor, terminal};
use tracing::warn;

use crate::domain::{Urgency, format_clock};

use super::align::{ColumnAligner, RowMeasure};
use super::{BoardView, DepartureRow, NO_MORE_DEPARTURES, RenderSink, StationSummary};

/// Default viewport width in terminal cells.
pub const DEFAULT_WIDTH: usize = 80;

/// Urgency marker, a space, the line cell and a space.
const PREFIX_WIDTH: usize = 1 + 1 + LINE_WIDTH + 1;

/// Width of the line cell.
const LINE_WIDTH: usize = 5;

/// Space between the label and the time indicator.
const COLUMN_GAP: usize = 2;

/// Whole board, laid out as text lines.
#[derive(Template)]
#[template(path = "board.txt")]
struct BoardTemplate<'a> {
    header: &'a str,
    permission_required: bool,
    lines: Vec<String>,
    status: &'a str,
    footer: &'a str,
}

#[derive(Debug, Clone)]
struct LayoutRow {
    marker: char,
    line: String,
    label: String,
    time: String,
    label_width: Option<usize>,
}

/// The row table of the terminal board, measured in cells.
#[derive(Debug, Clone, Default)]
pub struct TableLayout {
    rows: Vec<LayoutRow>,
    viewport: usize,
    time_width: usize,
}

impl TableLayout {
    /// Lay out rows for a viewport width.
    pub fn new(rows: &[DepartureRow], viewport: usize) -> Self {
        let rows: Vec<LayoutRow> = rows
            .iter()
            .map(|row| LayoutRow {
                marker: urgency_marker(row.urgency),
                line: row.line.clone(),
                label: row_label(row),
                time: time_cell(row),
                label_width: None,
            })
            .collect();
        let time_width = rows.iter().map(|r| cells(&r.time)).max().unwrap_or(0);

        Self {
            rows,
            viewport,
            time_width,
        }
    }

    /// Change the viewport width. Forced label widths are kept until the
    /// next alignment pass.
    pub fn set_viewport(&mut self, viewport: usize) {
        self.viewport = viewport;
    }

    /// Label width currently forced on a row, if any.
    pub fn label_width(&self, row: usize) -> Option<usize> {
        self.rows.get(row).and_then(|r| r.label_width)
    }

    /// Render every row as a line of text.
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                let label = match row.label_width {
                    Some(width) => fit(&row.label, width),
                    None => row.label.clone(),
                };
                format!(
                    "{} {:<line_w$} {}{:gap$}{:>time_w$}",
                    row.marker,
                    row.line,
                    label,
                    "",
                    row.time,
                    line_w = LINE_WIDTH,
                    gap = COLUMN_GAP,
                    time_w = self.time_width,
                )
            })
            .collect()
    }
}

impl RowMeasure for TableLayout {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn reset_label_width(&mut self, row: usize) {
        self.rows[row].label_width = None;
    }

    fn natural_label_width(&self, row: usize) -> usize {
        cells(&self.rows[row].label)
    }

    fn content_width(&self, _row: usize) -> usize {
        self.viewport.saturating_sub(PREFIX_WIDTH)
    }

    fn time_width(&self, _row: usize) -> usize {
        self.time_width
    }

    fn column_gap(&self) -> usize {
        COLUMN_GAP
    }

    fn set_label_width(&mut self, row: usize, width: usize) {
        self.rows[row].label_width = Some(width);
    }
}

/// Departure board written to a terminal (or any writer).
///
/// Changes are buffered; nothing is written until [`RenderSink::present`].
pub struct TerminalSink<W: Write> {
    out: W,
    clear_screen: bool,
    viewport: usize,
    clock: Option<DateTime<Utc>>,
    status: String,
    permission_required: bool,
    last_updated: Option<DateTime<Utc>>,
    helsinki_only: bool,
    station: Option<StationSummary>,
    next: Option<DepartureRow>,
    table: TableLayout,
    aligner: ColumnAligner,
    dirty: bool,
}

impl<W: Write> TerminalSink<W> {
    /// Create a sink writing to `out`.
    pub fn new(out: W, viewport: usize) -> Self {
        Self {
            out,
            clear_screen: false,
            viewport,
            clock: None,
            status: String::new(),
            permission_required: false,
            last_updated: None,
            helsinki_only: false,
            station: None,
            next: None,
            table: TableLayout::default(),
            aligner: ColumnAligner::new(),
            dirty: true,
        }
    }

    /// Repaint the whole screen from the top-left corner on each paint,
    /// for a terminal in raw mode.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// The underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Table as currently laid out.
    pub fn table(&self) -> &TableLayout {
        &self.table
    }

    /// Compose the board text without writing it.
    pub fn compose(&self) -> Result<String, askama::Error> {
        let header = self.header();
        let footer = self.footer();
        let lines = self.body_lines();

        BoardTemplate {
            header: &header,
            permission_required: self.permission_required,
            lines,
            status: &self.status,
            footer: &footer,
        }
        .render()
    }

    fn header(&self) -> String {
        let clock = self.clock.map(format_clock).unwrap_or_else(|| "--:--".into());
        let filter = if self.helsinki_only {
            " · Helsinki only"
        } else {
            ""
        };
        format!("{clock}  Commuter departures{filter}")
    }

    fn footer(&self) -> String {
        let updated = match self.last_updated {
            Some(at) => format!("Updated {}", format_clock(at)),
            None => "Not updated yet".to_string(),
        };
        format!("{updated}  [h] Helsinki only  [r] refresh  [q] quit")
    }

    fn body_lines(&self) -> Vec<String> {
        let Some(station) = &self.station else {
            return Vec::new();
        };

        let mut lines = vec![String::new(), station_line(station)];
        if let Some(next) = &self.next {
            lines.push(next_line(next));
        }
        lines.push(String::new());

        if self.table.row_count() == 0 {
            lines.push(NO_MORE_DEPARTURES.to_string());
        } else {
            lines.extend(self.table.lines());
        }
        lines
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render_board(&mut self, board: &BoardView) {
        self.station = Some(board.station.clone());
        self.next = board.next.clone();
        self.helsinki_only = board.helsinki_only;
        self.table = TableLayout::new(&board.rows, self.viewport);
        self.aligner.schedule();
        self.dirty = true;
    }

    fn hide_results(&mut self) {
        self.station = None;
        self.next = None;
        self.table = TableLayout::default();
        self.dirty = true;
    }

    fn set_status(&mut self, status: &str) {
        if self.status != status {
            self.status = status.to_string();
            self.dirty = true;
        }
    }

    fn set_permission_required(&mut self, required: bool) {
        if self.permission_required != required {
            self.permission_required = required;
            self.dirty = true;
        }
    }

    fn set_last_updated(&mut self, at: DateTime<Utc>) {
        self.last_updated = Some(at);
        self.dirty = true;
    }

    fn set_helsinki_only(&mut self, on: bool) {
        if self.helsinki_only != on {
            self.helsinki_only = on;
            self.dirty = true;
        }
    }

    fn set_clock(&mut self, now: DateTime<Utc>) {
        self.clock = Some(now);
        self.dirty = true;
    }

    fn resize(&mut self, width: usize) {
        self.viewport = width;
        self.table.set_viewport(width);
        self.aligner.schedule();
        self.dirty = true;
    }

    fn present(&mut self) {
        if !self.dirty {
            return;
        }
        self.aligner.run_if_scheduled(&mut self.table);

        let text = match self.compose() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to render board");
                return;
            }
        };

        let written = if self.clear_screen {
            paint_screen(&mut self.out, &text)
        } else {
            writeln!(self.out, "{text}")
        };
        if let Err(e) = written.and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to write board");
            return;
        }
        self.dirty = false;
    }
}

/// Clear the screen and draw `text` line by line. Raw mode does not turn
/// `\n` into a carriage return, so every line starts with a cursor move.
fn paint_screen<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?
        .queue(terminal::Clear(terminal::ClearType::All))?;
    for line in text.lines() {
        out.queue(Print(line))?.queue(cursor::MoveToNextLine(1))?;
    }
    Ok(())
}

/// Raw mode on an alternate screen, restored on drop.
///
/// Keys reach the board one at a time without Enter, and the user's
/// scrollback is left untouched.
pub struct RawTerminal {
    stdout: io::Stdout,
}

impl RawTerminal {
    /// Switch the terminal into board mode.
    pub fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout
            .execute(terminal::EnterAlternateScreen)?
            .execute(cursor::Hide)?;
        Ok(Self { stdout })
    }

    /// Current terminal width in cells, if it can be read.
    pub fn width() -> Option<usize> {
        terminal::size().ok().map(|(cols, _rows)| usize::from(cols))
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

fn urgency_marker(urgency: Urgency) -> char {
    match urgency {
        Urgency::Now => '●',
        Urgency::Soon => '◐',
        Urgency::Later => '○',
    }
}

fn row_label(row: &DepartureRow) -> String {
    let destination = row.destination.as_deref().unwrap_or("—");
    match &row.track {
        Some(track) => format!("{destination} · Track {track}"),
        None => destination.to_string(),
    }
}

fn time_cell(row: &DepartureRow) -> String {
    format!("{:>4} {}", row.relative, row.clock)
}

fn station_line(station: &StationSummary) -> String {
    let distance = if station.distance_meters >= 1000.0 {
        format!("{:.1} km", station.distance_meters / 1000.0)
    } else {
        format!("{:.0} m", station.distance_meters)
    };
    format!("{} ({distance} away)", station.name)
}

fn next_line(next: &DepartureRow) -> String {
    let mut line = format!("Next: {} in {} ({})", next.line, next.relative, next.clock);
    if let Some(destination) = &next.destination {
        line.push_str(&format!(" → {destination}"));
    }
    if let Some(track) = &next.track {
        line.push_str(&format!(", track {track}"));
    }
    line
}

/// Width of a string in terminal cells, one per char.
fn cells(s: &str) -> usize {
    s.chars().count()
}

/// Pad or truncate to exactly `width` cells.
fn fit(s: &str, width: usize) -> String {
    let len = cells(s);
    if len <= width {
        return format!("{s:<width$}");
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}
