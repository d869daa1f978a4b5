//! The refresh state machine.
//!
//! ```text
//! Idle ─▶ AcquiringLocation ─▶ Loading ─▶ Rendered
//!               │                  │          │
//!               ▼                  ▼          │
//!             Error ◀──────────────┘          │
//!               │                             │
//!               └────── next trigger ─────────┴─▶ Loading (coordinates known)
//!                                                 AcquiringLocation (otherwise)
//! ```
//!
//! Transitions are synchronous. Anything that has to wait (the position
//! sensor, the network) is returned as a [`Job`]; the caller runs it with
//! [`Services::run`] and feeds the [`Outcome`] back through
//! [`RefreshController::complete`]. While a job is out, `is_loading` is
//! set and every new refresh trigger is dropped.

use tracing::{debug, info};

use crate::client::{ClientError, DepartureSource};
use crate::domain::{Coordinates, ResponseEnvelope, visible_departures};
use crate::location::{LocationError, PositionSensor};
use crate::render::RenderSink;

use super::clock::Clock;
use super::state::{Job, Outcome, Phase, RefreshState, Services};
use super::status;
use super::view::build_board;

/// Drives location, fetching, filtering and rendering.
pub struct RefreshController<S, C> {
    state: RefreshState,
    sink: S,
    clock: C,
    location_supported: bool,
}

impl<S: RenderSink, C: Clock> RefreshController<S, C> {
    /// Create a controller.
    ///
    /// `location_supported` says whether the host has a position sensor
    /// at all; see [`crate::location::LocationProvider::is_supported`].
    pub fn new(sink: S, clock: C, location_supported: bool) -> Self {
        Self {
            state: RefreshState::default(),
            sink,
            clock,
            location_supported,
        }
    }

    /// Start with the Helsinki-only filter already on.
    pub fn with_helsinki_only(mut self, on: bool) -> Self {
        self.state.helsinki_only = on;
        self.sink.set_helsinki_only(on);
        self
    }

    /// Current state.
    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    /// The render sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The render sink, mutably (for paint and resize hooks).
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Acquire a position, then load departures for it.
    ///
    /// Returns the job to run, or `None` when the request was dropped or
    /// location is unsupported.
    pub fn request_location_and_load(&mut self) -> Option<Job> {
        if self.state.is_loading {
            debug!("location request dropped: cycle in flight");
            return None;
        }

        if !self.location_supported {
            self.state.phase = Phase::Error;
            self.set_permission_required(true);
            self.sink.set_status(status::LOCATION_UNSUPPORTED);
            return None;
        }

        self.state.is_loading = true;
        self.state.phase = Phase::AcquiringLocation;
        self.sink.set_status(status::LOCATING);
        Some(Job::Locate)
    }

    /// Load departures for known coordinates.
    pub fn load(&mut self, coordinates: Coordinates) -> Option<Job> {
        if self.state.is_loading {
            debug!("load dropped: cycle in flight");
            return None;
        }

        self.state.is_loading = true;
        self.state.phase = Phase::Loading;
        self.sink.set_status(status::LOADING);
        Some(Job::Fetch(coordinates))
    }

    /// Periodic refresh: reuse known coordinates, locate only the first time.
    pub fn refresh_departures_only(&mut self) -> Option<Job> {
        match self.state.current_coordinates {
            Some(coordinates) => self.load(coordinates),
            None => self.request_location_and_load(),
        }
    }

    /// Feed back the result of a job. May return a follow-up job.
    pub fn complete(&mut self, outcome: Outcome) -> Option<Job> {
        match outcome {
            Outcome::Located(result) => self.on_located(result),
            Outcome::Fetched(result) => {
                self.on_fetched(result);
                None
            }
        }
    }

    /// Flip the Helsinki-only filter and re-render the cached snapshot.
    pub fn toggle_helsinki_only(&mut self) {
        let on = !self.state.helsinki_only;
        self.set_helsinki_only(on);
    }

    /// Set the Helsinki-only filter and re-render the cached snapshot.
    ///
    /// Never fetches; with nothing cached only the toggle changes.
    pub fn set_helsinki_only(&mut self, on: bool) {
        self.state.helsinki_only = on;
        self.sink.set_helsinki_only(on);
        if self.state.latest_response.is_some() {
            self.render_latest();
        }
    }

    /// Once-per-second tick: update the clock and keep relative times
    /// current. Not subject to the loading guard.
    pub fn tick_clock(&mut self) {
        self.sink.set_clock(self.clock.now());
        if !self.state.is_loading && self.state.latest_response.is_some() {
            self.render_latest();
        }
    }

    /// Run a job and every follow-up job to completion.
    pub async fn drive<D, P>(&mut self, job: Option<Job>, services: &Services<D, P>)
    where
        D: DepartureSource,
        P: PositionSensor,
    {
        let mut job = job;
        while let Some(next) = job.take() {
            let outcome = services.run(next).await;
            job = self.complete(outcome);
        }
    }

    fn on_located(&mut self, result: Result<Coordinates, LocationError>) -> Option<Job> {
        match result {
            Ok(coordinates) => {
                info!(%coordinates, "using position");
                self.state.current_coordinates = Some(coordinates);
                self.set_permission_required(false);
                self.state.is_loading = false;
                self.load(coordinates)
            }
            Err(error) => {
                info!(%error, "location failed");
                self.state.is_loading = false;
                self.state.phase = Phase::Error;
                self.set_permission_required(error == LocationError::PermissionDenied);
                self.state.latest_response = None;
                self.sink.hide_results();
                self.sink.set_status(status::location_error_status(&error));
                None
            }
        }
    }

    fn on_fetched(&mut self, result: Result<ResponseEnvelope, ClientError>) {
        match result {
            Ok(envelope) => {
                self.state.latest_response = Some(envelope);
                self.render_latest();
                self.set_permission_required(false);
                let now = self.clock.now();
                self.state.last_updated = Some(now);
                self.sink.set_last_updated(now);
                self.state.phase = Phase::Rendered;
            }
            Err(error) => {
                info!(%error, "departure load failed");
                self.state.latest_response = None;
                self.sink.hide_results();
                self.sink.set_status(status::client_error_status(&error));
                self.state.phase = Phase::Error;
            }
        }
        self.state.is_loading = false;
    }

    /// Paint the cached response under the current filter and derive the
    /// status line from what is visible.
    fn render_latest(&mut self) {
        let Some(envelope) = &self.state.latest_response else {
            return;
        };
        let now = self.clock.now();

        let visible = match envelope.station() {
            Some(station) => {
                let visible = visible_departures(&station.departures, self.state.helsinki_only);
                let board = build_board(station, &visible, self.state.helsinki_only, now);
                self.sink.render_board(&board);
                visible
            }
            None => {
                self.sink.hide_results();
                Vec::new()
            }
        };

        let line = status::envelope_status(
            envelope,
            visible.first(),
            self.state.helsinki_only,
            now,
        );
        self.sink.set_status(&line);
    }

    fn set_permission_required(&mut self, required: bool) {
        self.state.permission_required = required;
        self.sink.set_permission_required(required);
    }
}
