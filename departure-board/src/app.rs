//! The board's event loop.
//!
//! One task drives everything: the clock tick, the refresh tick, terminal
//! events and at most one in-flight [`Job`]. Jobs borrow only the
//! [`Services`], so the controller keeps handling triggers (and dropping
//! refreshes) while a location request or fetch is outstanding.

use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::future::LocalBoxFuture;
use futures::{FutureExt, Stream, StreamExt};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::client::DepartureSource;
use crate::config::RefreshConfig;
use crate::controller::{Clock, Job, Outcome, RefreshController, Services};
use crate::location::PositionSensor;
use crate::render::RenderSink;

/// What a terminal event asks the board to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flip the Helsinki-only filter
    ToggleHelsinki,
    /// Refresh now
    Refresh,
    /// New terminal width
    Resize(usize),
    Quit,
}

impl Command {
    /// Map a terminal event to a command. Anything else is `None`.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) => Self::from_key(key),
            Event::Resize(width, _height) => Some(Self::Resize(usize::from(*width))),
            _ => None,
        }
    }

    fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        // Raw mode swallows the interrupt signal.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(key.code, KeyCode::Char('c')).then_some(Self::Quit);
        }
        match key.code {
            KeyCode::Char('h' | 'H') => Some(Self::ToggleHelsinki),
            KeyCode::Char('r' | 'R') => Some(Self::Refresh),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Run the board until quit or the end of `events`. Returns the controller.
pub async fn run_board<S, C, D, P, E>(
    mut controller: RefreshController<S, C>,
    services: &Services<D, P>,
    mut events: E,
    config: RefreshConfig,
) -> RefreshController<S, C>
where
    S: RenderSink,
    C: Clock,
    D: DepartureSource,
    P: PositionSensor,
    E: Stream<Item = io::Result<Event>> + Unpin,
{
    let mut clock_tick = interval(config.clock_interval);
    clock_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately, which gives the initial load.
    let mut refresh_tick = interval(config.refresh_interval);
    refresh_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: Option<LocalBoxFuture<'_, Outcome>> = None;

    info!("board started");
    loop {
        let mut next_job = None;

        tokio::select! {
            _ = clock_tick.tick() => controller.tick_clock(),
            _ = refresh_tick.tick() => {
                debug!("refresh tick");
                next_job = controller.refresh_departures_only();
            }
            outcome = async {
                match in_flight.as_mut() {
                    Some(job) => job.await,
                    None => std::future::pending().await,
                }
            }, if in_flight.is_some() => {
                in_flight = None;
                next_job = controller.complete(outcome);
            }
            event = events.next() => match event {
                Some(Ok(event)) => match Command::from_event(&event) {
                    Some(Command::Quit) => break,
                    Some(command) => next_job = apply(&mut controller, command),
                    None => debug!(?event, "ignoring terminal event"),
                },
                Some(Err(error)) => {
                    warn!(%error, "terminal input failed");
                    break;
                }
                None => break,
            },
        }

        if let Some(job) = next_job {
            start(&mut in_flight, services, job);
        }
        controller.sink_mut().present();
    }
    info!("board stopped");

    controller
}

fn apply<S: RenderSink, C: Clock>(
    controller: &mut RefreshController<S, C>,
    command: Command,
) -> Option<Job> {
    match command {
        Command::ToggleHelsinki => {
            controller.toggle_helsinki_only();
            None
        }
        Command::Refresh => controller.refresh_departures_only(),
        Command::Resize(width) => {
            debug!(width, "viewport resized");
            controller.sink_mut().resize(width);
            None
        }
        Command::Quit => None,
    }
}

fn start<'a, D, P>(
    in_flight: &mut Option<LocalBoxFuture<'a, Outcome>>,
    services: &'a Services<D, P>,
    job: Job,
) where
    D: DepartureSource,
    P: PositionSensor,
{
    // The loading guard only hands out a job when none is running.
    debug_assert!(in_flight.is_none());
    debug!(?job, "starting job");
    *in_flight = Some(services.run(job).boxed_local());
}
