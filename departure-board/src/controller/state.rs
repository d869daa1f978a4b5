//! Refresh state and the jobs that move it forward.

use chrono::{DateTime, Utc};

use crate::client::{ClientError, DepartureSource};
use crate::domain::{Coordinates, ResponseEnvelope};
use crate::location::{LocationError, LocationProvider, PositionSensor};

/// Where the board is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the position sensor
    AcquiringLocation,
    /// Waiting for the departures endpoint
    Loading,
    /// Showing a snapshot
    Rendered,
    /// Showing a failure status
    Error,
}

/// Everything the controller remembers between triggers.
///
/// Owned by one controller, never shared and never persisted.
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    /// A location or fetch job is in flight
    pub is_loading: bool,
    pub current_coordinates: Option<Coordinates>,
    /// Last successful response; cleared on any failure
    pub latest_response: Option<ResponseEnvelope>,
    pub helsinki_only: bool,
    pub permission_required: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub phase: Phase,
}

/// A suspended step of a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Job {
    /// Ask the position sensor for coordinates
    Locate,
    /// Fetch a snapshot for known coordinates
    Fetch(Coordinates),
}

/// What a [`Job`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Located(Result<Coordinates, LocationError>),
    Fetched(Result<ResponseEnvelope, ClientError>),
}

/// The controller's external collaborators.
///
/// Kept apart from the controller so a job can borrow them while the
/// controller keeps handling triggers.
#[derive(Debug, Clone)]
pub struct Services<D, P> {
    pub source: D,
    pub location: LocationProvider<P>,
}

impl<D: DepartureSource, P: PositionSensor> Services<D, P> {
    /// Bundle a departure source and a location provider.
    pub fn new(source: D, location: LocationProvider<P>) -> Self {
        Self { source, location }
    }

    /// Perform a job.
    pub async fn run(&self, job: Job) -> Outcome {
        match job {
            Job::Locate => Outcome::Located(self.location.locate().await),
            Job::Fetch(coordinates) => {
                Outcome::Fetched(self.source.fetch_snapshot(&coordinates).await)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let state = RefreshState::default();

        assert!(!state.is_loading);
        assert!(!state.helsinki_only);
        assert!(state.current_coordinates.is_none());
        assert!(state.latest_response.is_none());
        assert_eq!(state.phase, Phase::Idle);
    }
}
