//! One-shot position acquisition.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::Coordinates;

use super::error::LocationError;

/// How long a single position request may take.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters for a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Request a precise fix (GPS) rather than a coarse one
    pub high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// Oldest cached reading that may be returned; zero means always fresh
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: DEFAULT_TIMEOUT,
            maximum_age: Duration::ZERO,
        }
    }
}

/// A host capability that can report the current position.
///
/// Failures are raw sensor codes (see [`super::error`]); the provider
/// classifies them.
pub trait PositionSensor {
    /// Request the current position once.
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, u16>>;
}

/// Wraps an optional sensor with a fixed request configuration.
///
/// Each call to [`LocationProvider::locate`] resolves exactly once. There
/// is no way to cancel a request in flight.
#[derive(Debug, Clone)]
pub struct LocationProvider<S> {
    sensor: Option<S>,
    options: PositionOptions,
}

impl<S: PositionSensor> LocationProvider<S> {
    /// Create a provider around a sensor.
    pub fn new(sensor: S) -> Self {
        Self {
            sensor: Some(sensor),
            options: PositionOptions::default(),
        }
    }

    /// A provider for a host with no position sensor.
    pub fn unsupported() -> Self {
        Self {
            sensor: None,
            options: PositionOptions::default(),
        }
    }

    /// Override the request options.
    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether the host can be asked for a position at all.
    pub fn is_supported(&self) -> bool {
        self.sensor.is_some()
    }

    /// The wrapped sensor, if any.
    pub fn sensor(&self) -> Option<&S> {
        self.sensor.as_ref()
    }

    /// Request the current position.
    ///
    /// Resolves immediately with [`LocationError::Unsupported`] when there
    /// is no sensor. A sensor that outlives the timeout yields
    /// [`LocationError::Timeout`].
    pub async fn locate(&self) -> Result<Coordinates, LocationError> {
        let Some(sensor) = &self.sensor else {
            return Err(LocationError::Unsupported);
        };

        debug!(timeout = ?self.options.timeout, "requesting position");
        let request = sensor.current_position(&self.options);
        let result = match tokio::time::timeout(self.options.timeout, request).await {
            Ok(Ok(coordinates)) => Ok(coordinates),
            Ok(Err(code)) => Err(LocationError::from_code(code)),
            Err(_) => Err(LocationError::Timeout),
        };

        match &result {
            Ok(coordinates) => info!(%coordinates, "position acquired"),
            Err(e) => info!(error = %e, "position request failed"),
        }
        result
    }
}
