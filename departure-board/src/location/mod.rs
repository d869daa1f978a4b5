//! Position acquisition.
//!
//! Wraps the host's position capability as a single async call that
//! resolves to coordinates or a classified failure.

mod error;
mod fixed;
mod provider;

pub use error::{LocationError, PERMISSION_DENIED, POSITION_UNAVAILABLE, TIMEOUT};
pub use fixed::FixedSensor;
pub use provider::{LocationProvider, PositionOptions, PositionSensor};
