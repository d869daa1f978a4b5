//! Location acquisition errors.

/// Sensor error code: the user refused location access.
pub const PERMISSION_DENIED: u16 = 1;
/// Sensor error code: no position could be determined.
pub const POSITION_UNAVAILABLE: u16 = 2;
/// Sensor error code: the sensor gave up waiting.
pub const TIMEOUT: u16 = 3;

/// Why no position was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The host has no position sensor
    #[error("location is not supported on this host")]
    Unsupported,

    /// The user refused location access
    #[error("location permission denied")]
    PermissionDenied,

    /// The sensor could not determine a position
    #[error("position unavailable")]
    Unavailable,

    /// No position within the configured timeout
    #[error("timed out waiting for position")]
    Timeout,

    /// The sensor reported a code outside the known set
    #[error("unknown location error (code {0})")]
    Unknown(u16),
}

impl LocationError {
    /// Classify a raw sensor error code.
    pub fn from_code(code: u16) -> Self {
        match code {
            PERMISSION_DENIED => LocationError::PermissionDenied,
            POSITION_UNAVAILABLE => LocationError::Unavailable,
            TIMEOUT => LocationError::Timeout,
            other => LocationError::Unknown(other),
        }
    }
}
