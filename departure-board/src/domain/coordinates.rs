//! Geographic position of the board's user.

use std::fmt;

/// A WGS84 position in decimal degrees.
///
/// Captured once per location acquisition and reused by later refresh
/// cycles until the process exits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create coordinates from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Query parameters for the departures endpoint.
    ///
    /// Both values are sent as plain decimal strings; range validation is
    /// left to the server, which answers with `"Invalid lat/lon"`.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("lat", self.lat.to_string()), ("lon", self.lon.to_string())]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}
