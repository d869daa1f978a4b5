//! Client for the nearest-station departures endpoint.
//!
//! `GET /api/next-trains?lat=..&lon=..` resolves the station closest to a
//! position and returns its upcoming commuter-train departures. Transient
//! failures (no response, 5xx) get exactly one retry after a short pause.

mod departures;
mod error;
mod http;
mod mock;
mod types;

pub use departures::{DEFAULT_FAILURE_MESSAGE, DepartureClient, DepartureSource, decode_response};
pub use error::{ClientError, TransportError};
pub use http::{ClientConfig, DEFAULT_BASE_URL, HttpTransport, RawResponse, Transport};
pub use mock::MockDepartureSource;
pub use types::{ConversionError, DepartureDto, EnvelopeDto, StationDto};

use crate::domain::{Coordinates, ResponseEnvelope};

/// The source selected at startup: live HTTP or a mock file.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Http(DepartureClient<HttpTransport>),
    Mock(MockDepartureSource),
}

impl DepartureSource for ConfiguredSource {
    async fn fetch_snapshot(
        &self,
        coordinates: &Coordinates,
    ) -> Result<ResponseEnvelope, ClientError> {
        match self {
            ConfiguredSource::Http(client) => client.fetch_snapshot(coordinates).await,
            ConfiguredSource::Mock(mock) => mock.fetch_snapshot(coordinates).await,
        }
    }
}
