//! reqwest-backed transport for the departures endpoint.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::domain::Coordinates;

use super::error::{ClientError, TransportError};

/// Default backend URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Path of the nearest-station departures endpoint.
const NEXT_TRAINS_PATH: &str = "/api/next-trains";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default pause before the single retry.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(350);

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Create a response from status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status indicates a server-side failure.
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// One attempt at fetching a snapshot, without retries or decoding.
///
/// This is the seam between the retry policy and the network, so the
/// policy can be exercised with scripted outcomes.
pub trait Transport {
    /// Perform a single GET for the given position.
    fn get_snapshot(
        &self,
        coordinates: &Coordinates,
    ) -> impl Future<Output = Result<RawResponse, TransportError>>;
}

/// Configuration for the departure client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (no trailing slash)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Pause before retrying a transient failure
    pub retry_delay: Duration,
}

impl ClientConfig {
    /// Create a config for the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the pause before the retry.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Full URL of the departures endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, NEXT_TRAINS_PATH)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// HTTP transport using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for the configured backend.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
        })
    }
}

impl Transport for HttpTransport {
    async fn get_snapshot(&self, coordinates: &Coordinates) -> Result<RawResponse, TransportError> {
        debug!(url = %self.endpoint, %coordinates, "requesting departures");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&coordinates.query_pairs()[..])
            .send()
            .await?;

        let status = response.status().as_u16();
        Ok(received(status, response.text().await))
    }
}

/// A response whose status arrived, whatever happened to the body.
///
/// A body that fails to read is treated as empty, so the status alone
/// decides between retrying and decoding.
fn received<E: std::fmt::Display>(status: u16, body: Result<String, E>) -> RawResponse {
    match body {
        Ok(body) => RawResponse::new(status, body),
        Err(e) => {
            warn!(status, error = %e, "failed to read response body");
            RawResponse::new(status, "")
        }
    }
}
