//! Departure snapshot client with a single bounded retry.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{Coordinates, ResponseEnvelope};

use super::error::{ClientError, TransportError};
use super::http::{ClientConfig, HttpTransport, RawResponse, Transport};
use super::types::EnvelopeDto;

/// Message used when a failed response carries no `error` text.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Anything that can produce a departure snapshot for a position.
pub trait DepartureSource {
    /// Fetch the nearest station and its departures.
    fn fetch_snapshot(
        &self,
        coordinates: &Coordinates,
    ) -> impl Future<Output = Result<ResponseEnvelope, ClientError>>;
}

/// Departure client.
///
/// Retries exactly once, after a fixed delay, when the first attempt gets
/// no response or a 5xx. Whatever the second attempt returns is final.
#[derive(Debug, Clone)]
pub struct DepartureClient<T = HttpTransport> {
    transport: T,
    retry_delay: Duration,
}

impl DepartureClient<HttpTransport> {
    /// Create an HTTP client for the configured backend.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.retry_delay))
    }
}

impl<T: Transport> DepartureClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: T, retry_delay: Duration) -> Self {
        Self {
            transport,
            retry_delay,
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn fetch_with_retry(
        &self,
        coordinates: &Coordinates,
    ) -> Result<RawResponse, TransportError> {
        let first = self.transport.get_snapshot(coordinates).await;

        let retry = match &first {
            Err(e) => {
                warn!(error = %e, "departure request failed, retrying once");
                true
            }
            Ok(response) if response.is_server_error() => {
                warn!(status = response.status, "departure request got server error, retrying once");
                true
            }
            Ok(_) => false,
        };

        if !retry {
            return first;
        }

        tokio::time::sleep(self.retry_delay).await;
        self.transport.get_snapshot(coordinates).await
    }
}

impl<T: Transport> DepartureSource for DepartureClient<T> {
    async fn fetch_snapshot(
        &self,
        coordinates: &Coordinates,
    ) -> Result<ResponseEnvelope, ClientError> {
        let response = self.fetch_with_retry(coordinates).await?;
        debug!(status = response.status, bytes = response.body.len(), "departure response");
        decode_response(response)
    }
}

/// Turn a final HTTP exchange into an envelope or a client error.
pub fn decode_response(response: RawResponse) -> Result<ResponseEnvelope, ClientError> {
    let success = response.is_success();
    let RawResponse { status, body } = response;

    if !success {
        let message = serde_json::from_str::<EnvelopeDto>(&body)
            .ok()
            .and_then(|dto| dto.error)
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());

        return Err(if status >= 500 {
            ClientError::Server { status, message }
        } else {
            ClientError::RequestFailed { status, message }
        });
    }

    let dto: EnvelopeDto = serde_json::from_str(&body).map_err(|e| ClientError::MalformedBody {
        message: e.to_string(),
    })?;

    match dto.into_envelope() {
        Ok(ResponseEnvelope::Error(message)) => Err(ClientError::RequestFailed { status, message }),
        Ok(envelope) => Ok(envelope),
        Err(e) => Err(ClientError::MalformedBody {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport that plays back a fixed list of outcomes.
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<RawResponse, TransportError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl Transport for ScriptedTransport {
        async fn get_snapshot(
            &self,
            _coordinates: &Coordinates,
        ) -> Result<RawResponse, TransportError> {
            *self.calls.lock().unwrap() += 1;
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted outcome left")
        }
    }

    const OK_BODY: &str = r#"{"station":{"stopName":"Tikkurila","distanceMeters":120,"departures":[]}}"#;

    fn client(outcomes: Vec<Result<RawResponse, TransportError>>) -> DepartureClient<ScriptedTransport> {
        DepartureClient::with_transport(
            ScriptedTransport::new(outcomes),
            Duration::from_millis(350),
        )
    }

    fn here() -> Coordinates {
        Coordinates::new(60.2925, 25.0441)
    }

    fn unavailable() -> RawResponse {
        RawResponse::new(503, r#"{"error":"Temporary server error. Please try again."}"#)
    }

    #[tokio::test(start_paused = true)]
    async fn success_needs_one_attempt() {
        let client = client(vec![Ok(RawResponse::new(200, OK_BODY))]);

        let envelope = client.fetch_snapshot(&here()).await.unwrap();

        assert_eq!(envelope.station().unwrap().stop_name, "Tikkurila");
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn server_error_then_success() {
        let client = client(vec![Ok(unavailable()), Ok(RawResponse::new(200, OK_BODY))]);
        let started = tokio::time::Instant::now();

        let envelope = client.fetch_snapshot(&here()).await.unwrap();

        assert!(envelope.station().is_some());
        assert_eq!(client.transport().calls(), 2);
        assert!(started.elapsed() >= Duration::from_millis(350));
    }

    #[tokio::test(start_paused = true)]
    async fn two_server_errors_stop_after_second() {
        let client = client(vec![Ok(unavailable()), Ok(unavailable())]);

        let err = client.fetch_snapshot(&here()).await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Server {
                status: 503,
                message: "Temporary server error. Please try again.".into()
            }
        );
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failure_is_retried() {
        let client = client(vec![
            Err(TransportError("connection refused".into())),
            Ok(RawResponse::new(200, OK_BODY)),
        ]);

        assert!(client.fetch_snapshot(&here()).await.is_ok());
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn second_network_failure_is_final() {
        let client = client(vec![
            Err(TransportError("connection refused".into())),
            Err(TransportError("connection reset".into())),
        ]);

        let err = client.fetch_snapshot(&here()).await.unwrap_err();

        assert_eq!(err, ClientError::Network("connection reset".into()));
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn client_error_is_not_retried() {
        let client = client(vec![Ok(RawResponse::new(400, r#"{"error":"Invalid lat/lon"}"#))]);

        let err = client.fetch_snapshot(&here()).await.unwrap_err();

        assert_eq!(
            err,
            ClientError::RequestFailed {
                status: 400,
                message: "Invalid lat/lon".into()
            }
        );
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_result_is_final_even_if_client_error() {
        let client = client(vec![Ok(unavailable()), Ok(RawResponse::new(404, "not json"))]);

        let err = client.fetch_snapshot(&here()).await.unwrap_err();

        assert_eq!(
            err,
            ClientError::RequestFailed {
                status: 404,
                message: DEFAULT_FAILURE_MESSAGE.into()
            }
        );
        assert_eq!(client.transport().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn client_error_with_lost_body_is_not_retried() {
        let client = client(vec![Ok(RawResponse::new(404, ""))]);

        let err = client.fetch_snapshot(&here()).await.unwrap_err();

        assert_eq!(
            err,
            ClientError::RequestFailed {
                status: 404,
                message: DEFAULT_FAILURE_MESSAGE.into()
            }
        );
        assert_eq!(client.transport().calls(), 1);
    }

    #[test]
    fn decode_empty_success_body() {
        let err = decode_response(RawResponse::new(200, "")).unwrap_err();
        assert!(matches!(err, ClientError::MalformedBody { .. }));
    }

    #[test]
    fn decode_message_envelope() {
        let envelope =
            decode_response(RawResponse::new(200, r#"{"message":"No stations nearby"}"#)).unwrap();
        assert_eq!(envelope, ResponseEnvelope::Message("No stations nearby".into()));
    }

    #[test]
    fn decode_error_body_on_success_status() {
        let err = decode_response(RawResponse::new(200, r#"{"error":"Invalid lat/lon"}"#))
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Invalid lat/lon"));
    }

    #[test]
    fn decode_malformed_body() {
        let err = decode_response(RawResponse::new(200, "<html>")).unwrap_err();
        assert!(matches!(err, ClientError::MalformedBody { .. }));

        let err = decode_response(RawResponse::new(200, "{}")).unwrap_err();
        assert!(matches!(err, ClientError::MalformedBody { .. }));
    }
}
