//! Mock departure source for running the board without a backend.
//!
//! Loads one response body from a JSON file and serves it as if it were
//! a live snapshot. Useful for development and demos.

use std::path::Path;

use crate::domain::{Coordinates, ResponseEnvelope};

use super::departures::{DepartureSource, decode_response};
use super::error::ClientError;
use super::http::RawResponse;

/// Serves a fixed snapshot loaded from disk.
#[derive(Debug, Clone)]
pub struct MockDepartureSource {
    snapshot: Result<ResponseEnvelope, ClientError>,
}

impl MockDepartureSource {
    /// Load a snapshot from a JSON file in the endpoint's wire format.
    ///
    /// A file holding `{"error": ...}` makes every fetch fail with that
    /// message, which is handy for exercising the error paths.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|e| ClientError::Setup(format!(
            "failed to read mock snapshot {}: {}",
            path.display(),
            e
        )))?;

        // Validate eagerly so a broken file fails at startup.
        let snapshot = decode_response(RawResponse::new(200, body));
        if let Err(ClientError::MalformedBody { message }) = &snapshot {
            return Err(ClientError::Setup(format!(
                "invalid mock snapshot {}: {}",
                path.display(),
                message
            )));
        }

        Ok(Self { snapshot })
    }

    /// Serve an envelope directly.
    pub fn from_envelope(envelope: ResponseEnvelope) -> Self {
        Self {
            snapshot: Ok(envelope),
        }
    }
}

impl DepartureSource for MockDepartureSource {
    async fn fetch_snapshot(
        &self,
        _coordinates: &Coordinates,
    ) -> Result<ResponseEnvelope, ClientError> {
        self.snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn here() -> Coordinates {
        Coordinates::new(60.17, 24.94)
    }

    #[tokio::test]
    async fn load_bundled_snapshot() {
        let source = MockDepartureSource::from_file("data/mock_snapshot.json").unwrap();
        let envelope = source.fetch_snapshot(&here()).await.unwrap();

        let station = envelope.station().unwrap();
        assert_eq!(station.stop_name, "Tikkurila");
        assert!(!station.departures.is_empty());
    }

    #[tokio::test]
    async fn error_file_fails_every_fetch() {
        let file = write_temp(r#"{"error":"Temporary server error. Please try again."}"#);
        let source = MockDepartureSource::from_file(file.path()).unwrap();

        let err = source.fetch_snapshot(&here()).await.unwrap_err();
        assert_eq!(
            err.server_message(),
            Some("Temporary server error. Please try again.")
        );
    }

    #[test]
    fn malformed_file_is_rejected() {
        let file = write_temp("not json");
        let result = MockDepartureSource::from_file(file.path());
        assert!(matches!(result, Err(ClientError::Setup(_))));
    }

    #[test]
    fn missing_file_is_rejected() {
        let result = MockDepartureSource::from_file("data/does_not_exist.json");
        assert!(matches!(result, Err(ClientError::Setup(_))));
    }
}
