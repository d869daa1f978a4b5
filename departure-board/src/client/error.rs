//! Departure client error types.

/// A request that produced no HTTP response at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Errors from fetching a departure snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// No response obtained (connection refused, DNS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Server returned a 5xx status on the final attempt
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Server rejected the request (4xx, or an error body on success)
    #[error("request failed {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// Response body could not be decoded
    #[error("malformed response: {message}")]
    MalformedBody { message: String },

    /// HTTP client could not be constructed
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl ClientError {
    /// The server-provided error text, if the server answered with one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } | ClientError::RequestFailed { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Network(err.0)
    }
}
