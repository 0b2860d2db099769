use thiserror::Error;

/// Errors from [`crate::proximity::ProximityProvider::any_poi_within`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProximityError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was queried.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description from the HTTP client.
        message: String,
    },
    /// The request could not be sent or the connection failed.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Endpoint that was queried.
        url: String,
        /// Error description from the HTTP client.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse proximity response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
    /// The service reported an error inside an otherwise valid response.
    #[error("proximity service reported an error: {message}")]
    ServiceError {
        /// Message reported by the service.
        message: String,
    },
}
