//! HTTP-based `ProximityProvider` backed by an Overpass interpreter.
//!
//! This module provides [`HttpOverpassProvider`], an implementation of the
//! [`ProximityProvider`] trait that posts an [`OverpassQuery`] to an Overpass
//! API endpoint and reports whether any element came back.
//!
//! # Architecture
//!
//! The [`ProximityProvider`] trait is synchronous so the scorer can be called
//! from plain threads or task workers. This provider bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use sahasi_core::{ProximityError, ProximityProvider, ProximityRequest};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::query::OverpassQuery;
use super::response::InterpreterResponse;

/// Error type for [`HttpOverpassProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Public Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "sahasi-safety/0.1";

/// Default request timeout in seconds, also sent as the server-side limit.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for [`HttpOverpassProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassConfig {
    /// Interpreter URL (e.g., `"https://overpass-api.de/api/interpreter"`).
    pub endpoint: String,
    /// Client-side request timeout; also rendered into the query.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OverpassConfig {
    /// Create a new configuration with the given interpreter URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP proximity provider using the Overpass API.
///
/// This provider implements the synchronous [`ProximityProvider`] trait by
/// internally blocking on asynchronous HTTP requests. It owns a Tokio runtime
/// that is reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider uses its own stored runtime. Inside
/// a multi-threaded runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]) it uses that runtime's handle with
/// [`tokio::task::block_in_place`] so a slow interpreter only parks the
/// calling worker. Tokio refuses to nest `block_on` inside a `current_thread`
/// runtime, so from there the request runs on the stored runtime in a scoped
/// helper thread while the caller's thread waits for it.
///
/// Every request is bounded by [`OverpassConfig::timeout`]; a stalled
/// interpreter surfaces as [`ProximityError::Timeout`]. The stored runtime is
/// shut down in the background on drop, so the provider may be dropped from
/// async code.
pub struct HttpOverpassProvider {
    client: Client,
    config: OverpassConfig,
    runtime: Option<Runtime>,
}

impl std::fmt::Debug for HttpOverpassProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOverpassProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpOverpassProvider {
    /// Create a provider for `endpoint` with default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OverpassConfig::new(endpoint))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime: Some(runtime),
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Post the query and decode the interpreter's answer.
    async fn query_async(&self, query: OverpassQuery) -> Result<bool, ProximityError> {
        let url = self.config.endpoint.as_str();

        let response = self
            .client
            .post(url)
            .form(&query.form_fields())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        let body: InterpreterResponse = response
            .json()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        Self::convert_response(&body)
    }

    /// Block on the stored runtime from a thread outside any runtime.
    fn block_on_owned(&self, query: OverpassQuery) -> Result<bool, ProximityError> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| self.bridge_error("provider runtime has shut down"))?;
        runtime.block_on(self.query_async(query))
    }

    /// Run the request on a helper thread so the stored runtime is never
    /// entered from inside another runtime.
    fn block_on_helper_thread(&self, query: OverpassQuery) -> Result<bool, ProximityError> {
        std::thread::scope(|scope| {
            scope
                .spawn(|| self.block_on_owned(query))
                .join()
                .unwrap_or_else(|_| Err(self.bridge_error("request thread panicked")))
        })
    }

    fn bridge_error(&self, message: &str) -> ProximityError {
        ProximityError::NetworkError {
            url: self.config.endpoint.clone(),
            message: message.to_owned(),
        }
    }

    /// Convert a reqwest error to a `ProximityError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> ProximityError {
        if error.is_timeout() {
            return ProximityError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProximityError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return ProximityError::ParseError {
                message: error.to_string(),
            };
        }

        ProximityError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Convert an interpreter response to a presence answer.
    fn convert_response(response: &InterpreterResponse) -> Result<bool, ProximityError> {
        if let Some(remark) = response.runtime_error() {
            return Err(ProximityError::ServiceError {
                message: remark.to_owned(),
            });
        }
        Ok(response.has_elements())
    }
}

impl ProximityProvider for HttpOverpassProvider {
    /// Ask the interpreter whether any category matches near the coordinate.
    ///
    /// # Runtime requirements
    ///
    /// Callable from plain threads and from any Tokio runtime flavour. From a
    /// `current_thread` runtime the call blocks that runtime's only thread
    /// until the request completes or times out, so other tasks on it stall
    /// for that long.
    fn any_poi_within(&self, request: &ProximityRequest<'_>) -> Result<bool, ProximityError> {
        let query = OverpassQuery::build(request, self.config.timeout);
        debug!(
            "querying Overpass at {} within {} of {}",
            self.config.endpoint, request.radius, request.coordinate
        );

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.query_async(query)))
            }
            Ok(_) => self.block_on_helper_thread(query),
            Err(_) => self.block_on_owned(query),
        }
    }
}

impl Drop for HttpOverpassProvider {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
