//! Transport seam between the repository client and the network
//!
//! [`RepositoryClient`](crate::RepositoryClient) only ever sees the
//! [`Transport`] trait. [`HttpTransport`] is the blocking HTTPS
//! implementation used by the binary; tests substitute their own.

use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Header carrying the access token.
pub const AUTH_HEADER: &str = "PRIVATE-TOKEN";

/// A read-only API request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub token: SecretString,
    pub user_agent: String,
}

/// A response as delivered by a transport, before status interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    /// Response headers with lowercase names
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// A response with an arbitrary status and body.
    pub fn with_status(status: u16, status_text: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text.to_string(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header, normalizing its name to lowercase.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to perform an authenticated GET.
///
/// Implementations return `Err` only when no response was received
/// ([`Error::Transport`]); HTTP error statuses are returned as responses.
pub trait Transport {
    fn get(&self, request: &ApiRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, request: &ApiRequest) -> Result<HttpResponse> {
        (**self).get(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, request: &ApiRequest) -> Result<HttpResponse> {
        (**self).get(request)
    }
}

/// Blocking HTTPS transport backed by `reqwest`.
///
/// Connection failures and timeouts are retried with exponential backoff
/// until `retry_window` has elapsed. Responses of any status are returned
/// as-is and never retried.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    retry_window: Duration,
}

impl HttpTransport {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default total time spent retrying transient failures.
    pub const DEFAULT_RETRY_WINDOW: Duration = Duration::from_secs(10);

    /// Create a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the TLS backend cannot be
    /// initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidRequest {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            retry_window: Self::DEFAULT_RETRY_WINDOW,
        })
    }

    /// Override how long transient failures are retried.
    pub fn with_retry_window(mut self, retry_window: Duration) -> Self {
        self.retry_window = retry_window;
        self
    }

    fn send_once(&self, request: &ApiRequest) -> std::result::Result<HttpResponse, reqwest::Error> {
        let response = self
            .client
            .get(&request.url)
            .header(AUTH_HEADER, request.token.expose_secret())
            .header(reqwest::header::USER_AGENT, &request.user_agent)
            .send()?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(250))
            .with_max_elapsed_time(Some(self.retry_window))
            .build();

        let operation = || {
            self.send_once(request).map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    tracing::debug!(url = %request.url, error = %e, "Transient transport failure, retrying");
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        };

        backoff::retry(policy, operation).map_err(|e| {
            let inner = match e {
                backoff::Error::Permanent(err) => err,
                backoff::Error::Transient { err, .. } => err,
            };
            Error::transport(&request.url, inner)
        })
    }
}
