//! HTTP transport seam shared by the adapters.

use crate::error::{Result, SourceError};
use async_trait::async_trait;
use atlas_core::LookupConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// A GET request as issued by an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Fully built URL including query string
    pub url: String,
    /// Extra request headers
    pub headers: Vec<(&'static str, String)>,
}

impl HttpRequest {
    /// Create a GET request for `url`.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if present
    pub content_type: Option<String>,
    /// Response body
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body is an HTML page rather than an API payload.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Connection-level failure reported by a transport.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

/// Issues HTTP requests on behalf of the adapters.
///
/// Implementations must be thread-safe (Send + Sync) so one transport can be
/// shared by both adapters.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a GET request and read the whole body.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    async fn get(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Build a standard HTTP client with the lookup timeout and user agent.
///
/// # Errors
/// Returns error if the HTTP client cannot be created.
pub fn build_http_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| SourceError::Client(e.to_string()))
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport configured from the lookup settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout(), &config.user_agent)?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Issue `request` with a per-call timeout, tagging failures with `service`.
///
/// A timeout is reported as [`SourceError::Timeout`]; the pending request is
/// dropped.
pub(crate) async fn fetch(
    transport: &dyn HttpTransport,
    request: &HttpRequest,
    timeout: Duration,
    service: &'static str,
) -> Result<HttpResponse> {
    match tokio::time::timeout(timeout, transport.get(request)).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => Err(SourceError::Transport {
            service,
            message: e.to_string(),
        }),
        Err(_) => Err(SourceError::Timeout {
            service,
            after: timeout,
        }),
    }
}
