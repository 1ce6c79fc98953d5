//! Breach index adapter.
//!
//! One authenticated GET per lookup:
//! `{base_url}/query/{target}?type={email|username}` with an `X-API-Key`
//! header. The response envelope is `{ success, message?, result: [...] }`.

use crate::error::{Result, SourceError};
use crate::transport::{fetch, HttpRequest, HttpResponse, HttpTransport};
use atlas_core::{BreachConfig, ResolvedKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const SERVICE: &str = "breach-index";

/// Envelope message the index uses for an unknown target.
const NOT_FOUND_MARKER: &str = "Not found";

/// How the breach index should interpret the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreachKind {
    /// Email address
    Email,
    /// Username / handle
    Username,
}

impl BreachKind {
    /// Value of the `type` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }

    /// The breach kind for a resolved kind, `None` for profile ids.
    #[must_use]
    pub fn from_resolved(kind: ResolvedKind) -> Option<Self> {
        match kind {
            ResolvedKind::Email => Some(Self::Email),
            ResolvedKind::Username => Some(Self::Username),
            ResolvedKind::RobloxId => None,
        }
    }
}

impl fmt::Display for BreachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hit in a breach report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachRecord {
    /// Breach databases the record was found in
    #[serde(default)]
    pub sources: Vec<String>,
    /// Leaked username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Leaked email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Leaked plaintext password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Leaked password hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Breach date as reported by the index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl BreachRecord {
    /// Comma-joined source names, or `Unknown DB` when none are listed.
    #[must_use]
    pub fn source_label(&self) -> String {
        if self.sources.is_empty() {
            "Unknown DB".to_string()
        } else {
            self.sources.join(", ")
        }
    }
}

#[derive(Debug, Deserialize)]
struct BreachEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<Vec<BreachRecord>>,
}

/// Client for the breach index.
pub struct BreachAdapter {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl BreachAdapter {
    /// Create an adapter from the breach settings and the per-call timeout.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, config: &BreachConfig, timeout: Duration) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("No breach API key configured; the index will reject lookups");
        }

        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        }
    }

    /// Build the request for one target.
    #[must_use]
    pub fn request_for(&self, target: &str, kind: BreachKind) -> HttpRequest {
        let url = format!(
            "{}/query/{}?type={}",
            self.base_url,
            urlencoding::encode(target),
            kind.as_str()
        );

        let request = HttpRequest::get(url).header("Accept", "application/json");
        match &self.api_key {
            Some(key) => request.header("X-API-Key", key.clone()),
            None => request,
        }
    }

    /// Look up every breach record for `target`.
    ///
    /// # Errors
    /// - `GatewayMisconfigured` when an HTML page comes back instead of JSON
    /// - `Upstream` for any other non-success status
    /// - `NotFound` when the envelope carries the not-found marker
    /// - `Rejected` for any other unsuccessful envelope
    /// - `Timeout`/`Transport` when no response arrives
    pub async fn lookup(&self, target: &str, kind: BreachKind) -> Result<Vec<BreachRecord>> {
        tracing::debug!("Querying breach index by {}", kind);
        let request = self.request_for(target, kind);
        let response = fetch(self.transport.as_ref(), &request, self.timeout, SERVICE).await?;
        let records = Self::interpret(&response)?;
        tracing::debug!("Breach index returned {} records", records.len());
        Ok(records)
    }

    /// Classify a raw response into records or an error.
    fn interpret(response: &HttpResponse) -> Result<Vec<BreachRecord>> {
        if response.is_html() {
            tracing::error!(
                "Breach index returned HTML (status {}); check the gateway/proxy configuration",
                response.status
            );
            return Err(SourceError::GatewayMisconfigured {
                service: SERVICE,
                status: response.status,
            });
        }

        if !response.is_success() {
            return Err(SourceError::Upstream {
                service: SERVICE,
                status: response.status,
                message: format!("Lookup failed: API responded with {}", response.status),
            });
        }

        let envelope: BreachEnvelope = response.json().map_err(|e| SourceError::Parse {
            service: SERVICE,
            message: e.to_string(),
        })?;

        if !envelope.success {
            return match envelope.message {
                Some(msg) if msg.trim().eq_ignore_ascii_case(NOT_FOUND_MARKER) => {
                    Err(SourceError::NotFound { service: SERVICE })
                }
                Some(msg) => Err(SourceError::Rejected {
                    service: SERVICE,
                    message: msg,
                }),
                None => Err(SourceError::Rejected {
                    service: SERVICE,
                    message: "Lookup failed".to_string(),
                }),
            };
        }

        Ok(envelope.result.unwrap_or_default())
    }
}
