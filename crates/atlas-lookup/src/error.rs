//! Caller-facing lookup errors.

use atlas_sources::SourceError;
use serde::Serialize;
use thiserror::Error;

/// Why a lookup produced no report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupError {
    /// The caller's balance is exhausted; requires a top-up
    #[error("insufficient credit")]
    InsufficientCredit,

    /// The query was well-formed but the target does not exist
    #[error("target not found")]
    TargetNotFound,

    /// Transient upstream failure; retrying is reasonable
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The request never reached the real upstream
    #[error("gateway misconfigured: the request did not reach the intended upstream")]
    GatewayMisconfigured,

    /// Anything else, message preserved for diagnostics
    #[error("lookup failed: {0}")]
    Unknown(String),
}

impl LookupError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientCredit => "INSUFFICIENT_CREDIT",
            Self::TargetNotFound => "TARGET_NOT_FOUND",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::GatewayMisconfigured => "GATEWAY_MISCONFIGURED",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Text shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InsufficientCredit => {
                "INSUFFICIENT CREDITS. Access denied. Please contact administration.".to_string()
            }
            Self::TargetNotFound => "No records found for this target.".to_string(),
            Self::UpstreamUnavailable(detail) => format!("Lookup failed: {detail}"),
            Self::GatewayMisconfigured => {
                "Connection Error: The security gateway refused the connection.".to_string()
            }
            Self::Unknown(detail) if detail.is_empty() => {
                "An error occurred during the investigation.".to_string()
            }
            Self::Unknown(detail) => detail.clone(),
        }
    }

    /// Whether re-running the lookup might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }
}

impl From<SourceError> for LookupError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound { .. } => Self::TargetNotFound,
            SourceError::GatewayMisconfigured { .. } => Self::GatewayMisconfigured,
            SourceError::Upstream { service, status, .. } => {
                Self::UpstreamUnavailable(format!("{service} responded with status {status}"))
            }
            e @ (SourceError::Timeout { .. } | SourceError::Transport { .. }) => {
                Self::UpstreamUnavailable(e.to_string())
            }
            SourceError::Rejected { message, .. } => Self::Unknown(message),
            e @ (SourceError::Parse { .. } | SourceError::Client(_)) => Self::Unknown(e.to_string()),
        }
    }
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_source_error_mapping() {
        assert_eq!(
            LookupError::from(SourceError::NotFound {
                service: "breach-index"
            }),
            LookupError::TargetNotFound
        );
        assert_eq!(
            LookupError::from(SourceError::GatewayMisconfigured {
                service: "breach-index",
                status: 404
            }),
            LookupError::GatewayMisconfigured
        );
        assert_eq!(
            LookupError::from(SourceError::Upstream {
                service: "breach-index",
                status: 503,
                message: "down".to_string()
            }),
            LookupError::UpstreamUnavailable("breach-index responded with status 503".to_string())
        );
        assert_eq!(
            LookupError::from(SourceError::Rejected {
                service: "breach-index",
                message: "Invalid type".to_string()
            }),
            LookupError::Unknown("Invalid type".to_string())
        );
    }

    #[test]
    fn test_timeout_is_upstream_unavailable() {
        let err = LookupError::from(SourceError::Timeout {
            service: "profile-identity",
            after: Duration::from_secs(15),
        });
        assert_eq!(err.code(), "UPSTREAM_UNAVAILABLE");
        assert!(err.is_transient());
    }

    #[test]
    fn test_user_messages() {
        assert!(LookupError::InsufficientCredit
            .user_message()
            .starts_with("INSUFFICIENT CREDITS"));
        assert_eq!(
            LookupError::GatewayMisconfigured.user_message(),
            "Connection Error: The security gateway refused the connection."
        );
        assert_eq!(
            LookupError::Unknown(String::new()).user_message(),
            "An error occurred during the investigation."
        );
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LookupError::UpstreamUnavailable("status 502".to_string()))
            .expect("serialize error");
        assert_eq!(json, r#"{"code":"UPSTREAM_UNAVAILABLE","detail":"status 502"}"#);

        let json = serde_json::to_string(&LookupError::TargetNotFound).expect("serialize error");
        assert_eq!(json, r#"{"code":"TARGET_NOT_FOUND"}"#);
    }
}
