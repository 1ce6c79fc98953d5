//! Error types for the source adapters.

use std::time::Duration;
use thiserror::Error;

/// Errors an adapter can report for one source.
///
/// `service` names the sub-service that failed (e.g. `breach-index`,
/// `profile-identity`).
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source answered but the target does not exist
    #[error("target not found ({service})")]
    NotFound {
        /// Failing service
        service: &'static str,
    },

    /// The response came from something other than the intended upstream
    #[error("gateway misconfigured ({service}): received HTML with status {status}")]
    GatewayMisconfigured {
        /// Failing service
        service: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// Non-success HTTP status from the upstream
    #[error("upstream error ({service}): status {status}, {message}")]
    Upstream {
        /// Failing service
        service: &'static str,
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// The upstream answered with an unsuccessful envelope
    #[error("request rejected by {service}: {message}")]
    Rejected {
        /// Failing service
        service: &'static str,
        /// Message carried by the envelope
        message: String,
    },

    /// No response within the configured timeout
    #[error("request to {service} timed out after {after:?}")]
    Timeout {
        /// Failing service
        service: &'static str,
        /// Configured timeout
        after: Duration,
    },

    /// Connection-level failure (DNS, TLS, reset)
    #[error("transport error ({service}): {message}")]
    Transport {
        /// Failing service
        service: &'static str,
        /// Error message
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("failed to parse response from {service}: {message}")]
    Parse {
        /// Failing service
        service: &'static str,
        /// Error message
        message: String,
    },

    /// HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::Upstream {
            service: "breach-index",
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream error (breach-index): status 503, Service Unavailable"
        );

        let err = SourceError::Timeout {
            service: "profile-identity",
            after: Duration::from_secs(15),
        };
        assert_eq!(
            err.to_string(),
            "request to profile-identity timed out after 15s"
        );
    }
}
