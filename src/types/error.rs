//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Source Failures
//!
//! Every external market data call resolves to a [`SourceError`] tagged with a
//! [`FailureKind`]. All three kinds are recovered by substituting fallback data:
//!
//! - **CredentialMissing**: the source is not configured (expected, silent)
//! - **TransportFailure**: network error or non-2xx status (logged)
//! - **MalformedResponse**: the payload could not be interpreted (logged)
//!
//! [`PulseError`] covers everything else: configuration, client construction
//! and CLI plumbing.

use thiserror::Error;

// =============================================================================
// Failure Kinds
// =============================================================================

/// Why an external source did not produce live data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No credential configured for the source
    CredentialMissing,
    /// Network failure or non-success HTTP status
    TransportFailure,
    /// Response body could not be parsed into the expected shape
    MalformedResponse,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CredentialMissing => write!(f, "CREDENTIAL_MISSING"),
            Self::TransportFailure => write!(f, "TRANSPORT_FAILURE"),
            Self::MalformedResponse => write!(f, "MALFORMED_RESPONSE"),
        }
    }
}

impl FailureKind {
    /// Expected failures are not worth a warning in the logs
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::CredentialMissing)
    }
}

// =============================================================================
// Source Error
// =============================================================================

/// Tagged failure from one external source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub kind: FailureKind,
    /// Source that produced the error (e.g. "openai")
    pub source: &'static str,
    pub message: String,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.source, self.kind, self.message)
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    pub fn new(kind: FailureKind, source: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            source,
            message: message.into(),
        }
    }

    pub fn credential_missing(source: &'static str) -> Self {
        Self::new(
            FailureKind::CredentialMissing,
            source,
            "credential not configured",
        )
    }

    pub fn transport(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(FailureKind::TransportFailure, source, message)
    }

    pub fn malformed(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, source, message)
    }

    /// Classify a non-success HTTP status
    pub fn from_status(source: &'static str, status: u16, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::transport(source, format!("HTTP {}: {}", status, preview))
    }

    /// Classify a reqwest error; body decoding failures are malformed responses
    pub fn from_reqwest(source: &'static str, err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed(source, err.to_string())
        } else {
            Self::transport(source, err.to_string())
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum PulseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, PulseError>;

/// Outcome of one external source call
pub type SourceResult<T> = std::result::Result<T, SourceError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(
            FailureKind::CredentialMissing.to_string(),
            "CREDENTIAL_MISSING"
        );
        assert_eq!(
            FailureKind::TransportFailure.to_string(),
            "TRANSPORT_FAILURE"
        );
        assert_eq!(
            FailureKind::MalformedResponse.to_string(),
            "MALFORMED_RESPONSE"
        );
    }

    #[test]
    fn test_only_missing_credential_is_expected() {
        assert!(FailureKind::CredentialMissing.is_expected());
        assert!(!FailureKind::TransportFailure.is_expected());
        assert!(!FailureKind::MalformedResponse.is_expected());
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::transport("aviationstack", "connection refused");
        assert_eq!(
            err.to_string(),
            "[aviationstack:TRANSPORT_FAILURE] connection refused"
        );
    }

    #[test]
    fn test_from_status_truncates_body() {
        let body = "x".repeat(500);
        let err = SourceError::from_status("openai", 503, &body);
        assert_eq!(err.kind, FailureKind::TransportFailure);
        assert!(err.message.starts_with("HTTP 503: "));
        assert_eq!(err.message.len(), "HTTP 503: ".len() + 200);
    }

    #[test]
    fn test_source_error_converts_into_pulse_error() {
        let err: PulseError = SourceError::malformed("alphavantage", "bad close").into();
        assert!(matches!(err, PulseError::Source(_)));
        assert!(err.to_string().contains("MALFORMED_RESPONSE"));
    }
}
