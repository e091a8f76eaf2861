//! Fallback Policy
//!
//! Every external call yields a `SourceResult`. [`resolve`] is the single
//! place where a failure is logged and replaced with substitute data, so the
//! services above it never fail.
//!
//! - `CredentialMissing` resolves quietly (debug log)
//! - `TransportFailure` and `MalformedResponse` resolve with a warning
//!
//! There are no retries: the first failure resolves to the fallback.

use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{FailureKind, SourceResult};

/// Data together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Live(T),
    Fallback { reason: FailureKind, value: T },
}

impl<T> Resolution<T> {
    pub fn origin(&self) -> DataOrigin {
        match self {
            Resolution::Live(_) => DataOrigin::Live,
            Resolution::Fallback { reason, .. } => DataOrigin::Fallback { reason: *reason },
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Resolution::Live(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Resolution::Live(value) | Resolution::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resolution::Live(value) | Resolution::Fallback { value, .. } => value,
        }
    }

    /// Split into value and origin
    pub fn into_parts(self) -> (T, DataOrigin) {
        let origin = self.origin();
        (self.into_value(), origin)
    }
}

/// Provenance of one dashboard collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DataOrigin {
    Live,
    Fallback {
        reason: FailureKind,
    },
    /// Nothing loaded yet
    #[default]
    Pending,
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Live => write!(f, "live"),
            DataOrigin::Fallback {
                reason: FailureKind::CredentialMissing,
            } => write!(f, "mock"),
            DataOrigin::Fallback { reason } => write!(f, "fallback ({})", reason),
            DataOrigin::Pending => write!(f, "pending"),
        }
    }
}

/// Resolve an external result, substituting `fallback()` on any failure
pub fn resolve<T, F>(what: &str, result: SourceResult<T>, fallback: F) -> Resolution<T>
where
    F: FnOnce() -> T,
{
    match result {
        Ok(value) => Resolution::Live(value),
        Err(err) => {
            if err.kind.is_expected() {
                debug!(source = err.source, "{} source not configured, using mock data", what);
            } else {
                warn!("{} unavailable, using fallback: {}", what, err);
            }
            Resolution::Fallback {
                reason: err.kind,
                value: fallback(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceError;

    #[test]
    fn test_success_is_live() {
        let resolution = resolve("insights", Ok(vec![1, 2]), Vec::new);
        assert!(resolution.is_live());
        assert_eq!(resolution.origin(), DataOrigin::Live);
        assert_eq!(resolution.into_value(), vec![1, 2]);
    }

    #[test]
    fn test_each_failure_kind_resolves_to_fallback() {
        let failures = [
            SourceError::credential_missing("openai"),
            SourceError::transport("openai", "connection reset"),
            SourceError::malformed("openai", "expected array"),
        ];

        for err in failures {
            let kind = err.kind;
            let resolution: Resolution<Vec<u8>> = resolve("insights", Err(err), || vec![9]);
            assert_eq!(resolution.value(), &vec![9]);
            assert_eq!(resolution.origin(), DataOrigin::Fallback { reason: kind });
        }
    }

    #[test]
    fn test_fallback_not_built_on_success() {
        let resolution = resolve("trends", Ok(1), || panic!("fallback must stay lazy"));
        assert_eq!(resolution.into_parts(), (1, DataOrigin::Live));
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(DataOrigin::Live.to_string(), "live");
        assert_eq!(
            DataOrigin::Fallback {
                reason: FailureKind::CredentialMissing
            }
            .to_string(),
            "mock"
        );
        assert_eq!(
            DataOrigin::Fallback {
                reason: FailureKind::TransportFailure
            }
            .to_string(),
            "fallback (TRANSPORT_FAILURE)"
        );
    }

    #[test]
    fn test_origin_serializes_with_reason() {
        let value = serde_json::to_value(DataOrigin::Fallback {
            reason: FailureKind::MalformedResponse,
        })
        .unwrap();
        assert_eq!(value["status"], "fallback");
        assert_eq!(value["reason"], "malformed_response");
    }
}
