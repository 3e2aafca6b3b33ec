//! # Parameter Store Errors
//!
//! Error taxonomy for the parameter store configuration source.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields carry the path or key that failed
//! - Backend failures keep their underlying cause as `source`
//!
//! A parameter that does not exist at a path is *not* an error: clients
//! report it as `None` so resolution can fall back to the next root.

use thiserror::Error;

/// Boxed underlying cause, as produced by transport libraries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while resolving configuration from the parameter store.
#[derive(Debug, Error)]
pub enum ParameterStoreError {
    /// Unexpected backend failure (network, auth, throttling, malformed
    /// request). Never cached, never swallowed.
    #[error("Accessing parameter store for parameter '{path}' failed")]
    RemoteStore {
        path: String,
        #[source]
        source: BoxError
    },

    #[error("Parameter store is unreachable at root '{root}'")]
    ActivationProbe {
        root: String,
        #[source]
        source: BoxError
    },

    #[error("Parameter store probe at root '{root}' timed out after {timeout_ms}ms")]
    ProbeTimeout { root: String, timeout_ms: u64 },

    #[error("Parameter not found under any root: {key}")]
    ParameterNotFound { key: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String }
}

impl ParameterStoreError {
    /// Wraps a backend failure for `path`.
    pub fn remote(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::RemoteStore {
            path: path.into(),
            source: source.into()
        }
    }

    /// True for failures raised by the one-time reachability probe.
    #[must_use]
    pub fn is_probe_failure(&self) -> bool {
        matches!(self, Self::ActivationProbe { .. } | Self::ProbeTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_remote_store_keeps_path_and_cause() {
        let err = ParameterStoreError::remote("/app/server/port", "connection reset");

        assert_eq!(
            err.to_string(),
            "Accessing parameter store for parameter '/app/server/port' failed"
        );
        assert_eq!(err.source().unwrap().to_string(), "connection reset");
        assert!(!err.is_probe_failure());
    }

    #[test]
    fn test_probe_failures() {
        let probe = ParameterStoreError::ActivationProbe {
            root: "/app".to_string(),
            source: "expired token".into()
        };
        let timeout = ParameterStoreError::ProbeTimeout {
            root: "/app".to_string(),
            timeout_ms: 250
        };

        assert!(probe.is_probe_failure());
        assert!(timeout.is_probe_failure());
        assert!(timeout.to_string().contains("250ms"));
    }

    #[test]
    fn test_converts_into_anyhow_with_chain() {
        let inner = ParameterStoreError::remote("/common/db/url", "throttled");
        let probe = ParameterStoreError::ActivationProbe {
            root: "/common".to_string(),
            source: Box::new(inner)
        };

        let err = anyhow::Error::from(probe);
        let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[2], "throttled");
    }
}
