//! Error types for serve configuration requests.

use thiserror::Error;

use crate::identity::IdentityError;
use crate::store::StoreError;

/// Errors that abort a serve request.
///
/// Input validation variants are always returned before the store is touched.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Port is zero, non-numeric, or does not fit in 16 bits.
    #[error("invalid port {0:?}")]
    InvalidPort(String),

    /// Proxy target could not be parsed as a URL.
    #[error("invalid proxy target {target:?}: {source}")]
    InvalidUrl {
        target: String,
        #[source]
        source: url::ParseError,
    },

    /// Proxy target scheme is not http, https or https+insecure.
    #[error("unsupported scheme {0:?}: must be a URL starting with http://, https://, or https+insecure://")]
    UnsupportedScheme(String),

    /// Proxy target does not point at this machine.
    #[error("proxy host {0:?} not allowed: only localhost or 127.0.0.1 proxies are supported")]
    NonLoopbackHost(String),

    /// Mount point is not a valid URL path.
    #[error("invalid mount point {mount:?}: {reason}")]
    InvalidMountPoint { mount: String, reason: String },

    /// Path handler target could not be inspected.
    #[error("invalid path {path:?}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Raw configuration input is not a valid serve config document.
    #[error("invalid JSON: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    /// Reading or writing the config store failed.
    #[error("{step} serve config: {source}")]
    Store {
        step: StoreStep,
        #[source]
        source: StoreError,
    },

    /// Resolving this node's name failed.
    #[error("getting self DNS name: {0}")]
    Identity(#[from] IdentityError),

    /// Reading raw input failed.
    #[error("reading input: {0}")]
    Io(#[from] std::io::Error),
}

/// Which store call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStep {
    Get,
    Set,
}

impl std::fmt::Display for StoreStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreStep::Get => write!(f, "getting"),
            StoreStep::Set => write!(f, "setting"),
        }
    }
}

/// Result type for serve requests.
pub type ServeResult<T> = Result<T, ServeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_argument() {
        assert_eq!(
            ServeError::NonLoopbackHost("somehost".into()).to_string(),
            "proxy host \"somehost\" not allowed: only localhost or 127.0.0.1 proxies are supported"
        );
        assert_eq!(ServeError::InvalidPort("70000".into()).to_string(), "invalid port \"70000\"");

        let err = ServeError::Store {
            step: StoreStep::Set,
            source: StoreError::Status {
                status: 500,
                body: "disk full".into(),
            },
        };
        assert!(err.to_string().starts_with("setting serve config: "));
        assert!(err.to_string().contains("disk full"));
    }
}
