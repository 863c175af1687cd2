//! Resolving this node's own DNS name.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from an identity resolver.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Transport failure talking to the local daemon.
    #[error("getting client status: {0}")]
    Http(#[from] reqwest::Error),

    /// Daemon answered with a non-success status.
    #[error("local API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Status response was not the expected shape.
    #[error("decoding client status: {0}")]
    Decode(#[from] serde_json::Error),

    /// Daemon is up but not connected.
    #[error("daemon is not running (state {0:?})")]
    NotRunning(String),

    /// Status has no entry for this node.
    #[error("no self node")]
    NoSelfNode,
}

/// Source of the name used to key this node's `Web` and `AllowIngress` entries.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// This node's DNS name without a trailing `.`.
    async fn self_dns_name(&self) -> Result<String, IdentityError>;
}

#[async_trait]
impl<R: IdentityResolver + ?Sized> IdentityResolver for Arc<R> {
    async fn self_dns_name(&self) -> Result<String, IdentityError> {
        (**self).self_dns_name().await
    }
}

#[async_trait]
impl<R: IdentityResolver + ?Sized> IdentityResolver for Box<R> {
    async fn self_dns_name(&self) -> Result<String, IdentityError> {
        (**self).self_dns_name().await
    }
}

/// A fixed name, from configuration or tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    dns_name: String,
}

impl StaticIdentity {
    pub fn new(dns_name: impl Into<String>) -> Self {
        Self {
            dns_name: trim_fqdn(&dns_name.into()).to_string(),
        }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn self_dns_name(&self) -> Result<String, IdentityError> {
        Ok(self.dns_name.clone())
    }
}

/// Strip the trailing root `.` of a fully-qualified name.
pub fn trim_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}
