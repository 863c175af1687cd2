//! Serve config storage backends.
//!
//! # Responsibilities
//! - Read the current document (absent means "no config yet")
//! - Replace the document with a complete new one
//!
//! # Design Decisions
//! - No locking or compare-and-swap: the backing store decides what
//!   concurrent writers see (last writer wins for the bundled backends)
//! - Reads and writes are whole-document

pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::serve::ServeConfig;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors from a config store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure talking to the local daemon.
    #[error("local API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Daemon answered with a non-success status.
    #[error("local API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Stored document could not be decoded.
    #[error("decoding serve config: {0}")]
    Decode(#[from] serde_json::Error),

    /// Filesystem failure for file-backed stores.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A place the serve config document lives.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the current document, `None` if none has been written.
    async fn get(&self) -> Result<Option<ServeConfig>, StoreError>;

    /// Replace the stored document.
    async fn set(&self, config: &ServeConfig) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: ConfigStore + ?Sized> ConfigStore for Arc<S> {
    async fn get(&self) -> Result<Option<ServeConfig>, StoreError> {
        (**self).get().await
    }

    async fn set(&self, config: &ServeConfig) -> Result<(), StoreError> {
        (**self).set(config).await
    }
}

#[async_trait]
impl<S: ConfigStore + ?Sized> ConfigStore for Box<S> {
    async fn get(&self) -> Result<Option<ServeConfig>, StoreError> {
        (**self).get().await
    }

    async fn set(&self, config: &ServeConfig) -> Result<(), StoreError> {
        (**self).set(config).await
    }
}
