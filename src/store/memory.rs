//! In-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ConfigStore, StoreError};
use crate::serve::ServeConfig;

/// Holds the document in process. Used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    config: Mutex<Option<ServeConfig>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing document.
    pub fn with_config(config: ServeConfig) -> Self {
        Self {
            config: Mutex::new(Some(config)),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current document without going through the trait.
    pub fn snapshot(&self) -> Option<ServeConfig> {
        self.lock().clone()
    }

    /// Drop the document, as if nothing had ever been written.
    pub fn reset(&self) {
        *self.lock() = None;
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ServeConfig>> {
        // A poisoned lock still holds a whole document.
        self.config.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self) -> Result<Option<ServeConfig>, StoreError> {
        Ok(self.snapshot())
    }

    async fn set(&self, config: &ServeConfig) -> Result<(), StoreError> {
        *self.lock() = Some(config.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_writes() {
        let store = MemoryStore::new();
        assert_eq!(store.get().await.unwrap(), None);

        store.set(&ServeConfig::default()).await.unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.snapshot(), Some(ServeConfig::default()));

        store.reset();
        assert_eq!(store.snapshot(), None);
        assert_eq!(store.writes(), 1);
    }
}
