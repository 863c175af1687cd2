//! JSON file backed store.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{ConfigStore, StoreError};
use crate::serve::ServeConfig;

/// Keeps the serve config as a pretty-printed JSON file.
///
/// A missing or empty file reads as "no config". Writes go to a sibling
/// temp file that is then renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "serve-config.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn get(&self) -> Result<Option<ServeConfig>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn set(&self, config: &ServeConfig) -> Result<(), StoreError> {
        let mut json = serde_json::to_vec_pretty(config)?;
        json.push(b'\n');

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = ?self.path, bytes = json.len(), "Serve config file written");
        Ok(())
    }
}
