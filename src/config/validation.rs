//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check the local API URL and store path are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ToolConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{StoreBackend, ToolConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a loaded configuration.
pub fn validate_config(config: &ToolConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.local_api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "local_api.base_url",
            format!("unsupported scheme {:?}", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("local_api.base_url", e.to_string())),
    }

    if config.local_api.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "local_api.timeout_secs",
            "must be > 0",
        ));
    }

    if config.store.backend == StoreBackend::File && config.store.path.trim().is_empty() {
        errors.push(ValidationError::new(
            "store.path",
            "required for the file backend",
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("must be one of: {:?}", LOG_LEVELS),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
