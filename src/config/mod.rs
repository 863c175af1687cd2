//! Tool configuration.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ToolConfig
//!     → CLI flag overrides (cli.rs)
//!     → store / identity construction
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the tool runs with no config file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{StoreBackend, ToolConfig};
