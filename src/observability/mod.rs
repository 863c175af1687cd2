//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! serve service, stores, CLI
//!     → logging.rs (structured log events on stderr)
//! ```

pub mod logging;
