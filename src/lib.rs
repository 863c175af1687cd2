//! Serve configuration reconciliation library.

pub mod cli;
pub mod config;
pub mod error;
pub mod fsprobe;
pub mod identity;
pub mod local_api;
pub mod observability;
pub mod serve;
pub mod store;

pub use error::{ServeError, ServeResult};
pub use serve::{ServeConfig, ServeService};
