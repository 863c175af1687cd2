//! Serve configuration reconciliation.
//!
//! # Data Flow
//! ```text
//! caller intent (mount point, kind, argument)
//!     → target.rs / mount.rs (validate & normalize)
//!     → service.rs (read current document, resolve self name)
//!     → reconcile.rs (clone, mutate, compare)
//!         → handlers.rs (mount point overlap resolution)
//!     → Unchanged (no write) or Changed (one write to the store)
//! ```
//!
//! # Design Decisions
//! - All validation happens before the store is read
//! - Mutation happens on a private clone; the store sees only complete documents
//! - Change detection is full structural equality, not a dirty flag

pub mod handlers;
pub mod mount;
pub mod reconcile;
pub mod service;
pub mod target;
pub mod types;

pub use reconcile::Reconciled;
pub use service::{HandlerKind, Outcome, ServeService};
pub use types::{HostPort, HttpHandler, ServeConfig, TcpPortHandler, WebServerConfig};
