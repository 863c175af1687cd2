//! Pure reconciliation of one serve request into a config document.
//!
//! Each operation clones the current document (or starts empty), applies the
//! change, and compares the result to the input document. Nothing here performs
//! I/O; inputs are already normalized by the caller.

use super::handlers::merge_handler;
use super::target::tcp_forward_addr;
use super::types::{HostPort, HttpHandler, ServeConfig, TcpPortHandler, HTTPS_PORT};

/// Result of applying a request to the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// The document already reflects the request; skip the write.
    Unchanged,
    /// The document to persist.
    Changed(ServeConfig),
}

impl Reconciled {
    fn diff(current: Option<&ServeConfig>, next: ServeConfig) -> Self {
        if current == Some(&next) {
            Reconciled::Unchanged
        } else {
            Reconciled::Changed(next)
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Reconciled::Changed(_))
    }

    /// The document to write, if any.
    pub fn into_changed(self) -> Option<ServeConfig> {
        match self {
            Reconciled::Unchanged => None,
            Reconciled::Changed(sc) => Some(sc),
        }
    }
}

/// Mount `handler` on this node's HTTPS web server.
///
/// Port 443 is forced to HTTPS mode; any TCP forward is replaced.
pub fn set_web_handler(
    current: Option<&ServeConfig>,
    host_port: &HostPort,
    mount_point: &str,
    handler: HttpHandler,
    is_directory: bool,
) -> Reconciled {
    let mut next = current.cloned().unwrap_or_default();

    next.tcp.clear();
    next.tcp.insert(HTTPS_PORT, TcpPortHandler::Https);

    let web = next.web.entry(host_port.clone()).or_default();
    merge_handler(&mut web.handlers, mount_point, handler, is_directory);

    Reconciled::diff(current, next)
}

/// Forward port 443 to a local TCP port, replacing the whole TCP table.
///
/// `terminate_tls` is the certificate name when TLS is terminated locally.
pub fn set_tcp_forward(
    current: Option<&ServeConfig>,
    port: u16,
    terminate_tls: Option<&str>,
) -> Reconciled {
    let mut next = current.cloned().unwrap_or_default();

    next.tcp.clear();
    next.tcp.insert(
        HTTPS_PORT,
        TcpPortHandler::TcpForward {
            target: tcp_forward_addr(port),
            terminate_tls: terminate_tls.map(str::to_string),
        },
    );

    Reconciled::diff(current, next)
}

/// Enable or disable public ingress for `host_port`.
///
/// Short-circuits before cloning when membership already matches, so a
/// missing document stays missing on `off`.
pub fn set_ingress(current: Option<&ServeConfig>, host_port: &HostPort, on: bool) -> Reconciled {
    let enabled = current.is_some_and(|sc| sc.ingress_allowed(host_port));
    if enabled == on {
        return Reconciled::Unchanged;
    }

    let mut next = current.cloned().unwrap_or_default();
    if on {
        next.allow_ingress.insert(host_port.clone(), true);
    } else {
        next.allow_ingress.remove(host_port);
    }
    Reconciled::Changed(next)
}
