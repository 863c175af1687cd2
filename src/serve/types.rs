//! Serve configuration document.
//!
//! This is the JSON document the local daemon persists. Field names on the
//! wire are fixed (`TCP`, `Web`, `AllowIngress`, ...) and must round-trip
//! with what the daemon already stores.
//!
//! # Design Decisions
//! - Maps are `BTreeMap` so serialized output and `Debug` are deterministic
//! - Empty maps are omitted on write and default on read: absent == empty
//! - Mutually exclusive handler fields are sum types, not optional fields

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::trim_fqdn;

/// Port that all web serving and TCP forwarding binds to.
pub const HTTPS_PORT: u16 = 443;

/// Root serve configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServeConfig {
    /// Public port → handler for that port.
    #[serde(rename = "TCP", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tcp: BTreeMap<u16, TcpPortHandler>,

    /// `host:port` → web server bound to it.
    #[serde(rename = "Web", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub web: BTreeMap<HostPort, WebServerConfig>,

    /// Bindings reachable from the public internet.
    #[serde(
        rename = "AllowIngress",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub allow_ingress: BTreeMap<HostPort, bool>,
}

impl ServeConfig {
    /// Whether public ingress is enabled for `hp`.
    pub fn ingress_allowed(&self, hp: &HostPort) -> bool {
        self.allow_ingress.get(hp).copied().unwrap_or(false)
    }

    /// Handlers mounted on `hp`, if a web server exists for it.
    pub fn handlers(&self, hp: &HostPort) -> Option<&BTreeMap<String, HttpHandler>> {
        self.web.get(hp).map(|w| &w.handlers)
    }
}

/// A node DNS name joined with a port, e.g. `foo.example.ts.net:443`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct HostPort(String);

impl HostPort {
    /// Canonical construction used for every `Web` and `AllowIngress` key.
    ///
    /// A single trailing `.` (fully-qualified form) is dropped. Names that
    /// contain `:` are bracketed like an IPv6 literal.
    pub fn new(dns_name: &str, port: u16) -> Self {
        let name = trim_fqdn(dns_name);
        if name.contains(':') {
            Self(format!("[{}]:{}", name, port))
        } else {
            Self(format!("{}:{}", name, port))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a public TCP port does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawTcpPortHandler", into = "RawTcpPortHandler")]
pub enum TcpPortHandler {
    /// Terminate TLS and serve the `Web` table for this port.
    Https,
    /// Forward the connection to `target` (`host:port`).
    TcpForward {
        target: String,
        /// When set, TLS is terminated locally using this name's certificate.
        terminate_tls: Option<String>,
    },
}

/// Wire form of [`TcpPortHandler`].
#[derive(Debug, Default, Deserialize, Serialize)]
struct RawTcpPortHandler {
    #[serde(rename = "HTTPS", default, skip_serializing_if = "is_false")]
    https: bool,
    #[serde(rename = "TCPForward", default, skip_serializing_if = "String::is_empty")]
    tcp_forward: String,
    #[serde(rename = "TerminateTLS", default, skip_serializing_if = "String::is_empty")]
    terminate_tls: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TryFrom<RawTcpPortHandler> for TcpPortHandler {
    type Error = String;

    fn try_from(raw: RawTcpPortHandler) -> Result<Self, Self::Error> {
        match (raw.https, raw.tcp_forward.is_empty()) {
            (true, true) if raw.terminate_tls.is_empty() => Ok(TcpPortHandler::Https),
            (true, true) => Err("TerminateTLS requires TCPForward".to_string()),
            (false, false) => Ok(TcpPortHandler::TcpForward {
                target: raw.tcp_forward,
                terminate_tls: Some(raw.terminate_tls).filter(|s| !s.is_empty()),
            }),
            (true, false) => Err("HTTPS and TCPForward are mutually exclusive".to_string()),
            (false, true) => Err("one of HTTPS or TCPForward must be set".to_string()),
        }
    }
}

impl From<TcpPortHandler> for RawTcpPortHandler {
    fn from(h: TcpPortHandler) -> Self {
        match h {
            TcpPortHandler::Https => RawTcpPortHandler {
                https: true,
                ..Default::default()
            },
            TcpPortHandler::TcpForward {
                target,
                terminate_tls,
            } => RawTcpPortHandler {
                https: false,
                tcp_forward: target,
                terminate_tls: terminate_tls.unwrap_or_default(),
            },
        }
    }
}

/// A web server bound to one [`HostPort`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebServerConfig {
    /// Mount point → handler. Mount points always start with one `/`.
    #[serde(rename = "Handlers", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub handlers: BTreeMap<String, HttpHandler>,
}

/// How requests under a mount point are answered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum HttpHandler {
    /// Absolute filesystem path to a file or directory.
    Path(String),
    /// Normalized base URL, e.g. `http://127.0.0.1:3000`.
    Proxy(String),
    /// Literal response body.
    Text(String),
}
