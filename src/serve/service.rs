//! Serve request orchestration.
//!
//! # Responsibilities
//! - Validate and normalize request arguments
//! - Read the current document and resolve this node's name
//! - Run the matching reconcile operation
//! - Write the result only when it differs from what is stored
//!
//! # Design Decisions
//! - Each request is one read-modify-compare-write cycle; no state is kept
//!   between requests
//! - Concurrent writers are not arbitrated here; the store decides
//! - Collaborators are traits so tests can run without a daemon

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::mount::normalize_mount_point;
use super::reconcile::{self, Reconciled};
use super::target::{normalize_proxy_target, normalize_tcp_target, tcp_forward_addr};
use super::types::{HostPort, HttpHandler, ServeConfig, HTTPS_PORT};
use crate::error::{ServeError, ServeResult, StoreStep};
use crate::fsprobe::Filesystem;
use crate::identity::IdentityResolver;
use crate::store::ConfigStore;

/// Kind of web handler requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HandlerKind {
    /// Serve a file or directory.
    Path,
    /// Reverse proxy to a local server.
    Proxy,
    /// Respond with literal text.
    Text,
}

/// What a request did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Stored document already matched; nothing written.
    Unchanged,
    /// A new document was written.
    Written,
}

/// Applies serve requests against a store.
pub struct ServeService<S, I, F> {
    store: S,
    identity: I,
    fs: F,
}

impl<S, I, F> ServeService<S, I, F>
where
    S: ConfigStore,
    I: IdentityResolver,
    F: Filesystem,
{
    pub fn new(store: S, identity: I, fs: F) -> Self {
        Self {
            store,
            identity,
            fs,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mount a `path`, `proxy` or `text` handler at `mount_point`.
    pub async fn serve_web(
        &self,
        mount_point: &str,
        kind: HandlerKind,
        arg: &str,
    ) -> ServeResult<Outcome> {
        let mount = normalize_mount_point(mount_point)?;
        let (handler, is_dir) = self.build_handler(kind, arg)?;
        tracing::debug!(mount = %mount, ?handler, is_dir, "Web handler request normalized");

        let current = self.get().await?;
        let hp = self.self_host_port().await?;
        let result = reconcile::set_web_handler(current.as_ref(), &hp, &mount, handler, is_dir);
        self.commit(result, hp.as_str()).await
    }

    /// Forward port 443 to local TCP `port`, optionally terminating TLS.
    pub async fn serve_tcp(&self, port: &str, terminate_tls: bool) -> ServeResult<Outcome> {
        let port = normalize_tcp_target(port)?;
        tracing::debug!(port, terminate_tls, "TCP forward request normalized");

        let current = self.get().await?;
        let tls_name = if terminate_tls {
            Some(self.identity.self_dns_name().await?)
        } else {
            None
        };
        let result = reconcile::set_tcp_forward(current.as_ref(), port, tls_name.as_deref());
        self.commit(result, &tcp_forward_addr(port)).await
    }

    /// Turn public ingress for this node on or off.
    pub async fn set_ingress(&self, on: bool) -> ServeResult<Outcome> {
        let current = self.get().await?;
        let hp = self.self_host_port().await?;
        let result = reconcile::set_ingress(current.as_ref(), &hp, on);
        self.commit(result, hp.as_str()).await
    }

    /// Current document, `None` if nothing is configured.
    pub async fn show_config(&self) -> ServeResult<Option<ServeConfig>> {
        self.get().await
    }

    /// Replace the whole document with JSON read from `reader`, unmodified.
    pub async fn set_raw<R>(&self, mut reader: R) -> ServeResult<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        let config: ServeConfig = serde_json::from_slice(&buf)?;
        self.set(&config).await?;
        tracing::info!("Raw serve config written");
        Ok(())
    }

    fn build_handler(&self, kind: HandlerKind, arg: &str) -> ServeResult<(HttpHandler, bool)> {
        match kind {
            HandlerKind::Path => {
                let path = Path::new(arg);
                let invalid = |source| ServeError::InvalidPath {
                    path: arg.to_string(),
                    source,
                };
                let info = self.fs.stat(path).map_err(invalid)?;
                let abs = self.fs.absolute_path(path).map_err(invalid)?;
                let abs = abs.into_os_string().into_string().map_err(|_| {
                    invalid(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "path is not valid UTF-8",
                    ))
                })?;
                Ok((HttpHandler::Path(abs), info.is_dir))
            }
            HandlerKind::Proxy => Ok((HttpHandler::Proxy(normalize_proxy_target(arg)?), false)),
            HandlerKind::Text => Ok((HttpHandler::Text(arg.to_string()), false)),
        }
    }

    async fn self_host_port(&self) -> ServeResult<HostPort> {
        let name = self.identity.self_dns_name().await?;
        Ok(HostPort::new(&name, HTTPS_PORT))
    }

    async fn get(&self) -> ServeResult<Option<ServeConfig>> {
        self.store.get().await.map_err(|source| ServeError::Store {
            step: StoreStep::Get,
            source,
        })
    }

    async fn set(&self, config: &ServeConfig) -> ServeResult<()> {
        self.store.set(config).await.map_err(|source| ServeError::Store {
            step: StoreStep::Set,
            source,
        })
    }

    async fn commit(&self, result: Reconciled, binding: &str) -> ServeResult<Outcome> {
        match result {
            Reconciled::Unchanged => {
                tracing::debug!(binding = %binding, "Serve config unchanged, skipping write");
                Ok(Outcome::Unchanged)
            }
            Reconciled::Changed(next) => {
                self.set(&next).await?;
                tracing::info!(binding = %binding, "Serve config written");
                Ok(Outcome::Written)
            }
        }
    }
}
