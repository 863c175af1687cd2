//! HTTP client for the local control daemon.
//!
//! # Endpoints
//! ```text
//! GET  /localapi/v0/serve-config   → ServeConfig JSON, or null / empty body
//! POST /localapi/v0/serve-config   ← ServeConfig JSON
//! GET  /localapi/v0/status         → {"BackendState": "...", "Self": {"DNSName": "..."}}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::identity::{trim_fqdn, IdentityError, IdentityResolver};
use crate::serve::ServeConfig;
use crate::store::{ConfigStore, StoreError};

const SERVE_CONFIG_PATH: &str = "/localapi/v0/serve-config";
const STATUS_PATH: &str = "/localapi/v0/status";

/// Daemon status, reduced to the fields this client reads.
#[derive(Debug, Deserialize)]
pub struct Status {
    #[serde(rename = "BackendState", default)]
    pub backend_state: String,

    #[serde(rename = "Self")]
    pub self_node: Option<PeerStatus>,
}

#[derive(Debug, Deserialize)]
pub struct PeerStatus {
    #[serde(rename = "DNSName", default)]
    pub dns_name: String,
}

/// Talks to the daemon's local API. Serves as both config store and
/// identity resolver.
#[derive(Debug, Clone)]
pub struct LocalApiClient {
    client: Client,
    base_url: String,
}

impl LocalApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the daemon status.
    pub async fn status(&self) -> Result<Status, IdentityError> {
        let res = self.client.get(self.url(STATUS_PATH)).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(IdentityError::Status {
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn check_status(res: Response) -> Result<Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    Err(StoreError::Status {
        status: status.as_u16(),
        body: res.text().await.unwrap_or_default(),
    })
}

#[async_trait]
impl ConfigStore for LocalApiClient {
    async fn get(&self) -> Result<Option<ServeConfig>, StoreError> {
        let res = self.client.get(self.url(SERVE_CONFIG_PATH)).send().await?;
        let body = check_status(res).await?.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn set(&self, config: &ServeConfig) -> Result<(), StoreError> {
        let res = self
            .client
            .post(self.url(SERVE_CONFIG_PATH))
            .json(config)
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for LocalApiClient {
    async fn self_dns_name(&self) -> Result<String, IdentityError> {
        let st = self.status().await?;
        match st.backend_state.as_str() {
            "Running" | "Starting" => {}
            other => return Err(IdentityError::NotRunning(other.to_string())),
        }
        let node = st.self_node.ok_or(IdentityError::NoSelfNode)?;
        Ok(trim_fqdn(&node.dns_name).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let c = LocalApiClient::new("http://127.0.0.1:41112/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            c.url(SERVE_CONFIG_PATH),
            "http://127.0.0.1:41112/localapi/v0/serve-config"
        );
    }

    #[test]
    fn test_status_decoding() {
        let st: Status = serde_json::from_str(
            r#"{"BackendState": "Running", "Self": {"DNSName": "foo.tail.ts.net.", "ID": "n1"}}"#,
        )
        .unwrap();
        assert_eq!(st.backend_state, "Running");
        assert_eq!(st.self_node.unwrap().dns_name, "foo.tail.ts.net.");

        let st: Status = serde_json::from_str(r#"{"BackendState": "Stopped"}"#).unwrap();
        assert!(st.self_node.is_none());
    }
}
