//! End-to-end tests against a mock local daemon.

use std::sync::atomic::Ordering;
use std::time::Duration;

use serve_config::error::StoreStep;
use serve_config::fsprobe::OsFilesystem;
use serve_config::identity::{IdentityError, IdentityResolver};
use serve_config::local_api::LocalApiClient;
use serve_config::serve::{HandlerKind, Outcome, ServeConfig, ServeService};
use serve_config::store::{ConfigStore, StoreError};
use serve_config::ServeError;

mod common;

use common::{proxy, self_hp, start_mock_daemon, web_config};

fn client(addr: std::net::SocketAddr) -> LocalApiClient {
    LocalApiClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_end_to_end_from_empty() {
    let (addr, daemon) = start_mock_daemon().await;
    let api = client(addr);
    let service = ServeService::new(api.clone(), api, OsFilesystem);

    assert_eq!(service.show_config().await.unwrap(), None);

    assert_eq!(
        service.serve_web("/", HandlerKind::Proxy, "3000").await.unwrap(),
        Outcome::Written
    );
    assert_eq!(
        service
            .serve_web("/bar", HandlerKind::Proxy, "https://127.0.0.1:8443")
            .await
            .unwrap(),
        Outcome::Written
    );
    assert_eq!(
        service
            .serve_web("/bar", HandlerKind::Proxy, "https://127.0.0.1:8443")
            .await
            .unwrap(),
        Outcome::Unchanged
    );
    assert_eq!(daemon.writes(), 2);

    let want = web_config(&[
        ("/", proxy("http://127.0.0.1:3000")),
        ("/bar", proxy("https://127.0.0.1:8443")),
    ]);
    assert_eq!(daemon.stored(), serde_json::to_value(&want).unwrap());
    assert_eq!(
        daemon.stored(),
        serde_json::json!({
            "TCP": {"443": {"HTTPS": true}},
            "Web": {"foo:443": {"Handlers": {
                "/": {"Proxy": "http://127.0.0.1:3000"},
                "/bar": {"Proxy": "https://127.0.0.1:8443"}
            }}}
        })
    );
    assert_eq!(service.show_config().await.unwrap(), Some(want));
}

#[tokio::test]
async fn test_ingress_uses_trimmed_self_name() {
    let (addr, daemon) = start_mock_daemon().await;
    let api = client(addr);
    assert_eq!(api.self_dns_name().await.unwrap(), "foo");

    let service = ServeService::new(api.clone(), api, OsFilesystem);
    assert_eq!(service.set_ingress(true).await.unwrap(), Outcome::Written);

    let mut want = ServeConfig::default();
    want.allow_ingress.insert(self_hp(), true);
    assert_eq!(daemon.stored(), serde_json::to_value(&want).unwrap());

    assert_eq!(service.set_ingress(false).await.unwrap(), Outcome::Written);
    assert_eq!(daemon.stored(), serde_json::json!({}));
    assert_eq!(service.set_ingress(false).await.unwrap(), Outcome::Unchanged);
}

#[tokio::test]
async fn test_identity_failures() {
    let (addr, daemon) = start_mock_daemon().await;
    let api = client(addr);

    daemon.set_status(serde_json::json!({"BackendState": "NeedsLogin"}));
    assert!(matches!(
        api.self_dns_name().await,
        Err(IdentityError::NotRunning(s)) if s == "NeedsLogin"
    ));

    daemon.set_status(serde_json::json!({"BackendState": "Running"}));
    assert!(matches!(api.self_dns_name().await, Err(IdentityError::NoSelfNode)));

    let service = ServeService::new(api.clone(), api, OsFilesystem);
    let err = service.set_ingress(true).await.unwrap_err();
    assert!(matches!(err, ServeError::Identity(IdentityError::NoSelfNode)));
    assert_eq!(daemon.writes(), 0);
}

#[tokio::test]
async fn test_write_failure_is_reported() {
    let (addr, daemon) = start_mock_daemon().await;
    daemon.fail_writes.store(true, Ordering::SeqCst);
    let api = client(addr);

    let err = api.set(&ServeConfig::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 500, ref body } if body == "disk full"));

    let service = ServeService::new(api.clone(), api, OsFilesystem);
    let err = service.serve_tcp("5432", false).await.unwrap_err();
    assert!(matches!(
        err,
        ServeError::Store {
            step: StoreStep::Set,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unreachable_daemon() {
    // Bind and drop to get a port nothing listens on.
    let addr = {
        let l = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let api = client(addr);
    let service = ServeService::new(api.clone(), api, OsFilesystem);

    let err = service.set_ingress(true).await.unwrap_err();
    assert!(matches!(
        err,
        ServeError::Store {
            step: StoreStep::Get,
            source: StoreError::Http(_)
        }
    ));
}
