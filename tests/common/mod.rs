//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use serve_config::serve::{HostPort, HttpHandler, ServeConfig, TcpPortHandler};

/// Self name every test node resolves to.
pub const SELF_NAME: &str = "foo";

/// State behind the mock local API.
#[derive(Clone)]
pub struct MockDaemon {
    pub config: Arc<Mutex<Value>>,
    pub status: Arc<Mutex<Value>>,
    pub writes: Arc<AtomicUsize>,
    pub fail_writes: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockDaemon {
    pub fn stored(&self) -> Value {
        self.config.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_status(&self, status: Value) {
        *self.status.lock().unwrap() = status;
    }
}

async fn get_config(State(d): State<MockDaemon>) -> Json<Value> {
    Json(d.config.lock().unwrap().clone())
}

async fn set_config(State(d): State<MockDaemon>, Json(body): Json<Value>) -> (StatusCode, String) {
    if d.fail_writes.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "disk full".to_string());
    }
    *d.config.lock().unwrap() = body;
    d.writes.fetch_add(1, Ordering::SeqCst);
    (StatusCode::OK, String::new())
}

async fn get_status(State(d): State<MockDaemon>) -> Json<Value> {
    Json(d.status.lock().unwrap().clone())
}

/// Start a mock local API on an ephemeral port, with no serve config stored
/// and a running backend named `foo.`.
#[allow(dead_code)]
pub async fn start_mock_daemon() -> (SocketAddr, MockDaemon) {
    let daemon = MockDaemon {
        config: Arc::new(Mutex::new(Value::Null)),
        status: Arc::new(Mutex::new(serde_json::json!({
            "BackendState": "Running",
            "Self": {"DNSName": format!("{}.", SELF_NAME)}
        }))),
        writes: Arc::new(AtomicUsize::new(0)),
        fail_writes: Arc::new(AtomicBool::new(false)),
    };

    let app = Router::new()
        .route("/localapi/v0/serve-config", get(get_config).post(set_config))
        .route("/localapi/v0/status", get(get_status))
        .with_state(daemon.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, daemon)
}

/// HostPort of the test node.
#[allow(dead_code)]
pub fn self_hp() -> HostPort {
    HostPort::new(SELF_NAME, 443)
}

/// Expected document: HTTPS on 443 serving `handlers` for the test node.
#[allow(dead_code)]
pub fn web_config(handlers: &[(&str, HttpHandler)]) -> ServeConfig {
    let mut sc = ServeConfig::default();
    sc.tcp.insert(443, TcpPortHandler::Https);
    let web = sc.web.entry(self_hp()).or_default();
    for (mount, h) in handlers {
        web.handlers.insert(mount.to_string(), h.clone());
    }
    sc
}

/// Expected document: port 443 forwarded to a local TCP port.
#[allow(dead_code)]
pub fn tcp_config(port: u16, terminate_tls: Option<&str>) -> ServeConfig {
    let mut sc = ServeConfig::default();
    sc.tcp.insert(
        443,
        TcpPortHandler::TcpForward {
            target: format!("127.0.0.1:{}", port),
            terminate_tls: terminate_tls.map(str::to_string),
        },
    );
    sc
}

#[allow(dead_code)]
pub fn proxy(url: &str) -> HttpHandler {
    HttpHandler::Proxy(url.to_string())
}

#[allow(dead_code)]
pub fn path(p: &std::path::Path) -> HttpHandler {
    HttpHandler::Path(p.to_str().unwrap().to_string())
}
