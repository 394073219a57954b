//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use es_ccs_proxy::config::ProxyConfig;
use es_ccs_proxy::correlation::AsyncSearchRegistry;
use es_ccs_proxy::http::HttpServer;
use es_ccs_proxy::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    /// Raw path and query, exactly as received on the wire.
    pub uri: String,
    pub host: Option<String>,
    pub authorization: Option<String>,
    pub accept_encoding: Option<String>,
}

type Responder = Arc<dyn Fn(&SeenRequest) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    responder: Responder,
    headers: &'static [(&'static str, &'static str)],
}

/// A backend that records every request and answers via a closure.
pub struct MockBackend {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> SeenRequest {
        self.requests().pop().expect("backend received no requests")
    }
}

/// Start a mock backend returning a fixed JSON body.
pub async fn start_mock_backend(body: &'static str) -> MockBackend {
    start_programmable_backend(move |_| (200, body.to_string())).await
}

/// Start a mock backend whose responses are computed per request.
pub async fn start_programmable_backend<F>(f: F) -> MockBackend
where
    F: Fn(&SeenRequest) -> (u16, String) + Send + Sync + 'static,
{
    start_backend_with_headers(&[], f).await
}

/// Like [`start_programmable_backend`], adding fixed headers to every response.
pub async fn start_backend_with_headers<F>(
    headers: &'static [(&'static str, &'static str)],
    f: F,
) -> MockBackend
where
    F: Fn(&SeenRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        seen: seen.clone(),
        responder: Arc::new(f),
        headers,
    };
    let app = Router::new().fallback(record).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, seen }
}

async fn record(State(state): State<MockState>, request: Request<Body>) -> Response {
    let header_value = |name: header::HeaderName| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let seen = SeenRequest {
        method: request.method().to_string(),
        uri: request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        host: header_value(header::HOST),
        authorization: header_value(header::AUTHORIZATION),
        accept_encoding: header_value(header::ACCEPT_ENCODING),
    };

    let (status, body) = (state.responder)(&seen);
    state.seen.lock().unwrap().push(seen);

    let mut response = (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response();
    for (name, value) in state.headers {
        response
            .headers_mut()
            .insert(*name, header::HeaderValue::from_static(*value));
    }
    response
}

/// A running proxy under test.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub registry: AsyncSearchRegistry,
    pub shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait until `id` has been captured from a submit response.
    pub async fn wait_for_id(&self, id: &str) {
        for _ in 0..100 {
            if self.registry.contains(id) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("async search id {id} was never recorded");
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let registry = AsyncSearchRegistry::new();
    let server = HttpServer::with_registry(config, registry.clone()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestProxy {
        addr,
        registry,
        shutdown,
    }
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
