//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, request ID)
//! - Classify each request and pick the backend
//! - Forward requests to the backend and stream the response back
//! - Start id capture for CCS async search submits

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::correlation::{
    capture_channel, capture_search_id, check_content_encoding, report_capture_failure,
    AsyncSearchRegistry,
};
use crate::error::{ProxyError, StartupError};
use crate::http::headers::filter_hop_by_hop;
use crate::http::request::{build_outbound, request_id, MakeRequestUuidV4};
use crate::http::response::{error_response, TapBody};
use crate::observability::{logging::is_quiet, metrics};
use crate::routing::Router as ProxyRouter;
use crate::upstream::Backends;

/// Outbound client; plain HTTP or TLS depending on the backend URL scheme.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub backends: Arc<Backends>,
    pub client: UpstreamClient,
    pub quiet_paths: Arc<Vec<String>>,
}

/// HTTP server for the CCS proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        Self::with_registry(config, AsyncSearchRegistry::new())
    }

    /// Create a server that records async search ids into `registry`.
    pub fn with_registry(
        config: ProxyConfig,
        registry: AsyncSearchRegistry,
    ) -> Result<Self, StartupError> {
        let backends = Arc::new(Backends::from_config(&config)?);
        let client = build_client(&config);

        let state = AppState {
            router: Arc::new(ProxyRouter::new(registry)),
            backends,
            client,
            quiet_paths: Arc::new(config.quiet_paths),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn build_client(config: &ProxyConfig) -> UpstreamClient {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));

    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);

    Client::builder(TokioExecutor::new()).build(https)
}

/// Main proxy handler.
/// Classifies the request, picks the backend, and forwards it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    // 1. Classify
    let classification = state.router.classify(request.uri().path());
    let backend = classification.backend;

    if is_quiet(&url, &state.quiet_paths) {
        tracing::debug!(request_id = %request_id, backend = %backend, method = %method, url = %url, "Proxying request");
    } else {
        tracing::info!(request_id = %request_id, backend = %backend, method = %method, url = %url, "Proxying request");
    }
    if classification.rewritten {
        tracing::debug!(
            request_id = %request_id,
            route = %classification.kind,
            path = %classification.path,
            "Rewrote outbound path"
        );
    }

    // 2. Build outbound request
    let destination = state.backends.get(backend);
    let outbound = match build_outbound(request, &classification, destination) {
        Ok(req) => req,
        Err(e) => {
            return forward_failed(
                &request_id,
                &url,
                backend.as_str(),
                classification.kind.as_str(),
                start_time,
                e,
            )
        }
    };

    // 3. Forward
    let response = match state.client.request(outbound).await {
        Ok(response) => response,
        Err(e) => {
            return forward_failed(
                &request_id,
                &url,
                backend.as_str(),
                classification.kind.as_str(),
                start_time,
                ProxyError::Upstream(e),
            )
        }
    };

    let status = response.status();
    metrics::record_request(backend.as_str(), classification.kind.as_str(), status.as_u16(), start_time);
    if classification.is_ccs() {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            url = %url,
            status = status.as_u16(),
            "Proxying response from ccs"
        );
    }

    // 4. Stream back, tapping submit responses for the async search id
    let (mut parts, incoming) = response.into_parts();
    filter_hop_by_hop(&mut parts.headers);

    let body = if classification.async_search_initial {
        match check_content_encoding(&parts.headers) {
            Ok(()) => {
                let (sink, rx) = capture_channel();
                tokio::spawn(capture_search_id(rx, state.router.registry().clone(), url));
                Body::new(TapBody::new(incoming, sink))
            }
            Err(e) => {
                report_capture_failure(&e, &url);
                Body::new(incoming)
            }
        }
    } else {
        Body::new(incoming)
    };

    Response::from_parts(parts, body)
}

fn forward_failed(
    request_id: &str,
    url: &str,
    backend: &'static str,
    route: &'static str,
    start_time: Instant,
    error: ProxyError,
) -> Response {
    tracing::error!(
        request_id = %request_id,
        backend = backend,
        url = %url,
        error = %error,
        "Error proxying request"
    );
    if error.is_upstream() {
        metrics::record_upstream_error(backend);
    }
    metrics::record_request(backend, route, 500, start_time);
    error_response(&error)
}
