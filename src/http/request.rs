//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) when the client sent none
//! - Build the outbound request for the selected backend
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body is streamed, never buffered
//! - Outbound request is always HTTP/1.1; the connector negotiates the rest
//! - Async search submits ask for an unencoded body so the id can be read

use axum::body::Body;
use axum::http::header::{HeaderName, ACCEPT_ENCODING};
use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ProxyError;
use crate::http::headers::prepare_outbound;
use crate::routing::Classification;
use crate::upstream::Destination;

/// Header carrying the request id.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a fresh UUID v4 request id.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request id assigned by the request id layer.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Turn an inbound request into the request sent to `destination`.
///
/// The path comes from `classification` (rewritten when needed), the query
/// string is kept as received.
pub fn build_outbound(
    request: Request<Body>,
    classification: &Classification,
    destination: &Destination,
) -> Result<Request<Body>, ProxyError> {
    let (parts, body) = request.into_parts();
    let uri = destination.uri_for(&classification.path, parts.uri.query())?;

    let mut headers = parts.headers;
    prepare_outbound(&mut headers, destination)?;
    if classification.async_search_initial {
        headers.remove(ACCEPT_ENCODING);
    }

    let mut outbound = Request::builder().method(parts.method).uri(uri).body(body)?;
    *outbound.headers_mut() = headers;
    Ok(outbound)
}
