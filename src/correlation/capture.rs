//! Capture of async search ids from CCS initiation responses.
//!
//! The response body is streamed to the client by [`TapBody`]
//! (see `http::response`), which hands every data chunk to a
//! [`CaptureSink`]. A spawned [`capture_search_id`] task accumulates the
//! chunks and, once the body has ended, parses it and records the `id`.

use axum::http::header::{HeaderMap, CONTENT_ENCODING};
use bytes::{Bytes, BytesMut};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::correlation::registry::AsyncSearchRegistry;
use crate::observability::metrics;

/// Why an id could not be captured. Never surfaced to the client.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("response body error: {0}")]
    Body(String),

    #[error("response stream ended before completion")]
    Aborted,

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no \"id\" field")]
    MissingId,

    #[error("response body is {0}-encoded, not captured")]
    Encoded(String),
}

impl CaptureError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CaptureError::Body(_) => "body",
            CaptureError::Aborted => "aborted",
            CaptureError::Json(_) => "json",
            CaptureError::MissingId => "missing_id",
            CaptureError::Encoded(_) => "encoded",
        }
    }
}

/// Messages from the tapped response stream.
#[derive(Debug)]
pub enum CaptureEvent {
    Chunk(Bytes),
    End,
    Error(String),
}

#[derive(Deserialize)]
struct AsyncSearchResponse {
    id: Option<String>,
}

/// Parse an async search submit response and return its `id`.
pub fn extract_search_id(body: &[u8]) -> Result<String, CaptureError> {
    let response: AsyncSearchResponse = serde_json::from_slice(body)?;
    match response.id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(CaptureError::MissingId),
    }
}

/// Only identity-encoded bodies can be parsed for an id.
pub fn check_content_encoding(headers: &HeaderMap) -> Result<(), CaptureError> {
    match headers.get(CONTENT_ENCODING).map(|v| v.to_str().unwrap_or("unknown").trim()) {
        None => Ok(()),
        Some(coding) if coding.is_empty() || coding.eq_ignore_ascii_case("identity") => Ok(()),
        Some(coding) => Err(CaptureError::Encoded(coding.to_string())),
    }
}

/// Sending half handed to the response tap.
///
/// Sends never block; if the capture task is gone the chunk is dropped.
#[derive(Debug, Clone)]
pub struct CaptureSink {
    tx: mpsc::UnboundedSender<CaptureEvent>,
}

impl CaptureSink {
    pub fn chunk(&self, data: Bytes) {
        let _ = self.tx.send(CaptureEvent::Chunk(data));
    }

    pub fn end(&self) {
        let _ = self.tx.send(CaptureEvent::End);
    }

    pub fn error(&self, message: String) {
        let _ = self.tx.send(CaptureEvent::Error(message));
    }
}

/// Create a sink/receiver pair for one response.
pub fn capture_channel() -> (CaptureSink, mpsc::UnboundedReceiver<CaptureEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CaptureSink { tx }, rx)
}

/// Accumulate a tapped body and return the async search id it carries.
pub async fn collect_search_id(
    mut rx: mpsc::UnboundedReceiver<CaptureEvent>,
) -> Result<String, CaptureError> {
    let mut body = BytesMut::new();
    loop {
        match rx.recv().await {
            Some(CaptureEvent::Chunk(data)) => body.extend_from_slice(&data),
            Some(CaptureEvent::End) => return extract_search_id(&body),
            Some(CaptureEvent::Error(message)) => return Err(CaptureError::Body(message)),
            // client went away before the body finished
            None => return Err(CaptureError::Aborted),
        }
    }
}

/// Task body: collect the id and record it in the registry.
///
/// Failures are logged and counted; the client response is unaffected.
pub async fn capture_search_id(
    rx: mpsc::UnboundedReceiver<CaptureEvent>,
    registry: AsyncSearchRegistry,
    request_path: String,
) {
    match collect_search_id(rx).await {
        Ok(id) => {
            registry.record(&id);
            tracing::info!(
                async_search_id = %id,
                path = %request_path,
                "Recorded CCS async search id"
            );
        }
        Err(e) => report_capture_failure(&e, &request_path),
    }
}

/// Log and count a capture that did not produce an id.
pub fn report_capture_failure(error: &CaptureError, request_path: &str) {
    metrics::record_capture_failure(error.reason());
    tracing::warn!(
        path = %request_path,
        error = %error,
        "Could not capture CCS async search id"
    );
}
