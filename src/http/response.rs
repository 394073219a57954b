//! Response handling and transformation.
//!
//! # Responsibilities
//! - Stream backend responses to the client unmodified
//! - Tap the body of async search submit responses for id capture
//! - Map forwarding failures to a plain-text 500
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - The tap copies chunks into a channel; it never waits on the reader

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use hyper::body::{Body, Frame, SizeHint};

use crate::correlation::CaptureSink;
use crate::error::ProxyError;

/// Body wrapper that forwards every frame and mirrors data chunks to a
/// [`CaptureSink`].
///
/// The sink is told when the body ends or fails. If the wrapper is dropped
/// first (client disconnected) the sink is dropped with it and the capture
/// is abandoned.
pub struct TapBody<B> {
    inner: B,
    sink: Option<CaptureSink>,
}

impl<B> TapBody<B> {
    pub fn new(inner: B, sink: CaptureSink) -> Self {
        Self {
            inner,
            sink: Some(sink),
        }
    }
}

impl<B> Body for TapBody<B>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        let polled = Pin::new(&mut this.inner).poll_frame(cx);

        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let (Some(sink), Some(data)) = (&this.sink, frame.data_ref()) {
                    sink.chunk(data.clone());
                }
                // the server may stop polling once the inner body reports its end
                if this.inner.is_end_stream() {
                    if let Some(sink) = this.sink.take() {
                        sink.end();
                    }
                }
            }
            Poll::Ready(Some(Err(e))) => {
                if let Some(sink) = this.sink.take() {
                    sink.error(e.to_string());
                }
            }
            Poll::Ready(None) => {
                if let Some(sink) = this.sink.take() {
                    sink.end();
                }
            }
            Poll::Pending => {}
        }

        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// The response sent when a request could not be forwarded.
pub fn error_response(error: &ProxyError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        format!("error proxying request: {}", error),
    )
        .into_response()
}
