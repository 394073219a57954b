//! Async search correlation subsystem.
//!
//! # Data Flow
//! ```text
//! CCS async search submit (POST /cluster%3Aindex/_async_search)
//!     → http server taps the response body (fan-out, client not delayed)
//!     → capture.rs (accumulate chunks, parse JSON, read "id")
//!     → registry.rs (record raw + percent-encoded id)
//!
//! Later: GET /_async_search/<id>
//!     → routing classifier asks registry.rs whether <id> is known
//!     → known ids go to the CCS cluster, unknown ones to local
//! ```
//!
//! # Design Decisions
//! - Registry is the only mutable state shared between requests
//! - No eviction; ids live until the process exits
//! - A follow-on request racing its own submit response may miss the
//!   registry and be routed locally

pub mod capture;
pub mod registry;

pub use capture::{
    capture_channel, capture_search_id, check_content_encoding, report_capture_failure,
    CaptureError, CaptureSink,
};
pub use registry::{encode_component, AsyncSearchRegistry};
