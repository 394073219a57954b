//! Upstream cluster subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyConfig { server, ccs_server }
//!     → backend.rs (parse base URLs, pre-build ApiKey header values)
//!     → Backends (immutable, shared via Arc)
//!     → http server asks for the Destination of a BackendKind
//! ```
//!
//! # Design Decisions
//! - Exactly two destinations; no pools, no load balancing
//! - Credentials are marked sensitive so they never show up in header dumps

pub mod backend;

pub use backend::{BackendError, BackendKind, Backends, Destination};
