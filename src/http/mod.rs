//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, tracing)
//!     → routing::Router decides backend and outbound path
//!     → request.rs (outbound URI, Host, Authorization)
//!     → hyper-util client → backend
//!     → response.rs (stream back, tap async search submits)
//!     → Send to client
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::TapBody;
pub use server::HttpServer;
