//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (split on '/', classify)
//!     → matcher.rs (ordered rule table, first match wins)
//!         1. /remote--c-colon-i/…           → CCS, rewrite segment 1
//!         2. /_resolve/index/remote--c-colon-i → CCS, rewrite segment 3
//!         3. /c:i/…                          → CCS
//!         4. /_resolve/index/c:i             → CCS
//!         5. /_async_search[/status]/<id>    → CCS if <id> is registered
//!         otherwise                          → local
//!     → rewrite.rs (remote-- escape → cluster%3Aindex)
//!     → Classification { backend, async_search_initial, path }
//! ```
//!
//! # Design Decisions
//! - Rules are a static table of (kind, predicate) pairs
//! - No regex in hot path
//! - Deterministic for a given registry state

pub mod matcher;
pub mod rewrite;
pub mod router;

pub use matcher::RouteKind;
pub use router::{Classification, Router};
