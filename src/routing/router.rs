//! Request classification.
//!
//! # Responsibilities
//! - Split a request path and run it through the rule table
//! - Decide backend, async search submit flag and outbound path
//!
//! # Design Decisions
//! - Classification is a pure read of the path and the registry
//! - Deterministic: same path and same registry contents, same result
//! - Explicit `Local` fallback when no CCS rule matches

use crate::correlation::AsyncSearchRegistry;
use crate::routing::matcher::{is_async_search_submit, match_rule, RouteKind};
use crate::routing::rewrite::rewrite_path;
use crate::upstream::BackendKind;

/// Routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Which rule matched.
    pub kind: RouteKind,
    /// Destination cluster.
    pub backend: BackendKind,
    /// True for the submit leg of a CCS async search, whose response id
    /// must be captured.
    pub async_search_initial: bool,
    /// Path to send upstream (rewritten or original).
    pub path: String,
    /// Whether `path` differs from the inbound path.
    pub rewritten: bool,
}

impl Classification {
    pub fn is_ccs(&self) -> bool {
        self.backend == BackendKind::Ccs
    }
}

/// Classifies request paths against the CCS rules.
#[derive(Debug, Clone, Default)]
pub struct Router {
    registry: AsyncSearchRegistry,
}

impl Router {
    pub fn new(registry: AsyncSearchRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AsyncSearchRegistry {
        &self.registry
    }

    /// Classify a URL path (no query string).
    pub fn classify(&self, path: &str) -> Classification {
        let segments: Vec<&str> = path.split('/').collect();
        let kind = match_rule(&segments, &self.registry);

        let async_search_initial =
            kind.can_start_async_search() && is_async_search_submit(&segments);

        let (path, rewritten) = match kind.rewrite_index() {
            Some(index) => (rewrite_path(&segments, index), true),
            None => (path.to_string(), false),
        };

        Classification {
            kind,
            backend: kind.backend(),
            async_search_initial,
            path,
            rewritten,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Router::new(AsyncSearchRegistry::new())
    }

    #[test]
    fn test_remote_head_for_many_patterns() {
        let router = router();
        for (x, y) in [("c1", "logs"), ("cluster-2", "metrics-*"), ("a", "b,c"), ("eu_west", "x.y")] {
            let path = format!("/remote--{}-colon-{}/_search", x, y);
            let c = router.classify(&path);
            assert_eq!(c.kind, RouteKind::RemoteColonHead, "{}", path);
            assert!(c.is_ccs());
            assert!(c.rewritten);
            assert_eq!(c.path, format!("/{}%3A{}/_search", x, y));
            assert!(!c.async_search_initial);
        }
    }

    #[test]
    fn test_remote_async_search_submit() {
        let c = router().classify("/remote--cluster1-colon-logs*-colon-/_async_search");
        assert_eq!(c.kind, RouteKind::RemoteColonHead);
        assert_eq!(c.backend, BackendKind::Ccs);
        assert!(c.async_search_initial);
        assert_eq!(c.path, "/cluster1%3Alogs*%3A/_async_search");
    }

    #[test]
    fn test_remote_resolve_only_rewrites_third_segment() {
        let c = router().classify("/_resolve/index/remote--c1-colon-logs");
        assert_eq!(c.kind, RouteKind::RemoteColonResolve);
        assert!(c.is_ccs());
        assert!(!c.async_search_initial);
        assert_eq!(c.path, "/_resolve/index/c1%3Alogs");
    }

    #[test]
    fn test_index_colon_head_is_not_rewritten() {
        for path in ["/c1:logs/_search", "/c1%3Alogs/_search", "/a:b,c/_count"] {
            let c = router().classify(path);
            assert_eq!(c.kind, RouteKind::IndexColonHead, "{}", path);
            assert!(c.is_ccs());
            assert!(!c.rewritten);
            assert_eq!(c.path, path);
        }
    }

    #[test]
    fn test_index_colon_async_search_submit() {
        let c = router().classify("/c1:logs/_async_search");
        assert_eq!(c.kind, RouteKind::IndexColonHead);
        assert!(c.async_search_initial);
    }

    #[test]
    fn test_index_colon_resolve() {
        let c = router().classify("/_resolve/index/c1:logs");
        assert_eq!(c.kind, RouteKind::IndexColonResolve);
        assert!(c.is_ccs());
        assert!(!c.async_search_initial);
        assert_eq!(c.path, "/_resolve/index/c1:logs");
    }

    #[test]
    fn test_async_follow_on_requires_registered_id() {
        let router = router();
        let c = router.classify("/_async_search/abc:123");
        assert_eq!(c.kind, RouteKind::Local);
        assert_eq!(c.backend, BackendKind::Local);

        router.registry().record("abc:123");
        for path in [
            "/_async_search/abc:123",
            "/_async_search/abc%3A123",
            "/_async_search/status/abc:123",
            "/_async_search/status/abc%3A123",
        ] {
            let c = router.classify(path);
            assert_eq!(c.kind, RouteKind::AsyncFollowOn, "{}", path);
            assert!(c.is_ccs());
            assert!(!c.async_search_initial);
            assert!(!c.rewritten);
            assert_eq!(c.path, path);
        }
    }

    #[test]
    fn test_unrelated_registered_id_does_not_route() {
        let router = router();
        router.registry().record("xyz");
        assert_eq!(router.classify("/_async_search/abc:123").kind, RouteKind::Local);
    }

    #[test]
    fn test_status_literal_is_not_an_id() {
        let router = router();
        router.registry().record("status");
        // `status` is skipped in favour of the following segment
        assert_eq!(router.classify("/_async_search/status/other").kind, RouteKind::Local);
    }

    #[test]
    fn test_local_default() {
        let c = router().classify("/my-index/_search");
        assert_eq!(c.kind, RouteKind::Local);
        assert_eq!(c.backend, BackendKind::Local);
        assert!(!c.async_search_initial);
        assert!(!c.rewritten);
        assert_eq!(c.path, "/my-index/_search");

        assert_eq!(router().classify("/").kind, RouteKind::Local);
        assert_eq!(router().classify("/my-index/_async_search").kind, RouteKind::Local);
        assert!(!router().classify("/my-index/_async_search").async_search_initial);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let router = router();
        router.registry().record("abc");
        for path in [
            "/remote--a-colon-b/_async_search",
            "/_resolve/index/a:b",
            "/_async_search/abc",
            "/plain/_doc/1",
        ] {
            assert_eq!(router.classify(path), router.classify(path));
        }
    }
}
