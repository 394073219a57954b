//! Path segment matching.
//!
//! # Responsibilities
//! - Recognise cross-cluster markers in path segments
//! - Define the ordered rule table used for classification
//!
//! # Design Decisions
//! - Paths are split on `/` only; no case folding, no percent decoding
//! - Segment 0 is always empty for absolute paths, rules look from index 1
//! - First matching rule wins, later rules are not evaluated

use crate::correlation::AsyncSearchRegistry;
use crate::upstream::BackendKind;

/// Prefix of a path-safe remote index pattern, e.g. `remote--c1-colon-logs`.
pub const REMOTE_PREFIX: &str = "remote--";

/// Placeholder standing in for `:` inside a remote index pattern.
pub const COLON_PLACEHOLDER: &str = "-colon-";

/// Percent-encoded `:`.
pub const ENCODED_COLON: &str = "%3A";

const ASYNC_SEARCH: &str = "_async_search";

/// `remote--…-colon-…`
pub fn is_remote_segment(segment: Option<&str>) -> bool {
    segment.is_some_and(|s| s.starts_with(REMOTE_PREFIX) && s.contains(COLON_PLACEHOLDER))
}

/// Contains a literal `:` or `%3A`.
pub fn is_colon_segment(segment: Option<&str>) -> bool {
    segment.is_some_and(|s| s.contains(':') || s.contains(ENCODED_COLON))
}

/// `/_resolve/index/…`
pub fn is_resolve_index(segments: &[&str]) -> bool {
    segments.get(1) == Some(&"_resolve") && segments.get(2) == Some(&"index")
}

/// `/<target>/_async_search…`, the submit leg of an async search.
pub fn is_async_search_submit(segments: &[&str]) -> bool {
    segments.get(2) == Some(&ASYNC_SEARCH)
}

/// The id carried by `/_async_search/<id>` or `/_async_search/status/<id>`.
pub fn async_search_id<'a>(segments: &[&'a str]) -> Option<&'a str> {
    if segments.get(1) != Some(&ASYNC_SEARCH) {
        return None;
    }
    match segments.get(2) {
        Some(&"status") => segments.get(3).copied(),
        other => other.copied(),
    }
}

/// The outcome variants of classification, in rule priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// `/remote--c-colon-i/…`
    RemoteColonHead,
    /// `/_resolve/index/remote--c-colon-i`
    RemoteColonResolve,
    /// `/c:i/…` or `/c%3Ai/…`
    IndexColonHead,
    /// `/_resolve/index/c:i`
    IndexColonResolve,
    /// `/_async_search/<id>` for an id started on the CCS cluster
    AsyncFollowOn,
    /// Everything else.
    Local,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::RemoteColonHead => "remote_colon_head",
            RouteKind::RemoteColonResolve => "remote_colon_resolve",
            RouteKind::IndexColonHead => "index_colon_head",
            RouteKind::IndexColonResolve => "index_colon_resolve",
            RouteKind::AsyncFollowOn => "async_follow_on",
            RouteKind::Local => "local",
        }
    }

    pub fn backend(&self) -> BackendKind {
        match self {
            RouteKind::Local => BackendKind::Local,
            _ => BackendKind::Ccs,
        }
    }

    /// Segment index to rewrite from the `remote--` form, if any.
    pub fn rewrite_index(&self) -> Option<usize> {
        match self {
            RouteKind::RemoteColonHead => Some(1),
            RouteKind::RemoteColonResolve => Some(3),
            _ => None,
        }
    }

    /// Whether this variant can carry the submit leg of an async search.
    pub fn can_start_async_search(&self) -> bool {
        matches!(self, RouteKind::RemoteColonHead | RouteKind::IndexColonHead)
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classification rule.
pub struct Rule {
    pub kind: RouteKind,
    pub matches: fn(&[&str], &AsyncSearchRegistry) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("kind", &self.kind).finish()
    }
}

fn remote_colon_head(segments: &[&str], _: &AsyncSearchRegistry) -> bool {
    is_remote_segment(segments.get(1).copied())
}

fn remote_colon_resolve(segments: &[&str], _: &AsyncSearchRegistry) -> bool {
    is_resolve_index(segments) && is_remote_segment(segments.get(3).copied())
}

fn index_colon_head(segments: &[&str], _: &AsyncSearchRegistry) -> bool {
    is_colon_segment(segments.get(1).copied())
}

fn index_colon_resolve(segments: &[&str], _: &AsyncSearchRegistry) -> bool {
    is_resolve_index(segments) && is_colon_segment(segments.get(3).copied())
}

fn async_follow_on(segments: &[&str], registry: &AsyncSearchRegistry) -> bool {
    async_search_id(segments).is_some_and(|id| registry.contains(id))
}

/// CCS rules in priority order. `Local` is the fallback when none match.
pub static RULES: [Rule; 5] = [
    Rule { kind: RouteKind::RemoteColonHead, matches: remote_colon_head },
    Rule { kind: RouteKind::RemoteColonResolve, matches: remote_colon_resolve },
    Rule { kind: RouteKind::IndexColonHead, matches: index_colon_head },
    Rule { kind: RouteKind::IndexColonResolve, matches: index_colon_resolve },
    Rule { kind: RouteKind::AsyncFollowOn, matches: async_follow_on },
];

/// Find the first rule matching `segments`.
pub fn match_rule(segments: &[&str], registry: &AsyncSearchRegistry) -> RouteKind {
    RULES
        .iter()
        .find(|rule| (rule.matches)(segments, registry))
        .map(|rule| rule.kind)
        .unwrap_or(RouteKind::Local)
}
