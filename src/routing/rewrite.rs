//! Outbound path rewriting for `remote--` index patterns.
//!
//! `remote--cluster1-colon-logs*` becomes `cluster1%3Alogs*`: the prefix is
//! stripped and every `-colon-` placeholder is replaced by an encoded colon.
//! Only the one affected segment changes.

use crate::routing::matcher::{COLON_PLACEHOLDER, ENCODED_COLON, REMOTE_PREFIX};

/// Turn a `remote--…-colon-…` segment back into a cross-cluster pattern.
pub fn fix_remote_segment(segment: &str) -> String {
    segment
        .strip_prefix(REMOTE_PREFIX)
        .unwrap_or(segment)
        .replace(COLON_PLACEHOLDER, ENCODED_COLON)
}

/// Rebuild a path with the segment at `index` fixed and all others intact.
pub fn rewrite_path(segments: &[&str], index: usize) -> String {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if i == index {
                fix_remote_segment(segment)
            } else {
                (*segment).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
