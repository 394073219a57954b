//! Process-wide memory of async search ids that belong to the CCS cluster.

use std::sync::Arc;

use dashmap::DashSet;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::observability::metrics;

/// Characters escaped when an id is embedded in a path segment.
///
/// Everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )` is encoded,
/// which is the set browsers and most HTTP clients use for URI components.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single path component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Set of async search ids known to have been started on the CCS cluster.
///
/// Each id is stored twice, raw and percent-encoded, because follow-on
/// requests may carry either form. Lookups are exact matches.
///
/// Entries are never removed: an id stays routable to CCS for the life of
/// the process, so retried or late polling requests keep working. The set
/// therefore grows without bound.
#[derive(Debug, Clone, Default)]
pub struct AsyncSearchRegistry {
    ids: Arc<DashSet<String>>,
}

impl AsyncSearchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `id` (and its encoded form) as a CCS async search.
    pub fn record(&self, id: &str) {
        let encoded = encode_component(id);
        let inserted = self.ids.insert(id.to_string());
        if encoded != id {
            self.ids.insert(encoded);
        }
        if inserted {
            metrics::record_async_search_id(self.ids.len());
        }
    }

    /// Exact-match membership test.
    pub fn contains(&self, id: &str) -> bool {
        !id.is_empty() && self.ids.contains(id)
    }

    /// Number of stored keys (raw and encoded forms counted separately).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("abc:123"), "abc%3A123");
        assert_eq!(encode_component("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_component("FkxR-_.!~*'()"), "FkxR-_.!~*'()");
        assert_eq!(encode_component("x=="), "x%3D%3D");
    }

    #[test]
    fn test_record_stores_both_forms() {
        let registry = AsyncSearchRegistry::new();
        registry.record("abc:123");

        assert!(registry.contains("abc:123"));
        assert!(registry.contains("abc%3A123"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unrelated_id_does_not_match() {
        let registry = AsyncSearchRegistry::new();
        registry.record("xyz");

        assert!(registry.contains("xyz"));
        assert!(!registry.contains("abc:123"));
        assert!(!registry.contains("abc%3A123"));
    }

    #[test]
    fn test_record_is_idempotent() {
        let registry = AsyncSearchRegistry::new();
        registry.record("abc:123");
        registry.record("abc:123");
        assert_eq!(registry.len(), 2);

        // no encoding needed, one key
        registry.record("plain");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_empty_id_is_never_a_member() {
        let registry = AsyncSearchRegistry::new();
        assert!(!registry.contains(""));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookups_are_not_normalized() {
        let registry = AsyncSearchRegistry::new();
        registry.record("abc:123");
        assert!(!registry.contains("ABC:123"));
        assert!(!registry.contains("abc%3a123"));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = AsyncSearchRegistry::new();
        let writer = registry.clone();
        writer.record("shared");
        assert!(registry.contains("shared"));
    }

    #[tokio::test]
    async fn test_concurrent_records() {
        let registry = AsyncSearchRegistry::new();
        let mut tasks = Vec::new();
        for i in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.record(&format!("id:{}", i));
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(registry.len(), 64);
        assert!(registry.contains("id%3A31"));
    }
}
