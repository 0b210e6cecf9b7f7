//! # Node Descriptions
//!
//! Per-run cache in front of a [`NodeDescriptionRepository`]. Every GUID is looked up
//! at most once; failed lookups are remembered as empty strings so they are not
//! retried either.

use std::collections::HashMap;

use ibpdc_common::fabric::Guid;
use ibpdc_common::nodes::NodeDescriptionRepository;
use tracing::debug;

/// Host information column filled in while writing cable reports.
pub trait HostLookup {
    fn host_info(&mut self, node_guid: &str) -> String;
}

pub struct NodeDescriptionCache<R> {
    repository: R,
    entries: HashMap<String, String>,
}

impl<R: NodeDescriptionRepository> NodeDescriptionCache<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            entries: HashMap::new(),
        }
    }

    /// Description of `guid`, empty when it cannot be resolved.
    pub fn lookup(&mut self, guid: &str) -> &str {
        let key = Guid::canonical(guid);
        if key.is_empty() {
            return "";
        }
        let repository = &self.repository;
        self.entries.entry(key).or_insert_with_key(|key| {
            let description = repository.describe(key).unwrap_or_default();
            debug!("Node description of {key}: {description:?}");
            description
        })
    }

    /// Number of distinct GUIDs looked up so far.
    pub fn queried(&self) -> usize {
        self.entries.len()
    }

    pub fn resolved(&self) -> usize {
        self.entries.values().filter(|value| !value.is_empty()).count()
    }

    pub fn success_rate(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.resolved() as f64 / self.queried() as f64 * 100.0)
    }
}

impl<R: NodeDescriptionRepository> HostLookup for NodeDescriptionCache<R> {
    fn host_info(&mut self, node_guid: &str) -> String {
        self.lookup(node_guid).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeRepository {
        calls: RefCell<Vec<String>>,
    }

    impl NodeDescriptionRepository for FakeRepository {
        fn describe(&self, guid: &str) -> Option<String> {
            self.calls.borrow_mut().push(guid.to_string());
            match guid {
                "0xaaaa" => Some("node017 HCA-1".to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn repository_is_queried_once_per_guid() {
        let mut cache = NodeDescriptionCache::new(FakeRepository::default());
        assert_eq!(cache.lookup("0xAAAA"), "node017 HCA-1");
        assert_eq!(cache.lookup("0xaaaa"), "node017 HCA-1");
        assert_eq!(cache.lookup("0xbbbb"), "");
        assert_eq!(cache.lookup("0xbbbb"), "");

        assert_eq!(*cache.repository.calls.borrow(), vec!["0xaaaa", "0xbbbb"]);
        assert_eq!(cache.queried(), 2);
        assert_eq!(cache.resolved(), 1);
        assert_eq!(cache.success_rate(), Some(50.0));
    }

    #[test]
    fn empty_guid_is_not_queried() {
        let mut cache = NodeDescriptionCache::new(FakeRepository::default());
        assert_eq!(cache.host_info("  "), "");
        assert!(cache.repository.calls.borrow().is_empty());
        assert_eq!(cache.queried(), 0);
    }

    #[test]
    fn caches_are_independent() {
        let mut first = NodeDescriptionCache::new(FakeRepository::default());
        first.lookup("0xaaaa");
        let second = NodeDescriptionCache::new(FakeRepository::default());
        assert_eq!(second.queried(), 0);
        assert_eq!(second.success_rate(), None);
    }
}
