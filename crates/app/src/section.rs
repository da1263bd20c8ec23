//! In-memory [`Section`] implementation.
//!
//! Every handle shares the same [`SectionTree`]; a handle is just a path into
//! it. Useful on its own for tests and as the building block of file-backed
//! stores, which snapshot the tree after each write.

use std::sync::{Arc, PoisonError, RwLock};

use zonehub_domain::section::{SectionTree, Value};

use crate::ports::Section;

/// Section handle over a shared in-memory tree.
#[derive(Debug, Clone, Default)]
pub struct MemorySection {
    tree: Arc<RwLock<SectionTree>>,
    path: Vec<String>,
}

impl MemorySection {
    /// Create an empty store and return its root section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already populated tree (e.g. loaded from disk).
    #[must_use]
    pub fn from_tree(tree: SectionTree) -> Self {
        Self {
            tree: Arc::new(RwLock::new(tree)),
            path: Vec::new(),
        }
    }

    /// Copy of the whole tree, from the root regardless of this handle's path.
    #[must_use]
    pub fn snapshot(&self) -> SectionTree {
        self.tree
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Value stored under `key` in this section, whatever its type.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Value> {
        self.with_node(|node| node.and_then(|n| n.values.get(key)).cloned())
    }

    fn with_node<T>(&self, f: impl FnOnce(Option<&SectionTree>) -> T) -> T {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        f(tree.node(&self.path))
    }

    fn with_node_mut<T>(&self, f: impl FnOnce(&mut SectionTree) -> T) -> T {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        f(tree.node_mut(&self.path))
    }

    fn with_existing_mut<T>(&self, f: impl FnOnce(&mut SectionTree) -> T) -> Option<T> {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        tree.node(&self.path)?;
        Some(f(tree.node_mut(&self.path)))
    }
}

impl Section for MemorySection {
    fn section(&self, key: &str) -> Self {
        let mut path = self.path.clone();
        path.push(key.to_string());
        Self {
            tree: Arc::clone(&self.tree),
            path,
        }
    }

    fn section_keys(&self) -> Vec<String> {
        self.with_node(|node| {
            node.map(|n| n.sections.keys().cloned().collect())
                .unwrap_or_default()
        })
    }

    fn section_exists(&self, key: &str) -> bool {
        self.with_node(|node| node.is_some_and(|n| n.sections.contains_key(key)))
    }

    fn section_delete(&self, key: &str) -> bool {
        self.with_existing_mut(|node| node.sections.remove(key).is_some())
            .unwrap_or(false)
    }

    fn keys(&self) -> Vec<String> {
        self.with_node(|node| {
            node.map(|n| n.values.keys().cloned().collect())
                .unwrap_or_default()
        })
    }

    fn set(&self, key: &str, value: Value) {
        self.with_node_mut(|node| {
            node.values.insert(key.to_string(), value);
        });
    }

    fn string(&self, key: &str) -> Option<String> {
        self.with_node(|node| {
            node.and_then(|n| n.values.get(key))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.with_node(|node| node.and_then(|n| n.values.get(key)).and_then(Value::as_int))
    }

    fn delete(&self, key: &str) -> bool {
        self.with_existing_mut(|node| node.values.remove(key).is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_back_values_through_nested_sections() {
        let root = MemorySection::new();
        let zone = root.section("Zones").section("1");
        zone.set("Name", Value::from("Kitchen"));
        zone.set("ParentZone", Value::from(0));

        let again = root.section("Zones").section("1");
        assert_eq!(again.string("Name").as_deref(), Some("Kitchen"));
        assert_eq!(again.int("ParentZone"), Some(0));
        assert_eq!(root.section("Zones").section_keys(), vec!["1".to_string()]);
    }

    #[test]
    fn should_not_materialise_sections_on_read() {
        let root = MemorySection::new();
        let ghost = root.section("Devices").section("lamp");
        assert_eq!(ghost.string("Name"), None);
        assert!(!root.section_exists("Devices"));
    }

    #[test]
    fn should_return_none_for_mismatched_type() {
        let root = MemorySection::new();
        root.set("Name", Value::from("Hallway"));
        assert_eq!(root.int("Name"), None);
    }

    #[test]
    fn should_delete_sections_and_values() {
        let root = MemorySection::new();
        let zones = root.section("Zones");
        zones.section("1").set("Name", Value::from("Attic"));
        zones.set("NextZoneId", Value::from(2));

        assert!(zones.section_delete("1"));
        assert!(!zones.section_delete("1"));
        assert!(zones.delete("NextZoneId"));
        assert!(!zones.delete("NextZoneId"));
        assert!(zones.keys().is_empty());
        assert!(zones.section_keys().is_empty());
    }

    #[test]
    fn should_not_create_parent_when_deleting_from_missing_section() {
        let root = MemorySection::new();
        assert!(!root.section("Zones").delete("NextZoneId"));
        assert!(!root.section_exists("Zones"));
    }

    #[test]
    fn should_share_tree_between_handles() {
        let root = MemorySection::new();
        root.section("Zones").set("NextZoneId", Value::from(5));
        let snapshot = root.section("Devices").snapshot();
        assert!(snapshot.sections.contains_key("Zones"));
    }
}
