//! Section port — hierarchical key-value persistence.
//!
//! A section is a handle onto one level of a tree. Child sections are
//! addressed by key and materialise on first write, so handles to sections
//! that do not exist yet are cheap and valid.

use zonehub_domain::section::Value;

/// One level of a hierarchical key-value store.
pub trait Section: Send + Sync + Sized {
    /// Handle onto the child section named `key`.
    #[must_use]
    fn section(&self, key: &str) -> Self;

    /// Names of existing child sections.
    fn section_keys(&self) -> Vec<String>;

    /// Whether a child section named `key` exists.
    fn section_exists(&self, key: &str) -> bool;

    /// Remove the child section `key` and everything below it.
    ///
    /// Returns `false` when there was nothing to remove.
    fn section_delete(&self, key: &str) -> bool;

    /// Keys of the values stored directly in this section.
    fn keys(&self) -> Vec<String>;

    /// Store `value` under `key`, creating this section if needed.
    fn set(&self, key: &str, value: Value);

    /// String stored under `key`; `None` if absent or not a string.
    fn string(&self, key: &str) -> Option<String>;

    /// Integer stored under `key`; `None` if absent or not an integer.
    fn int(&self, key: &str) -> Option<i64>;

    /// Remove the value under `key`. Returns `false` if it was absent.
    fn delete(&self, key: &str) -> bool;
}
