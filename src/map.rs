//! Ordered map type for map-like tree nodes.
//!
//! [`TreeMap`] wraps [`IndexMap`] so that entries come back out in the order they
//! went in. Both text codecs depend on this: property lines and XML children are
//! written in source document order, which makes output deterministic and keeps a
//! read/write round trip stable.
//!
//! ## Examples
//!
//! ```rust
//! use datatree_text::{TreeMap, Value};
//!
//! let mut map = TreeMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to tree values.
///
/// # Examples
///
/// ```rust
/// use datatree_text::{TreeMap, Value};
///
/// let mut map = TreeMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TreeMap(IndexMap<String, crate::Value>);

impl TreeMap {
    /// Creates an empty `TreeMap`.
    #[must_use]
    pub fn new() -> Self {
        TreeMap(IndexMap::new())
    }

    /// Creates an empty `TreeMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TreeMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place (the
    /// entry keeps its original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatree_text::{TreeMap, Value};
    ///
    /// let mut map = TreeMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::Value> {
        self.0.get_mut(key)
    }

    /// Returns the value for `key`, inserting the result of `default` first if absent.
    pub fn entry_or_insert_with<F>(&mut self, key: &str, default: F) -> &mut crate::Value
    where
        F: FnOnce() -> crate::Value,
    {
        self.0.entry(key.to_string()).or_insert_with(default)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<crate::Value> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl Default for TreeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, crate::Value>> for TreeMap {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        TreeMap(map.into_iter().collect())
    }
}

impl IntoIterator for TreeMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TreeMap {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for TreeMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        TreeMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = TreeMap::new();
        map.insert("a".to_string(), Value::from(1));
        map.insert("b".to_string(), Value::from(2));
        map.insert("a".to_string(), Value::from(3));

        let entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        assert_eq!(entries, vec![("a", Value::from(3)), ("b", Value::from(2))]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let map: TreeMap = ["x", "y", "z"]
            .iter()
            .map(|k| (k.to_string(), Value::Null))
            .collect();
        let mut map = map;
        map.remove("y");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["x", "z"]);
    }
}
