//! A tree together with its metadata block.
//!
//! The metadata block is a side map that travels with the tree but is not part
//! of it. Codecs use it to remember what the text format told them and the tree
//! cannot express: the first-index base of each property key group, or the tag
//! of the XML root element. When a document is written with
//! [`WriteOptions::insert_meta`](crate::WriteOptions), the block is embedded
//! into the output under the reserved [`META_KEY`].

use crate::path::Path;
use crate::properties::FirstIndexMap;
use crate::{Result, TreeMap, Value};

/// Reserved top-level key under which metadata is embedded into text.
pub const META_KEY: &str = "_meta";

/// A document tree and its metadata block.
///
/// # Examples
///
/// ```rust
/// use datatree_text::{Document, Value};
///
/// let mut doc = Document::default();
/// doc.put("account[1].name", "User").unwrap();
/// doc.put("account[1].enabled", false).unwrap();
///
/// assert_eq!(doc.get("account[1].name").unwrap(), Some(&Value::from("User")));
/// assert_eq!(doc.get_or("age", &Value::from(0)).unwrap(), &Value::from(0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    root: Value,
    meta: TreeMap,
}

impl Document {
    #[must_use]
    pub fn new(root: Value) -> Self {
        Document {
            root,
            meta: TreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_meta(root: Value, meta: TreeMap) -> Self {
        Document { root, meta }
    }

    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// The metadata block.
    #[must_use]
    pub fn meta(&self) -> &TreeMap {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut TreeMap {
        &mut self.meta
    }

    #[must_use]
    pub fn into_parts(self) -> (Value, TreeMap) {
        (self.root, self.meta)
    }

    /// First-index bases recorded by a properties read, if any.
    #[must_use]
    pub fn first_indexes(&self) -> FirstIndexMap {
        FirstIndexMap::from_meta(&self.meta)
    }

    /// Stores `value` at the path given in `account[1].name` notation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPath`](crate::Error::MalformedPath) if the path
    /// cannot be parsed; the tree is left untouched in that case.
    pub fn put<V: Into<Value>>(&mut self, path: &str, value: V) -> Result<()> {
        let path = Path::parse(path)?;
        self.root.put_path(&path, value.into());
        Ok(())
    }

    /// Looks up the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPath`](crate::Error::MalformedPath) if the path
    /// cannot be parsed.
    pub fn get(&self, path: &str) -> Result<Option<&Value>> {
        let path = Path::parse(path)?;
        Ok(self.root.get_path(&path))
    }

    /// Looks up the node at `path`, falling back to `default` when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPath`](crate::Error::MalformedPath) if the path
    /// cannot be parsed.
    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> Result<&'a Value> {
        Ok(self.get(path)?.unwrap_or(default))
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Document::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_malformed_path_leaves_tree_untouched() {
        let mut doc = Document::default();
        doc.put("a", 1).unwrap();
        let before = doc.clone();
        assert!(matches!(
            doc.put("a[", 2).unwrap_err(),
            Error::MalformedPath { .. }
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_root_array() {
        let mut doc = Document::default();
        doc.put("[1]", "b").unwrap();
        doc.put("[0]", "a").unwrap();
        assert_eq!(
            doc.root(),
            &Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }
}
