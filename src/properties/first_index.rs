use crate::path::{Path, Segment};
use crate::{TreeMap, Value};
use indexmap::IndexMap;

/// Metadata key under which the first-index bases are stored.
pub const FIRST_INDEX_KEY: &str = "firstIndex";

/// Base used for lists nobody recorded a base for.
pub const DEFAULT_BASE: usize = 1;

/// Key holding a list's own base inside the metadata form.
const BASE_KEY: &str = "_base";

/// Whether each numbered key group started counting at 0 or at 1.
///
/// Lists are always 0-based inside the tree. This map, keyed by the list's path
/// (`servers[0].ports`), remembers how the source text numbered them so a later
/// write reproduces the same keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstIndexMap(IndexMap<Path, usize>);

impl FirstIndexMap {
    #[must_use]
    pub fn new() -> Self {
        FirstIndexMap(IndexMap::new())
    }

    /// Records the base of the list at `path`.
    pub fn record(&mut self, path: &Path, base: usize) {
        self.0.insert(path.clone(), base);
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains_key(path)
    }

    /// The recorded base for the list at `path`, or [`DEFAULT_BASE`].
    #[must_use]
    pub fn base_for(&self, path: &Path) -> usize {
        self.0.get(path).copied().unwrap_or(DEFAULT_BASE)
    }

    /// The recorded base for a path given as a string, `""` being the root.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<usize> {
        let path = Path::parse(path).ok()?;
        self.0.get(&path).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Path, usize> {
        self.0.iter()
    }

    /// The metadata form.
    ///
    /// Paths are spelled out as nested maps so every key stays a plain name
    /// that XML can carry as a tag: a list's own base sits under `_base`, and
    /// list positions become `_0`, `_1` and so on. The root list's base is the
    /// top-level `_base`.
    ///
    /// ```rust
    /// use datatree_text::{FirstIndexMap, Path};
    ///
    /// let mut bases = FirstIndexMap::new();
    /// bases.record(&"s".parse::<Path>().unwrap(), 0);
    /// bases.record(&"s[0].p".parse::<Path>().unwrap(), 1);
    /// let value = bases.to_value();
    /// assert_eq!(value.get_path(&"s._base".parse().unwrap()).unwrap().to_string(), "0");
    /// assert_eq!(value.get_path(&"s._0.p._base".parse().unwrap()).unwrap().to_string(), "1");
    /// ```
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut root = TreeMap::new();
        for (path, base) in &self.0 {
            insert_nested(&mut root, path.segments(), *base);
        }
        Value::Map(root)
    }

    /// Reads the bases out of a metadata block.
    ///
    /// Accepts the form produced by [`FirstIndexMap::to_value`], a bare number
    /// standing for the root list, and nested scalars or lists as they come out
    /// of reading embedded metadata back from property text.
    #[must_use]
    pub fn from_meta(meta: &TreeMap) -> Self {
        let mut map = FirstIndexMap::new();
        if let Some(value) = meta.get(FIRST_INDEX_KEY) {
            let mut path = Path::root();
            map.collect(value, &mut path);
        }
        map
    }

    fn collect(&mut self, value: &Value, path: &mut Path) {
        match value {
            Value::Map(entries) => {
                for (key, child) in entries.iter() {
                    if key == BASE_KEY {
                        self.collect_base(child, path);
                        continue;
                    }
                    path.push(segment_for_key(key));
                    self.collect(child, path);
                    path.pop();
                }
            }
            Value::List(items) => {
                for (index, child) in items.iter().enumerate() {
                    path.push_index(index);
                    self.collect(child, path);
                    path.pop();
                }
            }
            scalar => self.collect_base(scalar, path),
        }
    }

    fn collect_base(&mut self, value: &Value, path: &Path) {
        let base = match value {
            Value::Int(i) => usize::try_from(*i).ok(),
            Value::String(s) => s.trim().parse::<usize>().ok(),
            _ => None,
        };
        match base {
            Some(base @ (0 | 1)) => {
                self.0.insert(path.clone(), base);
            }
            _ => tracing::debug!(path = %path, "ignoring invalid first-index entry"),
        }
    }
}

fn insert_nested(map: &mut TreeMap, segments: &[Segment], base: usize) {
    match segments.split_first() {
        None => {
            map.insert(BASE_KEY.to_string(), Value::Int(base as i64));
        }
        Some((segment, rest)) => {
            let key = match segment {
                Segment::Name(name) => name.clone(),
                Segment::Index(index) => format!("_{}", index),
            };
            match map.entry_or_insert_with(&key, || Value::Map(TreeMap::new())) {
                Value::Map(child) => insert_nested(child, rest, base),
                _ => tracing::debug!(key = %key, "first-index entry shadowed by a base"),
            }
        }
    }
}

/// `_3` is list position 3, anything else a name.
fn segment_for_key(key: &str) -> Segment {
    match key.strip_prefix('_') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            match digits.parse() {
                Ok(index) => Segment::Index(index),
                Err(_) => Segment::Name(key.to_string()),
            }
        }
        _ => Segment::Name(key.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Segment;

    #[test]
    fn test_default_base() {
        let map = FirstIndexMap::new();
        assert_eq!(map.base_for(&"a.b".parse().unwrap()), DEFAULT_BASE);
    }

    #[test]
    fn test_metadata_roundtrip() {
        let mut map = FirstIndexMap::new();
        map.record(&Path::root(), 0);
        map.record(&"database.ports".parse().unwrap(), 0);
        map.record(&Path::from(vec![Segment::Name("servers".into()), Segment::Index(0), Segment::Name("ports".into())]), 1);
        map.record(&"servers".parse().unwrap(), 0);

        let mut meta = TreeMap::new();
        meta.insert(FIRST_INDEX_KEY.to_string(), map.to_value());
        assert_eq!(FirstIndexMap::from_meta(&meta), map);
    }

    #[test]
    fn test_metadata_keys_are_plain_names() {
        let mut map = FirstIndexMap::new();
        map.record(&Path::root(), 0);
        map.record(&"s".parse().unwrap(), 0);
        map.record(&"s[1].p".parse().unwrap(), 1);

        let value = map.to_value();
        let top = value.as_map().unwrap();
        assert_eq!(top.keys().map(String::as_str).collect::<Vec<_>>(), vec!["_base", "s"]);
        assert_eq!(top.get("_base"), Some(&Value::Int(0)));
        let s = top.get("s").unwrap().as_map().unwrap();
        assert_eq!(s.keys().map(String::as_str).collect::<Vec<_>>(), vec!["_base", "_1"]);
        assert_eq!(value.get_path(&"s._1.p._base".parse().unwrap()), Some(&Value::Int(1)));
    }

    #[test]
    fn test_scalar_metadata_is_the_root_base() {
        let mut meta = TreeMap::new();
        meta.insert(FIRST_INDEX_KEY.to_string(), Value::Int(0));
        let map = FirstIndexMap::from_meta(&meta);
        assert_eq!(map.get(""), Some(0));
        assert_eq!(map.base_for(&Path::root()), 0);
    }

    #[test]
    fn test_nested_metadata() {
        let mut nested = Value::Null;
        nested.put_path(&"database.ports".parse().unwrap(), Value::from("0"));
        nested.put_path(&"servers[0].ports".parse().unwrap(), Value::from("1"));
        nested.put_path(&"broken".parse().unwrap(), Value::from("7"));

        let mut meta = TreeMap::new();
        meta.insert(FIRST_INDEX_KEY.to_string(), nested);
        let map = FirstIndexMap::from_meta(&meta);
        assert_eq!(map.get("database.ports"), Some(0));
        assert_eq!(map.get("servers[0].ports"), Some(1));
        assert_eq!(map.get("broken"), None);
        assert_eq!(map.len(), 2);
    }
}
