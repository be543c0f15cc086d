//! The in-memory tree.
//!
//! [`Value`] is a closed set of node kinds. A node gets its kind once, when it
//! enters the tree (parsed from text, converted from a Rust value, or built by
//! hand), and every writer simply matches on it instead of inspecting the
//! content again.
//!
//! ## Structural nodes
//!
//! A structural node is either map-like ([`Value::Map`]) or array-like
//! ([`Value::List`]). XML attributes, element text and element tags travel
//! inside maps under reserved keys:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `@name` | attribute `name` |
//! | `_text` | element text content |
//! | `_name` | element tag, overriding the key the node is stored under |
//! | `_items` | positional children of an element that also has named entries |
//!
//! ## Examples
//!
//! ```rust
//! use datatree_text::{Path, Value, tree};
//!
//! let mut value = tree!({ "database": { "ports": [8001, 8002] } });
//! let path: Path = "database.ports[1]".parse().unwrap();
//! assert_eq!(value.get_path(&path), Some(&Value::Int(8002)));
//!
//! value.put_path(&"database.host".parse().unwrap(), Value::from("localhost"));
//! assert!(value.get_path(&"database".parse().unwrap()).unwrap().is_structural());
//! ```

use crate::path::{Path, Segment};
use crate::TreeMap;
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Reserved key carrying XML attributes (`@` + attribute name).
pub const ATTRIBUTE_PREFIX: char = '@';
/// Reserved key carrying element text.
pub const TEXT_KEY: &str = "_text";
/// Reserved key overriding the element tag.
pub const NAME_KEY: &str = "_name";
/// Reserved key holding positional children next to named entries.
pub const ITEMS_KEY: &str = "_items";

/// A node of the document tree.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
    Map(TreeMap),
}

/// An arbitrary precision decimal number: `unscaled * 10^-scale`.
///
/// Used for numeric text that does not fit the fixed-width variants.
///
/// ```rust
/// use datatree_text::Decimal;
///
/// let d: Decimal = "-1234.50".parse().unwrap();
/// assert_eq!(d.scale(), 2);
/// assert_eq!(d.to_string(), "-1234.50");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    #[must_use]
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Decimal { unscaled, scale }
    }

    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }
}

impl FromStr for Decimal {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (s, ""),
        };
        let digits = format!("{}{}", int_part, frac_part);
        let unscaled = digits
            .parse::<BigInt>()
            .map_err(|e| crate::Error::custom(format!("invalid decimal {:?}: {}", s, e)))?;
        let scale = u32::try_from(frac_part.len())
            .map_err(|_| crate::Error::custom(format!("decimal scale too large: {:?}", s)))?;
        Ok(Decimal { unscaled, scale })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.unscaled);
        }
        if self.unscaled.sign() == num_bigint::Sign::Minus {
            f.write_char('-')?;
        }
        let magnitude = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;
        if magnitude.len() > scale {
            let (int_part, frac_part) = magnitude.split_at(magnitude.len() - scale);
            return write!(f, "{}.{}", int_part, frac_part);
        }
        // zero padding is streamed, the scale is caller-controlled
        f.write_str("0.")?;
        for _ in magnitude.len()..scale {
            f.write_char('0')?;
        }
        f.write_str(&magnitude)
    }
}

/// The position of a child inside its parent, as yielded by [`Value::children`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    Name(&'a str),
    Index(usize),
}

impl Key<'_> {
    #[must_use]
    pub fn to_segment(self) -> Segment {
        match self {
            Key::Name(name) => Segment::Name(name.to_string()),
            Key::Index(index) => Segment::Index(index),
        }
    }
}

/// Ordered iterator over the direct children of a node.
pub enum Children<'a> {
    Leaf,
    List(std::iter::Enumerate<std::slice::Iter<'a, Value>>),
    Map(indexmap::map::Iter<'a, String, Value>),
}

impl<'a> Iterator for Children<'a> {
    type Item = (Key<'a>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Children::Leaf => None,
            Children::List(items) => items.next().map(|(i, v)| (Key::Index(i), v)),
            Children::Map(entries) => entries.next().map(|(k, v)| (Key::Name(k.as_str()), v)),
        }
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns `true` for nodes that hold other nodes (lists and maps).
    #[inline]
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Returns `true` for array-like nodes, whose children are addressed by position.
    #[inline]
    #[must_use]
    pub const fn is_enumeration(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&TreeMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut TreeMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Iterates the direct children in document order. Scalars have none.
    ///
    /// ```rust
    /// use datatree_text::{Key, Value, tree};
    ///
    /// let value = tree!(["a", "b"]);
    /// let keys: Vec<Key> = value.children().map(|(k, _)| k).collect();
    /// assert_eq!(keys, vec![Key::Index(0), Key::Index(1)]);
    /// ```
    pub fn children(&self) -> Children<'_> {
        match self {
            Value::List(items) => Children::List(items.iter().enumerate()),
            Value::Map(map) => Children::Map(map.iter()),
            _ => Children::Leaf,
        }
    }

    /// Text form of a scalar, as the text formats write it.
    ///
    /// `Null` is the empty string, bytes are lowercase hex and timestamps are
    /// RFC 3339. Structural nodes have no text form.
    #[must_use]
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        let text = match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Float(f) => Cow::Owned(f.to_string()),
            Value::Decimal(d) => Cow::Owned(d.to_string()),
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Bytes(bytes) => Cow::Owned(to_hex(bytes)),
            Value::Timestamp(ts) => Cow::Owned(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::List(_) | Value::Map(_) => return None,
        };
        Some(text)
    }

    /// Looks up the node at `path`, or `None` if any step is missing or of the
    /// wrong kind.
    #[must_use]
    pub fn get_path(&self, path: &Path) -> Option<&Value> {
        let mut node = self;
        for segment in path {
            node = match (segment, node) {
                (Segment::Name(name), Value::Map(map)) => map.get(name)?,
                (Segment::Index(index), Value::List(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Like [`Value::get_path`], falling back to `default`.
    #[must_use]
    pub fn get_path_or<'a>(&'a self, path: &Path, default: &'a Value) -> &'a Value {
        self.get_path(path).unwrap_or(default)
    }

    /// Stores `value` at `path`, creating containers on the way.
    ///
    /// A `Name` step turns the current node into a map and an `Index` step into
    /// a list (padded with `Null` up to the index). A node of the wrong kind is
    /// replaced rather than rejected.
    pub fn put_path(&mut self, path: &Path, value: Value) {
        let mut node = self;
        for segment in path {
            node = match segment {
                Segment::Name(name) => node
                    .reset_to_map()
                    .entry_or_insert_with(name, || Value::Null),
                Segment::Index(index) => {
                    let items = node.reset_to_list();
                    if items.len() <= *index {
                        items.resize(*index + 1, Value::Null);
                    }
                    &mut items[*index]
                }
            };
        }
        *node = value;
    }

    fn reset_to_map(&mut self) -> &mut TreeMap {
        if !self.is_map() {
            *self = Value::Map(TreeMap::new());
        }
        match self {
            Value::Map(map) => map,
            _ => unreachable!("node was just replaced by a map"),
        }
    }

    fn reset_to_list(&mut self) -> &mut Vec<Value> {
        if !self.is_list() {
            *self = Value::List(Vec::new());
        }
        match self {
            Value::List(items) => items,
            _ => unreachable!("node was just replaced by a list"),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0xF) as usize] as char);
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Null => f.write_str("null"),
            scalar => match scalar.to_text() {
                Some(text) => f.write_str(&text),
                None => Ok(()),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            Value::List(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any tree value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Int(i)),
                    Err(_) => Ok(Value::Decimal(Decimal::new(BigInt::from(value), 0))),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Value::Bytes(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    items.push(elem);
                }
                Ok(Value::List(items))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = TreeMap::new();
                while let Some((key, value)) = access.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Decimal(Decimal::new(BigInt::from(value), 0)),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<TreeMap> for Value {
    fn from(value: TreeMap) -> Self {
        Value::Map(value)
    }
}
