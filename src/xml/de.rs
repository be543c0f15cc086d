//! XML text → tree.
//!
//! The text is first read into a plain element tree with `quick-xml`, then
//! converted. XML has no arrays either: an element whose children repeat a tag
//! is taken as a list, everything else as a map. Leaf text is typed on the way
//! in (`true`/`false`, integers, decimals).

use super::ser::ITEM_TAG;
use super::{DEFAULT_ROOT_NAME, ROOT_NAME_KEY};
use crate::document::{Document, META_KEY};
use crate::value::{ATTRIBUTE_PREFIX, ITEMS_KEY, NAME_KEY, TEXT_KEY};
use crate::{Decimal, Error, Result, TreeMap, Value};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use tracing::debug;

/// A parsed element, before any inference.
#[derive(Debug, Default)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<Element>,
    pub(crate) text: String,
}

impl Element {
    /// Whether two or more children share a tag.
    fn has_repeated_children(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.children.len());
        self.children.iter().any(|child| !seen.insert(child.name.as_str()))
    }
}

fn start_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element {
        name: reader.decode(start.name()).into_owned(),
        ..Element::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| Error::malformed_document(reader.buffer_position(), e))?;
        let key = reader.decode(attribute.key).into_owned();
        let value = attribute
            .unescape_and_decode_value(reader)
            .map_err(|e| Error::malformed_document(reader.buffer_position(), e))?;
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Reads the single root element of `source`.
pub(crate) fn parse_element_tree(source: &str) -> Result<Element> {
    let mut reader = Reader::from_str(source);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let finished = match reader
            .read_event(&mut buf)
            .map_err(|e| Error::malformed_document(reader.buffer_position(), e))?
        {
            Event::Start(ref start) => {
                stack.push(start_element(&reader, start)?);
                None
            }
            Event::Empty(ref start) => Some(start_element(&reader, start)?),
            Event::End(_) => stack.pop(),
            Event::Text(ref text) => {
                let text = text
                    .unescape_and_decode(&reader)
                    .map_err(|e| Error::malformed_document(reader.buffer_position(), e))?;
                match stack.last_mut() {
                    Some(parent) => parent.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(Error::malformed_document(
                            reader.buffer_position(),
                            "text outside the root element",
                        ))
                    }
                }
                None
            }
            Event::CData(ref text) => {
                let text = reader.decode(text.escaped()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.text.push_str(&text),
                    None => {
                        return Err(Error::malformed_document(
                            reader.buffer_position(),
                            "character data outside the root element",
                        ))
                    }
                }
                None
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(Error::malformed_document(
                        reader.buffer_position(),
                        format!("unclosed element <{}>", open.name),
                    ));
                }
                break;
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => None,
        };

        if let Some(element) = finished {
            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None if root.is_none() => root = Some(element),
                None => {
                    return Err(Error::malformed_document(
                        reader.buffer_position(),
                        "more than one root element",
                    ))
                }
            }
        }
        buf.clear();
    }

    root.ok_or_else(|| Error::malformed_document(reader.buffer_position(), "no root element"))
}

/// Types the text of a leaf element.
///
/// ```text
/// ""        → Null
/// "true"    → Bool(true)
/// "42"      → Int(42)
/// "3.5"     → Float(3.5)
/// "99…9"    → Decimal (when the integer does not fit an i64)
/// "v1.2"    → String
/// ```
pub(crate) fn typed_scalar(text: &str) -> Value {
    match text {
        "" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    let points = text.bytes().filter(|&b| b == b'.').count();
    let numeric = points <= 1
        && text.bytes().any(|b| b.is_ascii_digit())
        && text.bytes().all(|b| b == b'.' || b.is_ascii_digit());
    if !numeric {
        return Value::String(text.to_string());
    }

    if points == 0 {
        if let Ok(i) = text.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(d) = text.parse::<Decimal>() {
            return Value::Decimal(d);
        }
    } else if let Ok(f) = text.parse::<f64>() {
        return Value::Float(f);
    }
    Value::String(text.to_string())
}

fn attribute_map(element: &Element) -> TreeMap {
    let mut map = TreeMap::with_capacity(element.attributes.len());
    for (name, value) in &element.attributes {
        map.insert(format!("{}{}", ATTRIBUTE_PREFIX, name), Value::String(value.clone()));
    }
    map
}

/// Converts an element into a tree node.
pub(crate) fn element_to_value(element: &Element) -> Value {
    if element.children.is_empty() {
        if element.attributes.is_empty() {
            return typed_scalar(&element.text);
        }
        let mut map = attribute_map(element);
        if !element.text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(element.text.clone()));
        }
        return Value::Map(map);
    }

    if !element.text.trim().is_empty() {
        debug!(element = %element.name, "dropping text of an element with child elements");
    }

    let mut map = attribute_map(element);
    if element.has_repeated_children() {
        let items = element.children.iter().map(item_value).collect();
        if map.is_empty() {
            return Value::List(items);
        }
        map.insert(ITEMS_KEY.to_string(), Value::List(items));
        return Value::Map(map);
    }

    for child in &element.children {
        map.insert(child.name.clone(), element_to_value(child));
    }
    Value::Map(map)
}

/// A list entry. Maps keep a tag other than `item` under `_name`.
fn item_value(element: &Element) -> Value {
    match element_to_value(element) {
        Value::Map(map) if element.name != ITEM_TAG => {
            let mut named = TreeMap::with_capacity(map.len() + 1);
            named.insert(NAME_KEY.to_string(), Value::String(element.name.clone()));
            for (key, value) in map {
                named.insert(key, value);
            }
            Value::Map(named)
        }
        value => value,
    }
}

/// Parses XML text into a document.
pub(crate) fn parse(source: &str) -> Result<Document> {
    let mut root = parse_element_tree(source)?;

    let mut meta = TreeMap::new();
    if let Some(position) = root.children.iter().position(|child| child.name == META_KEY) {
        let block = root.children.remove(position);
        if let Value::Map(map) = element_to_value(&block) {
            meta = map;
        }
    }
    if root.name == DEFAULT_ROOT_NAME {
        meta.remove(ROOT_NAME_KEY);
    } else {
        meta.insert(ROOT_NAME_KEY.to_string(), Value::String(root.name.clone()));
    }

    let value = element_to_value(&root);
    debug!(root = %root.name, "parsed xml text");
    Ok(Document::with_meta(value, meta))
}
