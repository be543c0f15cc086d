//! Tree → XML text.

use super::ROOT_NAME_KEY;
use crate::document::{Document, META_KEY};
use crate::value::{ATTRIBUTE_PREFIX, ITEMS_KEY, NAME_KEY, TEXT_KEY};
use crate::{TreeMap, Value, WriteOptions};
use std::borrow::Cow;

pub(crate) const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Tag used for list entries without a name of their own.
pub(crate) const ITEM_TAG: &str = "item";

/// Escapes the five XML special characters in text and attribute values.
pub(crate) fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(|c: char| matches!(c, '<' | '>' | '&' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

type Attributes<'v> = Vec<(&'v str, Cow<'v, str>)>;

pub(crate) struct XmlWriter {
    output: String,
    pretty: bool,
    indent: usize,
    line_ending: &'static str,
}

impl XmlWriter {
    pub(crate) fn new(options: &WriteOptions) -> Self {
        XmlWriter {
            output: String::with_capacity(512),
            pretty: options.pretty,
            indent: options.indent,
            line_ending: options.line_ending.as_str(),
        }
    }

    pub(crate) fn into_inner(self) -> String {
        self.output
    }

    fn newline(&mut self) {
        if self.pretty {
            self.output.push_str(self.line_ending);
        }
    }

    fn pad(&mut self, depth: usize) {
        if self.pretty {
            for _ in 0..depth * self.indent {
                self.output.push(' ');
            }
        }
    }

    fn open_tag(&mut self, tag: &str, attributes: &[(&str, Cow<'_, str>)]) {
        self.output.push('<');
        self.output.push_str(tag);
        for (name, value) in attributes {
            self.output.push(' ');
            self.output.push_str(name);
            self.output.push_str("=\"");
            self.output.push_str(&escape_xml(value));
            self.output.push('"');
        }
    }

    fn close_tag(&mut self, tag: &str) {
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
    }

    pub(crate) fn write_element(&mut self, tag: &str, value: &Value, depth: usize) {
        match value {
            Value::Map(map) => self.write_map(tag, map, depth, None),
            Value::List(items) => self.write_list(tag, items, depth, None),
            Value::Null => {
                self.open_tag(tag, &[]);
                self.output.push_str("/>");
            }
            scalar => {
                let text = scalar.to_text().unwrap_or_default();
                self.open_tag(tag, &[]);
                self.output.push('>');
                self.output.push_str(&escape_xml(&text));
                self.close_tag(tag);
            }
        }
    }

    fn write_list(&mut self, tag: &str, items: &[Value], depth: usize, meta: Option<&TreeMap>) {
        let children = items.iter().map(|item| (ITEM_TAG, item)).collect();
        self.write_container(tag, &[], children, depth, meta);
    }

    /// Writes a map node. Attributes come from `@` keys, `_name` overrides
    /// `tag` and `_text` replaces all element children.
    fn write_map(&mut self, tag: &str, map: &TreeMap, depth: usize, meta: Option<&TreeMap>) {
        let tag = map.get(NAME_KEY).and_then(Value::as_str).unwrap_or(tag);
        let attributes: Attributes<'_> = map
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(ATTRIBUTE_PREFIX)?;
                Some((name, value.to_text()?))
            })
            .collect();

        if let Some(text) = map.get(TEXT_KEY).and_then(|text| text.to_text()) {
            self.open_tag(tag, &attributes);
            self.output.push('>');
            self.output.push_str(&escape_xml(text.trim()));
            self.close_tag(tag);
            return;
        }

        let mut children = Vec::with_capacity(map.len());
        let mut items = None;
        for (key, value) in map {
            if key.starts_with(ATTRIBUTE_PREFIX) || key == NAME_KEY || key == TEXT_KEY {
                continue;
            }
            match (key.as_str(), value) {
                (ITEMS_KEY, Value::List(list)) => items = Some(list),
                ("", _) => children.push((ITEM_TAG, value)),
                (key, _) => children.push((key, value)),
            }
        }
        // positional children always follow the named ones
        if let Some(list) = items {
            children.extend(list.iter().map(|item| (ITEM_TAG, item)));
        }
        self.write_container(tag, &attributes, children, depth, meta);
    }

    fn write_container(
        &mut self,
        tag: &str,
        attributes: &[(&str, Cow<'_, str>)],
        children: Vec<(&str, &Value)>,
        depth: usize,
        meta: Option<&TreeMap>,
    ) {
        let meta = meta.filter(|meta| !meta.is_empty());
        self.open_tag(tag, attributes);
        if children.is_empty() && meta.is_none() {
            self.output.push_str("/>");
            return;
        }
        self.output.push('>');
        if let Some(meta) = meta {
            self.newline();
            self.pad(depth + 1);
            self.write_map(META_KEY, meta, depth + 1, None);
        }
        for (name, child) in children {
            self.newline();
            self.pad(depth + 1);
            self.write_element(name, child, depth + 1);
        }
        self.newline();
        self.pad(depth);
        self.close_tag(tag);
    }
}

/// Renders a document as XML.
pub(crate) fn write(doc: &Document, options: &WriteOptions) -> String {
    let mut writer = XmlWriter::new(options);
    writer.output.push_str(XML_HEADER);
    writer.output.push_str(writer.line_ending);

    let tag = doc
        .meta()
        .get(ROOT_NAME_KEY)
        .and_then(Value::as_str)
        .unwrap_or(&options.root_name);
    let meta = if options.insert_meta {
        Some(doc.meta())
    } else {
        None
    };
    match doc.root() {
        Value::Map(map) => writer.write_map(tag, map, 0, meta),
        Value::List(items) => writer.write_list(tag, items, 0, meta),
        scalar => {
            if meta.map_or(false, |meta| !meta.is_empty()) {
                tracing::debug!("scalar root element cannot carry metadata, skipping it");
            }
            writer.write_element(tag, scalar, 0);
        }
    }
    tracing::debug!(bytes = writer.output.len(), "wrote xml text");
    writer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tree, LineEnding};

    const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

    fn compact() -> WriteOptions {
        WriteOptions::new().with_line_ending(LineEnding::Lf)
    }

    fn render(value: Value) -> String {
        let xml = write(&Document::new(value), &compact());
        xml[HEADER.len()..].to_string()
    }

    #[test]
    fn test_header() {
        let xml = write(&Document::new(tree!({ "a": 1 })), &compact());
        assert!(xml.starts_with(HEADER));
    }

    #[test]
    fn test_compact_map() {
        assert_eq!(
            render(tree!({ "name": "Alice", "age": 30, "address": { "city": "Paris" } })),
            "<xml><name>Alice</name><age>30</age><address><city>Paris</city></address></xml>"
        );
    }

    #[test]
    fn test_lists_use_item_tags() {
        assert_eq!(
            render(tree!({ "ports": [8001, 8002] })),
            "<xml><ports><item>8001</item><item>8002</item></ports></xml>"
        );
        assert_eq!(render(tree!([1, 2])), "<xml><item>1</item><item>2</item></xml>");
    }

    #[test]
    fn test_named_list_items() {
        let value = tree!({ "users": [{ "_name": "user", "id": 1 }, { "_name": "user", "id": 2 }] });
        assert_eq!(
            render(value),
            "<xml><users><user><id>1</id></user><user><id>2</id></user></users></xml>"
        );
    }

    #[test]
    fn test_attributes_and_text() {
        let value = tree!({ "price": { "@currency": "EUR", "_text": " 9.99 ", "ignored": 1 } });
        assert_eq!(
            render(value),
            "<xml><price currency=\"EUR\">9.99</price></xml>"
        );
    }

    #[test]
    fn test_items_follow_named_children() {
        let value = tree!({ "list": { "_items": [1, 2], "@kind": "nums", "title": "t" } });
        assert_eq!(
            render(value),
            "<xml><list kind=\"nums\"><title>t</title><item>1</item><item>2</item></list></xml>"
        );
    }

    #[test]
    fn test_null_and_empty() {
        assert_eq!(
            render(tree!({ "none": null, "empty": {}, "attrs": { "@id": "7" } })),
            "<xml><none/><empty/><attrs id=\"7\"/></xml>"
        );
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            render(tree!({ "q": "<a href=\"x\">Tom & Jerry's</a>", "e": { "@v": "1<2" } })),
            "<xml><q>&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;</q><e v=\"1&lt;2\"/></xml>"
        );
    }

    #[test]
    fn test_pretty() {
        let options = WriteOptions::pretty().with_line_ending(LineEnding::Lf);
        let doc = Document::new(tree!({ "a": 1, "b": { "c": [true, null] } }));
        assert_eq!(
            write(&doc, &options),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <xml>\n  <a>1</a>\n  <b>\n    <c>\n      <item>true</item>\n      <item/>\n    </c>\n  </b>\n</xml>"
        );

        let doc = Document::new(tree!({ "a": 1 }));
        let options = options.with_indent(4).with_line_ending(LineEnding::CrLf);
        assert_eq!(
            write(&doc, &options),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n<xml>\r\n    <a>1</a>\r\n</xml>"
        );
    }

    #[test]
    fn test_root_name_resolution() {
        let options = compact().with_root_name("config");
        let doc = Document::new(tree!({ "a": 1 }));
        assert!(write(&doc, &options).ends_with("<config><a>1</a></config>"));

        let mut meta = TreeMap::new();
        meta.insert(ROOT_NAME_KEY.to_string(), Value::from("person"));
        let doc = Document::with_meta(tree!({ "a": 1 }), meta);
        assert!(write(&doc, &options).ends_with("<person><a>1</a></person>"));

        let doc = Document::new(tree!({ "_name": "user", "a": 1 }));
        assert!(write(&doc, &options).ends_with("<user><a>1</a></user>"));
    }

    #[test]
    fn test_insert_meta_comes_first() {
        let mut meta = TreeMap::new();
        meta.insert("owner".to_string(), Value::from("ops"));
        let doc = Document::with_meta(tree!({ "a": 1 }), meta);
        let xml = write(&doc, &compact().with_insert_meta(true));
        assert!(xml.ends_with("<xml><_meta><owner>ops</owner></_meta><a>1</a></xml>"));
    }

    #[test]
    fn test_scalar_root() {
        assert_eq!(render(Value::from("hi")), "<xml>hi</xml>");
        assert_eq!(render(Value::Null), "<xml/>");
    }
}
