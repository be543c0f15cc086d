//! Tree → property text.

use super::first_index::FirstIndexMap;
use crate::document::{Document, META_KEY};
use crate::escape::{escape, EscapeTable};
use crate::path::Path;
use crate::{Value, WriteOptions};
use tracing::{debug, trace};

/// Flattens a tree into `key=value` lines.
///
/// Keys are built from the tree path, with every list index shifted by the
/// base recorded for that list.
pub(crate) struct PropertiesWriter {
    output: String,
    line_ending: &'static str,
    first_indexes: FirstIndexMap,
    lines: usize,
}

impl PropertiesWriter {
    pub(crate) fn new(options: &WriteOptions, first_indexes: FirstIndexMap) -> Self {
        PropertiesWriter {
            output: String::with_capacity(256),
            line_ending: options.line_ending.as_str(),
            first_indexes,
            lines: 0,
        }
    }

    pub(crate) fn into_inner(self) -> String {
        self.output
    }

    fn join(key: &str, segment: &str) -> String {
        if key.is_empty() {
            segment.to_string()
        } else {
            let mut joined = String::with_capacity(key.len() + segment.len() + 1);
            joined.push_str(key);
            joined.push('.');
            joined.push_str(segment);
            joined
        }
    }

    /// Writes `value` and everything below it. `path` is the tree path of
    /// `value` and `key` its already rendered flat key.
    pub(crate) fn write_value(&mut self, value: &Value, path: &mut Path, key: &str) {
        match value {
            Value::Map(map) => {
                for (name, child) in map {
                    path.push_name(name);
                    self.write_value(child, path, &Self::join(key, name));
                    path.pop();
                }
            }
            Value::List(items) => {
                let base = self.first_indexes.base_for(path);
                for (index, child) in items.iter().enumerate() {
                    path.push_index(index);
                    self.write_value(child, path, &Self::join(key, &(index + base).to_string()));
                    path.pop();
                }
            }
            scalar => {
                let text = scalar.to_text().unwrap_or_default();
                self.write_line(key, &text);
            }
        }
    }

    fn write_line(&mut self, key: &str, value: &str) {
        trace!(key, "writing property");
        self.output.push_str(&escape(key, EscapeTable::Key));
        self.output.push('=');
        let value = escape(value, EscapeTable::Value);
        // the reader drops leading blanks of a value
        if value.starts_with(' ') {
            self.output.push('\\');
        }
        self.output.push_str(&value);
        self.output.push_str(self.line_ending);
        self.lines += 1;
    }
}

/// Renders a document as property text.
pub(crate) fn write(doc: &Document, options: &WriteOptions) -> String {
    let mut writer = PropertiesWriter::new(options, doc.first_indexes());
    let mut path = Path::root();
    writer.write_value(doc.root(), &mut path, "");

    if options.insert_meta && !doc.meta().is_empty() {
        // metadata lists are not covered by the recorded bases
        writer.first_indexes = FirstIndexMap::new();
        for (name, value) in doc.meta() {
            let mut path = Path::root();
            path.push_name(name);
            let key = PropertiesWriter::join(META_KEY, name);
            writer.write_value(value, &mut path, &key);
        }
    }

    debug!(lines = writer.lines, "wrote property text");
    writer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::FIRST_INDEX_KEY;
    use crate::{tree, LineEnding, TreeMap};

    fn lf() -> WriteOptions {
        WriteOptions::new().with_line_ending(LineEnding::Lf)
    }

    fn render(value: Value) -> String {
        write(&Document::new(value), &lf())
    }

    #[test]
    fn test_nested_maps() {
        let value = tree!({ "database": { "host": "localhost", "port": 5432 }, "debug": true });
        assert_eq!(
            render(value),
            "database.host=localhost\ndatabase.port=5432\ndebug=true\n"
        );
    }

    #[test]
    fn test_lists_default_to_one_based() {
        let value = tree!({ "account": [{ "name": "Admin" }, { "name": "User" }] });
        assert_eq!(render(value), "account.1.name=Admin\naccount.2.name=User\n");
    }

    #[test]
    fn test_recorded_bases_are_used() {
        let mut bases = FirstIndexMap::new();
        bases.record(&"ports".parse().unwrap(), 0);
        bases.record(&"servers[1].tags".parse().unwrap(), 0);

        let mut meta = TreeMap::new();
        meta.insert(FIRST_INDEX_KEY.to_string(), bases.to_value());
        let root = tree!({
            "ports": [8001, 8002],
            "servers": [{ "tags": ["a"] }, { "tags": ["b", "c"] }]
        });
        let text = write(&Document::with_meta(root, meta), &lf());
        assert_eq!(
            text,
            "ports.0=8001\nports.1=8002\n\
             servers.1.tags.1=a\n\
             servers.2.tags.0=b\nservers.2.tags.1=c\n"
        );
    }

    #[test]
    fn test_escaping() {
        let value = tree!({ "a b": "x=y", "c:d": "line\nbreak", "e": " padded" });
        assert_eq!(
            render(value),
            "a\\ b=x=y\nc\\:d=line\\nbreak\ne=\\ padded\n"
        );
    }

    #[test]
    fn test_null_and_empty_containers() {
        let value = tree!({ "none": null, "empty": {}, "nothing": [] });
        assert_eq!(render(value), "none=\n");
    }

    #[test]
    fn test_typed_scalars() {
        let value = Value::Map(
            vec![
                ("bytes".to_string(), Value::Bytes(vec![0xca, 0xfe])),
                ("big".to_string(), Value::Decimal("123456789012345678901234".parse().unwrap())),
                ("pi".to_string(), Value::Float(3.5)),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(
            render(value),
            "bytes=cafe\nbig=123456789012345678901234\npi=3.5\n"
        );
    }

    #[test]
    fn test_root_list_and_scalar() {
        assert_eq!(render(tree!(["a", "b"])), "1=a\n2=b\n");
        assert_eq!(render(Value::from("solo")), "=solo\n");
    }

    #[test]
    fn test_insert_meta() {
        let mut meta = TreeMap::new();
        meta.insert("owner".to_string(), Value::from("ops"));
        let doc = Document::with_meta(tree!({ "a": "1" }), meta);

        assert_eq!(write(&doc, &lf()), "a=1\n");
        assert_eq!(
            write(&doc, &lf().with_insert_meta(true)),
            "a=1\n_meta.owner=ops\n"
        );
    }

    #[test]
    fn test_crlf() {
        let options = WriteOptions::new().with_line_ending(LineEnding::CrLf);
        assert_eq!(write(&Document::new(tree!({ "a": 1, "b": 2 })), &options), "a=1\r\nb=2\r\n");
    }
}
