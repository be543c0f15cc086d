//! # datatree_text
//!
//! Round-trip conversion between an ordered tree of values and two text formats
//! that cannot tell arrays from objects: flat `key=value` property text and XML.
//!
//! ## What gets inferred
//!
//! Neither format has array syntax, so structure is inferred when reading:
//!
//! - **Property text**: a group of keys that differ only in a gap-free run of
//!   numbers starting at 0 or 1 (`ports.0`, `ports.1`) becomes a list. The base
//!   the text used is remembered so writing the tree again gives the same keys.
//! - **XML**: an element whose children repeat a tag becomes a list. Leaf text
//!   is typed (`true`, `42`, `3.5`), attributes live under `@name` keys and the
//!   root tag is remembered.
//!
//! Whatever a format tells the reader that the tree cannot hold is kept in the
//! document's metadata block, which can be embedded into the output under the
//! reserved `_meta` key.
//!
//! ## Quick Start
//!
//! ```rust
//! use datatree_text::{properties, xml, LineEnding, Value, WriteOptions};
//!
//! let doc = properties::from_str("account.1.name=Admin\naccount.2.name=User\n");
//! assert_eq!(doc.get("account[1].name").unwrap(), Some(&Value::from("User")));
//!
//! let options = WriteOptions::new().with_line_ending(LineEnding::Lf);
//! assert_eq!(
//!     properties::to_string(&doc, &options),
//!     "account.1.name=Admin\naccount.2.name=User\n"
//! );
//!
//! let text = xml::to_string(&doc, &options);
//! assert!(text.contains("<account><item><name>Admin</name></item>"));
//! ```
//!
//! ### Building trees
//!
//! ```rust
//! use datatree_text::{tree, to_value, Document, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Server { host: &'static str, ports: Vec<u16> }
//!
//! let from_macro = tree!({ "host": "localhost", "ports": [80, 443] });
//! let from_serde = to_value(&Server { host: "localhost", ports: vec![80, 443] }).unwrap();
//! assert_eq!(from_macro, from_serde);
//!
//! let mut doc = Document::new(from_macro);
//! doc.put("ports[2]", 8080).unwrap();
//! assert_eq!(doc.get("ports[2]").unwrap(), Some(&Value::Int(8080)));
//! ```
//!
//! ### Choosing the format at runtime
//!
//! ```rust
//! use datatree_text::{CodecRegistry, WriteOptions};
//!
//! let registry = CodecRegistry::with_builtin();
//! let doc = registry.read("xml", "<config><debug>true</debug></config>").unwrap();
//! let text = registry.write("properties", &doc, &WriteOptions::new()).unwrap();
//! assert!(text.starts_with("debug=true"));
//! ```
//!
//! ## Logging
//!
//! Inference decisions and parse summaries are reported through `tracing` at
//! `debug` level, individual keys at `trace`. The library installs no
//! subscriber.

pub mod codec;
pub mod document;
pub mod error;
pub mod escape;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod properties;
pub mod ser;
pub mod value;
pub mod xml;

pub use codec::{Codec, CodecRegistry};
pub use document::{Document, META_KEY};
pub use error::{Error, Result};
pub use map::TreeMap;
pub use options::{LineEnding, WriteOptions};
pub use path::{Path, Segment};
pub use properties::FirstIndexMap;
pub use ser::{to_value, ValueSerializer};
pub use value::{Children, Decimal, Key, Value};

use std::io;

/// Writes `doc` in the given built-in format.
///
/// # Examples
///
/// ```rust
/// use datatree_text::{tree, Document, LineEnding, WriteOptions};
///
/// let doc = Document::new(tree!({ "a": { "b": 1 } }));
/// let options = WriteOptions::new().with_line_ending(LineEnding::Lf);
/// assert_eq!(datatree_text::to_string("properties", &doc, &options).unwrap(), "a.b=1\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] for anything but `properties` and `xml`.
pub fn to_string(format: &str, doc: &Document, options: &WriteOptions) -> Result<String> {
    CodecRegistry::with_builtin().write(format, doc, options)
}

/// Writes `doc` in the given built-in format to `writer`.
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] for an unknown format and [`Error::Io`] if
/// writing fails.
pub fn to_writer<W>(mut writer: W, format: &str, doc: &Document, options: &WriteOptions) -> Result<()>
where
    W: io::Write,
{
    let text = to_string(format, doc, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Reads a document in the given built-in format.
///
/// # Examples
///
/// ```rust
/// use datatree_text::Value;
///
/// let doc = datatree_text::from_str("xml", "<xml><a>1</a><a>2</a></xml>").unwrap();
/// assert_eq!(doc.get("[1]").unwrap(), Some(&Value::Int(2)));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] for an unknown format, or whatever the
/// codec reports.
pub fn from_str(format: &str, s: &str) -> Result<Document> {
    CodecRegistry::with_builtin().read(format, s)
}

/// Reads a document in the given built-in format from an I/O stream.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise whatever the codec
/// reports. Property input that is not UTF-8 is decoded as ISO-8859-1; XML
/// input must be UTF-8.
pub fn from_reader<R>(mut reader: R, format: &str) -> Result<Document>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    CodecRegistry::with_builtin().read_slice(format, &bytes)
}
