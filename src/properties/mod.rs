//! Flat `key=value` property text.
//!
//! Property text has no syntax for arrays, so the reader infers them: a group of
//! keys that only differ in a gap-free run of numbers starting at 0 or 1
//! becomes a list. Which of the two bases the text used is kept in the
//! document's metadata block (see [`FirstIndexMap`]) and reused by the writer,
//! so reading and writing again reproduces the same keys.
//!
//! ```rust
//! use datatree_text::{properties, LineEnding, Value, WriteOptions};
//!
//! let text = "database.ports.0=8001\ndatabase.ports.1=8002\n";
//! let doc = properties::from_str(text);
//! assert!(doc.get("database.ports").unwrap().unwrap().is_enumeration());
//! assert_eq!(doc.get("database.ports[1]").unwrap(), Some(&Value::from("8002")));
//!
//! let options = WriteOptions::new().with_line_ending(LineEnding::Lf);
//! assert_eq!(properties::to_string(&doc, &options), text);
//! ```

mod de;
mod first_index;
mod reader;
mod ser;

pub use first_index::{FirstIndexMap, DEFAULT_BASE, FIRST_INDEX_KEY};
pub use reader::unescape;

use crate::codec::Codec;
use crate::{Document, Result, WriteOptions};

/// Format name under which [`PropertiesCodec`] registers.
pub const FORMAT: &str = "properties";

/// Renders a document as property text.
///
/// Lists are numbered from the base recorded in the document's metadata, or
/// from [`DEFAULT_BASE`] when nothing was recorded for them.
#[must_use]
pub fn to_string(doc: &Document, options: &WriteOptions) -> String {
    ser::write(doc, options)
}

/// Parses property text. Every value is read back as a string.
///
/// Property text cannot be malformed: a line without a separator is a key with
/// an empty value.
#[must_use]
pub fn from_str(s: &str) -> Document {
    de::parse(s)
}

/// Parses property bytes, decoded as UTF-8 or, failing that, as ISO-8859-1.
#[must_use]
pub fn from_slice(bytes: &[u8]) -> Document {
    match std::str::from_utf8(bytes) {
        Ok(s) => de::parse(s),
        Err(e) => {
            tracing::debug!(error = %e, "property bytes are not UTF-8, decoding as ISO-8859-1");
            let latin1: String = bytes.iter().map(|&b| char::from(b)).collect();
            de::parse(&latin1)
        }
    }
}

/// The property-text codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertiesCodec;

impl Codec for PropertiesCodec {
    fn format(&self) -> &str {
        FORMAT
    }

    fn read(&self, input: &str) -> Result<Document> {
        Ok(from_str(input))
    }

    fn read_slice(&self, input: &[u8]) -> Result<Document> {
        Ok(from_slice(input))
    }

    fn write(&self, doc: &Document, options: &WriteOptions) -> Result<String> {
        Ok(to_string(doc, options))
    }
}
