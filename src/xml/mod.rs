//! XML element trees.
//!
//! Writing maps the tree onto elements: map entries become child elements,
//! `@` keys become attributes, `_text` the element text and list entries
//! `<item>` elements. Reading goes the other way and has to guess: an element
//! whose children repeat a tag is read as a list, leaf text is typed, and the
//! root tag is remembered in the metadata block under [`ROOT_NAME_KEY`].
//!
//! ```rust
//! use datatree_text::{tree, xml, Document, LineEnding, Value, WriteOptions};
//!
//! let doc = Document::new(tree!({ "ports": [8001, 8002] }));
//! let options = WriteOptions::new().with_line_ending(LineEnding::Lf);
//! let text = xml::to_string(&doc, &options);
//! assert!(text.ends_with("<xml><ports><item>8001</item><item>8002</item></ports></xml>"));
//!
//! let back = xml::from_str(&text).unwrap();
//! assert_eq!(back.get("ports[1]").unwrap(), Some(&Value::Int(8002)));
//! ```

mod de;
mod ser;

use crate::codec::Codec;
use crate::{Document, Result, WriteOptions};

/// Format name under which [`XmlCodec`] registers.
pub const FORMAT: &str = "xml";

/// Metadata key holding the tag of the root element.
pub const ROOT_NAME_KEY: &str = "rootName";

/// Root tag that is not worth recording.
pub const DEFAULT_ROOT_NAME: &str = "xml";

/// Renders a document as XML, header included.
///
/// The root tag is the root map's `_name`, else the recorded
/// [`ROOT_NAME_KEY`], else [`WriteOptions::root_name`].
#[must_use]
pub fn to_string(doc: &Document, options: &WriteOptions) -> String {
    ser::write(doc, options)
}

/// Parses XML text.
///
/// Leaf text is typed: `true`/`false` become booleans and unsigned digits
/// numbers. An empty element reads as [`Value::Null`](crate::Value::Null),
/// so an empty string written by [`to_string`] comes back as null rather than
/// `""`, and a list with a single entry comes back as a map.
///
/// ```rust
/// use datatree_text::{tree, xml, Document, Value, WriteOptions};
///
/// let text = xml::to_string(&Document::new(tree!({ "a": "", "b": "x" })), &WriteOptions::new());
/// let back = xml::from_str(&text).unwrap();
/// assert_eq!(back.get("a").unwrap(), Some(&Value::Null));
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`](crate::Error::MalformedDocument) if the
/// text is not well-formed or has no single root element.
pub fn from_str(s: &str) -> Result<Document> {
    de::parse(s)
}

/// The XML codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn format(&self) -> &str {
        FORMAT
    }

    fn read(&self, input: &str) -> Result<Document> {
        from_str(input)
    }

    fn write(&self, doc: &Document, options: &WriteOptions) -> Result<String> {
        Ok(to_string(doc, options))
    }
}
