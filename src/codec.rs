//! Format-independent access to the text codecs.
//!
//! A [`CodecRegistry`] is an explicit table from format name to [`Codec`]. It
//! is built by the caller and passed around by reference; nothing is
//! registered globally.
//!
//! ```rust
//! use datatree_text::{CodecRegistry, WriteOptions};
//!
//! let registry = CodecRegistry::with_builtin();
//! let doc = registry.read("properties", "a.1=x\na.2=y").unwrap();
//! let xml = registry.write("xml", &doc, &WriteOptions::new()).unwrap();
//! assert!(xml.contains("<a><item>x</item><item>y</item></a>"));
//!
//! assert!(registry.read("yaml", "a: 1").is_err());
//! ```

use crate::properties::PropertiesCodec;
use crate::xml::XmlCodec;
use crate::{Document, Error, Result, WriteOptions};
use indexmap::IndexMap;
use std::fmt;

/// A text format that can be read into and written from a [`Document`].
pub trait Codec {
    /// The name the codec is registered under, e.g. `"xml"`.
    fn format(&self) -> &str;

    /// Parses `input` into a document.
    fn read(&self, input: &str) -> Result<Document>;

    /// Parses raw bytes. The default accepts UTF-8 only.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedDocument`] at the first invalid byte when `input` is
    /// not UTF-8, otherwise whatever [`Codec::read`] reports.
    fn read_slice(&self, input: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(input)
            .map_err(|e| Error::malformed_document(e.valid_up_to(), e))?;
        self.read(text)
    }

    /// Renders `doc` as text.
    fn write(&self, doc: &Document, options: &WriteOptions) -> Result<String>;
}

/// Format name → codec table.
#[derive(Default)]
pub struct CodecRegistry {
    codecs: IndexMap<String, Box<dyn Codec + Send + Sync>>,
}

impl CodecRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        CodecRegistry {
            codecs: IndexMap::new(),
        }
    }

    /// A registry holding the property-text and XML codecs.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = CodecRegistry::new();
        registry.register(PropertiesCodec);
        registry.register(XmlCodec);
        registry
    }

    /// Adds `codec` under its format name, replacing any codec registered
    /// under the same name.
    pub fn register<C>(&mut self, codec: C)
    where
        C: Codec + Send + Sync + 'static,
    {
        let format = codec.format().to_string();
        tracing::debug!(format = %format, "registering codec");
        self.codecs.insert(format, Box::new(codec));
    }

    #[must_use]
    pub fn get(&self, format: &str) -> Option<&(dyn Codec + Send + Sync)> {
        self.codecs.get(format).map(|codec| codec.as_ref())
    }

    /// Registered format names, in registration order.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    fn codec(&self, format: &str) -> Result<&(dyn Codec + Send + Sync)> {
        self.get(format).ok_or_else(|| Error::unknown_format(format))
    }

    /// Reads `input` with the codec registered for `format`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] if nothing is registered for `format`, or
    /// whatever the codec reports.
    pub fn read(&self, format: &str, input: &str) -> Result<Document> {
        self.codec(format)?.read(input)
    }

    /// Reads raw bytes with the codec registered for `format`, leaving the
    /// text decoding to the codec.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] if nothing is registered for `format`, or
    /// whatever the codec reports.
    pub fn read_slice(&self, format: &str, input: &[u8]) -> Result<Document> {
        self.codec(format)?.read_slice(input)
    }

    /// Writes `doc` with the codec registered for `format`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] if nothing is registered for `format`, or
    /// whatever the codec reports.
    pub fn write(&self, format: &str, doc: &Document, options: &WriteOptions) -> Result<String> {
        self.codec(format)?.write(doc, options)
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("formats", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tree, LineEnding, Value};

    struct Upper;

    impl Codec for Upper {
        fn format(&self) -> &str {
            "upper"
        }

        fn read(&self, input: &str) -> Result<Document> {
            Ok(Document::new(Value::from(input.to_uppercase())))
        }

        fn write(&self, doc: &Document, _options: &WriteOptions) -> Result<String> {
            doc.root()
                .as_str()
                .map(str::to_uppercase)
                .ok_or_else(|| Error::unsupported_type("only string roots"))
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = CodecRegistry::new();
        assert_eq!(registry.formats().count(), 0);
        assert!(matches!(
            registry.read("xml", "<xml/>"),
            Err(Error::UnknownFormat(ref f)) if f == "xml"
        ));
    }

    #[test]
    fn test_builtin_formats() {
        let registry = CodecRegistry::with_builtin();
        assert_eq!(registry.formats().collect::<Vec<_>>(), vec!["properties", "xml"]);
        assert!(registry.get("properties").is_some());
        assert!(registry.get("json").is_none());
    }

    #[test]
    fn test_custom_codec() {
        let mut registry = CodecRegistry::with_builtin();
        registry.register(Upper);
        let doc = registry.read("upper", "abc").unwrap();
        assert_eq!(doc.root(), &Value::from("ABC"));
        assert!(registry.write("upper", &Document::new(tree!([1])), &WriteOptions::new()).is_err());
    }

    #[test]
    fn test_read_slice_decoding() {
        let registry = CodecRegistry::with_builtin();
        let doc = registry.read_slice("properties", b"name=caf\xe9").unwrap();
        assert_eq!(doc.get("name").unwrap(), Some(&Value::from("caf\u{e9}")));

        assert!(matches!(
            registry.read_slice("xml", b"<xml>\xff</xml>"),
            Err(Error::MalformedDocument { position: 5, .. })
        ));
        let mut registry = registry;
        registry.register(Upper);
        assert_eq!(registry.read_slice("upper", b"abc").unwrap().root(), &Value::from("ABC"));
    }

    #[test]
    fn test_cross_format() {
        let registry = CodecRegistry::with_builtin();
        let options = WriteOptions::new().with_line_ending(LineEnding::Lf);
        let doc = registry.read("xml", "<xml><a>1</a><b><c>x</c></b></xml>").unwrap();
        assert_eq!(registry.write("properties", &doc, &options).unwrap(), "a=1\nb.c=x\n");
    }
}
