//! Configuration options for writing documents.
//!
//! - [`WriteOptions`]: main configuration struct shared by all codecs
//! - [`LineEnding`]: the terminator used between property lines and pretty XML lines
//!
//! ## Examples
//!
//! ```rust
//! use datatree_text::{Document, LineEnding, WriteOptions, tree};
//!
//! let doc = Document::new(tree!({ "name": "Alice" }));
//!
//! let options = WriteOptions::new().with_line_ending(LineEnding::CrLf);
//! let text = datatree_text::properties::to_string(&doc, &options);
//! assert_eq!(text, "name=Alice\r\n");
//!
//! let options = WriteOptions::pretty().with_indent(4).with_root_name("person");
//! let xml = datatree_text::xml::to_string(&doc, &options);
//! assert!(xml.contains("<person>"));
//! ```

/// Line terminator for generated text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineEnding {
    Lf,
    CrLf,
    /// `\r\n` on Windows, `\n` elsewhere.
    #[default]
    Native,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

/// Configuration options for writing a document.
///
/// Controls formatting (indentation, line endings), whether the metadata block
/// is embedded into the output, and the tag used for an unnamed XML root.
///
/// # Examples
///
/// ```rust
/// use datatree_text::WriteOptions;
///
/// let options = WriteOptions::new();
/// assert!(!options.pretty);
/// assert_eq!(options.root_name, "xml");
///
/// let options = WriteOptions::pretty().with_insert_meta(true);
/// assert!(options.pretty && options.insert_meta);
/// ```
#[derive(Clone, Debug)]
pub struct WriteOptions {
    pub pretty: bool,
    pub insert_meta: bool,
    pub indent: usize,
    pub line_ending: LineEnding,
    pub root_name: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            pretty: false,
            insert_meta: false,
            indent: 2,
            line_ending: LineEnding::default(),
            root_name: "xml".to_string(),
        }
    }
}

impl WriteOptions {
    /// Creates default options (compact, no metadata, native line endings).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for indented output.
    #[must_use]
    pub fn pretty() -> Self {
        WriteOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the number of spaces per nesting level. Only affects pretty output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Embeds the document's metadata block into the output.
    #[must_use]
    pub fn with_insert_meta(mut self, insert_meta: bool) -> Self {
        self.insert_meta = insert_meta;
        self
    }

    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Sets the XML root tag used when the document carries no name of its own.
    #[must_use]
    pub fn with_root_name(mut self, root_name: &str) -> Self {
        self.root_name = root_name.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = WriteOptions::default();
        assert!(!options.pretty);
        assert!(!options.insert_meta);
        assert_eq!(options.indent, 2);
        assert_eq!(options.line_ending, LineEnding::Native);
        assert_eq!(options.root_name, "xml");
    }

    #[test]
    fn test_builders_chain() {
        let options = WriteOptions::pretty()
            .with_indent(4)
            .with_insert_meta(true)
            .with_line_ending(LineEnding::CrLf)
            .with_root_name("config");
        assert!(options.pretty);
        assert!(options.insert_meta);
        assert_eq!(options.indent, 4);
        assert_eq!(options.line_ending.as_str(), "\r\n");
        assert_eq!(options.root_name, "config");
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
        assert!(LineEnding::Native.as_str().ends_with('\n'));
    }
}
