//! Error types for tree/text conversion.
//!
//! The codecs are forgiving: an ambiguous key group or an odd-looking
//! scalar never produces an error, it falls back to the conservative reading (a map
//! instead of an array, a string instead of a number). What remains are the cases
//! where no sensible tree can be built at all.
//!
//! ## Error Categories
//!
//! - **Malformed paths**: bracket or segment syntax errors in a path string
//! - **Malformed documents**: XML the underlying parser rejects
//! - **Unknown formats**: registry lookups for a format nobody registered
//! - **I/O Errors**: reading or writing failures
//!
//! ## Examples
//!
//! ```rust
//! use datatree_text::{Document, Error};
//!
//! let mut doc = Document::default();
//! let err = doc.put("account[1.name", "x").unwrap_err();
//! assert!(matches!(err, Error::MalformedPath { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while reading or writing a document.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Bad bracket or segment syntax in a path string
    #[error("Malformed path {path:?} at position {position}: {msg}")]
    MalformedPath {
        path: String,
        position: usize,
        msg: String,
    },

    /// The document could not be parsed; the message comes from the underlying parser
    #[error("Malformed document at byte {position}: {msg}")]
    MalformedDocument { position: usize, msg: String },

    /// No codec is registered under the requested format name
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Unsupported type for conversion into a tree
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a path syntax error pointing at a character offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatree_text::Error;
    ///
    /// let err = Error::malformed_path("a[x]", 2, "index is not numeric");
    /// assert!(err.to_string().contains("position 2"));
    /// ```
    pub fn malformed_path(path: &str, position: usize, msg: &str) -> Self {
        Error::MalformedPath {
            path: path.to_string(),
            position,
            msg: msg.to_string(),
        }
    }

    /// Creates a document error carrying the parser's byte position and message.
    pub fn malformed_document<T: fmt::Display>(position: usize, msg: T) -> Self {
        Error::MalformedDocument {
            position,
            msg: msg.to_string(),
        }
    }

    /// Creates an unknown format error for registry lookups.
    pub fn unknown_format(format: &str) -> Self {
        Error::UnknownFormat(format.to_string())
    }

    /// Creates an unsupported type error for values that cannot enter a tree.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatree_text::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
