//! Dotted/bracketed path strings.
//!
//! A path addresses a node inside a tree: `account[1].name` is the `name` entry
//! of the second element of the `account` list. Names are separated by `.` and
//! list positions are written as `[n]` directly after the name they index. A
//! path may start with `[n]` when the root itself is a list, and the empty path
//! addresses the root.
//!
//! ```rust
//! use datatree_text::{Path, Segment};
//!
//! let path: Path = "account[1].name".parse().unwrap();
//! assert_eq!(
//!     path.segments(),
//!     &[
//!         Segment::Name("account".to_string()),
//!         Segment::Index(1),
//!         Segment::Name("name".to_string()),
//!     ]
//! );
//! assert_eq!(path.to_string(), "account[1].name");
//! ```

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named entry of a map-like node.
    Name(String),
    /// A position inside an array-like node, always 0-based.
    Index(usize),
}

impl Segment {
    #[inline]
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

/// An ordered sequence of [`Segment`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Segment>);

impl Path {
    /// Creates the empty path, which addresses the root.
    #[must_use]
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Parses a path string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPath`] on unmatched brackets, a non-numeric or
    /// empty index, an empty name, or anything other than `.` or `[` after `]`.
    pub fn parse(source: &str) -> Result<Self> {
        PathTokenizer::new(source).tokenize()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn push_name(&mut self, name: &str) {
        self.0.push(Segment::Name(name.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(Segment::Index(index));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Name(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

struct PathTokenizer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    segments: Vec<Segment>,
}

impl<'a> PathTokenizer<'a> {
    fn new(source: &'a str) -> Self {
        PathTokenizer {
            source,
            chars: source.char_indices().peekable(),
            segments: Vec::new(),
        }
    }

    fn error(&self, position: usize, msg: &str) -> Error {
        Error::malformed_path(self.source, position, msg)
    }

    fn tokenize(mut self) -> Result<Path> {
        if self.source.is_empty() {
            return Ok(Path::root());
        }
        loop {
            self.name_segment()?;
            self.index_suffixes()?;
            match self.chars.next() {
                None => return Ok(Path(self.segments)),
                Some((pos, '.')) => {
                    if self.chars.peek().is_none() {
                        return Err(self.error(pos + 1, "empty name after '.'"));
                    }
                }
                Some((pos, ']')) => return Err(self.error(pos, "unmatched ']'")),
                Some((pos, _)) => return Err(self.error(pos, "expected '.' or '[' after ']'")),
            }
        }
    }

    /// Reads a name up to the next `.` or `[`. A name may only be empty when an
    /// index follows directly (`[0].x` at the start, `a.[0]` is rejected).
    fn name_segment(&mut self) -> Result<()> {
        let start = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.source.len());
        let mut end = start;
        while let Some(&(pos, ch)) = self.chars.peek() {
            match ch {
                '.' | '[' => break,
                ']' => return Err(self.error(pos, "unmatched ']'")),
                _ => {
                    end = pos + ch.len_utf8();
                    self.chars.next();
                }
            }
        }
        if start == end {
            let leading_index = self.segments.is_empty()
                && matches!(self.chars.peek(), Some(&(_, '[')));
            if !leading_index {
                return Err(self.error(start, "empty name segment"));
            }
            return Ok(());
        }
        self.segments
            .push(Segment::Name(self.source[start..end].to_string()));
        Ok(())
    }

    fn index_suffixes(&mut self) -> Result<()> {
        while let Some(&(open, '[')) = self.chars.peek() {
            self.chars.next();
            let mut digits = String::new();
            loop {
                match self.chars.next() {
                    None => return Err(self.error(open, "unmatched '['")),
                    Some((_, ']')) => break,
                    Some((_, ch)) if ch.is_ascii_digit() => digits.push(ch),
                    Some((pos, '[')) => return Err(self.error(pos, "nested '['")),
                    Some((pos, _)) => return Err(self.error(pos, "index is not numeric")),
                }
            }
            if digits.is_empty() {
                return Err(self.error(open, "empty index"));
            }
            let index = digits
                .parse::<usize>()
                .map_err(|_| self.error(open + 1, "index out of range"))?;
            self.segments.push(Segment::Index(index));
        }
        Ok(())
    }
}
