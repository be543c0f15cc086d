//! Loader for `.properties` text.
//!
//! Follows the classic property-file rules: comment lines start with `#` or
//! `!`, a key ends at the first unescaped `=`, `:` or whitespace, a line ending
//! in an odd number of backslashes continues on the next line (whose leading
//! whitespace is dropped), and later duplicates of a key overwrite earlier ones
//! while keeping the first key's position.

use indexmap::IndexMap;

#[inline]
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// Splits property text into logical lines.
pub(crate) struct LineReader<'a> {
    input: &'a str,
    position: usize,
    line: usize,
}

impl<'a> LineReader<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        LineReader {
            input,
            position: 0,
            line: 0,
        }
    }

    /// Number of physical lines consumed so far.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    fn next_physical_line(&mut self) -> Option<&'a str> {
        if self.position >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.position..];
        let (content, consumed) = match rest.find(|c: char| c == '\n' || c == '\r') {
            Some(end) => {
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                (&rest[..end], end + terminator)
            }
            None => (rest, rest.len()),
        };
        self.position += consumed;
        self.line += 1;
        Some(content)
    }

    /// The next non-blank, non-comment logical line, continuations joined and
    /// still escaped.
    pub(crate) fn next_logical_line(&mut self) -> Option<String> {
        loop {
            let physical = self.next_physical_line()?.trim_start_matches(is_blank);
            if physical.is_empty() || physical.starts_with('#') || physical.starts_with('!') {
                continue;
            }
            let mut logical = physical.to_string();
            while ends_with_odd_backslashes(&logical) {
                logical.pop();
                match self.next_physical_line() {
                    Some(next) => logical.push_str(next.trim_start_matches(is_blank)),
                    None => break,
                }
            }
            return Some(logical);
        }
    }
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Splits a logical line into its raw (still escaped) key and value.
pub(crate) fn split_key_value(line: &str) -> (&str, &str) {
    let mut backslash = false;
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    for (i, c) in line.char_indices() {
        if backslash {
            backslash = false;
            continue;
        }
        match c {
            '\\' => backslash = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                has_separator = true;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                value_start = i + c.len_utf8();
                break;
            }
            _ => {}
        }
    }

    let mut value = line[value_start..].trim_start_matches(is_blank);
    if !has_separator {
        if let Some(rest) = value.strip_prefix(|c: char| c == '=' || c == ':') {
            value = rest.trim_start_matches(is_blank);
        }
    }
    (&line[..key_end], value)
}

/// Resolves backslash escapes in a raw key or value.
///
/// `\t`, `\n`, `\r` and `\f` are control characters, `\uXXXX` is a UTF-16 code
/// unit (consecutive surrogate escapes combine into one character) and any other
/// escaped character stands for itself. A `\u` not followed by four hex digits
/// keeps the literal `u`.
///
/// ```rust
/// use datatree_text::properties::unescape;
///
/// assert_eq!(unescape(r"a\ b\=c"), "a b=c");
/// assert_eq!(unescape(r"\u20AC \uD83D\uDE00"), "€ 😀");
/// assert_eq!(unescape(r"\uZZ"), "uZZ");
/// ```
#[must_use]
pub fn unescape(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut units: Vec<u16> = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut out, &mut units);
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some(escaped) => escaped,
            None => break,
        };
        if escaped == 'u' {
            let mut lookahead = chars.clone();
            let hex: String = lookahead.by_ref().take(4).collect();
            if hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                if let Ok(unit) = u16::from_str_radix(&hex, 16) {
                    units.push(unit);
                    chars = lookahead;
                    continue;
                }
            }
        }
        flush_units(&mut out, &mut units);
        out.push(match escaped {
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\u{c}',
            other => other,
        });
    }
    flush_units(&mut out, &mut units);
    out
}

fn flush_units(out: &mut String, units: &mut Vec<u16>) {
    if !units.is_empty() {
        out.push_str(&String::from_utf16_lossy(units));
        units.clear();
    }
}

/// Loads all key/value pairs, unescaped, in first-seen key order.
pub(crate) fn load(source: &str) -> IndexMap<String, String> {
    let mut reader = LineReader::new(source);
    let mut entries = IndexMap::new();
    while let Some(line) = reader.next_logical_line() {
        let (key, value) = split_key_value(&line);
        tracing::trace!(line = reader.line(), key, "property line");
        entries.insert(unescape(key), unescape(value));
    }
    entries
}
