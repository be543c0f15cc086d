//! Character escaping for property keys and values.
//!
//! Two lookup tables cover Latin-1; everything above `0xFF` is written as a
//! `\uXXXX` escape (astral characters as a UTF-16 surrogate pair). Named escapes
//! win over the generic unicode form. The key table additionally protects the
//! characters that would otherwise end a key or start a comment.
//!
//! Unescaping is the job of the property-text reader, see
//! [`crate::properties::unescape`].
//!
//! ```rust
//! use datatree_text::escape::{escape, EscapeTable};
//!
//! assert_eq!(escape("a b=c", EscapeTable::Key), "a\\ b\\=c");
//! assert_eq!(escape("a b=c", EscapeTable::Value), "a b=c");
//! assert_eq!(escape("tab\there", EscapeTable::Value), "tab\\there");
//! assert_eq!(escape("\u{7f}", EscapeTable::Value), "\\u007F");
//! ```

use std::borrow::Cow;

/// Which character set to protect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeTable {
    Key,
    Value,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    Unicode,
    Named(u8),
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

const fn value_table() -> [Escape; 256] {
    let mut table = [Escape::None; 256];
    let mut i = 0;
    while i < 32 {
        table[i] = Escape::Unicode;
        table[128 + i] = Escape::Unicode;
        i += 1;
    }
    table[0x7F] = Escape::Unicode;
    table[b'\t' as usize] = Escape::Named(b't');
    table[b'\r' as usize] = Escape::Named(b'r');
    table[b'\n' as usize] = Escape::Named(b'n');
    table[b'\\' as usize] = Escape::Named(b'\\');
    table
}

const fn key_table() -> [Escape; 256] {
    let mut table = value_table();
    table[b'#' as usize] = Escape::Named(b'#');
    table[b'!' as usize] = Escape::Named(b'!');
    table[b'=' as usize] = Escape::Named(b'=');
    table[b':' as usize] = Escape::Named(b':');
    table[b' ' as usize] = Escape::Named(b' ');
    table
}

static VALUE_ESCAPES: [Escape; 256] = value_table();
static KEY_ESCAPES: [Escape; 256] = key_table();

impl EscapeTable {
    fn lookup(self, ch: char) -> Escape {
        let table = match self {
            EscapeTable::Key => &KEY_ESCAPES,
            EscapeTable::Value => &VALUE_ESCAPES,
        };
        match usize::try_from(u32::from(ch)) {
            Ok(code) if code < 256 => table[code],
            _ => Escape::Unicode,
        }
    }
}

/// Escapes `text` for use as a property key or value.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
#[must_use]
pub fn escape(text: &str, table: EscapeTable) -> Cow<'_, str> {
    let first = match text.char_indices().find(|&(_, ch)| table.lookup(ch) != Escape::None) {
        Some((pos, _)) => pos,
        None => return Cow::Borrowed(text),
    };

    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(&text[..first]);
    for ch in text[first..].chars() {
        match table.lookup(ch) {
            Escape::None => out.push(ch),
            Escape::Named(c) => {
                out.push('\\');
                out.push(c as char);
            }
            Escape::Unicode => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    push_unicode_escape(&mut out, *unit);
                }
            }
        }
    }
    Cow::Owned(out)
}

fn push_unicode_escape(out: &mut String, unit: u16) {
    out.push_str("\\u");
    for shift in [12, 8, 4, 0] {
        out.push(HEX[usize::from((unit >> shift) & 0xF)] as char);
    }
}
