//! Property text → tree.
//!
//! Keys are split into tokens on `.` and space. A numeric token turns into a
//! list index only if the whole group of keys sharing its prefix looks like a
//! list: every sibling token is numeric, no leaf index repeats, and the sorted
//! indices start at 0 or 1 without gaps. Anything else keeps the numeric tokens
//! as plain map keys. The decision is made once per prefix and memoized for the
//! rest of the parse.

use super::first_index::{FirstIndexMap, FIRST_INDEX_KEY};
use super::reader;
use crate::document::{Document, META_KEY};
use crate::path::Path;
use crate::{TreeMap, Value};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, trace};

struct Entry<'a> {
    tokens: Vec<&'a str>,
    value: &'a str,
}

fn tokenize(key: &str) -> Vec<&str> {
    key.split(|c: char| c == '.' || c == ' ')
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Per-parse cache of array/non-array decisions, keyed by prefix.
struct Classifier<'e, 'a> {
    entries: &'e [Entry<'a>],
    memo: HashMap<String, Option<usize>>,
}

impl<'e, 'a> Classifier<'e, 'a> {
    fn new(entries: &'e [Entry<'a>]) -> Self {
        Classifier {
            entries,
            memo: HashMap::new(),
        }
    }

    /// The base (0 or 1) if the keys under `prefix` form a list.
    fn classify(&mut self, prefix: &[&str]) -> Option<usize> {
        let memo_key = prefix.join(".");
        if let Some(decision) = self.memo.get(&memo_key) {
            return *decision;
        }
        let decision = self.decide(prefix);
        match decision {
            Some(base) => debug!(prefix = %memo_key, base, "key group classified as list"),
            None => debug!(prefix = %memo_key, "key group classified as map"),
        }
        self.memo.insert(memo_key, decision);
        decision
    }

    fn decide(&self, prefix: &[&str]) -> Option<usize> {
        let depth = prefix.len();
        let mut leaves = HashSet::new();
        let mut branches = HashSet::new();
        for entry in self.entries {
            if entry.tokens.len() < depth || entry.tokens[..depth] != *prefix {
                continue;
            }
            // the prefix itself carries a value
            let token = entry.tokens.get(depth)?;
            if !is_numeric(token) {
                return None;
            }
            let index = token.parse::<usize>().ok()?;
            if entry.tokens.len() == depth + 1 {
                if leaves.contains(&index) || branches.contains(&index) {
                    return None;
                }
                leaves.insert(index);
            } else {
                if leaves.contains(&index) {
                    return None;
                }
                branches.insert(index);
            }
        }

        let indices: BTreeSet<usize> = leaves.into_iter().chain(branches).collect();
        let first = *indices.iter().next()?;
        if first > 1 {
            return None;
        }
        let mut previous = first;
        for &index in indices.iter().skip(1) {
            if index - previous > 1 {
                return None;
            }
            previous = index;
        }
        Some(first)
    }
}

/// Builds a tree from tokenized entries, returning the bases of every list found.
fn build_tree(entries: &[Entry<'_>]) -> (Value, FirstIndexMap) {
    let mut classifier = Classifier::new(entries);
    let mut first_indexes = FirstIndexMap::new();
    let mut root = Value::Map(TreeMap::new());

    for entry in entries {
        let mut path = Path::root();
        if entry.tokens.is_empty() {
            path.push_name("");
        }
        for (depth, token) in entry.tokens.iter().enumerate() {
            if is_numeric(token) {
                if let Some(base) = classifier.classify(&entry.tokens[..depth]) {
                    let index = token.parse::<usize>().ok().and_then(|i| i.checked_sub(base));
                    if let Some(index) = index {
                        if !first_indexes.contains(&path) {
                            first_indexes.record(&path, base);
                        }
                        path.push_index(index);
                        continue;
                    }
                }
            }
            path.push_name(token);
        }
        trace!(path = %path, "storing property");
        root.put_path(&path, Value::String(entry.value.to_string()));
    }
    (root, first_indexes)
}

/// Parses property text into a document.
///
/// Keys under the reserved `_meta` prefix are parsed on their own into the
/// metadata block. The first-index bases found in the data are stored in the
/// metadata block as well, replacing any embedded ones.
pub(crate) fn parse(source: &str) -> Document {
    let raw = reader::load(source);

    let mut data = Vec::with_capacity(raw.len());
    let mut meta = Vec::new();
    for (key, value) in &raw {
        let tokens = tokenize(key);
        let value = value.as_str();
        if tokens.first() == Some(&META_KEY) {
            meta.push(Entry {
                tokens: tokens[1..].to_vec(),
                value,
            });
        } else {
            data.push(Entry { tokens, value });
        }
    }

    let (root, first_indexes) = build_tree(&data);
    let mut meta_block = match build_tree(&meta).0 {
        Value::Map(map) => map,
        _ => TreeMap::new(),
    };
    if first_indexes.is_empty() {
        meta_block.remove(FIRST_INDEX_KEY);
    } else {
        meta_block.insert(FIRST_INDEX_KEY.to_string(), first_indexes.to_value());
    }

    debug!(
        keys = raw.len(),
        lists = first_indexes.len(),
        "parsed property text"
    );
    Document::with_meta(root, meta_block)
}
