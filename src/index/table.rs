use std::collections::{BTreeMap, HashMap};

use sha2::{Digest, Sha256};

use crate::types::{SymbolKind, SymbolRecord};

/// Project-wide mapping from symbol name to its defining record.
///
/// Keys enumerate in lexicographic order, which is also the order in which
/// suffix matches are reported. A table is immutable once built; use
/// [`SymbolTableBuilder`] to construct one.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: BTreeMap<String, SymbolRecord>,
    /// Every `::`-delimited tail of every qualified key, mapped to the keys
    /// that end with `::<tail>`, sorted.
    suffixes: HashMap<String, Vec<String>>,
}

/// Accumulates symbol records and applies the collision rule.
#[derive(Debug, Default)]
pub struct SymbolTableBuilder {
    records: BTreeMap<String, SymbolRecord>,
}

/// What happened to a record offered to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Replaced,
    Kept,
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, resolving name collisions by code length.
    ///
    /// An existing record is replaced only when the new code is strictly
    /// longer; on a tie the earlier record stays.
    pub fn insert(&mut self, record: SymbolRecord) -> MergeOutcome {
        match self.records.get_mut(&record.name) {
            None => {
                self.records.insert(record.name.clone(), record);
                MergeOutcome::Inserted
            }
            Some(existing) if record.code.len() > existing.code.len() => {
                *existing = record;
                MergeOutcome::Replaced
            }
            Some(_) => MergeOutcome::Kept,
        }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = SymbolRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Freezes the accumulated records into a queryable table.
    pub fn build(self) -> SymbolTable {
        let mut suffixes: HashMap<String, Vec<String>> = HashMap::new();
        for key in self.records.keys() {
            for tail in qualified_tails(key) {
                suffixes
                    .entry(tail.to_string())
                    .or_default()
                    .push(key.clone());
            }
        }
        SymbolTable {
            records: self.records,
            suffixes,
        }
    }
}

/// Every substring of `key` that follows a `::`, longest first.
fn qualified_tails(key: &str) -> impl Iterator<Item = &str> {
    key.char_indices()
        .filter(move |(i, _)| key[*i..].starts_with("::"))
        .map(move |(i, _)| &key[i + 2..])
        .filter(|tail| !tail.is_empty())
}

impl SymbolTable {
    /// Looks up a record by exact name.
    pub fn get(&self, name: &str) -> Option<&SymbolRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over `(name, record)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Records of one kind, in key order.
    pub fn records_of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &SymbolRecord> {
        self.records.values().filter(move |r| r.kind == kind)
    }

    /// All keys ending in `::<name>`, in key order.
    pub fn suffix_matches(&self, name: &str) -> &[String] {
        self.suffixes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first key, in key order, ending in `::<name>`.
    ///
    /// Which candidate wins when several exist carries no meaning beyond
    /// sort order.
    pub fn first_suffix_match(&self, name: &str) -> Option<&str> {
        self.suffix_matches(name).first().map(String::as_str)
    }

    /// SHA-256 over every record in key order, hex-encoded.
    ///
    /// Two tables with the same names, kinds, files and code have the same
    /// fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, record) in &self.records {
            hasher.update(name.as_bytes());
            hasher.update([0]);
            hasher.update(record.kind.as_str().as_bytes());
            hasher.update([0]);
            hasher.update(record.file.as_bytes());
            hasher.update([0]);
            hasher.update(record.code.as_bytes());
            hasher.update([b'\n']);
        }
        hex::encode(hasher.finalize())
    }
}
