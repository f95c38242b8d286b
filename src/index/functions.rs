use std::collections::BTreeMap;

use crate::types::{FileAnalysis, FunctionRecord};

/// Flat table of analyzed functions keyed by function name.
///
/// Feeds the call tree builder. Keys enumerate in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<String, FunctionRecord>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the functions of several analyzed files, in the order given.
    pub fn from_analyses<'a>(analyses: impl IntoIterator<Item = &'a FileAnalysis>) -> Self {
        let mut table = Self::new();
        for analysis in analyses {
            for function in &analysis.functions {
                table.insert(function.clone());
            }
        }
        table
    }

    /// Adds a function; on a name collision the longer body wins and ties
    /// keep the earlier entry.
    pub fn insert(&mut self, function: FunctionRecord) {
        match self.functions.get_mut(&function.function_name) {
            Some(existing) if function.body.len() > existing.body.len() => *existing = function,
            Some(_) => {}
            None => {
                self.functions
                    .insert(function.function_name.clone(), function);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionRecord> {
        self.functions.get(name)
    }

    /// The stored key equal to `name`, borrowed from the table.
    pub fn key_of(&self, name: &str) -> Option<&str> {
        self.functions.get_key_value(name).map(|(k, _)| k.as_str())
    }

    /// Function names in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
