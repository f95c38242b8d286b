use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::debug;

use crate::extraction::extract_dependencies;
use crate::index::{FunctionTable, SymbolTable};
use crate::resolution::CallMatcher;
use crate::types::{DependencyTree, SymbolRecord};

/// Symbols reached by a breadth-first dependency traversal.
#[derive(Debug, Clone)]
pub struct Traversal<'a> {
    /// Expanded symbols that exist in the table, in discovery order.
    pub records: Vec<&'a SymbolRecord>,
    /// Number of distinct names expanded, including names with no record.
    pub visited: usize,
    /// Whether the traversal stopped at the visit cap with work left.
    pub truncated: bool,
}

/// Breadth-first traversal over the implicit dependency graph of a
/// symbol table.
///
/// Edges are the names each symbol's code references. Every name is
/// expanded at most once, so cyclic references terminate.
pub struct DependencyTraverser<'a> {
    table: &'a SymbolTable,
    ignore: HashSet<&'a str>,
    max_visited: usize,
}

impl<'a> DependencyTraverser<'a> {
    /// Creates a traverser that never expands the names in `ignore` and
    /// stops after `max_visited` expansions. The start name is expanded even
    /// when `max_visited` is zero.
    pub fn new(table: &'a SymbolTable, ignore: &'a [String], max_visited: usize) -> Self {
        Self {
            table,
            ignore: ignore.iter().map(String::as_str).collect(),
            max_visited,
        }
    }

    /// Traverses from `start`, discovering edges with [`extract_dependencies`].
    pub fn traverse_bfs(&self, start: &str) -> Traversal<'a> {
        self.traverse_bfs_with(start, |record| extract_dependencies(&record.code))
    }

    /// Traverses from `start` using a caller-supplied edge function.
    ///
    /// A discovered name that is unvisited and not ignored is queued as-is.
    /// Otherwise the first table key ending in `::<name>` is queued in its
    /// place, which maps a member call like `setColor` onto
    /// `Bird::setColor`.
    pub fn traverse_bfs_with<F>(&self, start: &str, mut edges: F) -> Traversal<'a>
    where
        F: FnMut(&SymbolRecord) -> BTreeSet<String>,
    {
        let mut visited: HashSet<String> = HashSet::new();
        let mut records: Vec<&'a SymbolRecord> = Vec::new();
        let mut truncated = false;

        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(start.to_string());

        while let Some(name) = queue.pop_front() {
            if visited.contains(&name) || self.is_ignored(&name) {
                continue;
            }
            // The start name is always expanded, whatever the cap.
            if !visited.is_empty() && visited.len() >= self.max_visited {
                truncated = true;
                break;
            }
            visited.insert(name.clone());

            let Some(record) = self.table.get(&name) else {
                continue;
            };
            records.push(record);

            for dependency in edges(record) {
                if !visited.contains(&dependency) && !self.is_ignored(&dependency) {
                    queue.push_back(dependency);
                } else if let Some(qualified) = self.table.first_suffix_match(&dependency) {
                    queue.push_back(qualified.to_string());
                }
            }
        }

        debug!(
            start,
            expanded = records.len(),
            visited = visited.len(),
            truncated,
            "dependency traversal finished"
        );

        Traversal {
            records,
            visited: visited.len(),
            truncated,
        }
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.contains(name)
    }
}

/// Builds the nested call tree of a focal function from a [`FunctionTable`].
pub struct CallTreeBuilder<'a> {
    functions: &'a FunctionTable,
    matcher: CallMatcher<'a>,
    max_depth: usize,
}

impl<'a> CallTreeBuilder<'a> {
    /// Creates a builder that stops expanding calls below `max_depth`.
    pub fn new(functions: &'a FunctionTable, max_depth: usize) -> Self {
        Self {
            functions,
            matcher: CallMatcher::new(functions),
            max_depth,
        }
    }

    /// Requires suffix-matched calls to start on an identifier boundary.
    pub fn identifier_boundaries(mut self, on: bool) -> Self {
        self.matcher = self.matcher.with_identifier_boundaries(on);
        self
    }

    /// Builds the tree rooted at `focal`.
    ///
    /// Never fails: a focal name with no match yields a single stub node
    /// with empty params, body and calls.
    pub fn build(&self, focal: &str) -> DependencyTree {
        let mut visited: HashSet<&'a str> = HashSet::new();
        match self.matcher.best_match(focal) {
            Some(name) => self
                .expand(name, 0, &mut visited)
                .unwrap_or_else(|| DependencyTree::stub(name)),
            None => {
                debug!(focal, "no function matches focal name, using stub");
                DependencyTree::stub(focal.trim())
            }
        }
    }

    /// Expands one function. Returns `None` for a name already in the tree.
    fn expand(
        &self,
        name: &'a str,
        depth: usize,
        visited: &mut HashSet<&'a str>,
    ) -> Option<DependencyTree> {
        if !visited.insert(name) {
            return None;
        }
        let function = self.functions.get(name)?;

        let mut node = DependencyTree {
            function_name: function.function_name.clone(),
            params: function.params.clone(),
            body: function.body.clone(),
            calls: Vec::new(),
        };
        if depth >= self.max_depth {
            return Some(node);
        }

        for call in &function.calls {
            if let Some(matched) = self.matcher.best_match(call) {
                if let Some(child) = self.expand(matched, depth + 1, visited) {
                    node.calls.push(child);
                }
            }
        }

        Some(node)
    }
}
