use tracing::info;

use crate::config::CppCtxConfig;
use crate::errors::Result;
use crate::graph::DependencyTraverser;
use crate::index::SymbolTable;
use crate::resolution::FocalResolver;
use crate::types::{ContextBlock, ContextBundle};

/// Builds the dependency context of a focal symbol from a symbol table.
pub struct ContextBuilder<'a> {
    table: &'a SymbolTable,
    config: &'a CppCtxConfig,
}

impl<'a> ContextBuilder<'a> {
    /// Creates a new `ContextBuilder` over an indexed symbol table.
    pub fn new(table: &'a SymbolTable, config: &'a CppCtxConfig) -> Self {
        Self { table, config }
    }

    /// Builds the context bundle for `focal`.
    ///
    /// Pipeline:
    /// 1. Resolve the focal name to a table key
    /// 2. Traverse its dependencies breadth-first
    /// 3. Emit one block per reached symbol, in discovery order
    pub fn build_context(&self, focal: &str) -> Result<ContextBundle> {
        let resolved =
            FocalResolver::new(self.table, self.config.suffix_policy).resolve(focal)?;

        let traverser = DependencyTraverser::new(
            self.table,
            &self.config.ignore_names,
            self.config.max_visited,
        );
        let traversal = traverser.traverse_bfs(&resolved);

        let blocks: Vec<ContextBlock> = traversal
            .records
            .iter()
            .map(|record| ContextBlock {
                name: record.name.clone(),
                label: record.kind.label().to_string(),
                file: record.file.clone(),
                code: record.code.clone(),
            })
            .collect();

        info!(
            focal,
            resolved = %resolved,
            blocks = blocks.len(),
            visited = traversal.visited,
            truncated = traversal.truncated,
            "built context"
        );

        Ok(ContextBundle {
            focal: focal.to_string(),
            resolved,
            blocks,
            truncated: traversal.truncated,
        })
    }
}
