use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kinds of symbols recorded in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Struct,
    Macro,
    Include,
    GlobalVariable,
    Unknown,
}

#[allow(clippy::should_implement_trait)]
impl SymbolKind {
    /// Returns the string representation of this symbol kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Macro => "macro",
            SymbolKind::Include => "include",
            SymbolKind::GlobalVariable => "global_variable",
            SymbolKind::Unknown => "unknown",
        }
    }

    /// Parses a string into a `SymbolKind`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<SymbolKind> {
        match s {
            "function" => Some(SymbolKind::Function),
            "class" => Some(SymbolKind::Class),
            "struct" => Some(SymbolKind::Struct),
            "macro" => Some(SymbolKind::Macro),
            "include" => Some(SymbolKind::Include),
            "global_variable" => Some(SymbolKind::GlobalVariable),
            "unknown" => Some(SymbolKind::Unknown),
            _ => None,
        }
    }

    /// Human-readable label used in rendered context blocks.
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Function => "FUNCTION",
            SymbolKind::Class => "CLASS",
            SymbolKind::Struct => "STRUCT",
            SymbolKind::Macro => "MACRO/CONSTANT",
            SymbolKind::Include => "LIBRARY",
            SymbolKind::GlobalVariable => "GLOBAL VARIABLE",
            SymbolKind::Unknown => "UNKNOWN",
        }
    }
}

/// One defined name in the project and the source span that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub name: String,
    /// Verbatim text of the nearest enclosing definitional node.
    pub code: String,
    /// Path of the defining file, relative to the project root.
    pub file: String,
    pub kind: SymbolKind,
    pub start_line: u32,
    pub end_line: u32,
}

/// Result of extracting symbols from one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub symbols: Vec<SymbolRecord>,
    pub errors: Vec<String>,
    /// Whether the syntax tree contained ERROR or MISSING nodes.
    pub has_syntax_errors: bool,
    pub duration_ms: u64,
}

/// Outcome of indexing a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Indexed {
        content_hash: String,
        size: u64,
        symbol_count: u32,
    },
    Failed {
        error: String,
    },
}

/// Record tracking one discovered source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileRecord {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

/// Summary of a full indexing pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReport {
    pub files: Vec<FileRecord>,
    pub symbol_count: usize,
    pub failed_count: usize,
    pub fingerprint: String,
    pub duration_ms: u64,
}

/// A function definition as seen by the per-file analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub function_name: String,
    pub params: String,
    pub body: String,
    /// Callee expression texts, in source order.
    pub calls: Vec<String>,
    /// Same-file classes referenced from the body, keyed by class name.
    pub object_dependencies: BTreeMap<String, String>,
}

/// Everything the per-file analyzer learns about one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Full text of each `#include` line.
    pub includes: Vec<String>,
    pub functions: Vec<FunctionRecord>,
    /// Class name to class body text.
    pub classes: BTreeMap<String, String>,
}

/// Per-file analyzer output; failed files serialize as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileAnalysisOutcome {
    Analyzed(FileAnalysis),
    Failed { error: String },
}

/// A node of the call-graph dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTree {
    pub function_name: String,
    pub params: String,
    pub body: String,
    pub calls: Vec<DependencyTree>,
}

impl DependencyTree {
    /// A placeholder node for a name with no known definition.
    pub fn stub(name: &str) -> Self {
        DependencyTree {
            function_name: name.to_string(),
            params: String::new(),
            body: String::new(),
            calls: Vec::new(),
        }
    }

    /// Total number of nodes in this tree, including the root.
    pub fn node_count(&self) -> usize {
        1 + self.calls.iter().map(DependencyTree::node_count).sum::<usize>()
    }
}

/// One rendered symbol in a context bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBlock {
    pub name: String,
    pub label: String,
    pub file: String,
    pub code: String,
}

/// The dependency closure of a focal symbol, in BFS discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    /// The name as requested by the caller.
    pub focal: String,
    /// The symbol table key the focal name resolved to.
    pub resolved: String,
    pub blocks: Vec<ContextBlock>,
    /// Set when the traversal stopped at the visit cap.
    pub truncated: bool,
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}
