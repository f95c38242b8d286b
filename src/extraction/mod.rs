/// Tree-sitter based source code extraction module.
///
/// This module turns C++ source files into symbol records, reference sets
/// and per-file function summaries.
pub mod analyzer;
mod cpp_extractor;
pub mod dependencies;
pub mod syntax;

pub use analyzer::analyze_source;
pub use cpp_extractor::CppExtractor;
pub use dependencies::extract_dependencies;

use crate::types::ExtractionResult;

/// Trait for language-specific symbol extractors.
///
/// Each implementation handles a single programming language,
/// using tree-sitter to parse source and emit symbol records.
pub trait LanguageExtractor: Send + Sync {
    /// File extensions this extractor handles (without leading dot).
    fn extensions(&self) -> &[&str];

    /// Human-readable language name.
    fn language_name(&self) -> &str;

    /// Extract symbol records from source code.
    ///
    /// `file_path` is the relative path stored on each record.
    /// `source` is the source code to parse.
    fn extract(&self, file_path: &str, source: &str) -> ExtractionResult;
}

/// Registry of all available language extractors.
///
/// Dispatches to the correct extractor based on file extension. Extension
/// matching is case-sensitive.
pub struct LanguageRegistry {
    extractors: Vec<Box<dyn LanguageExtractor>>,
}

impl LanguageRegistry {
    /// Creates a new registry with all built-in language extractors.
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(CppExtractor)],
        }
    }

    /// Returns the extractor for a file path based on its extension.
    pub fn extractor_for_file(&self, path: &str) -> Option<&dyn LanguageExtractor> {
        let file_name = path.rsplit('/').next()?;
        let (_, ext) = file_name.rsplit_once('.')?;
        self.extractors
            .iter()
            .find(|e| e.extensions().contains(&ext))
            .map(|e| e.as_ref())
    }

    /// Returns all supported file extensions across all extractors.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extractors
            .iter()
            .flat_map(|e| e.extensions().iter().copied())
            .collect()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
