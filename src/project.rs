use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{load_config, save_config, should_include_file, CppCtxConfig};
use crate::context::ContextBuilder;
use crate::errors::{CppCtxError, Result};
use crate::extraction::{analyze_source, LanguageRegistry};
use crate::graph::CallTreeBuilder;
use crate::hashing::content_hash;
use crate::index::{FunctionTable, SymbolTable, SymbolTableBuilder};
use crate::types::*;

/// A C++ project on disk: its root directory and configuration.
///
/// Every query re-reads the sources; tables are built per call and are
/// immutable once returned.
pub struct Project {
    config: CppCtxConfig,
    project_root: PathBuf,
    registry: LanguageRegistry,
}

/// What one worker produced for one file.
struct FileOutcome {
    record: FileRecord,
    symbols: Vec<SymbolRecord>,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Project {
    /// Initializes a project at the given root.
    ///
    /// Creates the `.cppctx` directory and writes a default configuration.
    pub fn init(project_root: &Path) -> Result<Self> {
        Self::check_root(project_root)?;
        let config = CppCtxConfig {
            root_dir: project_root.to_string_lossy().to_string(),
            ..CppCtxConfig::default()
        };
        save_config(project_root, &config)?;
        info!(root = %project_root.display(), "initialized project");

        Ok(Self::with_config(project_root, config))
    }

    /// Opens the project at the given root.
    ///
    /// A missing configuration file yields the default configuration.
    pub fn open(project_root: &Path) -> Result<Self> {
        Self::check_root(project_root)?;
        let config = load_config(project_root)?;
        Ok(Self::with_config(project_root, config))
    }

    /// Opens a project with an explicit configuration, ignoring the one on disk.
    pub fn with_config(project_root: &Path, config: CppCtxConfig) -> Self {
        Self {
            config,
            project_root: project_root.to_path_buf(),
            registry: LanguageRegistry::new(),
        }
    }

    pub fn config(&self) -> &CppCtxConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn check_root(project_root: &Path) -> Result<()> {
        if project_root.is_dir() {
            Ok(())
        } else {
            Err(CppCtxError::Config {
                message: format!(
                    "project root '{}' is not a directory",
                    project_root.display()
                ),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Indexing
// ---------------------------------------------------------------------------

impl Project {
    /// Indexes every source file and builds the project symbol table.
    ///
    /// Files are extracted in parallel and merged in discovery order, so the
    /// table is the same for every run over the same tree. A file that
    /// cannot be read or parsed gets a failure marker in the report and
    /// contributes no symbols.
    pub fn index(&self) -> Result<(SymbolTable, IndexReport)> {
        let start = Instant::now();
        let files = self.scan_files()?;

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| self.extract_file(path))
            .collect();

        let mut builder = SymbolTableBuilder::new();
        let mut records = Vec::with_capacity(outcomes.len());
        let mut failed_count = 0;
        for outcome in outcomes {
            if outcome.record.is_failed() {
                failed_count += 1;
            }
            builder.extend(outcome.symbols);
            records.push(outcome.record);
        }
        let table = builder.build();

        let report = IndexReport {
            files: records,
            symbol_count: table.len(),
            failed_count,
            fingerprint: table.fingerprint(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            files = report.files.len(),
            symbols = report.symbol_count,
            failed = report.failed_count,
            duration_ms = report.duration_ms,
            "indexed project"
        );

        Ok((table, report))
    }

    /// Runs the per-file analyzer over the same file set as [`Project::index`].
    ///
    /// Files that cannot be read or parsed map to an error entry.
    pub fn analyze(&self) -> Result<BTreeMap<String, FileAnalysisOutcome>> {
        let files = self.scan_files()?;

        let analyses: Vec<(String, FileAnalysisOutcome)> = files
            .par_iter()
            .map(|path| {
                let outcome = match self.read_source(path).and_then(|source| {
                    analyze_source(&source).map_err(|message| CppCtxError::Parse {
                        message,
                        path: path.clone(),
                    })
                }) {
                    Ok(analysis) => FileAnalysisOutcome::Analyzed(analysis),
                    Err(e) => {
                        warn!(path = %path, error = %e, "skipping file");
                        FileAnalysisOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                (path.clone(), outcome)
            })
            .collect();

        Ok(analyses.into_iter().collect())
    }

    /// Builds the flat function table from every successfully analyzed file.
    pub fn function_table(&self) -> Result<FunctionTable> {
        let analyses = self.analyze()?;
        let table = FunctionTable::from_analyses(analyses.values().filter_map(|outcome| {
            match outcome {
                FileAnalysisOutcome::Analyzed(analysis) => Some(analysis),
                FileAnalysisOutcome::Failed { .. } => None,
            }
        }));
        debug!(functions = table.len(), "built function table");
        Ok(table)
    }

    /// Scans the project root for source files, respecting the configured
    /// include/exclude patterns, `skip_hidden` and max file size.
    ///
    /// Only files with a registered extractor are returned, whatever the
    /// include patterns say. Paths are relative to the root, `/`-separated
    /// and sorted.
    pub fn scan_files(&self) -> Result<Vec<String>> {
        let skip_hidden = self.config.skip_hidden;
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.project_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| {
                // The root itself is never skipped, even when it is a dot directory.
                !skip_hidden
                    || e.depth() == 0
                    || !e.file_name().to_string_lossy().starts_with('.')
            })
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&self.project_root) else {
                continue;
            };
            let rel_str = to_slash_path(relative);
            if !should_include_file(&rel_str, &self.config)
                || self.registry.extractor_for_file(&rel_str).is_none()
            {
                continue;
            }
            match entry.metadata() {
                Ok(metadata) if metadata.len() <= self.config.max_file_size => {
                    files.push(rel_str)
                }
                Ok(metadata) => {
                    debug!(path = %rel_str, size = metadata.len(), "skipping oversized file")
                }
                Err(e) => warn!(path = %rel_str, error = %e, "skipping file without metadata"),
            }
        }
        Ok(files)
    }

    /// Reads a source file, replacing invalid UTF-8 sequences with U+FFFD.
    ///
    /// Legacy C++ sources often carry Latin-1 or CP1252 bytes in comments and
    /// string literals; those files are still indexed.
    fn read_source(&self, path: &str) -> Result<String> {
        let bytes = fs::read(self.project_root.join(path)).map_err(|e| CppCtxError::File {
            message: e.to_string(),
            path: path.to_string(),
        })?;
        Ok(decode_source(path, bytes))
    }

    fn extract_file(&self, path: &str) -> FileOutcome {
        match self.try_extract_file(path) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(path, error = %e, "skipping file");
                FileOutcome {
                    record: FileRecord {
                        path: path.to_string(),
                        status: FileStatus::Failed {
                            error: e.to_string(),
                        },
                    },
                    symbols: Vec::new(),
                }
            }
        }
    }

    fn try_extract_file(&self, path: &str) -> Result<FileOutcome> {
        let extractor =
            self.registry
                .extractor_for_file(path)
                .ok_or_else(|| CppCtxError::File {
                    message: "no extractor for file extension".to_string(),
                    path: path.to_string(),
                })?;
        let source = self.read_source(path)?;
        let result = extractor.extract(path, &source);

        if let Some(message) = result.errors.first() {
            return Err(CppCtxError::Parse {
                message: message.clone(),
                path: path.to_string(),
            });
        }
        if result.has_syntax_errors {
            if self.config.skip_files_with_syntax_errors {
                return Err(CppCtxError::Parse {
                    message: "syntax tree contains errors".to_string(),
                    path: path.to_string(),
                });
            }
            debug!(path, "indexing file with syntax errors");
        }

        debug!(
            path,
            language = extractor.language_name(),
            symbols = result.symbols.len(),
            duration_ms = result.duration_ms,
            "extracted file"
        );
        Ok(FileOutcome {
            record: FileRecord {
                path: path.to_string(),
                status: FileStatus::Indexed {
                    content_hash: content_hash(&source),
                    size: source.len() as u64,
                    symbol_count: result.symbols.len() as u32,
                },
            },
            symbols: result.symbols,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl Project {
    /// Indexes the project and builds the context bundle for `focal`.
    pub fn build_context(&self, focal: &str) -> Result<ContextBundle> {
        let (table, _) = self.index()?;
        self.build_context_from(&table, focal)
    }

    /// Builds the context bundle for `focal` against an existing table.
    pub fn build_context_from(&self, table: &SymbolTable, focal: &str) -> Result<ContextBundle> {
        ContextBuilder::new(table, &self.config).build_context(focal)
    }

    /// Analyzes the project and builds the call tree rooted at `focal`.
    pub fn build_call_tree(&self, focal: &str) -> Result<DependencyTree> {
        let functions = self.function_table()?;
        let tree = CallTreeBuilder::new(&functions, self.config.max_depth)
            .identifier_boundaries(self.config.call_suffix_boundary)
            .build(focal);
        info!(focal, nodes = tree.node_count(), "built call tree");
        Ok(tree)
    }
}

/// Decodes file bytes as UTF-8, lossily when they are not valid UTF-8.
pub fn decode_source(path: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(e) => {
            debug!(
                path,
                valid_up_to = e.utf8_error().valid_up_to(),
                "decoding non-UTF-8 source lossily"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Joins path components with `/` regardless of platform.
fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
