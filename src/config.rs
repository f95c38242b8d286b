use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::errors::{CppCtxError, Result};

/// Name of the configuration file stored inside the `.cppctx` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store cppctx metadata.
pub const CPPCTX_DIR: &str = ".cppctx";

/// Names never expanded during context resolution: primitive types, common
/// standard-library spellings and control-flow keywords.
pub const DEFAULT_IGNORE_NAMES: &[&str] = &[
    "int", "float", "double", "bool", "void", "std", "vector", "string", "cout", "endl", "return",
    "if", "else", "for", "while", "true", "false", "auto", "const",
];

/// How a focal name with several `::<name>` suffix matches is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixPolicy {
    /// Take the first candidate in lexicographic key order.
    #[default]
    First,
    /// Fail with `AmbiguousMatch` when more than one candidate exists.
    Unique,
}

/// Configuration for a cppctx project.
///
/// Controls which files are indexed, how parse failures are treated and
/// the limits applied during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CppCtxConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Root directory of the project being indexed.
    pub root_dir: String,
    /// Glob patterns for files to include during indexing.
    pub include: Vec<String>,
    /// Glob patterns for files to exclude during indexing.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes; files larger than this are skipped.
    pub max_file_size: u64,
    /// Skip files and directories whose name starts with `.`.
    pub skip_hidden: bool,
    /// Treat a syntax tree containing ERROR nodes as a failed file.
    pub skip_files_with_syntax_errors: bool,
    /// Names that context resolution never expands.
    pub ignore_names: Vec<String>,
    /// Upper bound on the number of names expanded per context resolution.
    pub max_visited: usize,
    /// Upper bound on call-tree depth.
    pub max_depth: usize,
    /// Tie-break rule for focal suffix matches.
    pub suffix_policy: SuffixPolicy,
    /// Require call-tree suffix matches to start on an identifier boundary,
    /// so a call to `start` no longer matches `Game::restart`.
    pub call_suffix_boundary: bool,
}

impl Default for CppCtxConfig {
    fn default() -> Self {
        Self {
            version: 1,
            root_dir: String::new(),
            include: vec!["**/*.cpp".to_string(), "**/*.h".to_string()],
            exclude: vec![".git/**".to_string(), ".cppctx/**".to_string()],
            max_file_size: 1_048_576,
            skip_hidden: false,
            skip_files_with_syntax_errors: false,
            ignore_names: DEFAULT_IGNORE_NAMES.iter().map(|s| s.to_string()).collect(),
            max_visited: 10_000,
            max_depth: 64,
            suffix_policy: SuffixPolicy::First,
            call_suffix_boundary: false,
        }
    }
}

/// Returns the path to the `.cppctx` directory within the given project root.
pub fn get_cppctx_dir(project_root: &Path) -> PathBuf {
    project_root.join(CPPCTX_DIR)
}

/// Returns the path to the configuration file within the `.cppctx` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_cppctx_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads `.cppctx/config.json` for a project.
///
/// The file may be partial: fields it omits, including fields added after it
/// was written by `cppctx init`, take their defaults. An absent file or an
/// empty `root_dir` resolves to the given project root.
pub fn load_config(project_root: &Path) -> Result<CppCtxConfig> {
    let config_path = get_config_path(project_root);
    let config_error = |action: &str, e: &dyn std::fmt::Display| CppCtxError::Config {
        message: format!("failed to {} '{}': {}", action, config_path.display(), e),
    };

    let mut config = if config_path.exists() {
        let contents =
            fs::read_to_string(&config_path).map_err(|e| config_error("read config file", &e))?;
        serde_json::from_str::<CppCtxConfig>(&contents)
            .map_err(|e| config_error("parse config file", &e))?
    } else {
        CppCtxConfig::default()
    };

    if config.root_dir.is_empty() {
        config.root_dir = project_root.to_string_lossy().to_string();
    }
    Ok(config)
}

/// Writes `.cppctx/config.json`, creating the `.cppctx` directory if needed.
///
/// The JSON goes to `config.tmp` first and is renamed over `config.json`, so
/// an interrupted write never leaves a truncated config behind.
pub fn save_config(project_root: &Path, config: &CppCtxConfig) -> Result<()> {
    let cppctx_dir = get_cppctx_dir(project_root);
    fs::create_dir_all(&cppctx_dir).map_err(|e| CppCtxError::Config {
        message: format!("failed to create '{}': {}", cppctx_dir.display(), e),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");
    let json = serde_json::to_string_pretty(config).map_err(|e| CppCtxError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, json)
        .and_then(|()| fs::rename(&tmp_path, &config_path))
        .map_err(|e| CppCtxError::Config {
            message: format!("failed to write '{}': {}", config_path.display(), e),
        })
}

/// Decides whether a root-relative, `/`-separated path is indexed.
///
/// Exclude patterns win over include patterns. Matching is case-sensitive:
/// C++ toolchains on case-sensitive file systems treat `bird.H` or
/// `Legacy.CPP` as different files from `.h`/`.cpp` sources, and only the
/// lower-case extensions are indexed. Invalid patterns are ignored.
pub fn should_include_file(file_path: &str, config: &CppCtxConfig) -> bool {
    !matches_any(&config.exclude, file_path) && matches_any(&config.include, file_path)
}

fn matches_any(patterns: &[String], file_path: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .any(|pattern| pattern.matches_with(file_path, options))
}
