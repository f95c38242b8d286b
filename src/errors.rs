use thiserror::Error;

/// Errors that can occur while indexing a project or resolving symbols.
#[derive(Error, Debug)]
pub enum CppCtxError {
    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("parse error: {message} (path: {path})")]
    Parse { message: String, path: String },

    #[error("symbol not found: {name}")]
    SymbolNotFound { name: String },

    #[error("ambiguous symbol '{name}': matches {}", candidates.join(", "))]
    AmbiguousMatch {
        name: String,
        candidates: Vec<String>,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `CppCtxError`.
pub type Result<T> = std::result::Result<T, CppCtxError>;
