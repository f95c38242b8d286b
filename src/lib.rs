pub mod config;
pub mod context;
pub mod errors;
pub mod extraction;
pub mod graph;
pub mod hashing;
pub mod index;
pub mod project;
pub mod resolution;
pub mod types;

pub use context::ContextBuilder;
pub use extraction::{extract_dependencies, CppExtractor};
pub use graph::CallTreeBuilder;
pub use index::SymbolTable;
pub use project::Project;
