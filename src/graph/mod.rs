/// Graph traversal algorithms over the symbol and function tables.
pub mod traversal;

pub use traversal::{CallTreeBuilder, DependencyTraverser, Traversal};
