/// In-memory project tables.
///
/// Built once per indexing pass and read-only afterwards.
mod functions;
mod table;

pub use functions::FunctionTable;
pub use table::{MergeOutcome, SymbolTable, SymbolTableBuilder};
