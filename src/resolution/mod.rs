/// Name resolution module.
///
/// Maps user-supplied focal names onto symbol table keys and call
/// expressions onto analyzed functions, using exact, normalized and suffix
/// matching.
mod resolver;

pub use resolver::{normalize_signature, CallMatcher, FocalResolver};
