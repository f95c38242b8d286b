use tracing::debug;

use crate::config::SuffixPolicy;
use crate::errors::{CppCtxError, Result};
use crate::index::{FunctionTable, SymbolTable};

/// Resolves a focal name, as typed by a user, to a symbol table key.
///
/// Strategies are tried in order:
/// 1. **Exact match** on the trimmed input.
/// 2. **Signature normalization**: `void Bird::fly(int h)` becomes
///    `Bird::fly`, then exact match again.
/// 3. **Suffix match**: any key ending in `::<name>`. Several candidates are
///    settled by the configured [`SuffixPolicy`].
pub struct FocalResolver<'a> {
    table: &'a SymbolTable,
    policy: SuffixPolicy,
}

impl<'a> FocalResolver<'a> {
    pub fn new(table: &'a SymbolTable, policy: SuffixPolicy) -> Self {
        Self { table, policy }
    }

    /// Returns the key the focal name resolves to.
    ///
    /// Fails with `SymbolNotFound` when no strategy matches, or with
    /// `AmbiguousMatch` under [`SuffixPolicy::Unique`].
    pub fn resolve(&self, focal: &str) -> Result<String> {
        let focal = focal.trim();
        if self.table.contains(focal) {
            return Ok(focal.to_string());
        }

        let normalized = normalize_signature(focal);
        if normalized != focal && self.table.contains(&normalized) {
            debug!(focal, resolved = %normalized, "focal resolved by signature");
            return Ok(normalized);
        }

        let candidates = self.table.suffix_matches(&normalized);
        match (candidates, self.policy) {
            ([], _) => Err(CppCtxError::SymbolNotFound {
                name: focal.to_string(),
            }),
            ([_, _, ..], SuffixPolicy::Unique) => Err(CppCtxError::AmbiguousMatch {
                name: focal.to_string(),
                candidates: candidates.to_vec(),
            }),
            ([first, ..], _) => {
                debug!(focal, resolved = %first, candidates = candidates.len(), "focal resolved by suffix");
                Ok(first.clone())
            }
        }
    }
}

/// Reduces a function signature to its declared name.
///
/// Takes the text before the first `(`, keeps its last whitespace-separated
/// token and strips pointer/reference markers: `const Foo &ns::get()`
/// becomes `ns::get`. Input without a parameter list is returned trimmed.
pub fn normalize_signature(signature: &str) -> String {
    let head = before_paren(signature);
    head.split_whitespace()
        .last()
        .unwrap_or("")
        .trim_start_matches(['*', '&'])
        .to_string()
}

/// Matches call expressions from function bodies against a [`FunctionTable`].
///
/// Tiers, first hit wins:
/// 1. exact name;
/// 2. the first name in key order that ends with the call text, or whose
///    part before `(` ends with the call's part before `(`; with identifier
///    boundaries on, a suffix must also start on an identifier boundary, so
///    `start` no longer matches `restart`;
/// 3. the member part of a `ptr->member` or `obj.member` call, retried from
///    tier 1.
pub struct CallMatcher<'a> {
    functions: &'a FunctionTable,
    identifier_boundaries: bool,
}

impl<'a> CallMatcher<'a> {
    pub fn new(functions: &'a FunctionTable) -> Self {
        Self {
            functions,
            identifier_boundaries: false,
        }
    }

    /// Requires tier-2 suffixes to start on an identifier boundary.
    pub fn with_identifier_boundaries(mut self, on: bool) -> Self {
        self.identifier_boundaries = on;
        self
    }

    /// Returns the table key for a call, or `None` if nothing matches.
    pub fn best_match(&self, call: &str) -> Option<&'a str> {
        let call = call.trim();
        if call.is_empty() {
            return None;
        }

        if let Some(key) = self.functions.key_of(call) {
            return Some(key);
        }

        let call_base = before_paren(call);
        let found = self.functions.names().find(|name| {
            self.is_suffix(name, call)
                || (!call_base.is_empty() && self.is_suffix(before_paren(name), call_base))
        });
        if found.is_some() {
            return found;
        }

        strip_receiver(call).and_then(|member| self.best_match(member))
    }

    fn is_suffix(&self, name: &str, suffix: &str) -> bool {
        if self.identifier_boundaries {
            ends_with_identifier(name, suffix)
        } else {
            name.ends_with(suffix)
        }
    }
}

/// The text before the first `(`, trimmed.
fn before_paren(s: &str) -> &str {
    s.split('(').next().unwrap_or("").trim()
}

/// Whether `name` ends with `suffix` and the suffix does not start in the
/// middle of an identifier.
fn ends_with_identifier(name: &str, suffix: &str) -> bool {
    if !name.ends_with(suffix) {
        return false;
    }
    let prefix = &name[..name.len() - suffix.len()];
    match prefix.chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_'),
    }
}

/// `bird->flap` and `bird.flap` yield `flap`.
fn strip_receiver(call: &str) -> Option<&str> {
    let arrow = call.rfind("->").map(|i| i + 2);
    let dot = call.rfind('.').map(|i| i + 1);
    let start = match (arrow, dot) {
        (Some(a), Some(d)) => a.max(d),
        (a, d) => a.or(d)?,
    };
    let member = call[start..].trim();
    (!member.is_empty()).then_some(member)
}
