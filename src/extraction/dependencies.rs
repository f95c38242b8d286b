/// Extraction of the names a code snippet references.
use std::collections::BTreeSet;

use tracing::debug;
use tree_sitter::Node as TsNode;

use crate::extraction::syntax::{node_text, parse_cpp, walk_descendants, Construct};

/// Returns the distinct names referenced by a snippet of C++ code.
///
/// Collected into one flat set:
/// - every `identifier` and `type_identifier`;
/// - call targets: the callee when it is a plain or qualified name, and the
///   member name when the callee is a field expression (`obj->start()`).
///
/// A snippet that cannot be parsed yields an empty set.
pub fn extract_dependencies(code: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let tree = match parse_cpp(code) {
        Ok(tree) => tree,
        Err(msg) => {
            debug!(error = %msg, "dependency extraction skipped");
            return names;
        }
    };
    let source = code.as_bytes();

    walk_descendants(tree.root_node(), &mut |node| {
        match node.kind() {
            "identifier" | "type_identifier" => {
                insert(&mut names, node, source);
            }
            _ if Construct::of(node) == Construct::CallExpression => {
                if let Some(callee) = call_target(node) {
                    insert(&mut names, callee, source);
                }
            }
            _ => {}
        }
    });

    names
}

/// The node naming the function a `call_expression` invokes.
fn call_target(call: TsNode<'_>) -> Option<TsNode<'_>> {
    let function = call.child_by_field_name("function")?;
    match function.kind() {
        "identifier" | "qualified_identifier" => Some(function),
        "field_expression" => function.child_by_field_name("field"),
        _ => None,
    }
}

fn insert(names: &mut BTreeSet<String>, node: TsNode<'_>, source: &[u8]) {
    let text = node_text(node, source);
    let text = text.trim();
    if !text.is_empty() {
        names.insert(text.to_string());
    }
}
