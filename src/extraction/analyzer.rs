//! Per-file function analysis.
//!
//! Where [`CppExtractor`](super::CppExtractor) feeds the project symbol
//! table, this analyzer produces the flat function view used by the call
//! tree builder: each function's parameters, body, callees and the
//! same-file classes it touches.

use std::collections::{BTreeMap, BTreeSet};

use tree_sitter::Node as TsNode;

use crate::extraction::syntax::{
    function_declarator, function_name_node, node_text, parse_cpp, walk_descendants, Construct,
};
use crate::types::{FileAnalysis, FunctionRecord};

/// Name given to function definitions whose declarator has no usable name.
pub const ANONYMOUS_FUNCTION: &str = "<anonymous>";

/// Analyzes one C++ source file.
///
/// Returns the parser's message if the source cannot be parsed.
pub fn analyze_source(source: &str) -> Result<FileAnalysis, String> {
    let tree = parse_cpp(source)?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    let mut includes = Vec::new();
    let mut classes = BTreeMap::new();
    let mut definitions = Vec::new();

    walk_descendants(root, &mut |node| match Construct::of(node) {
        Construct::Include => includes.push(node_text(node, bytes).trim().to_string()),
        Construct::ClassSpecifier => {
            if let Some(name) = node.child_by_field_name("name") {
                let body = node
                    .child_by_field_name("body")
                    .map(|b| node_text(b, bytes))
                    .unwrap_or_default();
                classes.insert(node_text(name, bytes), body);
            }
        }
        Construct::FunctionDefinition => definitions.push(node),
        _ => {}
    });

    let functions = definitions
        .into_iter()
        .map(|definition| analyze_function(definition, bytes, &classes))
        .collect();

    Ok(FileAnalysis {
        includes,
        functions,
        classes,
    })
}

fn analyze_function(
    definition: TsNode<'_>,
    source: &[u8],
    classes: &BTreeMap<String, String>,
) -> FunctionRecord {
    let function_name = function_name_node(definition)
        .map(|n| node_text(n, source).trim().to_string())
        .unwrap_or_else(|| ANONYMOUS_FUNCTION.to_string());

    let params = function_declarator(definition)
        .and_then(|d| d.child_by_field_name("parameters"))
        .map(|p| node_text(p, source).trim().to_string())
        .unwrap_or_default();

    let body_node = definition.child_by_field_name("body");
    let body_text = body_node
        .map(|b| node_text(b, source).trim().to_string())
        .unwrap_or_default();

    // Constructors keep their member initializer list in front of the body.
    let body = match constructor_initializer(definition) {
        Some(init) => format!("{}\n{}", node_text(init, source).trim(), body_text),
        None => body_text,
    };

    let mut calls = Vec::new();
    let mut object_dependencies = BTreeMap::new();
    if let Some(body_node) = body_node {
        calls = find_calls(body_node, source);
        for class in find_class_references(body_node, source, classes) {
            if let Some(class_body) = classes.get(&class) {
                object_dependencies.insert(class, class_body.clone());
            }
        }
    }

    FunctionRecord {
        function_name,
        params,
        body,
        calls,
        object_dependencies,
    }
}

fn constructor_initializer(definition: TsNode<'_>) -> Option<TsNode<'_>> {
    let mut cursor = definition.walk();
    let found = definition
        .children(&mut cursor)
        .find(|c| c.kind() == "field_initializer_list");
    found
}

/// Callee texts of every call expression under `body`, in source order.
fn find_calls(body: TsNode<'_>, source: &[u8]) -> Vec<String> {
    let mut calls = Vec::new();
    walk_descendants(body, &mut |node| {
        if Construct::of(node) == Construct::CallExpression {
            if let Some(function) = node.child_by_field_name("function") {
                calls.push(node_text(function, source).trim().to_string());
            }
        }
    });
    calls
}

/// Names of known classes used under `body` as a type or as a callee.
fn find_class_references(
    body: TsNode<'_>,
    source: &[u8],
    classes: &BTreeMap<String, String>,
) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    walk_descendants(body, &mut |node| {
        let candidate = match node.kind() {
            "type_identifier" => Some(node),
            "call_expression" => node
                .child_by_field_name("function")
                .filter(|f| f.kind() == "identifier"),
            _ => None,
        };
        if let Some(candidate) = candidate {
            let name = node_text(candidate, source);
            if classes.contains_key(&name) {
                found.insert(name);
            }
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_body_keeps_initializer() {
        let source = r#"
Bird::Bird(int h) : height(h), speed(0)
{
    setPos(h);
}
"#;
        let analysis = analyze_source(source).unwrap();
        assert_eq!(analysis.functions.len(), 1);
        let f = &analysis.functions[0];
        assert_eq!(f.function_name, "Bird::Bird");
        assert_eq!(f.params, "(int h)");
        assert!(f.body.starts_with(": height(h), speed(0)\n{"));
        assert_eq!(f.calls, vec!["setPos".to_string()]);
    }

    #[test]
    fn test_object_dependencies_limited_to_known_classes() {
        let source = r#"
class Pipe { int gap; };
void spawn() { Pipe p; Unknown u; }
"#;
        let analysis = analyze_source(source).unwrap();
        let f = analysis
            .functions
            .iter()
            .find(|f| f.function_name == "spawn")
            .unwrap();
        assert_eq!(f.object_dependencies.len(), 1);
        assert_eq!(f.object_dependencies["Pipe"], "{ int gap; }");
    }
}
