//! Thin layer over the tree-sitter C++ grammar.
//!
//! Every visitor in this crate dispatches on [`Construct`] rather than on raw
//! node-kind strings, so the set of grammar shapes the extractors understand
//! lives in one place.

use tree_sitter::{Node as TsNode, Parser, Tree};

/// Node kinds that can name a function in a `function_declarator`.
const FUNCTION_NAME_KINDS: &[&str] = &[
    "identifier",
    "qualified_identifier",
    "field_identifier",
    "destructor_name",
    "operator_name",
];

/// The grammar constructs the extractors care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    TranslationUnit,
    Namespace,
    DeclarationList,
    LinkageSpecification,
    FunctionDefinition,
    ClassSpecifier,
    StructSpecifier,
    /// `#define NAME ...` or `#define NAME(args) ...`.
    MacroDefinition,
    Include,
    Declaration,
    CallExpression,
    Other,
}

impl Construct {
    /// Classifies a syntax node.
    pub fn of(node: TsNode<'_>) -> Construct {
        match node.kind() {
            "translation_unit" => Construct::TranslationUnit,
            "namespace_definition" => Construct::Namespace,
            "declaration_list" => Construct::DeclarationList,
            "linkage_specification" => Construct::LinkageSpecification,
            "function_definition" => Construct::FunctionDefinition,
            "class_specifier" => Construct::ClassSpecifier,
            "struct_specifier" => Construct::StructSpecifier,
            "preproc_def" | "preproc_function_def" => Construct::MacroDefinition,
            "preproc_include" => Construct::Include,
            "declaration" => Construct::Declaration,
            "call_expression" => Construct::CallExpression,
            _ => Construct::Other,
        }
    }

    /// Whether this construct is a complete declaration or definition whose
    /// text becomes a symbol's code.
    pub fn is_definitional(self) -> bool {
        matches!(
            self,
            Construct::FunctionDefinition
                | Construct::ClassSpecifier
                | Construct::StructSpecifier
                | Construct::MacroDefinition
                | Construct::Include
                | Construct::Declaration
        )
    }
}

/// Parse C++ source code into a tree-sitter syntax tree.
pub fn parse_cpp(source: &str) -> Result<Tree, String> {
    let mut parser = Parser::new();
    let language = tree_sitter_cpp::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| format!("failed to load C++ grammar: {e}"))?;
    parser
        .parse(source, None)
        .ok_or_else(|| "tree-sitter parse returned None".to_string())
}

/// Gets the text of a node from the source it was parsed from.
pub fn node_text(node: TsNode<'_>, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

/// Returns the name node of a `function_definition`.
///
/// Pointer and reference return types wrap the `function_declarator`
/// (`int *make()`, `Foo &get()`), so those wrappers are peeled first.
pub fn function_name_node(definition: TsNode<'_>) -> Option<TsNode<'_>> {
    let declarator = function_declarator(definition)?;
    let name = declarator.child_by_field_name("declarator")?;
    FUNCTION_NAME_KINDS.contains(&name.kind()).then_some(name)
}

/// Returns the `function_declarator` of a `function_definition`.
pub fn function_declarator(definition: TsNode<'_>) -> Option<TsNode<'_>> {
    let mut current = definition.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "function_declarator" => return Some(current),
            "pointer_declarator" | "reference_declarator" | "parenthesized_declarator" => {
                current = inner_declarator(current)?;
            }
            _ => return None,
        }
    }
}

/// The declarator wrapped by a pointer/reference/parenthesized declarator.
///
/// `reference_declarator` has no `declarator` field in the grammar, so the
/// last named child is used instead.
fn inner_declarator(node: TsNode<'_>) -> Option<TsNode<'_>> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    let mut cursor = node.walk();
    let last = node.named_children(&mut cursor).last();
    last
}

/// Calls `f` on `node` and every descendant, in pre-order.
pub fn walk_descendants<'t>(node: TsNode<'t>, f: &mut impl FnMut(TsNode<'t>)) {
    f(node);
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            walk_descendants(cursor.node(), f);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

/// Renders a syntax tree as an indented outline, one node per line:
/// `kind [(row, col) - (row, col)]`.
pub fn dump_tree(tree: &Tree) -> String {
    let mut out = String::new();
    dump_node(tree.root_node(), 0, &mut out);
    out
}

fn dump_node(node: TsNode<'_>, depth: usize, out: &mut String) {
    let start = node.start_position();
    let end = node.end_position();
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!(
        "{} [({}, {}) - ({}, {})]\n",
        node.kind(),
        start.row,
        start.column,
        end.row,
        end.column
    ));
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            dump_node(cursor.node(), depth + 1, out);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}
