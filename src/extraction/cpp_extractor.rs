/// Tree-sitter based C++ symbol extractor.
///
/// Finds every defined name in one file and records the text of the
/// definition that encloses it.
use std::time::Instant;

use tree_sitter::Node as TsNode;

use crate::extraction::syntax::{function_name_node, node_text, parse_cpp, walk_descendants, Construct};
use crate::types::{ExtractionResult, SymbolKind, SymbolRecord};

/// Extracts symbol records from C++ source files using tree-sitter.
pub struct CppExtractor;

/// A name found by one of the definition patterns, before scope filtering.
struct Capture<'t> {
    /// The node holding the name; the enclosing definition is found from here.
    node: TsNode<'t>,
    /// The recorded name. Differs from the node text for includes.
    name: String,
    kind: SymbolKind,
}

/// Internal state used during AST traversal.
struct ExtractionState {
    symbols: Vec<SymbolRecord>,
    errors: Vec<String>,
    has_syntax_errors: bool,
    file_path: String,
    source: Vec<u8>,
}

impl ExtractionState {
    fn new(file_path: &str, source: &str) -> Self {
        Self {
            symbols: Vec::new(),
            errors: Vec::new(),
            has_syntax_errors: false,
            file_path: file_path.to_string(),
            source: source.as_bytes().to_vec(),
        }
    }

    fn node_text(&self, node: TsNode<'_>) -> String {
        node_text(node, &self.source)
    }
}

impl CppExtractor {
    /// Extract symbol records from a C++ source file.
    ///
    /// `file_path` is stored on each record (not used for I/O).
    /// `source` is the C++ source code to parse.
    pub fn extract(file_path: &str, source: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut state = ExtractionState::new(file_path, source);

        let tree = match parse_cpp(source) {
            Ok(tree) => tree,
            Err(msg) => {
                state.errors.push(msg);
                return Self::build_result(state, start);
            }
        };

        let root = tree.root_node();
        state.has_syntax_errors = root.has_error();

        let mut captures = Vec::new();
        walk_descendants(root, &mut |node| Self::capture_names(&state, node, &mut captures));

        for capture in captures {
            Self::record(&mut state, capture);
        }

        Self::build_result(state, start)
    }

    /// Applies the definition patterns to a single node.
    fn capture_names<'t>(state: &ExtractionState, node: TsNode<'t>, out: &mut Vec<Capture<'t>>) {
        match Construct::of(node) {
            Construct::FunctionDefinition => {
                if let Some(name) = function_name_node(node) {
                    out.push(Capture {
                        node: name,
                        name: state.node_text(name),
                        kind: SymbolKind::Function,
                    });
                }
            }
            Construct::ClassSpecifier => {
                Self::capture_type_name(state, node, SymbolKind::Class, out);
            }
            Construct::StructSpecifier => {
                Self::capture_type_name(state, node, SymbolKind::Struct, out);
            }
            Construct::MacroDefinition => {
                if let Some(name) = node.child_by_field_name("name") {
                    out.push(Capture {
                        node: name,
                        name: state.node_text(name),
                        kind: SymbolKind::Macro,
                    });
                }
            }
            Construct::Include => {
                if let Some(path) = node.child_by_field_name("path") {
                    if let Some(library) = Self::system_include_name(&state.node_text(path)) {
                        out.push(Capture {
                            node: path,
                            name: library,
                            kind: SymbolKind::Include,
                        });
                    }
                }
            }
            Construct::Declaration => {
                let mut cursor = node.walk();
                for declarator in node.children_by_field_name("declarator", &mut cursor) {
                    if let Some(name) = Self::variable_name_node(declarator) {
                        out.push(Capture {
                            node: name,
                            name: state.node_text(name),
                            kind: SymbolKind::GlobalVariable,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    /// Captures the `name` of a class or struct specifier, if it has one.
    fn capture_type_name<'t>(
        state: &ExtractionState,
        node: TsNode<'t>,
        kind: SymbolKind,
        out: &mut Vec<Capture<'t>>,
    ) {
        if let Some(name) = node.child_by_field_name("name") {
            if name.kind() == "type_identifier" {
                out.push(Capture {
                    node: name,
                    name: state.node_text(name),
                    kind,
                });
            }
        }
    }

    /// Returns the library name of an angle-bracket include path.
    ///
    /// Quoted includes are project-local and yield `None`.
    fn system_include_name(path: &str) -> Option<String> {
        let path = path.trim();
        let inner = path.strip_prefix('<')?.strip_suffix('>')?;
        Some(inner.trim().to_string())
    }

    /// Name node of a declarator in one of the variable forms:
    /// `x`, `x = v`, `x[n]`, `x[n] = {..}`.
    fn variable_name_node(declarator: TsNode<'_>) -> Option<TsNode<'_>> {
        match declarator.kind() {
            "identifier" => Some(declarator),
            "init_declarator" => {
                let inner = declarator.child_by_field_name("declarator")?;
                match inner.kind() {
                    "identifier" => Some(inner),
                    "array_declarator" => Self::array_name_node(inner),
                    _ => None,
                }
            }
            "array_declarator" => Self::array_name_node(declarator),
            _ => None,
        }
    }

    fn array_name_node(declarator: TsNode<'_>) -> Option<TsNode<'_>> {
        let inner = declarator.child_by_field_name("declarator")?;
        (inner.kind() == "identifier").then_some(inner)
    }

    /// Finds the nearest enclosing definitional node of a capture.
    ///
    /// Returns `None` for declarations that are not at translation-unit or
    /// namespace scope; those are locals.
    fn enclosing_definition(capture: TsNode<'_>) -> Option<TsNode<'_>> {
        let mut current = capture.parent();
        while let Some(node) = current {
            let construct = Construct::of(node);
            if construct.is_definitional() {
                if construct == Construct::Declaration && !Self::is_file_scope(node) {
                    return None;
                }
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// Whether a declaration sits directly at translation-unit or namespace
    /// scope. Preprocessor conditionals (include guards) are looked through.
    fn is_file_scope(declaration: TsNode<'_>) -> bool {
        let mut parent = declaration.parent();
        while let Some(node) = parent {
            if !is_preproc_conditional(node) {
                break;
            }
            parent = node.parent();
        }
        let Some(parent) = parent else {
            return false;
        };
        match Construct::of(parent) {
            Construct::TranslationUnit => true,
            Construct::DeclarationList => parent.parent().is_some_and(|owner| {
                matches!(
                    Construct::of(owner),
                    Construct::Namespace | Construct::LinkageSpecification
                )
            }),
            _ => false,
        }
    }

    /// Turns an accepted capture into a symbol record.
    fn record(state: &mut ExtractionState, capture: Capture<'_>) {
        let Some(definition) = Self::enclosing_definition(capture.node) else {
            return;
        };
        if capture.name.is_empty() {
            return;
        }
        let record = SymbolRecord {
            name: capture.name,
            code: state.node_text(definition),
            file: state.file_path.clone(),
            kind: capture.kind,
            start_line: definition.start_position().row as u32 + 1,
            end_line: definition.end_position().row as u32 + 1,
        };
        state.symbols.push(record);
    }

    /// Build the final ExtractionResult from the accumulated state.
    fn build_result(state: ExtractionState, start: Instant) -> ExtractionResult {
        ExtractionResult {
            symbols: state.symbols,
            errors: state.errors,
            has_syntax_errors: state.has_syntax_errors,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn is_preproc_conditional(node: TsNode<'_>) -> bool {
    matches!(
        node.kind(),
        "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef"
    )
}

impl crate::extraction::LanguageExtractor for CppExtractor {
    fn extensions(&self) -> &[&str] {
        &["cpp", "h"]
    }

    fn language_name(&self) -> &str {
        "C++"
    }

    fn extract(&self, file_path: &str, source: &str) -> ExtractionResult {
        CppExtractor::extract(file_path, source)
    }
}
