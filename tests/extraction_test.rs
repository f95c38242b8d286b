use cppctx::extraction::{CppExtractor, LanguageRegistry};
use cppctx::types::*;

fn find<'a>(result: &'a ExtractionResult, name: &str) -> Option<&'a SymbolRecord> {
    result.symbols.iter().find(|s| s.name == name)
}

#[test]
fn test_extract_top_level_definitions() {
    let source = r#"#include <vector>
#include "bird.h"
#define SPEED 5
int g_count = 0;
int g_table[4];
class Bird { public: void fly(); };
struct Point { int x; int y; };
void Bird::fly() { int local = SPEED; g_count++; }
"#;
    let result = CppExtractor::extract("src/bird.cpp", source);
    assert!(result.errors.is_empty());
    assert!(!result.has_syntax_errors);

    let vector = find(&result, "vector").expect("system include should be recorded");
    assert_eq!(vector.kind, SymbolKind::Include);
    assert!(vector.code.contains("#include <vector>"));
    assert!(
        result.symbols.iter().all(|s| !s.name.contains("bird.h")),
        "quoted includes are project-local and skipped"
    );

    assert_eq!(find(&result, "SPEED").unwrap().kind, SymbolKind::Macro);

    let count = find(&result, "g_count").unwrap();
    assert_eq!(count.kind, SymbolKind::GlobalVariable);
    assert_eq!(count.code, "int g_count = 0;");
    assert_eq!(
        find(&result, "g_table").unwrap().kind,
        SymbolKind::GlobalVariable
    );

    assert_eq!(find(&result, "Bird").unwrap().kind, SymbolKind::Class);
    assert_eq!(find(&result, "Point").unwrap().kind, SymbolKind::Struct);

    let fly = find(&result, "Bird::fly").unwrap();
    assert_eq!(fly.kind, SymbolKind::Function);
    assert!(fly.code.starts_with("void Bird::fly()"));
    assert_eq!(fly.file, "src/bird.cpp");
}

#[test]
fn test_locals_are_not_symbols() {
    let source = r#"
int counter = 0;
void tick() {
    int counter = 1;
    int scratch[8];
    counter++;
}
"#;
    let result = CppExtractor::extract("tick.cpp", source);
    assert!(find(&result, "scratch").is_none(), "locals must not be recorded");
    let counters: Vec<_> = result
        .symbols
        .iter()
        .filter(|s| s.name == "counter")
        .collect();
    assert_eq!(counters.len(), 1);
    assert_eq!(counters[0].code, "int counter = 0;");
}

#[test]
fn test_namespace_and_extern_c_scope() {
    let source = r#"
namespace game {
int score = 0;
}
extern "C" {
int legacy_flag;
}
"#;
    let result = CppExtractor::extract("scope.cpp", source);
    assert_eq!(
        find(&result, "score").unwrap().kind,
        SymbolKind::GlobalVariable
    );
    assert_eq!(
        find(&result, "legacy_flag").unwrap().kind,
        SymbolKind::GlobalVariable
    );
}

#[test]
fn test_include_guard_is_transparent() {
    let source = r#"#ifndef BIRD_H
#define BIRD_H
int lives = 3;
#endif
"#;
    let result = CppExtractor::extract("bird.h", source);
    assert_eq!(find(&result, "BIRD_H").unwrap().kind, SymbolKind::Macro);
    assert_eq!(find(&result, "lives").unwrap().code, "int lives = 3;");
}

#[test]
fn test_function_forms() {
    let source = r#"char *dup_name(const char *s) { return 0; }
static int add(int a, int b) { return a + b; }
"#;
    let result = CppExtractor::extract("util.cpp", source);
    assert_eq!(find(&result, "dup_name").unwrap().kind, SymbolKind::Function);
    assert_eq!(find(&result, "add").unwrap().kind, SymbolKind::Function);
    assert!(
        find(&result, "a").is_none(),
        "parameters must not be recorded"
    );
}

#[test]
fn test_prototypes_are_not_symbols() {
    let result = CppExtractor::extract("proto.h", "void later(int x);\n");
    assert!(find(&result, "later").is_none());
}

#[test]
fn test_line_numbers_are_one_based() {
    let source = "int a = 1;\nvoid f() {\n}\n";
    let result = CppExtractor::extract("lines.cpp", source);
    let a = find(&result, "a").unwrap();
    assert_eq!((a.start_line, a.end_line), (1, 1));
    let f = find(&result, "f").unwrap();
    assert_eq!((f.start_line, f.end_line), (2, 3));
}

#[test]
fn test_syntax_errors_are_flagged() {
    let result = CppExtractor::extract("broken.cpp", "void broken( {\n");
    assert!(result.has_syntax_errors);
}

#[test]
fn test_registry_extension_is_case_sensitive() {
    let registry = LanguageRegistry::new();
    assert!(registry.extractor_for_file("src/main.cpp").is_some());
    assert!(registry.extractor_for_file("include/bird.h").is_some());
    assert!(registry.extractor_for_file("src/Legacy.CPP").is_none());
    assert!(registry.extractor_for_file("src/bird.hpp").is_none());
    assert!(registry.extractor_for_file("Makefile").is_none());

    let mut exts = registry.supported_extensions();
    exts.sort();
    assert_eq!(exts, vec!["cpp", "h"]);
}
