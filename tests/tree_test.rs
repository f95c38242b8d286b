use cppctx::extraction::analyze_source;
use cppctx::graph::CallTreeBuilder;
use cppctx::index::FunctionTable;
use cppctx::types::*;

const GAME: &str = r#"
void helper(int x)
{
}

void Game::restart()
{
    helper(1);
    bird->flap();
}

void Bird::flap()
{
    Game::restart();
}
"#;

fn function_table(sources: &[&str]) -> FunctionTable {
    let analyses: Vec<FileAnalysis> = sources
        .iter()
        .map(|s| analyze_source(s).expect("source should parse"))
        .collect();
    FunctionTable::from_analyses(&analyses)
}

#[test]
fn test_unmatched_focal_yields_stub() {
    let table = FunctionTable::new();
    let tree = CallTreeBuilder::new(&table, 64).build("nothing_here");
    assert_eq!(tree, DependencyTree::stub("nothing_here"));
    assert!(tree.params.is_empty());
    assert!(tree.body.is_empty());
    assert!(tree.calls.is_empty());
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn test_tree_follows_calls_and_stops_at_cycles() {
    let table = function_table(&[GAME]);
    let tree = CallTreeBuilder::new(&table, 64).build("restart");

    assert_eq!(tree.function_name, "Game::restart");
    assert_eq!(tree.params, "()");
    let children: Vec<&str> = tree.calls.iter().map(|c| c.function_name.as_str()).collect();
    assert_eq!(children, vec!["helper", "Bird::flap"]);

    assert_eq!(tree.calls[0].params, "(int x)");
    // Bird::flap calls back into Game::restart, which is already in the tree.
    assert!(tree.calls[1].calls.is_empty());
    assert_eq!(tree.node_count(), 3);
}

#[test]
fn test_repeated_callee_appears_once() {
    let table = function_table(&["void log() {}\nvoid run() { log(); log(); }\n"]);
    let tree = CallTreeBuilder::new(&table, 64).build("run");
    assert_eq!(tree.calls.len(), 1);
    assert_eq!(tree.calls[0].function_name, "log");
}

#[test]
fn test_depth_cap() {
    let table = function_table(&[GAME]);
    let tree = CallTreeBuilder::new(&table, 0).build("Game::restart");
    assert_eq!(tree.function_name, "Game::restart");
    assert!(tree.calls.is_empty());

    let tree = CallTreeBuilder::new(&table, 1).build("Game::restart");
    assert_eq!(tree.calls.len(), 2);
    assert!(tree.calls.iter().all(|c| c.calls.is_empty()));
}

#[test]
fn test_longer_definition_wins_across_files() {
    let table = function_table(&[
        "void tick() {}\n",
        "void tick() { update(); }\nvoid update() {}\n",
    ]);
    let tree = CallTreeBuilder::new(&table, 64).build("tick");
    assert_eq!(tree.body, "{ update(); }");
    assert_eq!(tree.calls.len(), 1);
}

#[test]
fn test_tree_serializes_nested_calls() {
    let table = function_table(&[GAME]);
    let tree = CallTreeBuilder::new(&table, 64).build("Bird::flap");
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["function_name"], "Bird::flap");
    assert_eq!(json["calls"][0]["function_name"], "Game::restart");
    assert_eq!(json["calls"][0]["calls"][0]["function_name"], "helper");
}

#[test]
fn test_identifier_boundaries_leave_partial_names_unmatched() {
    let table = function_table(&["void Game::restart() {}\nvoid run() { start(); }\n"]);

    let plain = CallTreeBuilder::new(&table, 64).build("run");
    let children: Vec<&str> = plain.calls.iter().map(|c| c.function_name.as_str()).collect();
    assert_eq!(children, vec!["Game::restart"]);

    let strict = CallTreeBuilder::new(&table, 64)
        .identifier_boundaries(true)
        .build("run");
    assert!(strict.calls.is_empty());
}
