use std::collections::BTreeMap;

use crate::errors::Result;
use crate::types::{ContextBundle, DependencyTree, FileAnalysisOutcome};

/// Renders a context bundle as plain text.
///
/// Each block becomes a `// --- LABEL: name (File: file) ---` header line,
/// the verbatim code and a blank line. An empty bundle renders as an empty
/// string.
pub fn format_bundle_as_text(bundle: &ContextBundle) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(bundle.blocks.len() * 3);
    for block in &bundle.blocks {
        parts.push(format!(
            "// --- {}: {} (File: {}) ---",
            block.label, block.name, block.file
        ));
        parts.push(block.code.clone());
        parts.push(String::new());
    }
    parts.join("\n")
}

/// Formats a context bundle as pretty-printed JSON.
pub fn format_bundle_as_json(bundle: &ContextBundle) -> Result<String> {
    Ok(serde_json::to_string_pretty(bundle)?)
}

/// Formats a call tree as pretty-printed JSON with nested `calls` arrays.
pub fn format_tree_as_json(tree: &DependencyTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Formats per-file analysis results as a pretty-printed JSON object keyed
/// by file path.
pub fn format_analysis_as_json(analysis: &BTreeMap<String, FileAnalysisOutcome>) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn make_bundle(blocks: Vec<ContextBlock>) -> ContextBundle {
        ContextBundle {
            focal: "Bird::Bird".to_string(),
            resolved: "Bird::Bird".to_string(),
            blocks,
            truncated: false,
        }
    }

    fn block(name: &str, label: &str, file: &str, code: &str) -> ContextBlock {
        ContextBlock {
            name: name.to_string(),
            label: label.to_string(),
            file: file.to_string(),
            code: code.to_string(),
        }
    }

    #[test]
    fn test_text_empty_bundle() {
        assert_eq!(format_bundle_as_text(&make_bundle(vec![])), "");
    }

    #[test]
    fn test_text_block_layout() {
        let bundle = make_bundle(vec![
            block("Bird::Bird", "FUNCTION", "src/bird.cpp", "Bird::Bird() {}"),
            block("WING_SPAN", "MACRO/CONSTANT", "src/bird.h", "#define WING_SPAN 4\n"),
        ]);
        let text = format_bundle_as_text(&bundle);
        assert_eq!(
            text,
            "// --- FUNCTION: Bird::Bird (File: src/bird.cpp) ---\n\
             Bird::Bird() {}\n\
             \n\
             // --- MACRO/CONSTANT: WING_SPAN (File: src/bird.h) ---\n\
             #define WING_SPAN 4\n\
             \n"
        );
    }

    #[test]
    fn test_bundle_json_fields() {
        let bundle = make_bundle(vec![block("g_speed", "GLOBAL VARIABLE", "a.cpp", "int g_speed = 1;")]);
        let json = format_bundle_as_json(&bundle).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["resolved"], "Bird::Bird");
        assert_eq!(parsed["truncated"], false);
        assert_eq!(parsed["blocks"][0]["label"], "GLOBAL VARIABLE");
    }

    #[test]
    fn test_tree_json_nests_calls() {
        let mut root = DependencyTree::stub("main");
        root.calls.push(DependencyTree::stub("helper"));
        let json = format_tree_as_json(&root).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["function_name"], "main");
        assert_eq!(parsed["calls"][0]["function_name"], "helper");
        assert_eq!(parsed["calls"][0]["calls"], serde_json::json!([]));
    }

    #[test]
    fn test_analysis_json_failed_entry() {
        let mut analysis = BTreeMap::new();
        analysis.insert(
            "bad.cpp".to_string(),
            FileAnalysisOutcome::Failed {
                error: "invalid UTF-8".to_string(),
            },
        );
        let json = format_analysis_as_json(&analysis).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["bad.cpp"]["error"], "invalid UTF-8");
    }
}
