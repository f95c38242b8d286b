/// Builds the dependency context of a focal symbol.
pub mod builder;

/// Formats context bundles, call trees and analyses as text or JSON.
pub mod formatter;

pub use builder::ContextBuilder;
pub use formatter::{
    format_analysis_as_json, format_bundle_as_json, format_bundle_as_text, format_tree_as_json,
};
