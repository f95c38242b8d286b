use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use cppctx::context::{
    format_analysis_as_json, format_bundle_as_json, format_bundle_as_text, format_tree_as_json,
};
use cppctx::errors::{CppCtxError, Result};
use cppctx::extraction::syntax::{dump_tree, parse_cpp};
use cppctx::project::{decode_source, Project};
use cppctx::types::*;

/// Dependency context extraction for C++ codebases.
#[derive(Parser)]
#[command(name = "cppctx", about = "Dependency context extraction for C++ codebases")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration for a project
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// Index the project and report per-file results
    Index {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Output the report as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// List indexed symbols
    Symbols {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Only list symbols of this kind (function, class, struct, macro, include, global_variable)
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Resolve the dependency context of a focal symbol
    Context {
        /// Focal symbol name or signature
        focal: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: FormatArg,
        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the call tree of a focal function as JSON
    Tree {
        /// Focal function name or call text
        focal: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Analyze every file and print includes, classes and functions as JSON
    Analyze {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the syntax tree of a single file
    Ast {
        /// Source file to parse
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            Project::init(&project_path)?;
            println!("Initialized cppctx at {}", project_path.display());
        }
        Commands::Index { path, json } => {
            let project = Project::open(&resolve_path(path))?;
            let (_, report) = project.index()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Indexed {} files: {} symbols, {} failed in {}ms",
                    report.files.len(),
                    report.symbol_count,
                    report.failed_count,
                    report.duration_ms
                );
                for file in &report.files {
                    if let FileStatus::Failed { error } = &file.status {
                        println!("  FAILED {}: {}", file.path, error);
                    }
                }
                println!("Fingerprint: {}", report.fingerprint);
            }
        }
        Commands::Symbols { path, kind } => {
            let kind = match kind {
                Some(k) => Some(SymbolKind::from_str(&k).ok_or_else(|| CppCtxError::Config {
                    message: format!("unknown symbol kind '{}'", k),
                })?),
                None => None,
            };
            let project = Project::open(&resolve_path(path))?;
            let (table, _) = project.index()?;
            let records: Vec<&SymbolRecord> = match kind {
                Some(k) => table.records_of_kind(k).collect(),
                None => table.iter().map(|(_, record)| record).collect(),
            };
            for record in records {
                println!(
                    "{} ({}) - {}:{}",
                    record.name,
                    record.kind.as_str(),
                    record.file,
                    record.start_line
                );
            }
        }
        Commands::Context {
            focal,
            path,
            format,
            output,
        } => {
            let project = Project::open(&resolve_path(path))?;
            let bundle = project.build_context(&focal)?;
            let rendered = match OutputFormat::from(format) {
                OutputFormat::Text => format_bundle_as_text(&bundle),
                OutputFormat::Json => format_bundle_as_json(&bundle)?,
            };
            if bundle.truncated {
                eprintln!("warning: context truncated at the visit limit");
            }
            emit(&rendered, output.as_deref())?;
        }
        Commands::Tree {
            focal,
            path,
            output,
        } => {
            let project = Project::open(&resolve_path(path))?;
            let tree = project.build_call_tree(&focal)?;
            emit(&format_tree_as_json(&tree)?, output.as_deref())?;
        }
        Commands::Analyze { path, output } => {
            let project = Project::open(&resolve_path(path))?;
            let analysis = project.analyze()?;
            emit(&format_analysis_as_json(&analysis)?, output.as_deref())?;
        }
        Commands::Ast { file } => {
            let bytes = fs::read(&file).map_err(|e| CppCtxError::File {
                message: e.to_string(),
                path: file.display().to_string(),
            })?;
            let source = decode_source(&file.display().to_string(), bytes);
            let tree = parse_cpp(&source).map_err(|message| CppCtxError::Parse {
                message,
                path: file.display().to_string(),
            })?;
            print!("{}", dump_tree(&tree));
        }
    }
    Ok(())
}

/// Writes output to a file, or to stdout when no file is given.
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
