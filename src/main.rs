//! Pseudocode - command-line front end
//!
//! Runs the tokenizer, fold matcher and auto-indent heuristic over a file,
//! and validates AST or evaluation-result JSON from the evaluator.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use pseudocode::ast;
use pseudocode::editor::{auto_indent, fold_ranges, FoldStrategy, DEFAULT_INDENT_UNIT};
use pseudocode::evaluation::{EvaluationResult, FeedbackLevel};
use pseudocode::lexer::lex;

/// Pseudocode language tools
#[derive(Parser, Debug)]
#[command(name = "pseudocode")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every classified token with its byte span
    Tokens {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Print the foldable blocks
    Folds {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pair each opener with the first closer, ignoring nesting
        #[arg(long)]
        legacy: bool,
    },
    /// Show what a line break at a byte offset would insert
    Indent {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Byte offset of the cursor
        #[arg(long)]
        offset: usize,
    },
    /// Validate an AST (or, with --result, an evaluation result) in JSON
    Decode {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Input is a full evaluation result rather than a bare AST
        #[arg(long)]
        result: bool,
    },
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let ok = match &args.command {
        Command::Tokens { input } => {
            let source = read_source(input);
            print_tokens(&source);
            true
        }
        Command::Folds { input, legacy } => {
            let source = read_source(input);
            let strategy = if *legacy {
                FoldStrategy::FirstCloser
            } else {
                FoldStrategy::Nested
            };
            print_folds(&source, strategy);
            true
        }
        Command::Indent { input, offset } => {
            let source = read_source(input);
            print_indent(&source, *offset);
            true
        }
        Command::Decode { input, result } => {
            let source = read_source(input);
            if *result {
                decode_result(&source)
            } else {
                decode_ast(&source)
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

fn read_source(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(s) => {
            log::debug!("Read {} ({} bytes)", path.display(), s.len());
            s
        }
        Err(e) => {
            eprintln!("Error reading '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

/// 1-based line and column of a byte offset.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

fn print_tokens(source: &str) {
    println!("{:-<60}", "");
    for token in lex(source) {
        println!(
            "{:4}..{:<4} {:10} {:?}",
            token.start(),
            token.end(),
            token.kind.as_str(),
            token.text
        );
    }
}

fn print_folds(source: &str, strategy: FoldStrategy) {
    let ranges = fold_ranges(source, strategy);
    if ranges.is_empty() {
        println!("No foldable blocks");
        return;
    }
    for range in ranges {
        let (from_line, from_col) = line_col(source, range.from);
        let (to_line, to_col) = line_col(source, range.to);
        println!("{from_line}:{from_col} - {to_line}:{to_col}");
    }
}

fn print_indent(source: &str, offset: usize) {
    match auto_indent(source, offset, DEFAULT_INDENT_UNIT) {
        Some(edit) => println!(
            "insert {:?} at {}, cursor -> {}",
            edit.insert, edit.offset, edit.cursor
        ),
        None => println!("default line break"),
    }
}

/// Counts the nodes in encoded AST JSON.
fn count_nodes(value: &Value) -> usize {
    match value {
        Value::Object(map) => {
            let own = usize::from(map.contains_key("node_type"));
            own + map.values().map(count_nodes).sum::<usize>()
        }
        Value::Array(items) => items.iter().map(count_nodes).sum(),
        _ => 0,
    }
}

fn decode_ast(source: &str) -> bool {
    match ast::decode_str(source) {
        Ok(node) => {
            let json = ast::encode(&node);
            println!("OK: {} ({} nodes)", node.node_type(), count_nodes(&json));
            if !node.extra.is_empty() {
                let keys: Vec<_> = node.extra.keys().map(String::as_str).collect();
                println!("Unmodelled fields: {}", keys.join(", "));
            }
            true
        }
        Err(e) => {
            eprintln!("Invalid AST: {e}");
            false
        }
    }
}

fn decode_result(source: &str) -> bool {
    let result: EvaluationResult = match serde_json::from_str(source) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid evaluation result: {e}");
            return false;
        }
    };
    if let Err(e) = result.validate() {
        eprintln!("Invalid evaluation result: {e}");
        return false;
    }

    println!(
        "{} (score {:.2})",
        if result.is_correct { "Correct" } else { "Incorrect" },
        result.score
    );
    if !result.feedback.is_empty() {
        println!("{}", result.feedback);
    }
    for level in [FeedbackLevel::Error, FeedbackLevel::Warning, FeedbackLevel::Hint] {
        for item in result.items_at(level) {
            println!("  [{level:?}] {}", item.message);
        }
    }

    match result.program() {
        Ok(Some(program)) => {
            let names: Vec<_> = program
                .kind
                .functions
                .iter()
                .map(|f| f.kind.name.as_str())
                .collect();
            println!("AST: program with {} function(s) {:?}", names.len(), names);
            true
        }
        Ok(None) => {
            println!("AST: not included");
            true
        }
        Err(e) => {
            eprintln!("Invalid AST: {e}");
            false
        }
    }
}
