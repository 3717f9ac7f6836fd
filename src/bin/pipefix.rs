//! Command-line interface for pipefix
//! Runs the preprocessor over templates and exposes each conversion stage for debugging.
//!
//! Usage:
//!   pipefix preprocess `<path|->` [--config `<file>`]            - Preprocess a template file or stdin
//!   pipefix convert `<expr>` [--config `<file>`]                 - Convert one expression
//!   pipefix tokens `<expr>`                                      - Show the lexer output
//!   pipefix rpn `<expr>`                                         - Show the postfix token order
//!   pipefix eval `<expr>` [--context `<json>`] [--config `<file>`] - Convert, then evaluate
//!   pipefix functions                                          - List runtime functions
//!
//! Set `RUST_LOG=debug` to see each placeholder conversion and every fallback.

use clap::{Arg, ArgMatches, Command};
use pipefix::pipefix::runtime::evaluator::evaluate_with;
use pipefix::pipefix::transforms::standard::{LEXING, TO_RPN};
use pipefix::{FunctionRegistry, Preprocessor, PreprocessorConfig};
use std::io::Read;

fn expr_arg() -> Arg {
    Arg::new("expr")
        .help("Expression, without delimiters")
        .required(true)
        .index(1)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("YAML or JSON preprocessor config")
}

fn main() {
    env_logger::init();

    let matches = Command::new("pipefix")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rewrites infix template expressions into pipelines")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("preprocess")
                .about("Preprocess a template and print the result")
                .arg(
                    Arg::new("path")
                        .help("Template file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("convert")
                .about("Print the pipeline for one expression")
                .arg(expr_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the tokens of one expression")
                .arg(expr_arg()),
        )
        .subcommand(
            Command::new("rpn")
                .about("Print one expression in postfix order")
                .arg(expr_arg()),
        )
        .subcommand(
            Command::new("eval")
                .about("Convert one expression and evaluate the pipeline")
                .arg(expr_arg())
                .arg(
                    Arg::new("context")
                        .long("context")
                        .help("JSON file used as the root context"),
                )
                .arg(config_arg()),
        )
        .subcommand(Command::new("functions").about("List the available runtime functions"))
        .get_matches();

    match matches.subcommand() {
        Some(("preprocess", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            handle_preprocess_command(path, load_preprocessor(sub));
        }
        Some(("convert", sub)) => {
            let expr = sub.get_one::<String>("expr").unwrap();
            println!("{}", load_preprocessor(sub).convert_expression(expr.trim()));
        }
        Some(("tokens", sub)) => {
            let expr = sub.get_one::<String>("expr").unwrap();
            handle_tokens_command(expr);
        }
        Some(("rpn", sub)) => {
            let expr = sub.get_one::<String>("expr").unwrap();
            handle_rpn_command(expr);
        }
        Some(("eval", sub)) => {
            let expr = sub.get_one::<String>("expr").unwrap();
            let context = sub.get_one::<String>("context");
            handle_eval_command(expr, context.map(String::as_str), load_preprocessor(sub));
        }
        Some(("functions", _)) => {
            handle_functions_command();
        }
        _ => unreachable!(),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn load_preprocessor(matches: &ArgMatches) -> Preprocessor {
    let config = match matches.get_one::<String>("config") {
        Some(path) => PreprocessorConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => PreprocessorConfig::default(),
    };
    Preprocessor::with_config(config).unwrap_or_else(|e| fail(e))
}

/// Handle the preprocess command
fn handle_preprocess_command(path: &str, preprocessor: Preprocessor) {
    let template = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fail(format!("reading stdin: {}", e)));
        buf
    } else {
        std::fs::read_to_string(path).unwrap_or_else(|e| fail(format!("reading {}: {}", path, e)))
    };

    print!("{}", preprocessor.process(&template));
}

/// Handle the tokens command
fn handle_tokens_command(expr: &str) {
    let tokens = LEXING.run(expr.to_string()).unwrap_or_else(|e| fail(e));
    for token in tokens {
        println!("{:<9} {}", format!("{:?}", token.kind), token.text);
    }
}

/// Handle the rpn command
fn handle_rpn_command(expr: &str) {
    let tokens = TO_RPN.run(expr.to_string()).unwrap_or_else(|e| fail(e));
    let text: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    println!("{}", text.join(" "));
}

/// Handle the eval command
fn handle_eval_command(expr: &str, context_path: Option<&str>, preprocessor: Preprocessor) {
    let context: serde_json::Value = match context_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("reading {}: {}", path, e)));
            serde_json::from_str(&text).unwrap_or_else(|e| fail(format!("parsing {}: {}", path, e)))
        }
        None => serde_json::json!({}),
    };

    let pipeline = preprocessor.convert_expression(expr.trim());
    log::debug!("evaluating '{}'", pipeline);

    let registry = FunctionRegistry::with_presentation();
    match evaluate_with(&pipeline, &context, &registry) {
        Ok(value) => println!("{}", value),
        Err(e) => fail(format!("{} (pipeline: {})", e, pipeline)),
    }
}

/// Handle the functions command
fn handle_functions_command() {
    let registry = FunctionRegistry::with_presentation();
    println!("Available runtime functions:\n");
    for name in registry.names() {
        println!("  {}", name);
    }
}
