//! Command-line interface for rulelex
//! Prints the raw token stream of a bundled lexer, for debugging rule tables.
//!
//! Usage:
//!   rulelex tokens `<path|->` --lexer `<tag>` [--format text|json] [--coalesce] [--show-depth] [--config `<file>`]
//!   rulelex states --lexer `<tag>`    - Print every state's effective rule list
//!   rulelex list                      - List the bundled lexers
//!
//! Logging goes to stderr and is controlled by `RULELEX_LOG` (default `warn`).

use clap::{Arg, ArgAction, ArgMatches, Command};
use rulelex::lexers::{self, LexerInfo};
use rulelex::settings::{Loader, OutputFormat, Settings};
use rulelex::{LexerDefinition, RunError, Token};
use std::io::{self, Read, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RULELEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Command::new("rulelex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect the token streams of rule-table lexers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Tokenize a file and print the token stream")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file, or - for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(lexer_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["text", "json"]),
                )
                .arg(
                    Arg::new("coalesce")
                        .long("coalesce")
                        .help("Merge adjacent tokens of the same kind")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("show-depth")
                        .long("show-depth")
                        .help("Print the stack depth of each token")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Settings file layered over the defaults"),
                ),
        )
        .subcommand(
            Command::new("states")
                .about("Print the effective rule list of every state")
                .arg(lexer_arg()),
        )
        .subcommand(Command::new("list").about("List the bundled lexers"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("tokens", tokens_matches)) => handle_tokens_command(tokens_matches),
        Some(("states", states_matches)) => handle_states_command(states_matches),
        Some(("list", _)) => {
            handle_list_command();
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

fn lexer_arg() -> Arg {
    Arg::new("lexer")
        .long("lexer")
        .short('l')
        .help("Tag of the bundled lexer to use")
        .required(true)
}

fn find_lexer(matches: &ArgMatches) -> Result<&'static LexerInfo, String> {
    let tag = matches
        .get_one::<String>("lexer")
        .map(String::as_str)
        .unwrap_or_default();
    lexers::find(tag).ok_or_else(|| format!("unknown lexer `{}` (try `rulelex list`)", tag))
}

fn load_settings(matches: &ArgMatches) -> Result<Settings, String> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        let format: OutputFormat = format.parse()?;
        loader = loader
            .with_output_format(format)
            .map_err(|e| e.to_string())?;
    }
    if matches.get_flag("coalesce") {
        loader = loader.with_coalesce(true).map_err(|e| e.to_string())?;
    }
    if matches.get_flag("show-depth") {
        loader = loader.with_show_depth(true).map_err(|e| e.to_string())?;
    }
    loader.build().map_err(|e| e.to_string())
}

fn read_input(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("reading stdin: {}", e))?;
        Ok(source)
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("reading {}: {}", path, e))
    }
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) -> Result<(), String> {
    let info = find_lexer(matches)?;
    let settings = load_settings(matches)?;
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("-");
    let source = read_input(path)?;

    let definition = info.definition();
    let run = definition.tokenize_with(&source, settings.tokenizer.run_options());
    debug!(lexer = info.tag, bytes = source.len(), "tokenizing");
    let tokens: Result<Vec<Token<'_>>, RunError> = if settings.tokenizer.coalesce {
        run.coalesced().collect()
    } else {
        run.collect()
    };
    let tokens = tokens.map_err(|e| e.to_string())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match settings.output.format {
        OutputFormat::Text => {
            for token in &tokens {
                if settings.output.show_depth {
                    write!(out, "{:>3} ", token.depth()).map_err(|e| e.to_string())?;
                }
                writeln!(out, "{} {:?}", token.kind(), token.text()).map_err(|e| e.to_string())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &tokens).map_err(|e| e.to_string())?;
            writeln!(out).map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

/// Handle the states command
fn handle_states_command(matches: &ArgMatches) -> Result<(), String> {
    let info = find_lexer(matches)?;
    print_states(info.definition());
    Ok(())
}

fn print_states(definition: &LexerDefinition) {
    println!(
        "{} (start: {}, seed: [{}])",
        definition.name(),
        definition.start_state(),
        definition.seed().collect::<Vec<_>>().join(", ")
    );
    for name in definition.state_names() {
        let Some(state) = definition.state(name) else {
            continue;
        };
        let marker = if state.is_region() { " [region]" } else { "" };
        println!("\n{}{}", name, marker);
        if let Some(rules) = definition.effective_rules(name) {
            for rule in rules {
                let kind = rule
                    .fixed_kind()
                    .map(|kind| kind.to_string())
                    .unwrap_or_else(|| "<dynamic>".to_string());
                println!(
                    "  {:<40} {:<28} {:?} (from {})",
                    rule.pattern().as_str(),
                    kind,
                    rule.stack_op(),
                    rule.origin()
                );
            }
        }
    }
}

/// Handle the list command
fn handle_list_command() {
    println!("Bundled lexers:\n");
    for info in lexers::all() {
        println!("  {}", info.tag);
        println!("    {} - {}", info.title, info.description);
    }
}
