//! Command-line interface for grammar-parser
//! Runs the bundled SQL `SELECT` grammar over a piece of text and prints what the engine finds.
//!
//! Usage:
//!   grammar-parser tokens `<input>`                                - Print the token list
//!   grammar-parser parse `<input>` [--format text|json] [--limit N] - Print every accepted parse
//!   grammar-parser list-token-types                              - List token types in priority order
//!
//! Global flags: --ignore-case, --trace, --config `<file.yaml>`

use clap::{Arg, ArgAction, ArgMatches, Command};
use grammar_parser::sql::{self, SqlNode};
use grammar_parser::{Parser, ParserConfig};

fn main() {
    let matches = Command::new("grammar-parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize and parse text with the bundled SELECT grammar")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("YAML file with parser settings")
                .global(true),
        )
        .arg(
            Arg::new("ignore-case")
                .long("ignore-case")
                .short('i')
                .help("Match keywords and other token patterns ignoring case")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Log every step of the parse")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("tokens").about("Print the tokens of the input").arg(
                Arg::new("input")
                    .help("Text to tokenize")
                    .required(true)
                    .index(1),
            ),
        )
        .subcommand(
            Command::new("parse")
                .about("Print every accepted parse of the input")
                .arg(
                    Arg::new("input")
                        .help("Text to parse")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .short('n')
                        .help("Stop after this many parses")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(Command::new("list-token-types").about("List token types in priority order"))
        .get_matches();

    // The merged config's `trace` field sets the logger's default level
    let config = load_config(&matches);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if config.trace { "debug" } else { "info" }),
    )
    .init();

    let parser = build_parser(config);

    match matches.subcommand() {
        Some(("tokens", tokens_matches)) => {
            let input = tokens_matches.get_one::<String>("input").unwrap();
            handle_tokens_command(&parser, input);
        }
        Some(("parse", parse_matches)) => {
            let input = parse_matches.get_one::<String>("input").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            let limit = parse_matches.get_one::<usize>("limit").copied();
            handle_parse_command(&parser, input, format, limit);
        }
        Some(("list-token-types", _)) => {
            handle_list_token_types_command(&parser);
        }
        _ => unreachable!(),
    }
}

/// The `--config` file, if any, with `--ignore-case` and `--trace` switched on top
fn load_config(matches: &ArgMatches) -> ParserConfig {
    let config = match matches.get_one::<String>("config") {
        Some(path) => ParserConfig::from_yaml_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => ParserConfig::default(),
    };
    let ignore_case = config.case_insensitive || matches.get_flag("ignore-case");
    config
        .case_insensitive(ignore_case)
        .trace(config.trace || matches.get_flag("trace"))
}

fn build_parser(config: ParserConfig) -> Parser<SqlNode> {
    sql::parser(config).unwrap_or_else(|e| {
        eprintln!("Error building grammar: {}", e);
        std::process::exit(1);
    })
}

/// Handle the tokens command
fn handle_tokens_command(parser: &Parser<SqlNode>, input: &str) {
    match parser.tokenize(input) {
        Ok(tokens) => {
            for token in tokens {
                let span = token.span();
                println!("{} {}..{}", token, span.start, span.end);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the parse command
fn handle_parse_command(parser: &Parser<SqlNode>, input: &str, format: &str, limit: Option<usize>) {
    let parses = parser.parse(input).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut found = 0;
    let statements = parses
        .filter_map(SqlNode::into_select)
        .take(limit.unwrap_or(usize::MAX));
    for statement in statements {
        found += 1;
        match format {
            "json" => match serde_json::to_string_pretty(&statement) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Serialization error: {}", e);
                    std::process::exit(1);
                }
            },
            _ => println!("{}", statement),
        }
    }

    if found == 0 {
        eprintln!("No parse found");
        std::process::exit(1);
    }
}

/// Handle the list-token-types command
fn handle_list_token_types_command(parser: &Parser<SqlNode>) {
    println!("Token types, in priority order:\n");
    for token_type in parser.tokenizer().token_types() {
        println!("  {:>2}  {}", token_type.id().index(), token_type);
    }
}
