//! Command-line interface for offside
//! Runs a grammar file over a source file and shows the token stream with its indentation markers.
//!
//! Usage:
//!   offside tokens `<path>` --grammar `<grammar>` [--format `<format>`]  - Print the token stream
//!   offside check `<grammar>`                                          - Validate a grammar file

use clap::{Arg, Command};
use offside::{GrammarError, GrammarFile, LexError, Position, Token};

fn main() {
    let matches = Command::new("offside")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turns leading whitespace into INDENT and DEDENT tokens")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("grammar")
                        .long("grammar")
                        .short('g')
                        .help("Grammar file (.yaml, .yml or .json)")
                        .required(true),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            Command::new("check").about("Validate a grammar file").arg(
                Arg::new("grammar")
                    .help("Path to the grammar file")
                    .required(true)
                    .index(1),
            ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").map_or("", String::as_str);
            let grammar = tokens_matches.get_one::<String>("grammar").map_or("", String::as_str);
            let format = tokens_matches.get_one::<String>("format").map_or("text", String::as_str);
            handle_tokens_command(path, grammar, format)
        }
        Some(("check", check_matches)) => {
            let grammar = check_matches.get_one::<String>("grammar").map_or("", String::as_str);
            handle_check_command(grammar)
        }
        _ => unreachable!(),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, grammar: &str, format: &str) -> Result<(), String> {
    let source = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    let mut lexer = GrammarFile::from_path(grammar)
        .and_then(GrammarFile::into_lexer)
        .map_err(|e| e.to_string())?;
    lexer.reset(&source, None);

    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => break,
            Err(error) => return Err(lexer.format_error(&error_token(&error), &error.to_string())),
        }
    }

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&tokens).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        _ => {
            for token in &tokens {
                println!("{}", format_token(token));
            }
        }
    }
    Ok(())
}

/// Handle the check command
fn handle_check_command(grammar: &str) -> Result<(), String> {
    let file = GrammarFile::from_path(grammar).map_err(|e| e.to_string())?;
    let states = file.states.len();
    file.into_lexer().map_err(|e: GrammarError| e.to_string())?;
    println!("{}: ok ({} states)", grammar, states);
    Ok(())
}

fn format_token(token: &Token) -> String {
    match &token.indentation {
        Some(level) => format!("{}:{} {} -> {:?}", token.line, token.col, token.kind, level),
        None => format!("{}:{} {} {:?}", token.line, token.col, token.kind, token.text),
    }
}

/// A stand-in token at the position of a lexing error.
fn error_token(error: &LexError) -> Token {
    match error {
        LexError::InvalidSyntax {
            offset,
            line,
            col,
            text,
        } => Token::new("error", text.as_str(), Position::new(*offset, *line, *col)),
        _ => Token::new("error", "", Position::origin()),
    }
}
