//! Testing utilities
//!
//!     Tests across the crate lex the same small sample language, available both as a
//!     [`RuleSet`] for [`RegexLexer`] and as the logos enum [`SampleToken`]. The two
//!     produce identical token streams, so a test can switch sources without touching
//!     its expectations.
//!
//!     | kind      | matches                         |
//!     |-----------|---------------------------------|
//!     | `WS`      | runs of spaces and tabs         |
//!     | `comment` | `//` up to the end of the line  |
//!     | `number`  | `0` or an unpadded integer      |
//!     | `string`  | double quoted, single line      |
//!     | `lparen` `rparen` `lbrace` `rbrace` `lbracket` `rbracket` `comma` | punctuation |
//!     | `keyword` | while if else moo cows go       |
//!     | `word`    | any other lowercase identifier  |
//!     | `NL`      | `\n`                            |
//!
//! Rendering
//!
//!     [`render`] turns a whole stream into one line: source tokens as their quoted text,
//!     markers as `KIND("level")`. It is meant for `insta` inline snapshots and plain
//!     `assert_eq!` alike.

use crate::config::IndentationConfig;
use crate::indentation::IndentationLexer;
use crate::source::{LogosKind, LogosLexer, Peekable, RegexLexer, Rule, RuleSet, TokenSource};
use crate::token::{Position, Token};
use logos::Logos;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

const KEYWORDS: &[&str] = &["while", "if", "else", "moo", "cows", "go"];

static SAMPLE_RULES: Lazy<Arc<RuleSet>> = Lazy::new(|| {
    RuleSet::builder()
        .state(
            "main",
            vec![
                Rule::regex("WS", r"[ \t]+"),
                Rule::regex("comment", r"//[^\n]*"),
                Rule::regex("number", r"0|[1-9][0-9]*"),
                Rule::regex("string", r#""(?:\\["\\]|[^\n"\\])*""#),
                Rule::literal("lparen", "("),
                Rule::literal("rparen", ")"),
                Rule::literal("lbrace", "{"),
                Rule::literal("rbrace", "}"),
                Rule::literal("lbracket", "["),
                Rule::literal("rbracket", "]"),
                Rule::literal("comma", ","),
                Rule::keywords("keyword", KEYWORDS),
                Rule::regex("word", r"[a-z_][a-z0-9_]*"),
                Rule::regex("NL", r"\n"),
            ],
        )
        .build()
        .unwrap_or_else(|e| panic!("sample rules do not compile: {e}"))
});

/// The sample language as a logos token enum.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleToken {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"//[^\n]*")]
    Comment,
    #[regex(r"0|[1-9][0-9]*")]
    Number,
    #[regex(r#""(?:\\["\\]|[^\n"\\])*""#)]
    Str,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("while")]
    #[token("if")]
    #[token("else")]
    #[token("moo")]
    #[token("cows")]
    #[token("go")]
    Keyword,
    #[regex(r"[a-z_][a-z0-9_]*")]
    Word,
    #[token("\n")]
    Newline,
}

impl LogosKind for SampleToken {
    const KINDS: &'static [&'static str] = &[
        "WS", "comment", "number", "string", "lparen", "rparen", "lbrace", "rbrace", "lbracket",
        "rbracket", "comma", "keyword", "word", "NL",
    ];

    fn kind(&self) -> &'static str {
        match self {
            SampleToken::Whitespace => "WS",
            SampleToken::Comment => "comment",
            SampleToken::Number => "number",
            SampleToken::Str => "string",
            SampleToken::LParen => "lparen",
            SampleToken::RParen => "rparen",
            SampleToken::LBrace => "lbrace",
            SampleToken::RBrace => "rbrace",
            SampleToken::LBracket => "lbracket",
            SampleToken::RBracket => "rbracket",
            SampleToken::Comma => "comma",
            SampleToken::Keyword => "keyword",
            SampleToken::Word => "word",
            SampleToken::Newline => "NL",
        }
    }
}

pub fn sample_rules() -> Arc<RuleSet> {
    Arc::clone(&SAMPLE_RULES)
}

/// An indentation lexer over the sample rules, reset to `input`.
pub fn sample_lexer(config: IndentationConfig, input: &str) -> IndentationLexer<Peekable<RegexLexer>> {
    IndentationLexer::from_lexer(RegexLexer::with_input(sample_rules(), input), config)
        .unwrap_or_else(|e| panic!("invalid test configuration: {e}"))
}

/// Like [`sample_lexer`], tokenizing with [`SampleToken`].
pub fn logos_lexer(
    config: IndentationConfig,
    input: &str,
) -> IndentationLexer<Peekable<LogosLexer<SampleToken>>> {
    IndentationLexer::from_lexer(LogosLexer::new(input), config)
        .unwrap_or_else(|e| panic!("invalid test configuration: {e}"))
}

/// A source token at the origin.
pub fn mk_token(kind: &str, text: &str) -> Token {
    Token::new(kind, text, Position::origin())
}

/// Drain the lexer, panicking on the first error.
pub fn collect<S>(lexer: &mut IndentationLexer<S>) -> Vec<Token>
where
    S: TokenSource,
    S::Error: fmt::Display,
{
    lexer
        .tokens()
        .map(|token| token.unwrap_or_else(|e| panic!("lexing failed: {e}")))
        .collect()
}

/// Render a token the way [`render`] does.
pub fn describe(token: &Token) -> String {
    match &token.indentation {
        Some(level) => format!("{}({:?})", token.kind, level),
        None => format!("{:?}", token.text),
    }
}

/// Drain the lexer into a single line. An error ends the line with `!error`.
pub fn render<S>(lexer: &mut IndentationLexer<S>) -> String
where
    S: TokenSource,
    S::Error: fmt::Display,
{
    let mut parts = Vec::new();
    for token in lexer.tokens() {
        match token {
            Ok(token) => parts.push(describe(&token)),
            Err(error) => parts.push(format!("!{error}")),
        }
    }
    parts.join(" ")
}
