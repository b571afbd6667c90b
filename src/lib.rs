//! # offside
//!
//! A streaming token filter for indentation-sensitive grammars.
//!
//! [`IndentationLexer`] wraps a token source and inserts zero width INDENT and DEDENT
//! tokens wherever a line opens or closes a block. Everything else passes through
//! unchanged, positions included, so a grammar can treat leading whitespace the way it
//! treats braces.
//!
//! Token sources implement [`Lexer`] (and [`TokenSource`] if they can peek). Two come
//! with the crate: [`RegexLexer`], a rule-table tokenizer with sub-lexer states, and
//! [`LogosLexer`], which adapts any `#[derive(Logos)]` enum. A [`GrammarFile`] describes
//! a `RegexLexer` and its indentation settings in YAML or JSON.
//!
//! ## Testing
//!
//! The [`testing`] module holds the sample language and the stream rendering used
//! throughout the unit and integration tests.

pub mod config;
pub mod error;
pub mod grammar;
pub mod indentation;
pub mod source;
pub mod testing;
pub mod token;

pub use config::{Classifier, IndentationConfig, TokenClass};
pub use error::{ConfigError, GrammarError, LexError};
pub use grammar::GrammarFile;
pub use indentation::{IndentationLexer, Snapshot, State, Tokens};
pub use source::{Lexer, LogosKind, LogosLexer, Peekable, RegexLexer, Rule, RuleSet, TokenSource};
pub use token::{Position, Token};
