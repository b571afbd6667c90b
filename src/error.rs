//! Error types.
//!
//! The indentation lexer itself never fails: it is generic over the error type of its
//! token source and forwards it unchanged. The errors here belong to construction-time
//! configuration checks and to the token sources shipped with the crate.

use thiserror::Error;

/// Rejected [`IndentationConfig`](crate::config::IndentationConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("marker names must not be empty")]
    EmptyMarkerName,

    #[error("indent and dedent markers share the name `{0}`")]
    DuplicateMarkerName(String),

    #[error("marker name `{0}` collides with a configured token kind")]
    MarkerCollision(String),

    #[error("enclosure punctuation must not be empty")]
    EmptyPunctuation,

    #[error("`{0}` is configured as both an opening and a closing punctuation")]
    AmbiguousPunctuation(String),

    #[error("closing punctuation `{0}` is paired with more than one opener")]
    DuplicateCloser(String),

    #[error("separators must not be empty")]
    EmptySeparator,

    #[error("`{0}` is configured as both a separator and an enclosure punctuation")]
    SeparatorCollision(String),

    #[error("invalid configuration document: {0}")]
    Parse(String),
}

/// Errors reported by the bundled token sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("invalid syntax at line {line} col {col}: {text:?}")]
    InvalidSyntax {
        offset: usize,
        line: usize,
        col: usize,
        /// The rest of the offending line.
        text: String,
    },

    #[error("unknown lexer state `{0}`")]
    UnknownState(String),

    #[error("cannot pop the last lexer state")]
    EmptyStateStack,

    #[error("this lexer has no states")]
    StatesUnsupported,

    #[error("invalid rule `{kind}`: {message}")]
    InvalidRule { kind: String, message: String },

    #[error("a rule set needs at least one state with at least one rule")]
    EmptyRuleSet,
}

/// Errors loading a grammar file.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("cannot read grammar file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse grammar file: {0}")]
    Parse(String),

    #[error(transparent)]
    Rules(#[from] LexError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
