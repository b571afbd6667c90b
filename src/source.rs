//! Token sources
//!
//!     The indentation lexer does not tokenize anything itself. It pulls tokens from a
//!     source that satisfies one of two capability traits:
//!
//!     - [`Lexer`]: consume tokens, take and restore checkpoints, switch sub-lexer
//!       states, answer `has(kind)` and format errors.
//!     - [`TokenSource`]: a `Lexer` that can also peek at the next token without
//!       consuming it. The indentation lexer needs this to classify a line before
//!       deciding what to emit.
//!
//!     Sources that cannot peek are wrapped in [`Peekable`]; the choice is made by the
//!     caller through `IndentationLexer::new` (already peekable) or
//!     `IndentationLexer::from_lexer` (wrap it).
//!
//! Bundled sources
//!
//!     - [`RegexLexer`]: a rule-table tokenizer with a state stack for sub-lexing.
//!     - [`LogosLexer`]: adapts any `#[derive(Logos)]` token enum.

pub mod logos;
pub mod peekable;
pub mod rules;

pub use self::logos::{LogosKind, LogosLexer};
pub use peekable::Peekable;
pub use rules::{RegexCheckpoint, RegexLexer, Rule, RuleSet, RuleSetBuilder, RuleSpec};

use crate::token::Token;

/// A consuming token source.
pub trait Lexer {
    type Error;
    /// Everything needed to return to the current position and state.
    type Checkpoint: Clone;

    /// Consume the next token. `Ok(None)` signals the end of the input.
    fn next_token(&mut self) -> Result<Option<Token>, Self::Error>;

    /// Start over on `input`, either from its beginning or from `checkpoint`.
    fn reset(&mut self, input: &str, checkpoint: Option<Self::Checkpoint>);

    fn save(&self) -> Self::Checkpoint;

    /// Return to `checkpoint` without replacing the input.
    fn rewind(&mut self, checkpoint: Self::Checkpoint);

    fn set_state(&mut self, state: &str) -> Result<(), Self::Error>;

    fn push_state(&mut self, state: &str) -> Result<(), Self::Error>;

    fn pop_state(&mut self) -> Result<(), Self::Error>;

    /// Whether this source can produce tokens of `kind`.
    fn has(&self, kind: &str) -> bool;

    fn format_error(&self, token: &Token, message: &str) -> String;
}

/// A [`Lexer`] that can look one token ahead.
pub trait TokenSource: Lexer {
    fn peek(&mut self) -> Result<Option<&Token>, Self::Error>;
}

/// Render `message` with the source line of `token` and a caret under its column.
pub(crate) fn format_source_error(input: &str, token: &Token, message: &str) -> String {
    let mut offset = token.offset.min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    let line_start = input[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = input[offset..].find('\n').map_or(input.len(), |i| offset + i);
    let caret = " ".repeat(input[line_start..offset].chars().count());
    format!(
        "{} at line {} col {}:\n\n  {}\n  {}^",
        message,
        token.line,
        token.col,
        &input[line_start..line_end],
        caret
    )
}
