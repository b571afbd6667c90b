//! Token source backed by a logos lexer
//!
//! Any `#[derive(Logos)]` enum without extras can drive the indentation lexer once it
//! says what each variant is called through [`LogosKind`]. Tokens are produced one at a
//! time from the current offset, which keeps checkpoints down to a [`Position`].
//!
//! Logos lexers are compiled state machines without runtime modes, so the state
//! operations of [`Lexer`] report [`LexError::StatesUnsupported`].

use super::{format_source_error, Lexer};
use crate::error::LexError;
use crate::token::{Position, Token};
use log::debug;
use logos::Logos;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Names for the variants of a logos token enum.
pub trait LogosKind {
    /// Every kind name `kind` can return.
    const KINDS: &'static [&'static str];

    fn kind(&self) -> &'static str;
}

/// Adapts a logos token enum `T` to [`Lexer`].
pub struct LogosLexer<T> {
    input: Arc<str>,
    position: Position,
    _tokens: PhantomData<fn() -> T>,
}

impl<T> LogosLexer<T> {
    pub fn new(input: &str) -> Self {
        LogosLexer {
            input: Arc::from(input),
            position: Position::origin(),
            _tokens: PhantomData,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl<T> Clone for LogosLexer<T> {
    fn clone(&self) -> Self {
        LogosLexer {
            input: Arc::clone(&self.input),
            position: self.position,
            _tokens: PhantomData,
        }
    }
}

impl<T> fmt::Debug for LogosLexer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogosLexer")
            .field("position", &self.position)
            .field("len", &self.input.len())
            .finish()
    }
}

impl<T> Lexer for LogosLexer<T>
where
    T: for<'s> Logos<'s, Source = str, Extras = ()> + LogosKind,
{
    type Error = LexError;
    type Checkpoint = Position;

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let input = Arc::clone(&self.input);
        // A checkpoint taken on another input may point past its end or into a character
        let rest = match input.get(self.position.offset..) {
            Some(rest) => rest,
            None if self.position.offset >= input.len() => return Ok(None),
            None => {
                return Err(LexError::InvalidSyntax {
                    offset: self.position.offset,
                    line: self.position.line,
                    col: self.position.col,
                    text: String::new(),
                })
            }
        };
        let mut lexer = T::lexer(rest);

        let Some(result) = lexer.next() else {
            return Ok(None);
        };
        let span = lexer.span();
        // Text skipped by `#[logos(skip ...)]` still moves the position
        let start = self.position.advance(&rest[..span.start]);
        match result {
            Ok(kind) => {
                let text = &rest[span.clone()];
                self.position = start.advance(text);
                Ok(Some(Token::new(kind.kind(), text, start)))
            }
            Err(_) => Err(LexError::InvalidSyntax {
                offset: start.offset,
                line: start.line,
                col: start.col,
                text: rest[span.start..].split('\n').next().unwrap_or_default().to_string(),
            }),
        }
    }

    fn reset(&mut self, input: &str, checkpoint: Option<Position>) {
        debug!("logos lexer reset ({} bytes)", input.len());
        self.input = Arc::from(input);
        self.position = checkpoint.unwrap_or_else(Position::origin);
    }

    fn save(&self) -> Position {
        self.position
    }

    fn rewind(&mut self, checkpoint: Position) {
        self.position = checkpoint;
    }

    fn set_state(&mut self, _state: &str) -> Result<(), LexError> {
        Err(LexError::StatesUnsupported)
    }

    fn push_state(&mut self, _state: &str) -> Result<(), LexError> {
        Err(LexError::StatesUnsupported)
    }

    fn pop_state(&mut self) -> Result<(), LexError> {
        Err(LexError::StatesUnsupported)
    }

    fn has(&self, kind: &str) -> bool {
        T::KINDS.contains(&kind)
    }

    fn format_error(&self, token: &Token, message: &str) -> String {
        format_source_error(&self.input, token, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SampleToken;

    fn lex_all(input: &str) -> Vec<Token> {
        let mut lexer = LogosLexer::<SampleToken>::new(input);
        std::iter::from_fn(|| lexer.next_token().unwrap()).collect()
    }

    #[test]
    fn test_tokenizes() {
        let tokens = lex_all("while (10) cows\n\tmoo");
        let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "keyword", "WS", "lparen", "number", "rparen", "WS", "keyword", "NL", "WS", "keyword"
            ]
        );
        assert_eq!(tokens[8].start(), Position::new(16, 2, 1));
        assert_eq!(tokens[9].text, "moo");
        assert_eq!(tokens[9].start(), Position::new(17, 2, 2));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lex_all(""), vec![]);
    }

    #[test]
    fn test_invalid_character() {
        let mut lexer = LogosLexer::<SampleToken>::new("go @");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let error = lexer.next_token().unwrap_err();
        assert_eq!(
            error,
            LexError::InvalidSyntax {
                offset: 3,
                line: 1,
                col: 4,
                text: "@".into()
            }
        );
        // The position does not move past the error
        assert_eq!(lexer.position(), Position::new(3, 1, 4));
    }

    #[test]
    fn test_checkpoints() {
        let mut lexer = LogosLexer::<SampleToken>::new("go moo");
        lexer.next_token().unwrap();
        let checkpoint = lexer.save();
        let next = lexer.next_token().unwrap();
        lexer.rewind(checkpoint);
        assert_eq!(lexer.next_token().unwrap(), next);

        lexer.reset("cows", None);
        assert_eq!(lexer.next_token().unwrap().unwrap().text, "cows");
    }

    #[test]
    fn test_foreign_checkpoints_do_not_panic() {
        let mut lexer = LogosLexer::<SampleToken>::new("go moo");
        lexer.next_token().unwrap();
        let checkpoint = lexer.save();

        // Past the end of a shorter input
        lexer.reset("g", Some(checkpoint));
        assert_eq!(lexer.next_token().unwrap(), None);

        // Inside a multi-byte character
        lexer.reset("\"é\"", Some(Position::new(2, 1, 3)));
        assert!(matches!(
            lexer.next_token(),
            Err(LexError::InvalidSyntax { offset: 2, .. })
        ));
    }

    #[test]
    fn test_states_are_unsupported() {
        let mut lexer = LogosLexer::<SampleToken>::new("");
        assert_eq!(lexer.push_state("string"), Err(LexError::StatesUnsupported));
        assert_eq!(lexer.pop_state(), Err(LexError::StatesUnsupported));
        assert_eq!(lexer.set_state("main"), Err(LexError::StatesUnsupported));
    }

    #[test]
    fn test_has_kind() {
        let lexer = LogosLexer::<SampleToken>::new("");
        assert!(lexer.has("comment"));
        assert!(!lexer.has("INDENT"));
    }
}
