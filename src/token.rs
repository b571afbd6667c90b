//! Token record shared by token sources and the indentation lexer.
//!
//!     Tokens are produced by a token source and passed through the indentation lexer
//!     untouched. The only tokens the indentation lexer creates itself are markers: zero
//!     width Indent/Dedent tokens whose `indentation` field holds the level they move to.
//!
//! Positions
//!
//!     `offset` is a byte offset into the source, `line` and `col` are 1-based and `col`
//!     counts characters. Markers borrow their position from a neighbouring real token:
//!     either the start of the first token of the line being classified, the start of a
//!     closing bracket, or the end of the last token read at end of input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, col: usize) -> Self {
        Position { offset, line, col }
    }

    /// The position of the first character of a source.
    pub fn origin() -> Self {
        Position::new(0, 1, 1)
    }

    /// The position reached after reading `text` starting from `self`.
    pub fn advance(&self, text: &str) -> Self {
        match text.rfind('\n') {
            Some(last_break) => Position {
                offset: self.offset + text.len(),
                line: self.line + text.matches('\n').count(),
                col: text[last_break + 1..].chars().count() + 1,
            },
            None => Position {
                offset: self.offset + text.len(),
                line: self.line,
                col: self.col + text.chars().count(),
            },
        }
    }
}

/// A single token.
///
/// `kind` is the token type name as reported by the token source (or the configured
/// marker name for synthesized tokens). `value` defaults to `text` but sources may
/// transform it, e.g. to strip quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: String,
    pub value: String,
    pub text: String,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
    pub line_breaks: usize,
    /// Only set on Indent/Dedent markers: the indentation level the marker moves to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indentation: Option<String>,
}

impl Token {
    /// Create a source token at `at`. The value is the text and line breaks are counted.
    pub fn new(kind: impl Into<String>, text: impl Into<String>, at: Position) -> Self {
        let text = text.into();
        Token {
            kind: kind.into(),
            value: text.clone(),
            line_breaks: text.matches('\n').count(),
            text,
            offset: at.offset,
            line: at.line,
            col: at.col,
            indentation: None,
        }
    }

    /// Create a zero width marker token moving to `indentation`.
    pub fn marker(kind: impl Into<String>, at: Position, indentation: impl Into<String>) -> Self {
        Token {
            kind: kind.into(),
            value: String::new(),
            text: String::new(),
            offset: at.offset,
            line: at.line,
            col: at.col,
            line_breaks: 0,
            indentation: Some(indentation.into()),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn is_marker(&self) -> bool {
        self.indentation.is_some()
    }

    pub fn start(&self) -> Position {
        Position::new(self.offset, self.line, self.col)
    }

    /// The position just past the last character of this token.
    pub fn end(&self) -> Position {
        self.start().advance(&self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
