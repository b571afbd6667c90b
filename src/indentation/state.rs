//! States of the indentation lexer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the indentation lexer is within the current line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Reading the leading indentation of a line.
    #[default]
    LineStart,
    /// Reading a blank or comment-only line up to its newline.
    LineEnding,
    /// Comparing the buffered line against the indentation stack.
    LineContent,
    /// Emitting a continuation line without an Indent.
    SeparatorFlush,
    /// Emitting every buffered token.
    BufferFlush,
    /// Passing tokens through until the next newline.
    LineFlush,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::LineStart => "line-start",
            State::LineEnding => "line-ending",
            State::LineContent => "line-content",
            State::SeparatorFlush => "separator-flush",
            State::BufferFlush => "buffer-flush",
            State::LineFlush => "line-flush",
        };
        f.write_str(name)
    }
}
