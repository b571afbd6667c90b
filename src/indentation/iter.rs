//! Iterator adapter over the indentation lexer

use super::IndentationLexer;
use crate::source::TokenSource;
use crate::token::Token;
use std::iter::FusedIterator;

/// Pulls tokens from an [`IndentationLexer`] until the end of the stream or the first
/// error.
#[derive(Debug)]
pub struct Tokens<'a, S: TokenSource> {
    lexer: &'a mut IndentationLexer<S>,
    done: bool,
}

impl<'a, S: TokenSource> Tokens<'a, S> {
    pub(super) fn new(lexer: &'a mut IndentationLexer<S>) -> Self {
        Tokens { lexer, done: false }
    }
}

impl<S: TokenSource> Iterator for Tokens<'_, S> {
    type Item = Result<Token, S::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

impl<S: TokenSource> FusedIterator for Tokens<'_, S> {}

impl<'a, S: TokenSource> IntoIterator for &'a mut IndentationLexer<S> {
    type Item = Result<Token, S::Error>;
    type IntoIter = Tokens<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens()
    }
}
