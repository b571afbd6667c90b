//! One-token lookahead over any [`Lexer`].

use super::{Lexer, TokenSource};
use crate::token::Token;
use log::debug;

/// A token read ahead of time, together with the checkpoint taken just before it.
#[derive(Debug, Clone)]
struct Lookahead<C> {
    token: Option<Token>,
    before: C,
}

/// Adds [`TokenSource::peek`] to a plain [`Lexer`].
///
/// Checkpoints are taken as if nothing had been peeked: restoring one re-reads the
/// peeked token from the inner lexer. Changing the lexer state while a token is peeked
/// rewinds the inner lexer first so the token is read again under the new state.
#[derive(Debug, Clone)]
pub struct Peekable<L: Lexer> {
    lexer: L,
    lookahead: Option<Lookahead<L::Checkpoint>>,
}

impl<L: Lexer> Peekable<L> {
    pub fn new(lexer: L) -> Self {
        Peekable {
            lexer,
            lookahead: None,
        }
    }

    pub fn inner(&self) -> &L {
        &self.lexer
    }

    pub fn into_inner(mut self) -> L {
        self.unpeek();
        self.lexer
    }

    /// Give the peeked token back to the inner lexer.
    fn unpeek(&mut self) {
        if let Some(lookahead) = self.lookahead.take() {
            debug!("dropping peeked token before a state change");
            self.lexer.rewind(lookahead.before);
        }
    }
}

impl<L: Lexer> Lexer for Peekable<L> {
    type Error = L::Error;
    type Checkpoint = L::Checkpoint;

    fn next_token(&mut self) -> Result<Option<Token>, Self::Error> {
        match self.lookahead.take() {
            Some(lookahead) => Ok(lookahead.token),
            None => self.lexer.next_token(),
        }
    }

    fn reset(&mut self, input: &str, checkpoint: Option<Self::Checkpoint>) {
        self.lookahead = None;
        self.lexer.reset(input, checkpoint);
    }

    fn save(&self) -> Self::Checkpoint {
        match &self.lookahead {
            Some(lookahead) => lookahead.before.clone(),
            None => self.lexer.save(),
        }
    }

    fn rewind(&mut self, checkpoint: Self::Checkpoint) {
        self.lookahead = None;
        self.lexer.rewind(checkpoint);
    }

    fn set_state(&mut self, state: &str) -> Result<(), Self::Error> {
        self.unpeek();
        self.lexer.set_state(state)
    }

    fn push_state(&mut self, state: &str) -> Result<(), Self::Error> {
        self.unpeek();
        self.lexer.push_state(state)
    }

    fn pop_state(&mut self) -> Result<(), Self::Error> {
        self.unpeek();
        self.lexer.pop_state()
    }

    fn has(&self, kind: &str) -> bool {
        self.lexer.has(kind)
    }

    fn format_error(&self, token: &Token, message: &str) -> String {
        self.lexer.format_error(token, message)
    }
}

impl<L: Lexer> TokenSource for Peekable<L> {
    fn peek(&mut self) -> Result<Option<&Token>, Self::Error> {
        if self.lookahead.is_none() {
            let before = self.lexer.save();
            let token = self.lexer.next_token()?;
            self.lookahead = Some(Lookahead { token, before });
        }
        Ok(self.lookahead.as_ref().and_then(|lookahead| lookahead.token.as_ref()))
    }
}
