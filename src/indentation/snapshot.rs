//! Saved lexer state for backtracking

use super::enclosure::EnclosureTracker;
use super::lines::LineBuffer;
use super::stack::IndentationStack;
use super::state::State;
use crate::token::Token;
use serde::{Deserialize, Serialize};

/// Everything an [`IndentationLexer`](super::IndentationLexer) needs to resume from a
/// saved point, including the checkpoint `C` of its token source.
///
/// Taken with `save` and handed back through `reset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<C> {
    pub(super) state: State,
    pub(super) stack: IndentationStack,
    pub(super) lines: LineBuffer,
    pub(super) enclosures: EnclosureTracker,
    pub(super) last_token: Option<Token>,
    pub(super) checkpoint: C,
}

impl<C> Snapshot<C> {
    pub fn state(&self) -> State {
        self.state
    }

    pub fn indentation(&self) -> &IndentationStack {
        &self.stack
    }

    pub fn checkpoint(&self) -> &C {
        &self.checkpoint
    }
}
