//! Buffering of lines that have been read but not yet classified.

use crate::config::Classifier;
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A queue of completed lines plus the line currently being read.
///
/// Lines are closed into the queue in source order; the newest queued line is the one
/// whose indentation decides the next marker, older ones are blank or comment-only
/// lines that came before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBuffer {
    queue: VecDeque<VecDeque<Token>>,
    pending: Vec<Token>,
}

impl LineBuffer {
    pub fn new() -> Self {
        LineBuffer::default()
    }

    /// Add a token to the line being read.
    pub fn accumulate(&mut self, token: Token) {
        self.pending.push(token);
    }

    /// Move the line being read into the queue, even when it is empty.
    pub fn close_line(&mut self) {
        let line = std::mem::take(&mut self.pending);
        self.queue.push_back(line.into());
    }

    /// Queue a complete line directly.
    pub fn enqueue(&mut self, line: impl IntoIterator<Item = Token>) {
        self.queue.push_back(line.into_iter().collect());
    }

    /// The leading indentation of the newest queued line.
    pub fn indentation(&self, classifier: &Classifier) -> String {
        self.queue
            .back()
            .map(|line| {
                line.iter()
                    .take_while(|token| classifier.is_indentation(token))
                    .map(|token| token.text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The first buffered token of any queued line.
    pub fn first_token(&self) -> Option<&Token> {
        self.queue.iter().flatten().next()
    }

    /// The first token of the oldest queued line that is not indentation.
    pub fn front_content(&self, classifier: &Classifier) -> Option<&Token> {
        self.queue
            .front()?
            .iter()
            .find(|token| !classifier.is_indentation(token))
    }

    /// Take the next token of the oldest queued line without moving to the next line.
    pub fn take_from_front_line(&mut self) -> Option<Token> {
        self.queue.front_mut()?.pop_front()
    }

    pub fn discard_front_line(&mut self) {
        self.queue.pop_front();
    }

    /// Take the next queued token, dropping lines as they run empty.
    pub fn dequeue_token(&mut self) -> Option<Token> {
        loop {
            let line = self.queue.front_mut()?;
            match line.pop_front() {
                Some(token) => return Some(token),
                None => {
                    self.queue.pop_front();
                }
            }
        }
    }

    /// Number of queued lines, the line being read excluded.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> &[Token] {
        &self.pending
    }
}
