//! The indentation state machine.

use super::enclosure::EnclosureTracker;
use super::iter::Tokens;
use super::lines::LineBuffer;
use super::snapshot::Snapshot;
use super::stack::{extends, IndentationStack};
use super::state::State;
use crate::config::{Classifier, IndentationConfig, TokenClass};
use crate::error::ConfigError;
use crate::source::{Lexer, Peekable, TokenSource};
use crate::token::{Position, Token};
use log::{debug, trace};
use std::sync::Arc;

/// Outcome of a single state transition.
enum Step {
    Emit(Token),
    End,
    Continue,
}

/// Wraps a [`TokenSource`] and adds Indent and Dedent markers to its stream.
///
/// Cloning yields an independent lexer: the buffers are copied, the token source is
/// cloned and only the immutable configuration is shared.
#[derive(Debug, Clone)]
pub struct IndentationLexer<S> {
    source: S,
    classifier: Arc<Classifier>,
    state: State,
    stack: IndentationStack,
    lines: LineBuffer,
    enclosures: EnclosureTracker,
    last_token: Option<Token>,
}

impl<L: Lexer> IndentationLexer<Peekable<L>> {
    /// Build on a lexer that cannot peek by giving it a one-token lookahead.
    pub fn from_lexer(lexer: L, config: IndentationConfig) -> Result<Self, ConfigError> {
        IndentationLexer::new(Peekable::new(lexer), config)
    }
}

impl<S: TokenSource> IndentationLexer<S> {
    pub fn new(source: S, config: IndentationConfig) -> Result<Self, ConfigError> {
        let classifier = config.compile()?;
        Ok(IndentationLexer {
            source,
            classifier: Arc::new(classifier),
            state: State::default(),
            stack: IndentationStack::new(),
            lines: LineBuffer::new(),
            enclosures: EnclosureTracker::new(),
            last_token: None,
        })
    }

    /// Produce the next token, or `None` once the source is exhausted and every open
    /// block has been closed. Keeps returning `None` after that.
    pub fn next_token(&mut self) -> Result<Option<Token>, S::Error> {
        loop {
            match self.step()? {
                Step::Emit(token) => return Ok(Some(token)),
                Step::End => return Ok(None),
                Step::Continue => {}
            }
        }
    }

    pub fn tokens(&mut self) -> Tokens<'_, S> {
        Tokens::new(self)
    }

    /// Start over on `input`, from the beginning or from a saved snapshot.
    pub fn reset(&mut self, input: &str, snapshot: Option<Snapshot<S::Checkpoint>>) {
        match snapshot {
            Some(snapshot) => {
                debug!(
                    "restoring indentation lexer in {} at depth {}",
                    snapshot.state,
                    snapshot.stack.depth()
                );
                self.state = snapshot.state;
                self.stack = snapshot.stack;
                self.lines = snapshot.lines;
                self.enclosures = snapshot.enclosures;
                self.last_token = snapshot.last_token;
                self.source.reset(input, Some(snapshot.checkpoint));
            }
            None => {
                debug!("resetting indentation lexer ({} bytes)", input.len());
                self.state = State::default();
                self.stack = IndentationStack::new();
                self.lines = LineBuffer::new();
                self.enclosures = EnclosureTracker::new();
                self.last_token = None;
                self.source.reset(input, None);
            }
        }
    }

    pub fn save(&self) -> Snapshot<S::Checkpoint> {
        Snapshot {
            state: self.state,
            stack: self.stack.clone(),
            lines: self.lines.clone(),
            enclosures: self.enclosures.clone(),
            last_token: self.last_token.clone(),
            checkpoint: self.source.save(),
        }
    }

    pub fn set_state(&mut self, state: &str) -> Result<(), S::Error> {
        debug!("source state set to {state:?}");
        self.source.set_state(state)
    }

    pub fn push_state(&mut self, state: &str) -> Result<(), S::Error> {
        debug!("source state {state:?} pushed");
        self.source.push_state(state)
    }

    pub fn pop_state(&mut self) -> Result<(), S::Error> {
        debug!("source state popped");
        self.source.pop_state()
    }

    /// Whether `kind` is one of the marker names or a kind the source produces.
    pub fn has(&self, kind: &str) -> bool {
        self.classifier.is_marker_kind(kind) || self.source.has(kind)
    }

    pub fn format_error(&self, token: &Token, message: &str) -> String {
        self.source.format_error(token, message)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn indentation(&self) -> &IndentationStack {
        &self.stack
    }

    pub fn enclosures(&self) -> &EnclosureTracker {
        &self.enclosures
    }

    pub fn config(&self) -> &IndentationConfig {
        self.classifier.config()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn step(&mut self) -> Result<Step, S::Error> {
        match self.state {
            State::LineStart => self.line_start(),
            State::LineEnding => self.line_ending(),
            State::LineContent => self.line_content(),
            State::SeparatorFlush => Ok(self.separator_flush()),
            State::BufferFlush => Ok(self.buffer_flush()),
            State::LineFlush => self.line_flush(),
        }
    }

    fn line_start(&mut self) -> Result<Step, S::Error> {
        let upcoming = self
            .source
            .peek()?
            .map(|token| self.classifier.classify(token));
        match upcoming {
            Some(TokenClass::Indentation) => {
                if let Some(token) = self.consume()? {
                    self.lines.accumulate(token);
                }
            }
            Some(TokenClass::Newline | TokenClass::Comment) => self.state = State::LineEnding,
            _ => {
                self.lines.close_line();
                self.state = State::LineContent;
            }
        }
        Ok(Step::Continue)
    }

    fn line_ending(&mut self) -> Result<Step, S::Error> {
        match self.consume()? {
            Some(token) => {
                let ends_line = self.classifier.is_newline(&token);
                self.lines.accumulate(token);
                if ends_line {
                    self.lines.close_line();
                    self.state = State::LineStart;
                }
            }
            None => {
                self.lines.close_line();
                self.state = State::LineContent;
            }
        }
        Ok(Step::Continue)
    }

    fn line_content(&mut self) -> Result<Step, S::Error> {
        let exhausted = self.source.peek()?.is_none();
        if exhausted && !self.stack.is_root() {
            if self.holds_separator_line() {
                self.state = State::SeparatorFlush;
                return Ok(Step::Continue);
            }
            let at = self.last_token.as_ref().map_or_else(Position::origin, Token::end);
            return Ok(Step::Emit(self.dedent(at)));
        }

        let candidate = self.lines.indentation(&self.classifier);
        let level = self.stack.top();
        let suspended = self.classifier.suspends_in_enclosures() && !self.enclosures.is_empty();
        if exhausted || self.lines.is_empty() || candidate == level || suspended {
            self.state = State::BufferFlush;
            return Ok(Step::Continue);
        }
        if extends(&candidate, level) {
            if self.continues_with_separator()? {
                self.state = State::SeparatorFlush;
                return Ok(Step::Continue);
            }
            let at = self.marker_position()?;
            trace!("indent to {candidate:?} at {}:{}", at.line, at.col);
            self.stack.push(candidate.clone());
            let marker = Token::marker(self.classifier.indent_name(), at, candidate);
            return Ok(Step::Emit(marker));
        }

        // A separator held back from the end of the previous line still belongs to its block
        if self.holds_separator_line() {
            self.state = State::SeparatorFlush;
            return Ok(Step::Continue);
        }
        let at = self.marker_position()?;
        Ok(Step::Emit(self.dedent(at)))
    }

    fn separator_flush(&mut self) -> Step {
        match self.lines.take_from_front_line() {
            Some(token) => Step::Emit(token),
            None => {
                self.lines.discard_front_line();
                self.state = State::LineContent;
                Step::Continue
            }
        }
    }

    fn buffer_flush(&mut self) -> Step {
        match self.lines.dequeue_token() {
            Some(token) => Step::Emit(token),
            None => {
                self.state = State::LineFlush;
                Step::Continue
            }
        }
    }

    fn line_flush(&mut self) -> Result<Step, S::Error> {
        let unwind = match self.source.peek()? {
            None if self.stack.is_root() => return Ok(Step::End),
            None => {
                self.state = State::LineContent;
                return Ok(Step::Continue);
            }
            Some(token) => unwind_before(&self.classifier, &self.enclosures, &self.stack, token),
        };
        if let Some(at) = unwind {
            return Ok(Step::Emit(self.dedent(at)));
        }

        let Some(token) = self.consume()? else {
            return Ok(Step::End);
        };
        match self.classifier.classify(&token) {
            TokenClass::Opening => {
                let level = self.stack.top().to_string();
                self.enclosures.open(token.text.clone(), level);
            }
            TokenClass::Closing => {
                if let Some(opening) = self.classifier.opener_for(&token.text) {
                    self.enclosures.close(opening);
                }
            }
            TokenClass::Newline => self.state = State::LineStart,
            TokenClass::Separator => {
                let newline_follows = self
                    .source
                    .peek()?
                    .is_some_and(|next| self.classifier.is_newline(next));
                if newline_follows {
                    if let Some(newline) = self.consume()? {
                        self.lines.enqueue([token, newline]);
                        self.state = State::LineStart;
                        return Ok(Step::Continue);
                    }
                }
            }
            TokenClass::Indentation | TokenClass::Comment | TokenClass::Other => {}
        }
        Ok(Step::Emit(token))
    }

    /// Whether the oldest queued line is a separator held back by `line_flush`.
    fn holds_separator_line(&self) -> bool {
        self.lines
            .front_content(&self.classifier)
            .is_some_and(|token| self.classifier.is_separator(token))
    }

    /// Whether the buffered line continues the previous one.
    fn continues_with_separator(&mut self) -> Result<bool, S::Error> {
        if self.holds_separator_line() {
            return Ok(true);
        }
        Ok(self
            .source
            .peek()?
            .is_some_and(|token| self.classifier.is_separator(token)))
    }

    /// Where a marker for the buffered line goes: its first token, the next live token
    /// when nothing is buffered, or the end of the input.
    fn marker_position(&mut self) -> Result<Position, S::Error> {
        if let Some(token) = self.lines.first_token() {
            return Ok(token.start());
        }
        if let Some(token) = self.source.peek()? {
            return Ok(token.start());
        }
        Ok(self.last_token.as_ref().map_or_else(Position::origin, Token::end))
    }

    fn dedent(&mut self, at: Position) -> Token {
        let level = self.stack.pop().unwrap_or_default().to_string();
        trace!("dedent to {level:?} at {}:{}", at.line, at.col);
        Token::marker(self.classifier.dedent_name(), at, level)
    }

    fn consume(&mut self) -> Result<Option<Token>, S::Error> {
        let token = self.source.next_token()?;
        if let Some(token) = &token {
            self.last_token = Some(token.clone());
        }
        Ok(token)
    }
}

/// The position of a Dedent owed before `token`: set when `token` closes an enclosure
/// that was opened at a shallower level than the active one.
fn unwind_before(
    classifier: &Classifier,
    enclosures: &EnclosureTracker,
    stack: &IndentationStack,
    token: &Token,
) -> Option<Position> {
    let opening = classifier.opener_for(&token.text)?;
    let frame = enclosures.find(opening)?;
    extends(stack.top(), &frame.level).then(|| token.start())
}
