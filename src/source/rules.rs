//! Rule-table tokenizer with sub-lexer states
//!
//!     A [`RuleSet`] maps state names to ordered rule lists. At each position the rules
//!     of the current state are tried in order and the first non-empty match wins, so
//!     more specific rules go first. A rule may switch states when it matches: `push`
//!     enters a state and remembers the current one, `pop` returns to it, `next`
//!     replaces the current state.
//!
//!     Rule sets are immutable and shared between clones of a lexer through `Arc`.
//!
//! Errors
//!
//!     When no rule matches, [`RegexLexer`] reports [`LexError::InvalidSyntax`] and stays
//!     where it is, so asking again yields the same error.

use super::{format_source_error, Lexer};
use crate::error::LexError;
use crate::token::{Position, Token};
use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// State change performed when a rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Push(String),
    Pop,
    Next(String),
}

/// An uncompiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: String,
    pattern: String,
    transition: Option<Transition>,
    value: Option<fn(&str) -> String>,
}

impl Rule {
    pub fn regex(kind: impl Into<String>, pattern: impl Into<String>) -> Self {
        Rule {
            kind: kind.into(),
            pattern: pattern.into(),
            transition: None,
            value: None,
        }
    }

    pub fn literal(kind: impl Into<String>, text: &str) -> Self {
        Rule::regex(kind, regex::escape(text))
    }

    /// Any of `words`, as long as it is not immediately followed by a word character.
    pub fn keywords(kind: impl Into<String>, words: &[&str]) -> Self {
        let alternatives: Vec<String> = words.iter().map(|word| regex::escape(word)).collect();
        Rule::regex(kind, format!(r"(?:{})\b", alternatives.join("|")))
    }

    pub fn push(mut self, state: impl Into<String>) -> Self {
        self.transition = Some(Transition::Push(state.into()));
        self
    }

    pub fn pop(mut self) -> Self {
        self.transition = Some(Transition::Pop);
        self
    }

    pub fn next(mut self, state: impl Into<String>) -> Self {
        self.transition = Some(Transition::Next(state.into()));
        self
    }

    /// Derive the token value from the matched text.
    pub fn value(mut self, transform: fn(&str) -> String) -> Self {
        self.value = Some(transform);
        self
    }

    fn compile(self) -> Result<CompiledRule, LexError> {
        let regex = Regex::new(&format!(r"\A(?:{})", self.pattern)).map_err(|e| {
            LexError::InvalidRule {
                kind: self.kind.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(CompiledRule {
            kind: self.kind,
            regex,
            transition: self.transition,
            value: self.value,
        })
    }
}

/// A rule as written in a grammar file.
///
/// Exactly one of `regex`, `literal` and `keywords` must be given, and at most one of
/// `push`, `pop` and `next`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<String>,
    #[serde(default)]
    pub pop: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl TryFrom<RuleSpec> for Rule {
    type Error = LexError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        let invalid = |message: &str| LexError::InvalidRule {
            kind: spec.kind.clone(),
            message: message.to_string(),
        };

        let rule = match (&spec.regex, &spec.literal, &spec.keywords) {
            (Some(pattern), None, None) => Rule::regex(&spec.kind, pattern),
            (None, Some(text), None) => Rule::literal(&spec.kind, text),
            (None, None, Some(words)) if !words.is_empty() => {
                let words: Vec<&str> = words.iter().map(String::as_str).collect();
                Rule::keywords(&spec.kind, &words)
            }
            _ => return Err(invalid("exactly one of regex, literal or keywords is required")),
        };

        match (&spec.push, spec.pop, &spec.next) {
            (None, false, None) => Ok(rule),
            (Some(state), false, None) => Ok(rule.push(state)),
            (None, true, None) => Ok(rule.pop()),
            (None, false, Some(state)) => Ok(rule.next(state)),
            _ => Err(invalid("at most one of push, pop or next is allowed")),
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    kind: String,
    regex: Regex,
    transition: Option<Transition>,
    value: Option<fn(&str) -> String>,
}

/// Compiled rules for every state.
#[derive(Debug)]
pub struct RuleSet {
    start: String,
    states: HashMap<String, Vec<CompiledRule>>,
    kinds: HashSet<String>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    fn rules(&self, state: &str) -> &[CompiledRule] {
        self.states.get(state).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Collects states and rules for a [`RuleSet`].
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    states: Vec<(String, Vec<Rule>)>,
    start: Option<String>,
}

impl RuleSetBuilder {
    /// Add rules to a state. The first state added is the start state unless
    /// [`start`](Self::start) says otherwise.
    pub fn state(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        let name = name.into();
        match self.states.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => existing.extend(rules),
            None => self.states.push((name, rules)),
        }
        self
    }

    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    pub fn build(self) -> Result<Arc<RuleSet>, LexError> {
        let start = match self.start.or_else(|| self.states.first().map(|(name, _)| name.clone())) {
            Some(start) => start,
            None => return Err(LexError::EmptyRuleSet),
        };
        let declared: HashSet<&str> = self.states.iter().map(|(name, _)| name.as_str()).collect();
        if !declared.contains(start.as_str()) {
            return Err(LexError::UnknownState(start));
        }

        let mut kinds = HashSet::new();
        let mut states = HashMap::new();
        for (name, rules) in &self.states {
            let mut compiled = Vec::with_capacity(rules.len());
            for rule in rules {
                if let Some(Transition::Push(target) | Transition::Next(target)) = &rule.transition {
                    if !declared.contains(target.as_str()) {
                        return Err(LexError::UnknownState(target.clone()));
                    }
                }
                kinds.insert(rule.kind.clone());
                compiled.push(rule.clone().compile()?);
            }
            states.insert(name.clone(), compiled);
        }
        if states.get(&start).map_or(true, Vec::is_empty) {
            return Err(LexError::EmptyRuleSet);
        }

        Ok(Arc::new(RuleSet {
            start,
            states,
            kinds,
        }))
    }
}

/// Position and state of a [`RegexLexer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexCheckpoint {
    pub position: Position,
    pub state: String,
    pub stack: Vec<String>,
}

/// Tokenizes its input with a [`RuleSet`].
#[derive(Debug, Clone)]
pub struct RegexLexer {
    rules: Arc<RuleSet>,
    input: Arc<str>,
    position: Position,
    state: String,
    stack: Vec<String>,
}

impl RegexLexer {
    /// A lexer over empty input; call [`Lexer::reset`] to give it something to read.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        let state = rules.start().to_string();
        RegexLexer {
            rules,
            input: Arc::from(""),
            position: Position::origin(),
            state,
            stack: Vec::new(),
        }
    }

    pub fn with_input(rules: Arc<RuleSet>, input: &str) -> Self {
        let mut lexer = RegexLexer::new(rules);
        lexer.input = Arc::from(input);
        lexer
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn position(&self) -> Position {
        self.position
    }

    fn invalid_syntax(&self) -> LexError {
        let rest = self.input.get(self.position.offset..).unwrap_or_default();
        let text = rest.split('\n').next().unwrap_or_default().to_string();
        LexError::InvalidSyntax {
            offset: self.position.offset,
            line: self.position.line,
            col: self.position.col,
            text,
        }
    }

    fn apply(&mut self, transition: &Transition) -> Result<(), LexError> {
        match transition {
            Transition::Push(state) => {
                let previous = std::mem::replace(&mut self.state, state.clone());
                self.stack.push(previous);
            }
            Transition::Pop => {
                self.state = self.stack.pop().ok_or(LexError::EmptyStateStack)?;
            }
            Transition::Next(state) => self.state = state.clone(),
        }
        Ok(())
    }
}

impl Lexer for RegexLexer {
    type Error = LexError;
    type Checkpoint = RegexCheckpoint;

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.position.offset >= self.input.len() {
            return Ok(None);
        }
        let rules = Arc::clone(&self.rules);
        let input = Arc::clone(&self.input);
        let Some(rest) = input.get(self.position.offset..) else {
            return Err(self.invalid_syntax());
        };

        for rule in rules.rules(&self.state) {
            let Some(found) = rule.regex.find(rest) else {
                continue;
            };
            if found.is_empty() {
                continue;
            }
            let text = found.as_str();
            if let Some(transition) = &rule.transition {
                self.apply(transition)?;
            }
            let mut token = Token::new(&rule.kind, text, self.position);
            if let Some(transform) = rule.value {
                token = token.with_value(transform(text));
            }
            self.position = self.position.advance(text);
            return Ok(Some(token));
        }

        let error = self.invalid_syntax();
        trace!("{error}");
        Err(error)
    }

    fn reset(&mut self, input: &str, checkpoint: Option<RegexCheckpoint>) {
        debug!(
            "regex lexer reset ({} bytes, from checkpoint: {})",
            input.len(),
            checkpoint.is_some()
        );
        self.input = Arc::from(input);
        match checkpoint {
            Some(checkpoint) => self.rewind(checkpoint),
            None => {
                self.position = Position::origin();
                self.state = self.rules.start().to_string();
                self.stack.clear();
            }
        }
    }

    fn save(&self) -> RegexCheckpoint {
        RegexCheckpoint {
            position: self.position,
            state: self.state.clone(),
            stack: self.stack.clone(),
        }
    }

    fn rewind(&mut self, checkpoint: RegexCheckpoint) {
        self.position = checkpoint.position;
        self.state = checkpoint.state;
        self.stack = checkpoint.stack;
    }

    fn set_state(&mut self, state: &str) -> Result<(), LexError> {
        if !self.rules.has_state(state) {
            return Err(LexError::UnknownState(state.to_string()));
        }
        debug!("lexer state {} -> {}", self.state, state);
        self.state = state.to_string();
        Ok(())
    }

    fn push_state(&mut self, state: &str) -> Result<(), LexError> {
        if !self.rules.has_state(state) {
            return Err(LexError::UnknownState(state.to_string()));
        }
        debug!("lexer state push {}", state);
        self.apply(&Transition::Push(state.to_string()))
    }

    fn pop_state(&mut self) -> Result<(), LexError> {
        debug!("lexer state pop {}", self.state);
        self.apply(&Transition::Pop)
    }

    fn has(&self, kind: &str) -> bool {
        self.rules.has_kind(kind)
    }

    fn format_error(&self, token: &Token, message: &str) -> String {
        format_source_error(&self.input, token, message)
    }
}
