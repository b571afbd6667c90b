//! Indentation lexer configuration
//!
//!     The configuration names the token kinds the lexer has to recognise and the
//!     punctuation tables it consults. It is plain data (serde) so it can live in a
//!     grammar file, and it is validated once, when the lexer is built, into a
//!     [`Classifier`] that answers "what role does this token play" for the state machine.
//!
//! Recognising indentation and newlines
//!
//!     When `indentation_kind` is set, a token is indentation iff its kind matches. When
//!     it is not set, any non-empty token made only of spaces and tabs counts. Newlines
//!     work the same way with `newline_kind`, falling back to tokens made only of `\r` and
//!     `\n`. Comments are only recognised through `comment_kind`.

use crate::error::ConfigError;
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const DEFAULT_INDENT_NAME: &str = "INDENT";
pub const DEFAULT_DEDENT_NAME: &str = "DEDENT";

/// Settings for an [`IndentationLexer`](crate::indentation::IndentationLexer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentationConfig {
    /// Kind of indentation tokens. `None` selects the whitespace heuristic.
    pub indentation_kind: Option<String>,
    /// Kind of newline tokens. `None` selects the line break heuristic.
    pub newline_kind: Option<String>,
    /// Kind of comment tokens, if the grammar has comments.
    pub comment_kind: Option<String>,
    pub indent_name: String,
    pub dedent_name: String,
    /// Opening punctuation text mapped to its closing punctuation text.
    pub enclosures: BTreeMap<String, String>,
    /// Token texts that mark a line as the continuation of the previous one.
    pub separators: Vec<String>,
    /// Ignore indentation changes on lines that start inside an open enclosure.
    pub suspend_in_enclosures: bool,
}

impl Default for IndentationConfig {
    fn default() -> Self {
        IndentationConfig {
            indentation_kind: None,
            newline_kind: None,
            comment_kind: None,
            indent_name: DEFAULT_INDENT_NAME.to_string(),
            dedent_name: DEFAULT_DEDENT_NAME.to_string(),
            enclosures: [("{", "}"), ("(", ")"), ("[", "]")]
                .into_iter()
                .map(|(open, close)| (open.to_string(), close.to_string()))
                .collect(),
            separators: [",", ":", ";"].into_iter().map(String::from).collect(),
            suspend_in_enclosures: true,
        }
    }
}

impl IndentationConfig {
    pub fn with_indentation_kind(mut self, kind: impl Into<String>) -> Self {
        self.indentation_kind = Some(kind.into());
        self
    }

    pub fn with_newline_kind(mut self, kind: impl Into<String>) -> Self {
        self.newline_kind = Some(kind.into());
        self
    }

    pub fn with_comment_kind(mut self, kind: impl Into<String>) -> Self {
        self.comment_kind = Some(kind.into());
        self
    }

    pub fn with_marker_names(mut self, indent: impl Into<String>, dedent: impl Into<String>) -> Self {
        self.indent_name = indent.into();
        self.dedent_name = dedent.into();
        self
    }

    pub fn with_enclosure(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.enclosures.insert(open.into(), close.into());
        self
    }

    pub fn without_enclosures(mut self) -> Self {
        self.enclosures.clear();
        self
    }

    pub fn with_separators<I, T>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_suspend_in_enclosures(mut self, suspend: bool) -> Self {
        self.suspend_in_enclosures = suspend;
        self
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_name.is_empty() || self.dedent_name.is_empty() {
            return Err(ConfigError::EmptyMarkerName);
        }
        if self.indent_name == self.dedent_name {
            return Err(ConfigError::DuplicateMarkerName(self.indent_name.clone()));
        }
        for kind in [&self.indentation_kind, &self.newline_kind, &self.comment_kind]
            .into_iter()
            .flatten()
        {
            if *kind == self.indent_name || *kind == self.dedent_name {
                return Err(ConfigError::MarkerCollision(kind.clone()));
            }
        }

        let mut closers = HashSet::new();
        for (open, close) in &self.enclosures {
            if open.is_empty() || close.is_empty() {
                return Err(ConfigError::EmptyPunctuation);
            }
            if !closers.insert(close.as_str()) {
                return Err(ConfigError::DuplicateCloser(close.clone()));
            }
        }
        if let Some(both) = self.enclosures.keys().find(|open| closers.contains(open.as_str())) {
            return Err(ConfigError::AmbiguousPunctuation(both.clone()));
        }

        for separator in &self.separators {
            if separator.is_empty() {
                return Err(ConfigError::EmptySeparator);
            }
            if self.enclosures.contains_key(separator) || closers.contains(separator.as_str()) {
                return Err(ConfigError::SeparatorCollision(separator.clone()));
            }
        }
        Ok(())
    }

    /// Validate and compile into a [`Classifier`].
    pub fn compile(self) -> Result<Classifier, ConfigError> {
        self.validate()?;
        let closers = self
            .enclosures
            .iter()
            .map(|(open, close)| (close.clone(), open.clone()))
            .collect();
        let separators = self.separators.iter().cloned().collect();
        Ok(Classifier {
            config: self,
            closers,
            separators,
        })
    }
}

/// The role a token plays for the indentation lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Indentation,
    Newline,
    Comment,
    Opening,
    Closing,
    Separator,
    Other,
}

/// A validated configuration with lookup tables.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: IndentationConfig,
    /// Closing punctuation mapped back to its opener.
    closers: HashMap<String, String>,
    separators: HashSet<String>,
}

impl Classifier {
    pub fn config(&self) -> &IndentationConfig {
        &self.config
    }

    pub fn indent_name(&self) -> &str {
        &self.config.indent_name
    }

    pub fn dedent_name(&self) -> &str {
        &self.config.dedent_name
    }

    pub fn suspends_in_enclosures(&self) -> bool {
        self.config.suspend_in_enclosures
    }

    pub fn classify(&self, token: &Token) -> TokenClass {
        if self.is_indentation(token) {
            TokenClass::Indentation
        } else if self.is_newline(token) {
            TokenClass::Newline
        } else if self.is_comment(token) {
            TokenClass::Comment
        } else if self.config.enclosures.contains_key(&token.text) {
            TokenClass::Opening
        } else if self.closers.contains_key(&token.text) {
            TokenClass::Closing
        } else if self.is_separator(token) {
            TokenClass::Separator
        } else {
            TokenClass::Other
        }
    }

    pub fn is_indentation(&self, token: &Token) -> bool {
        match &self.config.indentation_kind {
            Some(kind) => token.kind == *kind,
            None => !token.text.is_empty() && token.text.chars().all(|c| c == ' ' || c == '\t'),
        }
    }

    pub fn is_newline(&self, token: &Token) -> bool {
        match &self.config.newline_kind {
            Some(kind) => token.kind == *kind,
            None => !token.text.is_empty() && token.text.chars().all(|c| c == '\n' || c == '\r'),
        }
    }

    pub fn is_comment(&self, token: &Token) -> bool {
        self.config
            .comment_kind
            .as_ref()
            .is_some_and(|kind| token.kind == *kind)
    }

    pub fn is_separator(&self, token: &Token) -> bool {
        self.separators.contains(&token.text)
    }

    /// The opener paired with a closing punctuation text.
    pub fn opener_for(&self, closer: &str) -> Option<&str> {
        self.closers.get(closer).map(String::as_str)
    }

    pub fn is_marker_kind(&self, kind: &str) -> bool {
        kind == self.config.indent_name || kind == self.config.dedent_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;

    fn tok(kind: &str, text: &str) -> Token {
        Token::new(kind, text, Position::origin())
    }

    #[test]
    fn test_defaults() {
        let config = IndentationConfig::default();
        assert_eq!(config.indent_name, "INDENT");
        assert_eq!(config.dedent_name, "DEDENT");
        assert_eq!(config.enclosures.get("(").map(String::as_str), Some(")"));
        assert_eq!(config.enclosures.get("{").map(String::as_str), Some("}"));
        assert_eq!(config.enclosures.get("[").map(String::as_str), Some("]"));
        assert_eq!(config.separators, vec![",", ":", ";"]);
        assert!(config.suspend_in_enclosures);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_heuristic_classification() {
        let classifier = IndentationConfig::default().compile().unwrap();
        assert_eq!(classifier.classify(&tok("WS", "\t ")), TokenClass::Indentation);
        assert_eq!(classifier.classify(&tok("NL", "\r\n")), TokenClass::Newline);
        assert_eq!(classifier.classify(&tok("lparen", "(")), TokenClass::Opening);
        assert_eq!(classifier.classify(&tok("rparen", ")")), TokenClass::Closing);
        assert_eq!(classifier.classify(&tok("comma", ",")), TokenClass::Separator);
        assert_eq!(classifier.classify(&tok("word", "cows")), TokenClass::Other);
        // Without a comment kind nothing is a comment
        assert_eq!(classifier.classify(&tok("comment", "// x")), TokenClass::Other);
    }

    #[test]
    fn test_explicit_kinds_win_over_text() {
        let classifier = IndentationConfig::default()
            .with_indentation_kind("indent")
            .with_newline_kind("eol")
            .with_comment_kind("comment")
            .compile()
            .unwrap();
        assert!(!classifier.is_indentation(&tok("WS", "\t")));
        assert!(classifier.is_indentation(&tok("indent", "\t")));
        assert!(!classifier.is_newline(&tok("NL", "\n")));
        assert!(classifier.is_newline(&tok("eol", "\n")));
        assert_eq!(classifier.classify(&tok("comment", "# x")), TokenClass::Comment);
    }

    #[test]
    fn test_opener_lookup() {
        let classifier = IndentationConfig::default()
            .with_enclosure("<<", ">>")
            .compile()
            .unwrap();
        assert_eq!(classifier.opener_for(")"), Some("("));
        assert_eq!(classifier.opener_for(">>"), Some("<<"));
        assert_eq!(classifier.opener_for("("), None);
    }

    #[test]
    fn test_rejects_shared_marker_names() {
        let config = IndentationConfig::default().with_marker_names("BLOCK", "BLOCK");
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateMarkerName("BLOCK".into()))
        );
    }

    #[test]
    fn test_rejects_empty_marker_name() {
        let config = IndentationConfig::default().with_marker_names("", "DEDENT");
        assert_eq!(config.validate(), Err(ConfigError::EmptyMarkerName));
    }

    #[test]
    fn test_rejects_marker_named_like_a_kind() {
        let config = IndentationConfig::default().with_newline_kind("INDENT");
        assert_eq!(
            config.validate(),
            Err(ConfigError::MarkerCollision("INDENT".into()))
        );
    }

    #[test]
    fn test_rejects_closer_used_twice() {
        let config = IndentationConfig::default().with_enclosure("<", ")");
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateCloser(")".into()))
        );
    }

    #[test]
    fn test_rejects_symmetric_punctuation() {
        let config = IndentationConfig::default()
            .without_enclosures()
            .with_enclosure("|", "|");
        assert_eq!(
            config.validate(),
            Err(ConfigError::AmbiguousPunctuation("|".into()))
        );
    }

    #[test]
    fn test_rejects_separator_that_is_punctuation() {
        let config = IndentationConfig::default().with_separators([",", ")"]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::SeparatorCollision(")".into()))
        );
        let config = IndentationConfig::default().with_separators([""]);
        assert_eq!(config.validate(), Err(ConfigError::EmptySeparator));
    }

    #[test]
    fn test_yaml_document_keeps_unspecified_defaults() {
        let config = IndentationConfig::from_yaml_str(
            "comment_kind: comment\nseparators: [\",\"]\nsuspend_in_enclosures: false\n",
        )
        .unwrap();
        assert_eq!(config.comment_kind.as_deref(), Some("comment"));
        assert_eq!(config.separators, vec![","]);
        assert!(!config.suspend_in_enclosures);
        assert_eq!(config.indent_name, "INDENT");
        assert_eq!(config.enclosures.len(), 3);
    }

    #[test]
    fn test_json_document() {
        let config = IndentationConfig::from_json_str(
            r#"{"indent_name": "BEGIN", "dedent_name": "END", "enclosures": {}}"#,
        )
        .unwrap();
        assert_eq!(config.indent_name, "BEGIN");
        assert!(config.enclosures.is_empty());
        assert!(matches!(
            IndentationConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
