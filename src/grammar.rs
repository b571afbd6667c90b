//! Grammar files
//!
//!     A grammar file bundles the rules of a [`RegexLexer`] with the indentation
//!     settings, so a complete lexer can be described without writing Rust:
//!
//!         start: main
//!         states:
//!           main:
//!             - { kind: WS, regex: "[ \t]+" }
//!             - { kind: comment, regex: "#[^\n]*" }
//!             - { kind: word, regex: "[a-z]+" }
//!             - { kind: quote, literal: "\"", push: string }
//!             - { kind: NL, regex: "\n" }
//!           string:
//!             - { kind: chars, regex: "[^\"]+" }
//!             - { kind: quote, literal: "\"", pop: true }
//!         indentation:
//!           comment_kind: comment
//!           separators: [","]
//!
//!     `start` defaults to `main`. Every field of `indentation` is optional. Files ending
//!     in `.yaml` or `.yml` are read as YAML, anything else as JSON.

use crate::config::IndentationConfig;
use crate::error::GrammarError;
use crate::indentation::IndentationLexer;
use crate::source::{Peekable, RegexLexer, Rule, RuleSet, RuleSpec};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_START_STATE: &str = "main";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    pub states: BTreeMap<String, Vec<RuleSpec>>,
    #[serde(default)]
    pub indentation: IndentationConfig,
}

impl GrammarFile {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let yaml = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| matches!(extension, "yaml" | "yml"));
        debug!("loading grammar {} as {}", path.display(), if yaml { "YAML" } else { "JSON" });
        if yaml {
            GrammarFile::from_yaml_str(&source)
        } else {
            GrammarFile::from_json_str(&source)
        }
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, GrammarError> {
        serde_yaml::from_str(source).map_err(|e| GrammarError::Parse(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(source).map_err(|e| GrammarError::Parse(e.to_string()))
    }

    pub fn start_state(&self) -> &str {
        self.start.as_deref().unwrap_or(DEFAULT_START_STATE)
    }

    /// Compile the rules.
    pub fn rules(&self) -> Result<Arc<RuleSet>, GrammarError> {
        let mut builder = RuleSet::builder().start(self.start_state());
        for (name, specs) in &self.states {
            let rules = specs
                .iter()
                .cloned()
                .map(Rule::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.state(name, rules);
        }
        Ok(builder.build()?)
    }

    /// Compile the rules and validate the indentation settings.
    pub fn into_lexer(self) -> Result<IndentationLexer<Peekable<RegexLexer>>, GrammarError> {
        let rules = self.rules()?;
        Ok(IndentationLexer::from_lexer(
            RegexLexer::new(rules),
            self.indentation,
        )?)
    }
}
