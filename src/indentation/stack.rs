//! The stack of active indentation levels.

use serde::{Deserialize, Serialize};

/// Whether `candidate` is a strictly deeper level than `level`.
pub fn extends(candidate: &str, level: &str) -> bool {
    candidate.len() > level.len() && candidate.starts_with(level)
}

/// Active indentation levels, root first.
///
/// The bottom entry is always the empty string and every entry strictly extends the
/// one below it. The root can never be popped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentationStack {
    levels: Vec<String>,
}

impl Default for IndentationStack {
    fn default() -> Self {
        IndentationStack::new()
    }
}

impl IndentationStack {
    pub fn new() -> Self {
        IndentationStack {
            levels: vec![String::new()],
        }
    }

    /// The active level.
    pub fn top(&self) -> &str {
        self.levels.last().map_or("", String::as_str)
    }

    /// Number of levels above the root.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn is_root(&self) -> bool {
        self.levels.len() == 1
    }

    /// Push `level` if it strictly extends the top. Returns whether it was pushed.
    pub fn push(&mut self, level: impl Into<String>) -> bool {
        let level = level.into();
        if !extends(&level, self.top()) {
            return false;
        }
        self.levels.push(level);
        true
    }

    /// Pop the top level and return the new top, or `None` at the root.
    pub fn pop(&mut self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.levels.pop();
        Some(self.top())
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_root() {
        let stack = IndentationStack::new();
        assert_eq!(stack.top(), "");
        assert!(stack.is_root());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_push_and_pop() {
        let mut stack = IndentationStack::new();
        assert!(stack.push("\t"));
        assert!(stack.push("\t  "));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some("\t"));
        assert_eq!(stack.pop(), Some(""));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_root());
    }

    #[test]
    fn test_rejects_levels_that_do_not_extend_the_top() {
        let mut stack = IndentationStack::new();
        stack.push("\t");
        assert!(!stack.push("\t"));
        assert!(!stack.push("  "));
        assert!(!stack.push(""));
        assert_eq!(stack.levels(), &["".to_string(), "\t".to_string()]);
    }

    #[test]
    fn test_extends() {
        assert!(extends("\t", ""));
        assert!(extends("\t\t", "\t"));
        assert!(!extends("\t", "\t"));
        assert!(!extends("  ", "\t"));
        assert!(!extends("", "\t"));
    }
}
