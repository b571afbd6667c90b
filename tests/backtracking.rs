//! Snapshots, clones and the iterator adapter

use offside::testing::{collect, describe, render, sample_lexer, sample_rules};
use offside::{
    IndentationConfig, IndentationLexer, LexError, Peekable, RegexLexer, Rule, RuleSet, Snapshot,
    State, Token,
};

const INPUT: &str = "go\n\tmoo (cows\n\t\tgo)\n\n\tmoo\ncows";

fn config() -> IndentationConfig {
    IndentationConfig::default()
        .with_comment_kind("comment")
        .with_suspend_in_enclosures(false)
}

fn lexer() -> IndentationLexer<Peekable<RegexLexer>> {
    sample_lexer(config(), INPUT)
}

fn advance<S>(lexer: &mut IndentationLexer<S>, count: usize) -> Vec<Token>
where
    S: offside::TokenSource,
    S::Error: std::fmt::Debug,
{
    (0..count)
        .map(|_| lexer.next_token().unwrap().expect("stream ended early"))
        .collect()
}

// ===== Snapshots =====

#[test]
fn test_restore_replays_the_same_tokens() {
    // Stop at every point of the stream, including inside buffered lines
    let total = collect(&mut lexer()).len();
    for stop in 0..=total {
        let mut lexer = lexer();
        advance(&mut lexer, stop);
        let snapshot = lexer.save();
        let rest = collect(&mut lexer);

        lexer.reset(INPUT, Some(snapshot));
        assert_eq!(collect(&mut lexer), rest, "restoring after {stop} tokens");
    }
}

#[test]
fn test_snapshot_captures_the_indentation_stack() {
    let mut lexer = lexer();
    let prefix: Vec<String> = advance(&mut lexer, 11).iter().map(describe).collect();
    assert_eq!(
        prefix.join(" "),
        r#""go" "\n" INDENT("\t") "\t" "moo" " " "(" "cows" "\n" INDENT("\t\t") "\t\t""#
    );

    let snapshot = lexer.save();
    assert_eq!(snapshot.indentation().levels(), &["", "\t", "\t\t"]);
    assert_eq!(snapshot.state(), State::BufferFlush);
}

#[test]
fn test_reset_without_snapshot_starts_over() {
    let mut lexer = lexer();
    let everything = collect(&mut lexer);
    lexer.reset(INPUT, None);
    assert_eq!(lexer.state(), State::LineStart);
    assert!(lexer.indentation().is_root());
    assert_eq!(collect(&mut lexer), everything);
}

#[test]
fn test_reset_on_new_input_clears_open_blocks() {
    let mut lexer = lexer();
    advance(&mut lexer, 4);
    assert_eq!(lexer.indentation().depth(), 1);

    lexer.reset("moo", None);
    assert_eq!(render(&mut lexer), r#""moo""#);
}

#[test]
fn test_snapshot_survives_serialization() {
    let mut lexer = lexer();
    advance(&mut lexer, 9);
    let snapshot = lexer.save();
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: Snapshot<offside::source::RegexCheckpoint> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, snapshot);

    let rest = collect(&mut lexer);
    lexer.reset(INPUT, Some(restored));
    assert_eq!(collect(&mut lexer), rest);
}

// ===== Clones =====

#[test]
fn test_clones_are_independent() {
    let mut original = lexer();
    advance(&mut original, 5);

    let mut clone = original.clone();
    let from_clone = collect(&mut clone);
    assert!(clone.indentation().is_root());

    // Draining the clone left the original where it was
    assert_eq!(original.indentation().depth(), 1);
    assert_eq!(collect(&mut original), from_clone);
}

#[test]
fn test_resetting_a_clone_does_not_touch_the_original() {
    let mut original = lexer();
    advance(&mut original, 4);
    let expected = collect(&mut original.clone());

    let mut clone = original.clone();
    clone.reset("a\n\t\t\tb", None);
    assert_eq!(
        render(&mut clone),
        r#""a" "\n" INDENT("\t\t\t") "\t\t\t" "b" DEDENT("")"#
    );

    assert_eq!(collect(&mut original), expected);
}

// ===== Iterator =====

#[test]
fn test_iterator_matches_next_token() {
    let mut by_iterator = lexer();
    let mut by_call = lexer();
    let mut expected = Vec::new();
    while let Some(token) = by_call.next_token().unwrap() {
        expected.push(token);
    }

    let mut tokens = Vec::new();
    for token in &mut by_iterator {
        tokens.push(token.unwrap());
    }
    assert_eq!(tokens, expected);
    assert_eq!(by_iterator.next_token().unwrap(), None);
}

#[test]
fn test_iterator_stops_after_an_error() {
    let mut lexer = sample_lexer(config(), "go @ moo");
    let mut tokens = lexer.tokens();
    assert_eq!(tokens.next().unwrap().unwrap().text, "go");
    assert_eq!(tokens.next().unwrap().unwrap().text, " ");
    assert!(matches!(
        tokens.next(),
        Some(Err(LexError::InvalidSyntax { col: 4, .. }))
    ));
    assert!(tokens.next().is_none());
    assert!(tokens.next().is_none());

    // The lexer itself keeps reporting the error
    assert!(lexer.next_token().is_err());
}

// ===== Delegation =====

#[test]
fn test_format_error_uses_the_source_text() {
    let mut lexer = sample_lexer(config(), "go\n  moo");
    let tokens = collect(&mut lexer);
    let moo = tokens.iter().find(|token| token.text == "moo").unwrap();
    assert_eq!(
        lexer.format_error(moo, "unexpected"),
        "unexpected at line 2 col 3:\n\n    moo\n    ^"
    );
}

#[test]
fn test_state_changes_reach_the_source() {
    let rules = RuleSet::builder()
        .state(
            "main",
            vec![
                Rule::regex("word", "[a-z]+"),
                Rule::regex("WS", "[ \t]+"),
                Rule::regex("NL", r"\n"),
            ],
        )
        .state("digits", vec![Rule::regex("number", "[0-9]+")])
        .build()
        .unwrap();
    let mut lexer =
        IndentationLexer::from_lexer(RegexLexer::with_input(rules, "12go"), config()).unwrap();

    assert!(matches!(
        lexer.push_state("nope"),
        Err(LexError::UnknownState(state)) if state == "nope"
    ));
    lexer.push_state("digits").unwrap();
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, "number");
    lexer.pop_state().unwrap();
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, "word");
    assert!(matches!(lexer.pop_state(), Err(LexError::EmptyStateStack)));

    lexer.set_state("digits").unwrap();
    assert_eq!(lexer.source().inner().state(), "digits");
}

#[test]
fn test_has_covers_markers_and_source_kinds() {
    let lexer = IndentationLexer::from_lexer(RegexLexer::new(sample_rules()), config()).unwrap();
    assert!(lexer.has("INDENT"));
    assert!(lexer.has("DEDENT"));
    assert!(lexer.has("comment"));
    assert!(!lexer.has("BLOCK"));
    assert_eq!(lexer.config().dedent_name, "DEDENT");
}
