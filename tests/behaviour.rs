//! Behavioural tests for the indentation lexer
//!
//! Each case runs against both bundled token sources. They lex the sample language
//! identically, so the expected streams are shared.

use offside::testing::{logos_lexer, render, sample_lexer};
use offside::IndentationConfig;
use rstest::rstest;

#[derive(Debug, Clone, Copy)]
enum Source {
    Regex,
    Logos,
}

impl Source {
    fn render(self, config: IndentationConfig, input: &str) -> String {
        match self {
            Source::Regex => render(&mut sample_lexer(config, input)),
            Source::Logos => render(&mut logos_lexer(config, input)),
        }
    }
}

fn config() -> IndentationConfig {
    IndentationConfig::default().with_comment_kind("comment")
}

#[rstest(source => [Source::Regex, Source::Logos])]
fn test_flat_input_is_unchanged(source: Source) {
    assert_eq!(
        source.render(config(), "while (10) cows\nmoo"),
        r#""while" " " "(" "10" ")" " " "cows" "\n" "moo""#
    );
}

#[rstest(source => [Source::Regex, Source::Logos])]
fn test_matching_indents_and_dedents(source: Source) {
    let input = "\nwhile (10)\n\tcows,\n\n\t// comment\n\t\t\t\t\n\t\t\tgo\n  moo";
    let expected = [
        r#""\n" "while" " " "(" "10" ")" "\n""#,
        r#"INDENT("\t") "\t" "cows" "," "\n""#,
        r#"INDENT("\t\t\t") "\n" "\t" "// comment" "\n" "\t\t\t\t" "\n" "\t\t\t" "go" "\n""#,
        r#"DEDENT("\t") DEDENT("") INDENT("  ") "  " "moo" DEDENT("")"#,
    ]
    .join(" ");
    assert_eq!(source.render(config(), input), expected);
}

#[rstest(source => [Source::Regex, Source::Logos])]
fn test_can_end_on_an_indent(source: Source) {
    let config = config().with_suspend_in_enclosures(false);
    let input = "cows\n\t{((cows\n\t\tcows))},\n\t";
    let expected = [
        r#""cows" "\n" INDENT("\t") "\t" "{" "(" "(" "cows" "\n""#,
        r#"INDENT("\t\t") "\t\t" "cows" DEDENT("\t") ")" ")" "}""#,
        r#""," "\n" DEDENT("") "\t""#,
    ]
    .join(" ");
    assert_eq!(source.render(config, input), expected);
}

#[rstest(source => [Source::Regex, Source::Logos])]
fn test_suspended_enclosure_ends_on_an_indent(source: Source) {
    let input = "cows\n\t{((cows\n\t\tcows))},\n\t";
    let expected = [
        r#""cows" "\n" INDENT("\t") "\t" "{" "(" "(" "cows" "\n""#,
        r#""\t\t" "cows" ")" ")" "}""#,
        r#""," "\n" DEDENT("") "\t""#,
    ]
    .join(" ");
    assert_eq!(source.render(config(), input), expected);
}

#[rstest(source => [Source::Regex, Source::Logos])]
fn test_adds_indents_and_dedents_early(source: Source) {
    let input = "cows\n\n\n\t\t\n\tcows\n\t\t\n\t\n\ncows\n";
    let expected = [
        r#""cows" "\n""#,
        r#"INDENT("\t") "\n" "\n" "\t\t" "\n" "\t" "cows" "\n""#,
        r#"DEDENT("") "\t\t" "\n" "\t" "\n" "\n" "cows" "\n""#,
    ]
    .join(" ");
    assert_eq!(source.render(config(), input), expected);
}

#[rstest(source => [Source::Regex, Source::Logos])]
fn test_custom_marker_names(source: Source) {
    let config = config().with_marker_names("indent", "dedent");
    assert_eq!(
        source.render(config, "go\n\tmoo\ncows"),
        r#""go" "\n" indent("\t") "\t" "moo" "\n" dedent("") "cows""#
    );
}

#[test]
fn test_marker_fields() {
    let mut lexer = sample_lexer(config(), "go\n\n\tmoo");
    let tokens = offside::testing::collect(&mut lexer);
    let markers: Vec<_> = tokens.iter().filter(|token| token.is_marker()).collect();
    assert_eq!(markers.len(), 2);

    let indent = markers[0];
    assert_eq!(indent.kind, "INDENT");
    assert_eq!(indent.text, "");
    assert_eq!(indent.value, "");
    assert_eq!(indent.line_breaks, 0);
    assert_eq!(indent.indentation.as_deref(), Some("\t"));
    assert_eq!((indent.offset, indent.line, indent.col), (3, 2, 1));

    let dedent = markers[1];
    assert_eq!(dedent.kind, "DEDENT");
    assert_eq!(dedent.indentation.as_deref(), Some(""));
    assert_eq!((dedent.offset, dedent.line, dedent.col), (8, 3, 5));
}
