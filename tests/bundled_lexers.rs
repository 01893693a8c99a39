//! Snapshot tests for the bundled lexers
//!
//! Each snapshot lists one token per line as `<kind> <text>`.

use rulelex::lexers;
use rulelex::{RunError, Token, TokenKind};

fn render(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|t| format!("{} {:?}", t.kind(), t.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn raw(tag: &str, input: &str) -> String {
    let def = lexers::find(tag).unwrap().definition();
    render(&def.tokens(input).unwrap())
}

fn coalesced(tag: &str, input: &str) -> String {
    let def = lexers::find(tag).unwrap().definition();
    let tokens: Result<Vec<_>, RunError> = def.tokenize(input).coalesced().collect();
    render(&tokens.unwrap())
}

#[test]
fn test_cobol_statement() {
    let input = "       * comment\n       MOVE \"HI\" TO WS-NAME.\n";
    insta::assert_snapshot!(raw("cobol", input), @r###"
    Text "       "
    Comment.Single "* comment"
    Text "\n       "
    Keyword "MOVE"
    Text " "
    Literal.String.Double "\"HI"
    Literal.String.Double "\""
    Text " "
    Keyword "TO"
    Text " "
    Name "WS"
    Operator "-"
    Name "NAME"
    Punctuation "."
    Text "\n"
    "###);
}

#[test]
fn test_cobol_numerals() {
    let input = "ADD 1_000 16#FF# 3.5E+2 TO X(2).";
    insta::assert_snapshot!(raw("cobol", input), @r###"
    Keyword "ADD"
    Text " "
    Literal.Number.Integer "1_000"
    Text " "
    Literal.Number.Hex "16#FF#"
    Text " "
    Literal.Number.Float "3.5E+2"
    Text " "
    Keyword "TO"
    Text " "
    Name "X"
    Punctuation "("
    Literal.Number.Integer "2"
    Punctuation ")"
    Punctuation "."
    "###);
}

#[test]
fn test_xcconfig_raw() {
    let input = "// Settings\n#include \"base.xcconfig\"\nA = $(B)\n";
    insta::assert_snapshot!(raw("xcconfig", input), @r###"
    Comment.Single "// Settings"
    Text "\n"
    Comment.Preproc "#"
    Comment.Preproc "include \"base.xcconfig\""
    Comment.Preproc "\n"
    Error "A"
    Text " "
    Operator "="
    Text " "
    Literal.String.Interpol "$("
    Error "B"
    Literal.String.Interpol ")"
    Text "\n"
    "###);
}

#[test]
fn test_xcconfig_coalesced() {
    let input = "// Settings\n#include \"base.xcconfig\"\nOTHER_FLAGS = $(inherited) \"-DX\"\n";
    insta::assert_snapshot!(coalesced("xcconfig", input), @r###"
    Comment.Single "// Settings"
    Text "\n"
    Comment.Preproc "#include \"base.xcconfig\"\n"
    Error "OTHER_FLAGS"
    Text " "
    Operator "="
    Text " "
    Literal.String.Interpol "$("
    Error "inherited"
    Literal.String.Interpol ")"
    Text " "
    Literal.String.Double "\"-DX\""
    Text "\n"
    "###);
}

#[test]
#[ignore = "open gap: COBOL identifiers with combining marks fall between the identifier rule and the word-like catch-all"]
fn test_cobol_identifier_with_combining_mark() {
    let def = lexers::find("cobol").unwrap().definition();
    let tokens = def.tokens("e\u{301}tude").unwrap();
    let view: Vec<_> = tokens.iter().map(|t| (t.kind(), t.text())).collect();
    assert_eq!(view, vec![(TokenKind::Name, "e\u{301}tude")]);
}
