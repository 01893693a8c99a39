//! Scenario tests for the tokenizer engine
//!
//! Small, hand-checked inputs for the behaviours callers rely on: rule priority,
//! contextual keywords, error recovery and nesting.

use rstest::rstest;
use rulelex::lexers;
use rulelex::{
    ConfigError, KeywordTable, LexerDefinition, LookupAction, RunError, StackOp, Token, TokenKind,
};

fn view<'t>(tokens: &[Token<'t>]) -> Vec<(TokenKind, &'t str)> {
    tokens.iter().map(|t| (t.kind(), t.text())).collect()
}

fn verbs() -> LexerDefinition {
    let table = KeywordTable::builder(TokenKind::Name)
        .words(["MOVE", "TO"], TokenKind::Keyword)
        .build();
    LexerDefinition::builder("verbs")
        .lookup_table("idents", table)
        .state("root", |s| {
            s.rule(r"\s+", TokenKind::Text)
                .lookup(r"[A-Za-z][A-Za-z0-9_-]*", LookupAction::new("idents"))
        })
        .build()
        .unwrap()
}

fn quoted() -> LexerDefinition {
    LexerDefinition::builder("quoted")
        .state("root", |s| {
            s.rule(r"\s+", TokenKind::Text)
                .rule(r"\w+", TokenKind::Name)
                .rule_then("\"", TokenKind::LiteralString, StackOp::push("string"))
        })
        .state("string", |s| {
            s.region()
                .rule(r#"[^"\n]+"#, TokenKind::LiteralString)
                .rule_then("\"", TokenKind::LiteralString, StackOp::pop())
                .rule_then(r"\n", TokenKind::Error, StackOp::pop())
        })
        .build()
        .unwrap()
}

fn brackets() -> LexerDefinition {
    LexerDefinition::builder("brackets")
        .state("root", |s| {
            s.literal_then("[", TokenKind::Punctuation, StackOp::PushSelf)
                .literal_then("]", TokenKind::Punctuation, StackOp::pop())
                .rule(r"\w+", TokenKind::Name)
        })
        .build()
        .unwrap()
}

#[rstest]
#[case::upper("MOVE X TO Y")]
#[case::lower("move x to y")]
#[case::mixed("Move x To y")]
fn test_keyword_vs_identifier(#[case] input: &str) {
    let tokens = verbs().tokens(input).unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Text,
            TokenKind::Name,
            TokenKind::Text,
            TokenKind::Keyword,
            TokenKind::Text,
            TokenKind::Name,
        ]
    );
}

#[test]
fn test_keyword_vs_identifier_in_cobol() {
    let def = lexers::find("cobol").unwrap().definition();
    let tokens = def.tokens("MOVE X TO Y").unwrap();
    assert_eq!(
        view(&tokens),
        vec![
            (TokenKind::Keyword, "MOVE"),
            (TokenKind::Text, " "),
            (TokenKind::Name, "X"),
            (TokenKind::Text, " "),
            (TokenKind::Keyword, "TO"),
            (TokenKind::Text, " "),
            (TokenKind::Name, "Y"),
        ]
    );
}

#[test]
fn test_first_declared_rule_wins_over_longer_match() {
    let def = LexerDefinition::builder("priority")
        .state("root", |s| {
            s.rule("a", TokenKind::Keyword).rule("a+", TokenKind::Name)
        })
        .build()
        .unwrap();
    let tokens = def.tokens("aaa").unwrap();
    assert_eq!(
        view(&tokens),
        vec![
            (TokenKind::Keyword, "a"),
            (TokenKind::Keyword, "a"),
            (TokenKind::Keyword, "a"),
        ]
    );
}

#[test]
fn test_one_unknown_character_degrades_locally() {
    let tokens = quoted().tokens("VALID_NAME § VALID_NAME").unwrap();
    assert_eq!(
        view(&tokens),
        vec![
            (TokenKind::Name, "VALID_NAME"),
            (TokenKind::Text, " "),
            (TokenKind::Error, "§"),
            (TokenKind::Text, " "),
            (TokenKind::Name, "VALID_NAME"),
        ]
    );
}

#[rstest]
#[case::end_of_input("\"abc", "")]
#[case::end_of_line("\"abc\n", "\n")]
fn test_unterminated_string_is_closed(#[case] input: &str, #[case] boundary: &str) {
    let def = quoted();
    let mut run = def.tokenize(input);
    let tokens: Vec<_> = run.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        view(&tokens),
        vec![
            (TokenKind::LiteralString, "\""),
            (TokenKind::LiteralString, "abc"),
            (TokenKind::Error, boundary),
        ]
    );
    assert_eq!(run.stack(), vec!["root"]);
}

#[test]
fn test_text_after_unterminated_string_is_unaffected() {
    let tokens = quoted().tokens("\"abc\nnext").unwrap();
    assert_eq!(tokens.last().map(|t| (t.kind(), t.text())), Some((TokenKind::Name, "next")));
}

#[test]
fn test_unterminated_cobol_string() {
    let def = lexers::find("cobol").unwrap().definition();
    let tokens = def.tokens("\"abc").unwrap();
    assert_eq!(
        view(&tokens),
        vec![
            (TokenKind::LiteralStringDouble, "\"abc"),
            (TokenKind::Error, ""),
        ]
    );
}

#[test]
fn test_push_self_nesting_depth() {
    let def = brackets();
    let mut run = def.tokenize("[[x]]");
    let mut depths = Vec::new();
    while let Some(token) = run.next() {
        let token = token.unwrap();
        depths.push((token.text(), run.depth()));
    }
    assert_eq!(
        depths,
        vec![("[", 1), ("[", 2), ("x", 2), ("]", 1), ("]", 0)]
    );
}

#[rstest]
#[case("[x]")]
#[case("[[a][b]]")]
#[case("[[[deep]]]x[y]")]
fn test_balanced_nesting_returns_to_root(#[case] input: &str) {
    let def = brackets();
    let mut run = def.tokenize(input);
    assert!(run.by_ref().all(|token| token.is_ok()));
    assert_eq!(run.depth(), 0);
    assert!(run.unclosed_states().is_empty());
}

#[test]
fn test_unbalanced_close_is_a_run_error() {
    let def = brackets();
    let result: Result<Vec<_>, _> = def.tokenize("[x]]y").collect();
    assert_eq!(
        result,
        Err(RunError::StackUnderflow {
            state: "root".to_string(),
            offset: 3,
            count: 1,
            depth: 1,
        })
    );
}

#[test]
fn test_unclosed_nesting_is_reported_not_fatal() {
    let def = brackets();
    let mut run = def.tokenize("[[x");
    assert_eq!(run.by_ref().count(), 3);
    assert_eq!(run.unclosed_states(), vec!["root", "root"]);
}

#[rstest]
#[case::direct(&[("a", "b"), ("b", "a")])]
#[case::self_reference(&[("a", "a")])]
#[case::through_root(&[("root", "a"), ("a", "b"), ("b", "root")])]
fn test_mixin_cycles_fail_at_build(#[case] edges: &[(&str, &str)]) {
    let mut builder = LexerDefinition::builder("cyclic")
        .state("plain", |s| s.rule("x", TokenKind::Text));
    let mut declared = vec![];
    for (from, to) in edges {
        builder = builder.state(*from, |s| s.rule("y", TokenKind::Name).mixin(*to));
        declared.push(*from);
    }
    if !declared.contains(&"root") {
        builder = builder.state("root", |s| s.mixin("plain"));
    }
    match builder.build() {
        Err(ConfigError::MixinCycle { cycle }) => {
            assert!(cycle.len() >= 2);
            assert_eq!(cycle.first(), cycle.last());
        }
        other => panic!("expected a mixin cycle, got {:?}", other.map(|d| d.name().to_string())),
    }
}

#[test]
fn test_conditional_push_from_lookup() {
    let table = KeywordTable::builder(TokenKind::Name)
        .word("section", TokenKind::KeywordDeclaration)
        .build();
    let def = LexerDefinition::builder("decl")
        .lookup_table("idents", table)
        .state("root", |s| {
            s.rule(r"\s+", TokenKind::Text).lookup(
                r"\w+",
                LookupAction::new("idents")
                    .when(TokenKind::KeywordDeclaration, StackOp::push("decl_name")),
            )
        })
        .state("decl_name", |s| {
            s.rule(r"\s+", TokenKind::Text)
                .rule_then(r"\w+", TokenKind::NameFunction, StackOp::pop())
        })
        .build()
        .unwrap();
    let tokens = def.tokens("SECTION main other").unwrap();
    assert_eq!(
        view(&tokens),
        vec![
            (TokenKind::KeywordDeclaration, "SECTION"),
            (TokenKind::Text, " "),
            (TokenKind::NameFunction, "main"),
            (TokenKind::Text, " "),
            (TokenKind::Name, "other"),
        ]
    );
}

#[test]
fn test_restarted_run_reproduces_stream() {
    let def = quoted();
    let input = "say \"hi\" § \"open";
    let first: Vec<_> = def.tokenize(input).collect();
    let second: Vec<_> = def.tokenize(input).collect();
    assert_eq!(first, second);
}
