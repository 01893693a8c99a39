//! Xcode build settings (`.xcconfig`)
//!
//!     Scanning starts one `root` deep, so the `)` and `]` pops of nested constructs never
//!     reach the bottom entry. Line ends and line comments push a fresh `root`.
//!
//!     Setting names are not matched by any rule: they come out as runs of `Error`
//!     characters, which the coalescing adapter joins back into one token per name.

use crate::definition::{LexerDefinition, RuleSpec, StackOp};
use crate::error::ConfigError;
use crate::token::TokenKind;
use once_cell::sync::Lazy;

static DEFINITION: Lazy<LexerDefinition> =
    Lazy::new(|| build().expect("bundled xcconfig rules are valid"));

/// The shared xcconfig definition.
pub fn definition() -> &'static LexerDefinition {
    &DEFINITION
}

pub(crate) fn build() -> Result<LexerDefinition, ConfigError> {
    LexerDefinition::builder("xcconfig")
        .seed(["root"])
        .state("inline_whitespace", |s| {
            s.rule(r"[ \t\r]+", TokenKind::Text).entry(
                RuleSpec::emit(r"/(?:\\\n)?[*].*?[*](?:\\\n)?/", TokenKind::CommentMultiline)
                    .dot_all(),
            )
        })
        .state("whitespace", |s| {
            s.rule_then(r"\n+", TokenKind::Text, StackOp::push("root"))
                .rule_then(r"//(?:\\.|.)*?$", TokenKind::CommentSingle, StackOp::push("root"))
                .mixin("inline_whitespace")
        })
        .state("root", |s| {
            s.literal_then("#", TokenKind::CommentPreproc, StackOp::push("macro"))
                .literal_then(
                    "$(",
                    TokenKind::LiteralStringInterpol,
                    StackOp::push("parentheses"),
                )
                .literal("=", TokenKind::Operator)
                .literal_then(
                    "\"",
                    TokenKind::LiteralStringDouble,
                    StackOp::push("double_quotes"),
                )
                .literal_then(
                    "'",
                    TokenKind::LiteralStringSingle,
                    StackOp::push("single_quotes"),
                )
                .rule_then(r"\$?\[", TokenKind::Operator, StackOp::push("brackets"))
                .mixin("whitespace")
        })
        .state("double_quotes", |s| {
            // "abc$" is the string abc$
            s.region()
                .rule_then(
                    r#"(?:\$#?)?""#,
                    TokenKind::LiteralStringDouble,
                    StackOp::pop(),
                )
                .rule(r#"[^"`\\$]+"#, TokenKind::LiteralStringDouble)
        })
        .state("single_quotes", |s| {
            s.region()
                .rule(r"\\.", TokenKind::LiteralStringEscape)
                .rule(r"[^\\']+", TokenKind::LiteralStringSingle)
                .literal_then("'", TokenKind::LiteralStringSingle, StackOp::pop())
                .rule(r"[^']+", TokenKind::LiteralStringSingle)
        })
        .state("macro", |s| {
            s.rule_then(r"\n", TokenKind::CommentPreproc, StackOp::pop())
                .rule(r"[^/\n\\]+", TokenKind::CommentPreproc)
                .entry(RuleSpec::emit(r"\\.", TokenKind::CommentPreproc).dot_all())
                .mixin("inline_whitespace")
                .literal("/", TokenKind::CommentPreproc)
        })
        .state("parentheses", |s| {
            s.region()
                .literal_then(")", TokenKind::LiteralStringInterpol, StackOp::pop())
                .literal(":", TokenKind::Punctuation)
                .mixin("root")
        })
        .state("brackets", |s| {
            s.region()
                .literal_then("[", TokenKind::Operator, StackOp::PushSelf)
                .groups(
                    r"(.+)(\s*)(=)(\s*)(.+)",
                    [
                        TokenKind::Keyword,
                        TokenKind::Text,
                        TokenKind::Operator,
                        TokenKind::Text,
                        TokenKind::Name,
                    ],
                )
                .literal_then("]", TokenKind::Operator, StackOp::pop())
                .mixin("root")
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn scan(input: &str) -> Vec<(TokenKind, &str)> {
        definition()
            .tokens(input)
            .unwrap()
            .iter()
            .map(|t: &Token<'_>| (t.kind(), t.text()))
            .collect()
    }

    #[test]
    fn test_starts_one_root_deep() {
        let def = definition();
        assert_eq!(def.seed().collect::<Vec<_>>(), vec!["root"]);
        let run = def.tokenize("");
        assert_eq!(run.stack(), vec!["root", "root"]);
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(
            scan("$(A:B)"),
            vec![
                (TokenKind::LiteralStringInterpol, "$("),
                (TokenKind::Error, "A"),
                (TokenKind::Punctuation, ":"),
                (TokenKind::Error, "B"),
                (TokenKind::LiteralStringInterpol, ")"),
            ]
        );
    }

    #[test]
    fn test_double_quotes_keep_trailing_dollar() {
        assert_eq!(
            scan("\"abc$\""),
            vec![
                (TokenKind::LiteralStringDouble, "\""),
                (TokenKind::LiteralStringDouble, "abc"),
                (TokenKind::LiteralStringDouble, "$\""),
            ]
        );
    }

    #[test]
    fn test_single_quote_escape() {
        assert_eq!(
            scan(r"'a\'b'"),
            vec![
                (TokenKind::LiteralStringSingle, "'"),
                (TokenKind::LiteralStringSingle, "a"),
                (TokenKind::LiteralStringEscape, r"\'"),
                (TokenKind::LiteralStringSingle, "b"),
                (TokenKind::LiteralStringSingle, "'"),
            ]
        );
    }

    #[test]
    fn test_unterminated_interpolation_is_closed() {
        let tokens = definition().tokens("$(A").unwrap();
        let last = tokens.last().unwrap();
        assert_eq!(last.kind(), TokenKind::Error);
        assert!(last.is_empty());
    }

    #[test]
    fn test_multiline_comment() {
        assert_eq!(
            scan("/* a\nb */"),
            vec![(TokenKind::CommentMultiline, "/* a\nb */")]
        );
    }
}
