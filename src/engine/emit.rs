//! Token emission for a matched rule.
//!
//!     Turns one successful match into tokens, according to the rule's action, and reports
//!     the stack effect the action itself decided on (classifiers and lookups). The rule's
//!     declared stack operation is not handled here.
//!
//!     Empty pieces are never emitted. For per-group actions the pieces are laid out left to
//!     right: a group that did not take part in the match, or that starts before the end of
//!     the previous piece, is skipped, and any stretch of the match not covered by an emitted
//!     group becomes `Text`.

use crate::definition::rule::{CompiledAction, Rule, Transition};
use crate::definition::LexerDefinition;
use crate::error::RunError;
use crate::token::{Token, TokenKind};
use regex_automata::util::captures::Captures;
use std::collections::VecDeque;
use std::ops::Range;

pub(crate) struct Emitter<'a, 't> {
    pub source: &'t str,
    pub depth: usize,
    pub out: &'a mut VecDeque<Token<'t>>,
}

impl<'a, 't> Emitter<'a, 't> {
    fn push(&mut self, kind: TokenKind, span: Range<usize>) {
        if span.start < span.end {
            self.out.push_back(Token::new(kind, self.source, span, self.depth));
        }
    }

    /// Emits the tokens for `rule` matching with `caps`. Returns the action's own transition.
    pub fn emit(
        &mut self,
        definition: &LexerDefinition,
        rule: &Rule,
        caps: &Captures,
    ) -> Result<Transition, RunError> {
        let Some(whole) = caps.get_match() else {
            return Ok(Transition::None);
        };
        let span = whole.range();
        let text = &self.source[span.clone()];

        match &rule.action {
            CompiledAction::Emit(kind) => {
                self.push(*kind, span);
                Ok(Transition::None)
            }
            CompiledAction::EmitGroups(kinds) => {
                self.emit_groups(kinds, caps, span);
                Ok(Transition::None)
            }
            CompiledAction::Classify(classifier) => {
                let classification = classifier(text, definition.lookups());
                let transition = definition.resolve(&classification.stack_op, span.start)?;
                self.push(classification.kind, span);
                Ok(transition)
            }
            CompiledAction::Lookup { table, branches } => {
                let kind = table.classify(text);
                let transition = branches
                    .iter()
                    .find(|(family, _)| kind.is_a(*family))
                    .map_or(Transition::None, |(_, transition)| *transition);
                self.push(kind, span);
                Ok(transition)
            }
        }
    }

    fn emit_groups(&mut self, kinds: &[TokenKind], caps: &Captures, whole: Range<usize>) {
        let mut cursor = whole.start;
        for (index, kind) in kinds.iter().enumerate() {
            let Some(group) = caps.get_group(index + 1) else {
                continue;
            };
            if group.start < cursor || group.end > whole.end {
                continue;
            }
            self.push(TokenKind::Text, cursor..group.start);
            self.push(*kind, group.range());
            cursor = group.end;
        }
        self.push(TokenKind::Text, cursor..whole.end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::rule::{Classification, StackOp};
    use crate::lookup::{KeywordTable, Lookups};
    use crate::definition::LookupAction;
    use regex_automata::Input;

    fn run_first_rule<'t>(def: &LexerDefinition, source: &'t str) -> (Vec<Token<'t>>, Transition) {
        let rule = def.effective_rules("root").unwrap().next().unwrap();
        let regex = rule.pattern().regex();
        let mut cache = regex.create_cache();
        let mut caps = regex.create_captures();
        regex.search_captures_with(&mut cache, &Input::new(source), &mut caps);
        let mut out = VecDeque::new();
        let transition = Emitter {
            source,
            depth: 0,
            out: &mut out,
        }
        .emit(def, rule, &caps)
        .unwrap();
        (out.into_iter().collect(), transition)
    }

    fn kinds_and_text<'t>(tokens: &[Token<'t>]) -> Vec<(TokenKind, &'t str)> {
        tokens.iter().map(|t| (t.kind(), t.text())).collect()
    }

    #[test]
    fn test_groups_fill_gaps_with_text() {
        let def = LexerDefinition::builder("t")
            .state("root", |s| {
                s.groups(
                    r"(\w+)\s*(=)\s*(\w+)",
                    [TokenKind::NameVariable, TokenKind::Operator, TokenKind::Name],
                )
            })
            .build()
            .unwrap();
        let (tokens, _) = run_first_rule(&def, "a = b");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![
                (TokenKind::NameVariable, "a"),
                (TokenKind::Text, " "),
                (TokenKind::Operator, "="),
                (TokenKind::Text, " "),
                (TokenKind::Name, "b"),
            ]
        );
    }

    #[test]
    fn test_non_participating_group_is_skipped() {
        let def = LexerDefinition::builder("t")
            .state("root", |s| {
                s.groups(r"(x)?(y)", [TokenKind::Keyword, TokenKind::Name])
            })
            .build()
            .unwrap();
        let (tokens, _) = run_first_rule(&def, "y");
        assert_eq!(kinds_and_text(&tokens), vec![(TokenKind::Name, "y")]);
    }

    #[test]
    fn test_undeclared_trailing_group_becomes_text() {
        let def = LexerDefinition::builder("t")
            .state("root", |s| s.groups(r"(\w+)(;)", [TokenKind::Name]))
            .build()
            .unwrap();
        let (tokens, _) = run_first_rule(&def, "abc;");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![(TokenKind::Name, "abc"), (TokenKind::Text, ";")]
        );
    }

    #[test]
    fn test_nested_group_is_skipped() {
        let def = LexerDefinition::builder("t")
            .state("root", |s| {
                s.groups(r"((a)b)", [TokenKind::Name, TokenKind::Keyword])
            })
            .build()
            .unwrap();
        let (tokens, _) = run_first_rule(&def, "ab");
        assert_eq!(kinds_and_text(&tokens), vec![(TokenKind::Name, "ab")]);
    }

    #[test]
    fn test_classifier_returns_its_transition() {
        fn braces(text: &str, _: &Lookups) -> Classification {
            if text == "{" {
                Classification::new(TokenKind::Punctuation).then(StackOp::PushSelf)
            } else {
                Classification::new(TokenKind::Error)
            }
        }
        let def = LexerDefinition::builder("t")
            .state("root", |s| s.classify(r"[{}]", braces))
            .build()
            .unwrap();
        let (tokens, transition) = run_first_rule(&def, "{");
        assert_eq!(kinds_and_text(&tokens), vec![(TokenKind::Punctuation, "{")]);
        assert_eq!(transition, Transition::PushSelf);
    }

    #[test]
    fn test_lookup_branch_by_family() {
        let table = KeywordTable::builder(TokenKind::Name)
            .word("SECTION", TokenKind::KeywordDeclaration)
            .word("MOVE", TokenKind::Keyword)
            .build();
        let def = LexerDefinition::builder("t")
            .lookup_table("idents", table)
            .state("root", |s| {
                s.lookup(
                    r"\w+",
                    LookupAction::new("idents")
                        .when(TokenKind::KeywordDeclaration, StackOp::push("decl")),
                )
            })
            .state("decl", |s| s.rule(r"\w+", TokenKind::NameFunction))
            .build()
            .unwrap();

        let (tokens, transition) = run_first_rule(&def, "section");
        assert_eq!(
            kinds_and_text(&tokens),
            vec![(TokenKind::KeywordDeclaration, "section")]
        );
        assert!(matches!(transition, Transition::Push(_)));

        let (tokens, transition) = run_first_rule(&def, "move");
        assert_eq!(kinds_and_text(&tokens), vec![(TokenKind::Keyword, "move")]);
        assert_eq!(transition, Transition::None);
    }
}
