//! Lexer definitions
//!
//!     A [LexerDefinition] is the frozen form of one language's rule table: named states,
//!     compiled rules, the start state and the start-up seed list, and the keyword tables
//!     contextual rules classify through. It is produced once by [LexerBuilder::build] and
//!     never changes afterwards, so one definition can drive any number of concurrent runs.
//!
//!     Rules live in a single arena. States refer to them by index, both in their declared
//!     entries and in their effective (mixin-expanded) rule lists; a rule mixed into five
//!     states is compiled once.
//!
//!     Building blocks:
//!         - [rule]: patterns, actions, stack operations.
//!         - [state]: declared entries and effective rule lists.
//!         - [mixin]: expansion of mixin references with cycle detection.
//!         - [builder]: the declaration API and the freeze step.

pub mod builder;
pub(crate) mod mixin;
pub mod rule;
pub mod state;

pub use builder::{LexerBuilder, StateBuilder};
pub use rule::{
    Action, Classification, Classifier, LookupAction, Pattern, PatternFlags, Rule, RuleSpec,
    StackOp,
};
pub use state::State;

use crate::engine::{RunOptions, Tokenizer};
use crate::error::RunError;
use crate::lookup::Lookups;
use crate::token::Token;
use rule::{RuleId, StateId, Transition};
use rustc_hash::FxHashMap;

/// The immutable rule table of one language.
#[derive(Debug, Clone)]
pub struct LexerDefinition {
    pub(crate) name: String,
    pub(crate) states: Vec<State>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) index: FxHashMap<String, StateId>,
    pub(crate) start: StateId,
    pub(crate) seed: Vec<StateId>,
    pub(crate) lookups: Lookups,
}

impl LexerDefinition {
    pub fn builder(name: impl Into<String>) -> LexerBuilder {
        LexerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_state(&self) -> &str {
        &self.states[self.start].name
    }

    /// States pushed on top of the start state before scanning begins.
    pub fn seed(&self) -> impl Iterator<Item = &str> {
        self.seed.iter().map(move |id| self.states[*id].name.as_str())
    }

    /// State names in declaration order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|state| state.name.as_str())
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.state_id(name).map(|id| &self.states[id])
    }

    /// The rules tried, in order, while `name` is the active state.
    pub fn effective_rules(&self, name: &str) -> Option<impl Iterator<Item = &Rule>> {
        let state = self.state(name)?;
        Some(state.effective().iter().map(move |id| &self.rules[*id]))
    }

    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    /// Starts a run over `text` with default options.
    pub fn tokenize<'d, 't>(&'d self, text: &'t str) -> Tokenizer<'d, 't> {
        Tokenizer::new(self, text, RunOptions::default())
    }

    pub fn tokenize_with<'d, 't>(&'d self, text: &'t str, options: RunOptions) -> Tokenizer<'d, 't> {
        Tokenizer::new(self, text, options)
    }

    /// Runs to completion and collects every token.
    pub fn tokens<'t>(&self, text: &'t str) -> Result<Vec<Token<'t>>, RunError> {
        self.tokenize(text).collect()
    }

    pub(crate) fn state_at(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub(crate) fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    pub(crate) fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub(crate) fn initial_stack(&self) -> Vec<StateId> {
        let mut stack = Vec::with_capacity(self.seed.len() + 4);
        stack.push(self.start);
        stack.extend_from_slice(&self.seed);
        stack
    }

    /// Resolves a stack operation produced while scanning (by a classifier).
    pub(crate) fn resolve(&self, op: &StackOp, offset: usize) -> Result<Transition, RunError> {
        let lookup = |name: &str| {
            self.state_id(name).ok_or_else(|| RunError::UnknownState {
                state: name.to_string(),
                offset,
            })
        };
        Ok(match op {
            StackOp::None => Transition::None,
            StackOp::Push(name) => Transition::Push(lookup(name)?),
            StackOp::Goto(name) => Transition::Goto(lookup(name)?),
            StackOp::Pop(count) => Transition::Pop(*count),
            StackOp::PushSelf => Transition::PushSelf,
            StackOp::Reset => Transition::Reset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn nested() -> LexerDefinition {
        LexerDefinition::builder("nested")
            .seed(["body"])
            .state("whitespace", |s| s.rule(r"\s+", TokenKind::Text))
            .state("root", |s| s.mixin("whitespace"))
            .state("body", |s| {
                s.rule(r"\w+", TokenKind::Name)
                    .mixin("whitespace")
                    .rule_then(r"\(", TokenKind::Punctuation, StackOp::push("body"))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_introspection() {
        let def = nested();
        assert_eq!(
            def.state_names().collect::<Vec<_>>(),
            vec!["whitespace", "root", "body"]
        );
        assert_eq!(def.seed().collect::<Vec<_>>(), vec!["body"]);
        let body = def.state("body").unwrap();
        assert_eq!(body.declared_len(), 2);
        assert_eq!(body.effective_len(), 3);
        assert_eq!(body.mixins().collect::<Vec<_>>(), vec!["whitespace"]);
        assert!(def.state("missing").is_none());
    }

    #[test]
    fn test_effective_rules_keep_origin() {
        let def = nested();
        let origins: Vec<_> = def
            .effective_rules("body")
            .unwrap()
            .map(|rule| rule.origin().to_string())
            .collect();
        assert_eq!(origins, vec!["body", "whitespace", "body"]);
    }

    #[test]
    fn test_initial_stack_includes_seed() {
        let def = nested();
        let names: Vec<_> = def
            .initial_stack()
            .into_iter()
            .map(|id| def.state_at(id).name())
            .collect();
        assert_eq!(names, vec!["root", "body"]);
    }

    #[test]
    fn test_runtime_resolution_reports_unknown_state() {
        let def = nested();
        assert_eq!(
            def.resolve(&StackOp::push("nowhere"), 7),
            Err(RunError::UnknownState {
                state: "nowhere".to_string(),
                offset: 7
            })
        );
        assert!(matches!(
            def.resolve(&StackOp::goto("body"), 0),
            Ok(Transition::Goto(_))
        ));
    }

    #[test]
    fn test_definition_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LexerDefinition>();
    }
}
