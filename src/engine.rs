//! Tokenizer runs
//!
//!     A [Tokenizer] is one run of a [LexerDefinition] over one input text. It is a lazy
//!     iterator: every call to `next` performs at most one scanning step, and the run holds
//!     nothing beyond its own stack, cursor and per-rule regex scratch space, so abandoning
//!     it early is free.
//!
//! Scanning step
//!
//!     With the cursor at offset `i` and state `s` on top of the stack, the effective rules
//!     of `s` are tried in order, each anchored exactly at `i`. The first rule that matches
//!     wins, whatever the length of its match. Its tokens are queued, its declared stack
//!     operation is applied, then any stack operation its action computed (classifiers,
//!     lookups), and the cursor moves to the end of the match.
//!
//!     When no rule matches, one `Error` token covering a single character is emitted and the
//!     stack is left alone. Input that a rule table does not understand degrades into error
//!     tokens, it never stops the run.
//!
//!     Patterns see the whole input, not just the remainder, so `\b` and `^` honour the text
//!     before the cursor.
//!
//! Zero-length matches
//!
//!     A rule matching the empty string still fires: it emits nothing (tokens are never empty)
//!     but its stack operation runs. Only [RunOptions::max_null_steps] such steps are allowed
//!     in a row; once the budget is spent, empty matches are skipped and the first non-empty
//!     match wins. When none is left the step falls back to the single-character `Error`
//!     token. Every run therefore terminates.
//!
//! End of input
//!
//!     When the cursor reaches the end, every region state (see [StateBuilder::region]) left on
//!     top of the stack above the seeded entries is closed: an empty `Error` token marks the boundary and the state is
//!     popped. Non-region states left on the stack are reported by
//!     [Tokenizer::unclosed_states] and are not an error.
//!
//! Failures
//!
//!     A pop that would empty the stack, or a classifier naming an unknown state, ends the
//!     run: the iterator yields the [RunError] once and is fused afterwards. Tokens produced
//!     by the failing step are dropped.
//!
//! [StateBuilder::region]: crate::definition::StateBuilder::region

pub(crate) mod emit;
pub(crate) mod stack;

use crate::definition::rule::{RuleId, Transition};
use crate::definition::LexerDefinition;
use crate::error::RunError;
use crate::stream::Coalesce;
use crate::token::{Token, TokenKind};
use emit::Emitter;
use regex_automata::meta::{Cache, Regex};
use regex_automata::util::captures::Captures;
use regex_automata::{Anchored, Input};
use stack::StateStack;
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace};

/// Per-run knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Consecutive zero-length matches honoured before empty matches are skipped.
    pub max_null_steps: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions { max_null_steps: 5 }
    }
}

struct Scratch {
    cache: Cache,
    caps: Captures,
}

impl Scratch {
    fn new(regex: &Regex) -> Self {
        Scratch {
            cache: regex.create_cache(),
            caps: regex.create_captures(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scanning,
    Done,
}

/// One run of a definition over one text. Yields tokens in input order.
pub struct Tokenizer<'d, 't> {
    definition: &'d LexerDefinition,
    source: &'t str,
    options: RunOptions,
    offset: usize,
    stack: StateStack,
    pending: VecDeque<Token<'t>>,
    scratch: Vec<Option<Scratch>>,
    null_steps: usize,
    phase: Phase,
}

impl<'d, 't> Tokenizer<'d, 't> {
    pub fn new(definition: &'d LexerDefinition, source: &'t str, options: RunOptions) -> Self {
        let mut scratch = Vec::new();
        scratch.resize_with(definition.rules.len(), || None);
        Tokenizer {
            definition,
            source,
            options,
            offset: 0,
            stack: StateStack::new(definition.initial_stack()),
            pending: VecDeque::new(),
            scratch,
            null_steps: 0,
            phase: Phase::Scanning,
        }
    }

    pub fn definition(&self) -> &'d LexerDefinition {
        self.definition
    }

    pub fn source(&self) -> &'t str {
        self.source
    }

    /// Byte offset of the scanning cursor.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Stack entries above the bottom one.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn current_state(&self) -> &'d str {
        self.definition.state_at(self.stack.top()).name()
    }

    /// State names, bottom of the stack first.
    pub fn stack(&self) -> Vec<&'d str> {
        let definition = self.definition;
        self.stack
            .entries()
            .iter()
            .map(|id| definition.state_at(*id).name())
            .collect()
    }

    /// Whether `name` is anywhere on the stack.
    pub fn in_state(&self, name: &str) -> bool {
        match self.definition.state_id(name) {
            Some(id) => self.stack.entries().contains(&id),
            None => false,
        }
    }

    /// States pushed during the run that are still open, innermost last.
    pub fn unclosed_states(&self) -> Vec<&'d str> {
        let definition = self.definition;
        self.stack.entries()[self.stack.initial_len().min(self.stack.len())..]
            .iter()
            .map(|id| definition.state_at(*id).name())
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done && self.pending.is_empty()
    }

    /// Merges adjacent tokens of the same kind.
    pub fn coalesced(self) -> Coalesce<'t, Self> {
        let source = self.source;
        Coalesce::new(self, source)
    }

    fn step(&mut self) -> Result<(), RunError> {
        let definition = self.definition;
        let source = self.source;
        let offset = self.offset;
        let depth = self.stack.len() - 1;
        let state = definition.state_at(self.stack.top());
        let input = Input::new(source)
            .span(offset..source.len())
            .anchored(Anchored::Yes);

        for &rule_id in state.effective() {
            let rule = definition.rule(rule_id);
            let regex = rule.pattern.regex();
            let scratch = self.scratch[rule_id].get_or_insert_with(|| Scratch::new(regex));
            regex.search_captures_with(&mut scratch.cache, &input, &mut scratch.caps);
            let Some(found) = scratch.caps.get_match() else {
                continue;
            };

            if found.is_empty() && self.null_steps >= self.options.max_null_steps {
                debug!(
                    offset,
                    state = state.name(),
                    rule = rule.pattern.as_str(),
                    "zero-length match budget spent"
                );
                continue;
            }

            let action_transition = Emitter {
                source,
                depth,
                out: &mut self.pending,
            }
            .emit(definition, rule, &scratch.caps)?;
            Self::transition(&mut self.stack, definition, rule_id, rule.transition, offset)?;
            Self::transition(&mut self.stack, definition, rule_id, action_transition, offset)?;

            self.null_steps = if found.is_empty() { self.null_steps + 1 } else { 0 };
            self.offset = found.end();
            return Ok(());
        }

        let width = source[offset..].chars().next().map_or(1, char::len_utf8);
        trace!(offset, state = state.name(), "no rule matched");
        self.pending.push_back(Token::new(
            TokenKind::Error,
            source,
            offset..offset + width,
            depth,
        ));
        self.null_steps = 0;
        self.offset += width;
        Ok(())
    }

    fn transition(
        stack: &mut StateStack,
        definition: &LexerDefinition,
        rule_id: RuleId,
        transition: Transition,
        offset: usize,
    ) -> Result<(), RunError> {
        if transition == Transition::None {
            return Ok(());
        }
        let from = stack.top();
        stack.apply(transition).map_err(|underflow| RunError::StackUnderflow {
            state: definition.state_at(from).name().to_string(),
            offset,
            count: underflow.count,
            depth: underflow.depth,
        })?;
        trace!(
            offset,
            rule = rule_id,
            ?transition,
            from = definition.state_at(from).name(),
            to = definition.state_at(stack.top()).name(),
            "stack transition"
        );
        Ok(())
    }

    fn finish(&mut self) {
        let end = self.source.len();
        let mut closed = 0;
        while self.stack.len() > self.stack.initial_len()
            && self.definition.state_at(self.stack.top()).is_region()
        {
            let depth = self.stack.len() - 1;
            self.pending
                .push_back(Token::new(TokenKind::Error, self.source, end..end, depth));
            if self.stack.pop(1).is_err() {
                break;
            }
            closed += 1;
        }
        if closed > 0 {
            debug!(closed, offset = end, "closed regions at end of input");
        }
        self.phase = Phase::Done;
    }
}

impl<'d, 't> Iterator for Tokenizer<'d, 't> {
    type Item = Result<Token<'t>, RunError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.phase == Phase::Done {
                return None;
            }
            if self.offset >= self.source.len() {
                self.finish();
                continue;
            }
            if let Err(err) = self.step() {
                self.pending.clear();
                self.phase = Phase::Done;
                return Some(Err(err));
            }
        }
    }
}

impl std::iter::FusedIterator for Tokenizer<'_, '_> {}

impl fmt::Debug for Tokenizer<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("lexer", &self.definition.name())
            .field("offset", &self.offset)
            .field("stack", &self.stack())
            .field("pending", &self.pending.len())
            .finish()
    }
}
