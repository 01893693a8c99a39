//! States
//!
//!     A state is an ordered list of entries, each either an inline rule or a reference to
//!     another state whose rules are mixed in at that point. Once the definition is frozen
//!     every state also carries its effective rule list: the mixin-expanded sequence the
//!     engine actually tries.

use super::rule::{RuleId, RuleSpec};

/// One declared entry of a state.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Rule(RuleId),
    Mixin(String),
}

/// Declared entry, before compilation.
#[derive(Debug, Clone)]
pub(crate) enum EntrySpec {
    Rule(RuleSpec),
    Mixin(String),
}

/// A frozen scanning state.
#[derive(Debug, Clone)]
pub struct State {
    pub(crate) name: String,
    pub(crate) region: bool,
    pub(crate) entries: Vec<Entry>,
    pub(crate) effective: Vec<RuleId>,
}

impl State {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Regions are closed with an `Error` token when the input ends inside them.
    pub fn is_region(&self) -> bool {
        self.region
    }

    /// States mixed in directly, in declaration order.
    pub fn mixins(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Mixin(name) => Some(name.as_str()),
            Entry::Rule(_) => None,
        })
    }

    /// Number of rules declared inline.
    pub fn declared_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Rule(_)))
            .count()
    }

    /// Number of rules after mixin expansion.
    pub fn effective_len(&self) -> usize {
        self.effective.len()
    }

    pub(crate) fn effective(&self) -> &[RuleId] {
        &self.effective
    }
}
