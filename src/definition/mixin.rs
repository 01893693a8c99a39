//! Mixin resolution
//!
//!     Expands every state's entries into its effective rule list. A mixin reference is
//!     replaced, in place, by the effective rules of the referenced state, recursively, so
//!     a state that mixes in `whitespace` behaves exactly as if those rules had been typed
//!     at that point.
//!
//!     Expansion is a depth-first walk with a three-colour mark per state. Meeting a state
//!     that is still in progress means the mixin graph has a cycle; the walk stops and
//!     reports the path that closes it. Each state is expanded once and its result reused
//!     by every state that mixes it in.

use super::rule::{RuleId, StateId};
use super::state::{Entry, State};
use crate::error::ConfigError;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Effective rule lists for `states`, indexed like `states`.
pub(crate) fn resolve(
    states: &[State],
    index: &FxHashMap<String, StateId>,
) -> Result<Vec<Vec<RuleId>>, ConfigError> {
    let mut resolver = MixinResolver {
        states,
        index,
        marks: vec![Mark::Unvisited; states.len()],
        resolved: vec![Vec::new(); states.len()],
        path: Vec::new(),
    };
    for id in 0..states.len() {
        resolver.expand(id)?;
    }
    Ok(resolver.resolved)
}

struct MixinResolver<'a> {
    states: &'a [State],
    index: &'a FxHashMap<String, StateId>,
    marks: Vec<Mark>,
    resolved: Vec<Vec<RuleId>>,
    path: Vec<StateId>,
}

impl<'a> MixinResolver<'a> {
    fn expand(&mut self, id: StateId) -> Result<(), ConfigError> {
        match self.marks[id] {
            Mark::Done => return Ok(()),
            Mark::InProgress => return Err(self.cycle_error(id)),
            Mark::Unvisited => {}
        }

        self.marks[id] = Mark::InProgress;
        self.path.push(id);

        let states = self.states;
        let mut rules = Vec::new();
        for entry in &states[id].entries {
            match entry {
                Entry::Rule(rule) => rules.push(*rule),
                Entry::Mixin(name) => {
                    let target =
                        *self
                            .index
                            .get(name)
                            .ok_or_else(|| ConfigError::UnknownMixin {
                                state: states[id].name.clone(),
                                mixin: name.clone(),
                            })?;
                    self.expand(target)?;
                    rules.extend_from_slice(&self.resolved[target]);
                }
            }
        }

        self.path.pop();
        self.marks[id] = Mark::Done;
        self.resolved[id] = rules;
        Ok(())
    }

    fn cycle_error(&self, id: StateId) -> ConfigError {
        let start = self
            .path
            .iter()
            .position(|state| *state == id)
            .unwrap_or(0);
        let cycle = self.path[start..]
            .iter()
            .chain(std::iter::once(&id))
            .map(|state| self.states[*state].name.clone())
            .collect();
        ConfigError::MixinCycle { cycle }
    }
}
