//! Definition builder
//!
//!     Rule tables are written against [LexerBuilder] and [StateBuilder]. Building is the
//!     only point where a table can be rejected: every pattern is compiled, every state name
//!     used by a stack operation, the start state or the seed list is checked, lookup tables
//!     are bound and the mixin graph is expanded. A definition that builds can only fail at
//!     run time through unbalanced pops.

use super::mixin;
use super::rule::{
    Action, Classifier, CompiledAction, LookupAction, Pattern, Rule, RuleSpec, StackOp, StateId,
    Transition,
};
use super::state::{Entry, EntrySpec, State};
use super::LexerDefinition;
use crate::error::ConfigError;
use crate::lookup::{KeywordTable, Lookups};
use crate::token::TokenKind;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Collects states, lookup tables and start-up directives for one language.
#[derive(Debug, Clone)]
pub struct LexerBuilder {
    name: String,
    start: String,
    seed: Vec<String>,
    states: Vec<StateBuilder>,
    lookups: Vec<(String, KeywordTable)>,
}

impl LexerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        LexerBuilder {
            name: name.into(),
            start: "root".to_string(),
            seed: Vec::new(),
            states: Vec::new(),
            lookups: Vec::new(),
        }
    }

    /// The bottom-of-stack state. Defaults to `root`.
    pub fn start_state(mut self, name: impl Into<String>) -> Self {
        self.start = name.into();
        self
    }

    /// States pushed, in order, on top of the start state before the first step.
    pub fn seed<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed.extend(states.into_iter().map(Into::into));
        self
    }

    /// Registers a keyword table that lookup rules can refer to by `name`.
    pub fn lookup_table(mut self, name: impl Into<String>, table: KeywordTable) -> Self {
        self.lookups.push((name.into(), table));
        self
    }

    /// Declares a state; `declare` adds its entries in order.
    pub fn state(
        mut self,
        name: impl Into<String>,
        declare: impl FnOnce(StateBuilder) -> StateBuilder,
    ) -> Self {
        self.states.push(declare(StateBuilder::new(name)));
        self
    }

    /// Freezes the table into a [LexerDefinition].
    pub fn build(self) -> Result<LexerDefinition, ConfigError> {
        let mut index: FxHashMap<String, StateId> = FxHashMap::default();
        for (id, state) in self.states.iter().enumerate() {
            if index.insert(state.name.clone(), id).is_some() {
                return Err(ConfigError::DuplicateState {
                    lexer: self.name,
                    state: state.name.clone(),
                });
            }
        }

        let mut lookups = Lookups::default();
        for (name, table) in self.lookups {
            if lookups.contains(&name) {
                return Err(ConfigError::DuplicateLookup {
                    lexer: self.name,
                    table: name,
                });
            }
            lookups.insert(name, table);
        }

        let start = resolve_state(&index, &self.start, "the start state")?;
        let seed = self
            .seed
            .iter()
            .map(|name| resolve_state(&index, name, "the start-up seed"))
            .collect::<Result<Vec<_>, _>>()?;

        let mut rules = Vec::new();
        let mut states = Vec::with_capacity(self.states.len());
        for declared in self.states {
            let mut entries = Vec::with_capacity(declared.entries.len());
            for entry in declared.entries {
                match entry {
                    EntrySpec::Mixin(name) => entries.push(Entry::Mixin(name)),
                    EntrySpec::Rule(spec) => {
                        entries.push(Entry::Rule(rules.len()));
                        rules.push(compile_rule(&declared.name, spec, &index, &lookups)?);
                    }
                }
            }
            states.push(State {
                name: declared.name,
                region: declared.region,
                entries,
                effective: Vec::new(),
            });
        }

        let effective = mixin::resolve(&states, &index)?;
        for (state, list) in states.iter_mut().zip(effective) {
            state.effective = list;
        }

        debug!(
            lexer = %self.name,
            states = states.len(),
            rules = rules.len(),
            "froze lexer definition"
        );

        Ok(LexerDefinition {
            name: self.name,
            states,
            rules,
            index,
            start,
            seed,
            lookups,
        })
    }
}

fn resolve_state(
    index: &FxHashMap<String, StateId>,
    name: &str,
    referenced_from: &str,
) -> Result<StateId, ConfigError> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| ConfigError::UnknownState {
            state: name.to_string(),
            referenced_from: referenced_from.to_string(),
        })
}

fn compile_transition(
    state: &str,
    op: &StackOp,
    index: &FxHashMap<String, StateId>,
) -> Result<Transition, ConfigError> {
    let referenced_from = || format!("state `{state}`");
    Ok(match op {
        StackOp::None => Transition::None,
        StackOp::Push(target) => Transition::Push(resolve_state(index, target, &referenced_from())?),
        StackOp::Goto(target) => Transition::Goto(resolve_state(index, target, &referenced_from())?),
        StackOp::Pop(0) => {
            return Err(ConfigError::InvalidPop {
                state: state.to_string(),
            })
        }
        StackOp::Pop(count) => Transition::Pop(*count),
        StackOp::PushSelf => Transition::PushSelf,
        StackOp::Reset => Transition::Reset,
    })
}

fn compile_rule(
    state: &str,
    spec: RuleSpec,
    index: &FxHashMap<String, StateId>,
    lookups: &Lookups,
) -> Result<Rule, ConfigError> {
    let pattern =
        Pattern::compile(&spec.pattern, spec.flags).map_err(|source| ConfigError::InvalidPattern {
            state: state.to_string(),
            pattern: spec.pattern.clone(),
            source: Box::new(source),
        })?;
    let transition = compile_transition(state, &spec.stack_op, index)?;

    let action = match spec.action {
        Action::Emit(kind) => CompiledAction::Emit(kind),
        Action::EmitGroups(kinds) => {
            if kinds.len() > pattern.group_count() {
                return Err(ConfigError::GroupCount {
                    state: state.to_string(),
                    pattern: spec.pattern,
                    declared: kinds.len(),
                    available: pattern.group_count(),
                });
            }
            CompiledAction::EmitGroups(kinds)
        }
        Action::Classify(classifier) => CompiledAction::Classify(classifier),
        Action::Lookup(lookup) => {
            let table = lookups
                .shared(&lookup.table)
                .ok_or_else(|| ConfigError::UnknownLookup {
                    state: state.to_string(),
                    table: lookup.table.clone(),
                })?;
            let branches = lookup
                .branches
                .iter()
                .map(|(family, op)| Ok((*family, compile_transition(state, op, index)?)))
                .collect::<Result<Vec<_>, ConfigError>>()?;
            CompiledAction::Lookup { table, branches }
        }
    };

    Ok(Rule {
        pattern,
        action,
        transition,
        stack_op: spec.stack_op,
        origin: state.to_string(),
    })
}

/// Collects the entries of one state, in the order they will be tried.
#[derive(Debug, Clone)]
pub struct StateBuilder {
    name: String,
    region: bool,
    entries: Vec<EntrySpec>,
}

impl StateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        StateBuilder {
            name: name.into(),
            region: false,
            entries: Vec::new(),
        }
    }

    /// Marks the state as a delimited region, closed with an `Error` token if the input
    /// ends inside it.
    pub fn region(mut self) -> Self {
        self.region = true;
        self
    }

    /// Adds a fully specified rule.
    pub fn entry(mut self, rule: RuleSpec) -> Self {
        self.entries.push(EntrySpec::Rule(rule));
        self
    }

    pub fn rule(self, pattern: impl Into<String>, kind: TokenKind) -> Self {
        self.entry(RuleSpec::emit(pattern, kind))
    }

    pub fn rule_then(self, pattern: impl Into<String>, kind: TokenKind, op: StackOp) -> Self {
        self.entry(RuleSpec::emit(pattern, kind).then(op))
    }

    pub fn literal(self, text: &str, kind: TokenKind) -> Self {
        self.entry(RuleSpec::literal(text, kind))
    }

    pub fn literal_then(self, text: &str, kind: TokenKind, op: StackOp) -> Self {
        self.entry(RuleSpec::literal(text, kind).then(op))
    }

    pub fn groups(
        self,
        pattern: impl Into<String>,
        kinds: impl IntoIterator<Item = TokenKind>,
    ) -> Self {
        self.entry(RuleSpec::new(
            pattern,
            Action::EmitGroups(kinds.into_iter().collect()),
        ))
    }

    pub fn groups_then(
        self,
        pattern: impl Into<String>,
        kinds: impl IntoIterator<Item = TokenKind>,
        op: StackOp,
    ) -> Self {
        self.entry(
            RuleSpec::new(pattern, Action::EmitGroups(kinds.into_iter().collect())).then(op),
        )
    }

    pub fn classify(self, pattern: impl Into<String>, classifier: Classifier) -> Self {
        self.entry(RuleSpec::new(pattern, Action::Classify(classifier)))
    }

    pub fn lookup(self, pattern: impl Into<String>, lookup: LookupAction) -> Self {
        self.entry(RuleSpec::new(pattern, Action::Lookup(lookup)))
    }

    /// Inlines the rules of state `name` at this point.
    pub fn mixin(mut self, name: impl Into<String>) -> Self {
        self.entries.push(EntrySpec::Mixin(name.into()));
        self
    }
}
