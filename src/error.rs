//! Error types
//!
//!     Two failure domains. [ConfigError] is raised while freezing a lexer definition and
//!     always points at a defect in the rule table. [RunError] is raised by a tokenizer run
//!     when the table's stack accounting is unbalanced; it ends that run.
//!
//!     Unmatched input and unterminated regions are not errors: the engine recovers from
//!     them locally by emitting `Error` tokens.

use thiserror::Error;

/// A rule table that cannot be frozen into a lexer definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lexer `{lexer}` declares state `{state}` more than once")]
    DuplicateState { lexer: String, state: String },

    #[error("lexer `{lexer}` registers lookup table `{table}` more than once")]
    DuplicateLookup { lexer: String, table: String },

    #[error("state `{state}` referenced from {referenced_from} is not defined")]
    UnknownState {
        state: String,
        referenced_from: String,
    },

    #[error("state `{state}` mixes in undefined state `{mixin}`")]
    UnknownMixin { state: String, mixin: String },

    #[error("mixin cycle: {}", cycle.join(" -> "))]
    MixinCycle { cycle: Vec<String> },

    #[error("invalid pattern {pattern:?} in state `{state}`")]
    InvalidPattern {
        state: String,
        pattern: String,
        #[source]
        source: Box<regex_automata::meta::BuildError>,
    },

    #[error(
        "pattern {pattern:?} in state `{state}` assigns {declared} group kinds but has {available} capture groups"
    )]
    GroupCount {
        state: String,
        pattern: String,
        declared: usize,
        available: usize,
    },

    #[error("state `{state}` uses undefined lookup table `{table}`")]
    UnknownLookup { state: String, table: String },

    #[error("state `{state}` pops zero entries")]
    InvalidPop { state: String },
}

/// A tokenizer run that cannot continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error(
        "stack underflow at offset {offset}: state `{state}` pops {count} of {depth} remaining entries"
    )]
    StackUnderflow {
        state: String,
        offset: usize,
        count: usize,
        depth: usize,
    },

    #[error("state `{state}` requested at offset {offset} is not defined")]
    UnknownState { state: String, offset: usize },
}
