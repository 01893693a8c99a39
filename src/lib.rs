//! # rulelex
//!
//! A state-stack regex tokenizer driven by declarative rule tables.
//!
//! A rule table names scanning states; each state is an ordered list of rules (pattern,
//! action, stack operation) and mixins (the rules of another state, inlined). The table
//! is frozen into a [LexerDefinition], which then tokenizes any number of inputs, lazily,
//! one [Token] at a time.
//!
//!     use rulelex::{LexerDefinition, StackOp, TokenKind};
//!
//!     let def = LexerDefinition::builder("demo")
//!         .state("root", |s| {
//!             s.rule(r"\s+", TokenKind::Text)
//!                 .rule(r"\w+", TokenKind::Name)
//!                 .rule_then("\"", TokenKind::LiteralString, StackOp::push("string"))
//!         })
//!         .state("string", |s| {
//!             s.region()
//!                 .rule(r#"[^"]+"#, TokenKind::LiteralString)
//!                 .rule_then("\"", TokenKind::LiteralString, StackOp::pop())
//!         })
//!         .build()?;
//!
//!     for token in def.tokenize("say \"hi\"") {
//!         let token = token?;
//!         println!("{} {:?}", token.kind(), token.text());
//!     }
//!
//! Modules:
//!
//! - [token]: the token value and the kind hierarchy.
//! - [definition]: rules, states, the builder and the frozen definition.
//! - [engine]: tokenizer runs.
//! - [stream]: adapters over token streams.
//! - [lookup]: keyword tables for contextual rules.
//! - [lexers]: the bundled rule tables.
//! - [settings]: layered settings for runs and the command-line tool.

pub mod definition;
pub mod engine;
pub mod error;
pub mod lexers;
pub mod lookup;
pub mod settings;
pub mod stream;
pub mod token;

pub use definition::{
    Action, Classification, Classifier, LexerBuilder, LexerDefinition, LookupAction,
    PatternFlags, RuleSpec, StackOp, StateBuilder,
};
pub use engine::{RunOptions, Tokenizer};
pub use error::{ConfigError, RunError};
pub use lookup::{CaseFold, KeywordTable, Lookups};
pub use stream::Coalesce;
pub use token::{Token, TokenKind};
