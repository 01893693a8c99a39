//! Rules
//!
//!     A rule is one pattern, one action and one stack operation. Rules are declared as
//!     [RuleSpec] values (through the state builder) and compiled into [Rule]s when the
//!     lexer definition is frozen: patterns are compiled once, state names in stack
//!     operations are resolved to state ids, lookup tables are bound.

use crate::lookup::{KeywordTable, Lookups};
use crate::token::TokenKind;
use regex_automata::meta::{BuildError, Regex};
use regex_automata::util::syntax;
use std::fmt;
use std::sync::Arc;

pub(crate) type StateId = usize;
pub(crate) type RuleId = usize;

/// State stack effect of a matched rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StackOp {
    #[default]
    None,
    /// Push the named state.
    Push(String),
    /// Remove this many entries; the bottom entry can never be removed.
    Pop(usize),
    /// Replace the top entry with the named state.
    Goto(String),
    /// Push another copy of the active state.
    PushSelf,
    /// Return to the initial stack, seed included.
    Reset,
}

impl StackOp {
    pub fn push(state: impl Into<String>) -> Self {
        StackOp::Push(state.into())
    }

    pub fn goto(state: impl Into<String>) -> Self {
        StackOp::Goto(state.into())
    }

    pub fn pop() -> Self {
        StackOp::Pop(1)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, StackOp::None)
    }
}

/// Result of a classifier: the kind to emit and an optional stack effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: TokenKind,
    pub stack_op: StackOp,
}

impl Classification {
    pub fn new(kind: TokenKind) -> Self {
        Classification {
            kind,
            stack_op: StackOp::None,
        }
    }

    pub fn then(mut self, stack_op: StackOp) -> Self {
        self.stack_op = stack_op;
        self
    }
}

impl From<TokenKind> for Classification {
    fn from(kind: TokenKind) -> Self {
        Classification::new(kind)
    }
}

/// Pure classification of the matched text, with read-only access to the lookup tables.
pub type Classifier = fn(&str, &Lookups) -> Classification;

/// Classify through a named keyword table, then push/pop depending on the result.
///
/// Branches are checked in order; the first whose family contains the looked-up kind
/// supplies the stack operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupAction {
    pub(crate) table: String,
    pub(crate) branches: Vec<(TokenKind, StackOp)>,
}

impl LookupAction {
    pub fn new(table: impl Into<String>) -> Self {
        LookupAction {
            table: table.into(),
            branches: Vec::new(),
        }
    }

    pub fn when(mut self, family: TokenKind, stack_op: StackOp) -> Self {
        self.branches.push((family, stack_op));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

/// What a matched rule emits.
#[derive(Clone)]
pub enum Action {
    /// One token covering the whole match.
    Emit(TokenKind),
    /// One token per capture group, in group order; uncovered gaps become `Text`.
    EmitGroups(Vec<TokenKind>),
    /// Kind (and optional stack effect) computed from the matched text.
    Classify(Classifier),
    /// Kind looked up in a keyword table, with conditional stack effects.
    Lookup(LookupAction),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Emit(kind) => f.debug_tuple("Emit").field(kind).finish(),
            Action::EmitGroups(kinds) => f.debug_tuple("EmitGroups").field(kinds).finish(),
            Action::Classify(_) => f.write_str("Classify(..)"),
            Action::Lookup(lookup) => f.debug_tuple("Lookup").field(lookup).finish(),
        }
    }
}

/// Regex flags for one rule.
///
/// `multi_line` is on by default: `^` and `$` match at line boundaries, `\A` and `\z`
/// at the ends of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
}

impl Default for PatternFlags {
    fn default() -> Self {
        PatternFlags {
            case_insensitive: false,
            multi_line: true,
            dot_matches_new_line: false,
        }
    }
}

/// A rule as declared in a rule table.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub(crate) pattern: String,
    pub(crate) flags: PatternFlags,
    pub(crate) action: Action,
    pub(crate) stack_op: StackOp,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>, action: Action) -> Self {
        RuleSpec {
            pattern: pattern.into(),
            flags: PatternFlags::default(),
            action,
            stack_op: StackOp::None,
        }
    }

    pub fn emit(pattern: impl Into<String>, kind: TokenKind) -> Self {
        RuleSpec::new(pattern, Action::Emit(kind))
    }

    /// A rule matching `text` literally.
    pub fn literal(text: &str, kind: TokenKind) -> Self {
        RuleSpec::emit(regex::escape(text), kind)
    }

    pub fn then(mut self, stack_op: StackOp) -> Self {
        self.stack_op = stack_op;
        self
    }

    pub fn flags(mut self, flags: PatternFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.flags.case_insensitive = true;
        self
    }

    pub fn single_line(mut self) -> Self {
        self.flags.multi_line = false;
        self
    }

    pub fn dot_all(mut self) -> Self {
        self.flags.dot_matches_new_line = true;
        self
    }
}

/// A compiled pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: PatternFlags,
    regex: Regex,
}

impl Pattern {
    pub(crate) fn compile(source: &str, flags: PatternFlags) -> Result<Self, BuildError> {
        let syntax_config = syntax::Config::new()
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_matches_new_line);
        let regex = Regex::builder().syntax(syntax_config).build(source)?;
        Ok(Pattern {
            source: source.to_string(),
            flags,
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// Number of explicit capture groups (the whole match is not counted).
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Stack operation with state names resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    None,
    Push(StateId),
    Pop(usize),
    Goto(StateId),
    PushSelf,
    Reset,
}

#[derive(Clone)]
pub(crate) enum CompiledAction {
    Emit(TokenKind),
    EmitGroups(Vec<TokenKind>),
    Classify(Classifier),
    Lookup {
        table: Arc<KeywordTable>,
        branches: Vec<(TokenKind, Transition)>,
    },
}

/// A compiled rule, shared by every state that mixes in its declaring state.
#[derive(Clone)]
pub struct Rule {
    pub(crate) pattern: Pattern,
    pub(crate) action: CompiledAction,
    pub(crate) transition: Transition,
    pub(crate) stack_op: StackOp,
    pub(crate) origin: String,
}

impl Rule {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The declared stack operation (classifier effects not included).
    pub fn stack_op(&self) -> &StackOp {
        &self.stack_op
    }

    /// Name of the state that declares this rule.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fixed kind for `Emit` rules.
    pub fn fixed_kind(&self) -> Option<TokenKind> {
        match self.action {
            CompiledAction::Emit(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            CompiledAction::Emit(kind) => kind.to_string(),
            CompiledAction::EmitGroups(kinds) => format!(
                "groups({})",
                kinds.iter().map(|k| k.qualname()).collect::<Vec<_>>().join(", ")
            ),
            CompiledAction::Classify(_) => "classify".to_string(),
            CompiledAction::Lookup { .. } => "lookup".to_string(),
        };
        f.debug_struct("Rule")
            .field("pattern", &self.pattern.as_str())
            .field("action", &action)
            .field("stack_op", &self.stack_op)
            .field("origin", &self.origin)
            .finish()
    }
}
