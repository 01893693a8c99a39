//! Token kind hierarchy
//!
//!     Token kinds form a tree: every specific kind names its parent, up to one of the
//!     top-level families (Text, Keyword, Name, Literal, ...). Rule tables classify as
//!     specifically as they like; downstream consumers that only understand a few
//!     families coarsen with [TokenKind::coarsen] instead of inspecting types.
//!
//!     The tree is closed. Its qualified names (`Literal.String.Double`) are the stable
//!     external representation, used by `Display`, `FromStr` and serde.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! token_kinds {
    (@parent) => {
        None
    };
    (@parent $parent:ident) => {
        Some(TokenKind::$parent)
    };
    ($($variant:ident => $qualname:literal $(: $parent:ident)?,)*) => {
        /// Classification of a token. See the module docs for the hierarchy.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TokenKind {
            $($variant,)*
        }

        impl TokenKind {
            /// Every kind, parents before their children.
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$variant,)*];

            /// The immediate parent kind, `None` for the top-level families.
            pub fn parent(self) -> Option<TokenKind> {
                match self {
                    $(TokenKind::$variant => token_kinds!(@parent $($parent)?),)*
                }
            }

            /// Dotted qualified name, e.g. `Literal.Number.Hex`.
            pub fn qualname(self) -> &'static str {
                match self {
                    $(TokenKind::$variant => $qualname,)*
                }
            }
        }
    };
}

token_kinds! {
    Text => "Text",
    TextWhitespace => "Text.Whitespace": Text,
    Error => "Error",
    Other => "Other",
    Escape => "Escape",

    Keyword => "Keyword",
    KeywordConstant => "Keyword.Constant": Keyword,
    KeywordDeclaration => "Keyword.Declaration": Keyword,
    KeywordNamespace => "Keyword.Namespace": Keyword,
    KeywordPseudo => "Keyword.Pseudo": Keyword,
    KeywordReserved => "Keyword.Reserved": Keyword,
    KeywordType => "Keyword.Type": Keyword,
    KeywordVariable => "Keyword.Variable": Keyword,

    Name => "Name",
    NameAttribute => "Name.Attribute": Name,
    NameBuiltin => "Name.Builtin": Name,
    NameBuiltinPseudo => "Name.Builtin.Pseudo": NameBuiltin,
    NameClass => "Name.Class": Name,
    NameConstant => "Name.Constant": Name,
    NameDecorator => "Name.Decorator": Name,
    NameEntity => "Name.Entity": Name,
    NameException => "Name.Exception": Name,
    NameFunction => "Name.Function": Name,
    NameFunctionMagic => "Name.Function.Magic": NameFunction,
    NameProperty => "Name.Property": Name,
    NameLabel => "Name.Label": Name,
    NameNamespace => "Name.Namespace": Name,
    NameOther => "Name.Other": Name,
    NameTag => "Name.Tag": Name,
    NameVariable => "Name.Variable": Name,
    NameVariableClass => "Name.Variable.Class": NameVariable,
    NameVariableGlobal => "Name.Variable.Global": NameVariable,
    NameVariableInstance => "Name.Variable.Instance": NameVariable,
    NameVariableMagic => "Name.Variable.Magic": NameVariable,

    Literal => "Literal",
    LiteralDate => "Literal.Date": Literal,
    LiteralString => "Literal.String": Literal,
    LiteralStringAffix => "Literal.String.Affix": LiteralString,
    LiteralStringBacktick => "Literal.String.Backtick": LiteralString,
    LiteralStringChar => "Literal.String.Char": LiteralString,
    LiteralStringDelimiter => "Literal.String.Delimiter": LiteralString,
    LiteralStringDoc => "Literal.String.Doc": LiteralString,
    LiteralStringDouble => "Literal.String.Double": LiteralString,
    LiteralStringEscape => "Literal.String.Escape": LiteralString,
    LiteralStringHeredoc => "Literal.String.Heredoc": LiteralString,
    LiteralStringInterpol => "Literal.String.Interpol": LiteralString,
    LiteralStringOther => "Literal.String.Other": LiteralString,
    LiteralStringRegex => "Literal.String.Regex": LiteralString,
    LiteralStringSingle => "Literal.String.Single": LiteralString,
    LiteralStringSymbol => "Literal.String.Symbol": LiteralString,
    LiteralNumber => "Literal.Number": Literal,
    LiteralNumberBin => "Literal.Number.Bin": LiteralNumber,
    LiteralNumberFloat => "Literal.Number.Float": LiteralNumber,
    LiteralNumberHex => "Literal.Number.Hex": LiteralNumber,
    LiteralNumberInteger => "Literal.Number.Integer": LiteralNumber,
    LiteralNumberIntegerLong => "Literal.Number.Integer.Long": LiteralNumberInteger,
    LiteralNumberOct => "Literal.Number.Oct": LiteralNumber,
    LiteralNumberOther => "Literal.Number.Other": LiteralNumber,

    Operator => "Operator",
    OperatorWord => "Operator.Word": Operator,

    Punctuation => "Punctuation",
    PunctuationIndicator => "Punctuation.Indicator": Punctuation,

    Comment => "Comment",
    CommentHashbang => "Comment.Hashbang": Comment,
    CommentDoc => "Comment.Doc": Comment,
    CommentMultiline => "Comment.Multiline": Comment,
    CommentPreproc => "Comment.Preproc": Comment,
    CommentPreprocFile => "Comment.Preproc.File": CommentPreproc,
    CommentSingle => "Comment.Single": Comment,
    CommentSpecial => "Comment.Special": Comment,

    Generic => "Generic",
    GenericDeleted => "Generic.Deleted": Generic,
    GenericEmph => "Generic.Emph": Generic,
    GenericError => "Generic.Error": Generic,
    GenericHeading => "Generic.Heading": Generic,
    GenericInserted => "Generic.Inserted": Generic,
    GenericLineno => "Generic.Lineno": Generic,
    GenericOutput => "Generic.Output": Generic,
    GenericPrompt => "Generic.Prompt": Generic,
    GenericStrong => "Generic.Strong": Generic,
    GenericSubheading => "Generic.Subheading": Generic,
    GenericTraceback => "Generic.Traceback": Generic,
}

impl TokenKind {
    /// True when `self` is `ancestor` or descends from it.
    pub fn is_a(self, ancestor: TokenKind) -> bool {
        self.ancestors().any(|kind| kind == ancestor)
    }

    /// `self` followed by each parent up to the top-level family.
    pub fn ancestors(self) -> impl Iterator<Item = TokenKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// The top-level family this kind belongs to.
    pub fn family(self) -> TokenKind {
        self.ancestors().last().unwrap_or(self)
    }

    /// Nearest kind in the ancestor chain (starting with `self`) accepted by `known`.
    pub fn coarsen(self, known: impl Fn(TokenKind) -> bool) -> Option<TokenKind> {
        self.ancestors().find(|kind| known(*kind))
    }

    /// Looks a kind up by its qualified name.
    pub fn from_qualname(name: &str) -> Option<TokenKind> {
        TokenKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.qualname() == name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualname())
    }
}

/// Returned when a qualified name does not denote a token kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for TokenKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenKind::from_qualname(s).ok_or_else(|| UnknownKind(s.to_string()))
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.qualname())
    }
}

impl<'de> Deserialize<'de> for TokenKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}
