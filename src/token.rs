//! Tokens
//!
//!     A token is a classified, positioned span of the input text. Tokens borrow their text
//!     from the input, carry byte offsets into it, and record the depth of the state stack
//!     they were matched at. They are plain values: once the engine hands one out it never
//!     changes.
//!
//!     Concatenating the text of every token of a run, in order, gives back the input.

pub mod kind;

pub use kind::{TokenKind, UnknownKind};

use serde::Serialize;
use std::ops::Range;

/// A classified span of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token<'t> {
    kind: TokenKind,
    text: &'t str,
    start: usize,
    end: usize,
    depth: usize,
}

impl<'t> Token<'t> {
    /// Builds a token for `source[span]`.
    pub(crate) fn new(kind: TokenKind, source: &'t str, span: Range<usize>, depth: usize) -> Self {
        Token {
            kind,
            text: &source[span.clone()],
            start: span.start,
            end: span.end,
            depth,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    /// Byte offset of the first byte of the token.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last byte of the token.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Depth of the state stack (entries above the bottom one) when the token was matched.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Same span with a different classification.
    pub fn with_kind(self, kind: TokenKind) -> Self {
        Token { kind, ..self }
    }

    /// Joins `next`, which must start where `self` ends, into one token.
    pub(crate) fn extend(self, next: &Token<'t>, source: &'t str) -> Self {
        debug_assert_eq!(self.end, next.start);
        Token {
            text: &source[self.start..next.end],
            end: next.end,
            ..self
        }
    }
}
