//! Token stream adapters
//!
//!     The raw stream of a run is as fine-grained as the rule table: one token per match,
//!     one `Error` token per unmatched character. Consumers that render text usually want
//!     runs of equal kinds joined, which [Coalesce] does lazily, one output token at a time.

use crate::error::RunError;
use crate::token::Token;

/// Joins adjacent non-empty tokens of the same kind.
///
/// The joined token keeps the depth of its first piece. Empty tokens are passed through on
/// their own, and an error is delivered after every token that precedes it.
#[derive(Debug)]
pub struct Coalesce<'t, I> {
    inner: I,
    source: &'t str,
    held: Option<Token<'t>>,
    stash: Option<Result<Token<'t>, RunError>>,
}

impl<'t, I> Coalesce<'t, I>
where
    I: Iterator<Item = Result<Token<'t>, RunError>>,
{
    pub fn new(inner: I, source: &'t str) -> Self {
        Coalesce {
            inner,
            source,
            held: None,
            stash: None,
        }
    }
}

impl<'t, I> Iterator for Coalesce<'t, I>
where
    I: Iterator<Item = Result<Token<'t>, RunError>>,
{
    type Item = Result<Token<'t>, RunError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = match self.stash.take() {
                Some(item) => Some(item),
                None => self.inner.next(),
            };
            match item {
                None => return self.held.take().map(Ok),
                Some(Err(err)) => match self.held.take() {
                    Some(held) => {
                        self.stash = Some(Err(err));
                        return Some(Ok(held));
                    }
                    None => return Some(Err(err)),
                },
                Some(Ok(token)) => match self.held.take() {
                    None if token.is_empty() => return Some(Ok(token)),
                    None => self.held = Some(token),
                    Some(held)
                        if !token.is_empty()
                            && held.kind() == token.kind()
                            && held.end() == token.start() =>
                    {
                        self.held = Some(held.extend(&token, self.source));
                    }
                    Some(held) => {
                        self.stash = Some(Ok(token));
                        return Some(Ok(held));
                    }
                },
            }
        }
    }
}

/// Coalesces any stream of tokens cut from `source`.
pub fn coalesce<'t, I>(tokens: I, source: &'t str) -> Coalesce<'t, I::IntoIter>
where
    I: IntoIterator<Item = Result<Token<'t>, RunError>>,
{
    Coalesce::new(tokens.into_iter(), source)
}

/// Concatenated text of `tokens`. For a complete run this is the input itself.
pub fn concat(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(Token::text).collect()
}
