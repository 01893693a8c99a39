//! Keyword lookup tables
//!
//!     Contextual rules classify a matched word by looking it up in a table built once,
//!     together with the lexer definition. Keys are stored case-folded and queries are
//!     folded the same way, so a table declared with upper-case vocabulary still answers
//!     lower-case or mixed-case input. Words missing from the table get the table's
//!     default kind (usually plain `Name`).

use crate::token::TokenKind;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// Case normalization applied to keys and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseFold {
    #[default]
    Lower,
    Upper,
    Exact,
}

impl CaseFold {
    pub fn apply<'a>(self, word: &'a str) -> Cow<'a, str> {
        match self {
            CaseFold::Lower if word.chars().any(char::is_uppercase) => {
                Cow::Owned(word.to_lowercase())
            }
            CaseFold::Upper if word.chars().any(char::is_lowercase) => {
                Cow::Owned(word.to_uppercase())
            }
            _ => Cow::Borrowed(word),
        }
    }
}

/// Immutable word -> kind table with an explicit default.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    entries: FxHashMap<String, TokenKind>,
    default: TokenKind,
    fold: CaseFold,
}

impl KeywordTable {
    pub fn builder(default: TokenKind) -> KeywordTableBuilder {
        KeywordTableBuilder {
            words: Vec::new(),
            default,
            fold: CaseFold::default(),
        }
    }

    /// Kind for `word`, or the default kind when the word is not in the table.
    pub fn classify(&self, word: &str) -> TokenKind {
        self.get(word).unwrap_or(self.default)
    }

    pub fn get(&self, word: &str) -> Option<TokenKind> {
        let key = self.fold.apply(word);
        self.entries.get(&*key).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn default_kind(&self) -> TokenKind {
        self.default
    }

    pub fn fold(&self) -> CaseFold {
        self.fold
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects vocabulary for a [KeywordTable].
#[derive(Debug, Clone)]
pub struct KeywordTableBuilder {
    words: Vec<(String, TokenKind)>,
    default: TokenKind,
    fold: CaseFold,
}

impl KeywordTableBuilder {
    pub fn fold(mut self, fold: CaseFold) -> Self {
        self.fold = fold;
        self
    }

    pub fn word(mut self, word: impl Into<String>, kind: TokenKind) -> Self {
        self.words.push((word.into(), kind));
        self
    }

    pub fn words<I, S>(mut self, words: I, kind: TokenKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words
            .extend(words.into_iter().map(|word| (word.into(), kind)));
        self
    }

    /// Later entries win when two words fold to the same key.
    pub fn build(self) -> KeywordTable {
        let fold = self.fold;
        let entries = self
            .words
            .into_iter()
            .map(|(word, kind)| (fold.apply(&word).into_owned(), kind))
            .collect();
        KeywordTable {
            entries,
            default: self.default,
            fold,
        }
    }
}

/// Named keyword tables owned by a lexer definition.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    tables: FxHashMap<String, Arc<KeywordTable>>,
}

impl Lookups {
    pub fn get(&self, name: &str) -> Option<&KeywordTable> {
        self.tables.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Classifies `word` through table `name`; `None` when the table does not exist.
    pub fn classify(&self, name: &str, word: &str) -> Option<TokenKind> {
        self.get(name).map(|table| table.classify(word))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: String, table: KeywordTable) {
        self.tables.insert(name, Arc::new(table));
    }

    pub(crate) fn shared(&self, name: &str) -> Option<Arc<KeywordTable>> {
        self.tables.get(name).cloned()
    }
}
