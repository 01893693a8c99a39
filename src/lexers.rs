//! Bundled lexers
//!
//!     Rule tables shipped with the crate, written against the builder API. Each one is
//!     built on first use and shared for the rest of the process.

pub mod cobol;
pub mod xcconfig;

use crate::definition::LexerDefinition;

/// Registry entry of a bundled lexer.
#[derive(Debug, Clone, Copy)]
pub struct LexerInfo {
    pub tag: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
    pub filenames: &'static [&'static str],
    pub mimetypes: &'static [&'static str],
    definition: fn() -> &'static LexerDefinition,
}

impl LexerInfo {
    pub fn definition(&self) -> &'static LexerDefinition {
        (self.definition)()
    }

    fn answers_to(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(tag))
    }
}

static LEXERS: &[LexerInfo] = &[
    LexerInfo {
        tag: "cobol",
        title: "COBOL",
        description: "Common Business-Oriented Language",
        aliases: &[],
        filenames: &["*.cbl"],
        mimetypes: &["text/x-cobol"],
        definition: cobol::definition,
    },
    LexerInfo {
        tag: "xcconfig",
        title: "xcconfig",
        description: "Xcode Build Settings File",
        aliases: &[],
        filenames: &["*.xcconfig"],
        mimetypes: &[],
        definition: xcconfig::definition,
    },
];

/// Every bundled lexer, sorted by tag.
pub fn all() -> &'static [LexerInfo] {
    LEXERS
}

/// Looks a lexer up by tag or alias, ignoring ASCII case.
pub fn find(tag: &str) -> Option<&'static LexerInfo> {
    LEXERS.iter().find(|info| info.answers_to(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_tag() {
        assert_eq!(find("cobol").unwrap().definition().name(), "cobol");
        assert_eq!(find("XCCONFIG").unwrap().tag, "xcconfig");
        assert!(find("ntriples").is_none());
    }

    #[test]
    fn test_registry_is_sorted_and_builds() {
        let tags: Vec<_> = all().iter().map(|info| info.tag).collect();
        let mut sorted = tags.clone();
        sorted.sort_unstable();
        assert_eq!(tags, sorted);
        for info in all() {
            assert_eq!(info.definition().name(), info.tag);
        }
    }
}
