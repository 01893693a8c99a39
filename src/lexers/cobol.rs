//! COBOL
//!
//!     Free-form COBOL with Ada-style numerals. Identifiers are classified through the
//!     `idents` keyword table (case-insensitive); an identifier classified as a declaration
//!     keyword switches to `decl_name` for the dotted name that follows.
//!
//!     Identifiers are Unicode letters and digits with single connector characters as
//!     separators, so `WS-NAME` scans as `WS`, `-`, `NAME`.

use crate::definition::{LexerDefinition, LookupAction, RuleSpec, StackOp};
use crate::error::ConfigError;
use crate::lookup::{CaseFold, KeywordTable};
use crate::token::TokenKind;
use once_cell::sync::Lazy;

const ID: &str = r"\b\p{Alphabetic}(?:\p{Pc}?[\p{Alphabetic}\p{Nd}])*\b";
const NUM: &str = r"\d(?:_?\d)*";
const XNUM: &str = r"[0-9a-fA-F](?:_?[0-9a-fA-F])*";

fn exp() -> String {
    format!(r"(?i:E[-+]?{NUM})?")
}

static DEFINITION: Lazy<LexerDefinition> =
    Lazy::new(|| build().expect("bundled COBOL rules are valid"));

/// The shared COBOL definition.
pub fn definition() -> &'static LexerDefinition {
    &DEFINITION
}

const KEYWORDS: &[&str] = &[
    "ACCEPT", "ACCESS", "ADD", "ADDRESS", "ADVANCING", "AFTER", "ALL", "ALPHABET", "ALPHABETIC",
    "ALPHABETIC-LOWER", "ALPHABETIC-UPPER", "ALPHANUMERIC", "ALPHANUMERIC-EDITED", "ALSO",
    "ALTER", "ALTERNATE", "AND", "ANY", "APPLY", "ARE", "AREA", "AREAS", "ASCENDING", "ASSIGN",
    "AT", "AUTHOR", "BASIS", "BEFORE", "BEGINNING", "BINARY", "BLANK", "BLOCK", "BOTTOM", "BY",
    "CALL", "CANCEL", "CBL", "CD", "CF", "CH", "CHARACTER", "CHARACTERS", "CLASS", "CLASS-ID",
    "CLOCK-UNITS", "CLOSE", "COBOL", "CODE", "CODE-SET", "COLLATING", "COLUMN", "COM-REG",
    "COMMA", "COMMON", "COMMUNICATION", "COMP", "COMP-1", "COMP-2", "COMP-3", "COMP-4", "COMP-5",
    "COMPUTATIONAL", "COMPUTATIONAL-1", "COMPUTATIONAL-2", "COMPUTATIONAL-3", "COMPUTATIONAL-4",
    "COMPUTATIONAL-5", "COMPUTE", "CONFIGURATION", "CONTAINS", "CONTENT", "CONTINUE", "CONTROL",
    "CONTROLS", "CONVERTING", "COPY", "CORR", "CORRESPONDING", "COUNT", "CURRENCY", "DATA",
    "DATE-COMPILED", "DATE-WRITTEN", "DAY", "DAY-OF-WEEK", "DBCS", "DE", "DEBUG-CONTENTS",
    "DEBUG-ITEM", "DEBUG-LINE", "DEBUG-NAME", "DEBUG-SUB-1", "DEBUG-SUB-2", "DEBUG-SUB-3",
    "DEBUGGING", "DECIMAL-POINT", "DECLARATIVES", "DELETE", "DELIMITED", "DELIMITER",
    "DEPENDING", "DESCENDING", "DESTINATION", "DETAIL", "DISPLAY", "DISPLAY-1", "DIVIDE",
    "DIVISION", "DOWN", "DUPLICATES", "DYNAMIC", "EGCS", "EGI", "EJECT", "ELSE", "EMI", "ENABLE",
    "END", "END-ADD", "END-CALL", "END-COMPUTE", "END-DELETE", "END-DIVIDE", "END-EVALUATE",
    "END-IF", "END-INVOKE", "END-MULTIPLY", "END-OF-PAGE", "END-PERFORM", "END-READ",
    "END-RECEIVE", "END-RETURN", "END-REWRITE", "END-SEARCH", "END-START", "END-STRING",
    "END-SUBTRACT", "END-UNSTRING", "END-WRITE", "ENDING", "ENTER", "ENTRY", "ENVIRONMENT", "EOP",
    "EQUAL", "ERROR", "ESI", "EVALUATE", "EVERY", "EXCEPTION", "EXIT", "EXTEND", "EXTERNAL",
    "FALSE", "FD", "FILE", "FILE-CONTROL", "FILLER", "FINAL", "FIRST", "FOOTING", "FOR", "FROM",
    "FUNCTION", "GENERATE", "GIVING", "GLOBAL", "GO", "GOBACK", "GREATER", "GROUP", "HEADING",
    "HIGH-VALUE", "HIGH-VALUES", "I-O", "I-O-CONTROL", "ID", "IDENTIFICATION", "IF", "IN",
    "INDEX", "INDEXED", "INDICATE", "INHERITS", "INITIAL", "INITIALIZE", "INITIATE", "INPUT",
    "INPUT-OUTPUT", "INSERT", "INSPECT", "INSTALLATION", "INTO", "INVALID", "INVOKE", "IS",
    "JUST", "JUSTIFIED", "KANJI", "KEY", "LABEL", "LAST", "LEADING", "LEFT", "LENGTH", "LESS",
    "LIMIT", "LIMITS", "LINAGE", "LINAGE-COUNTER", "LINE", "LINE-COUNTER", "LINES", "LINKAGE",
    "LOCAL-STORAGE", "LOCK", "LOW-VALUE", "LOW-VALUES", "MEMORY", "MERGE", "MESSAGE",
    "METACLASS", "METHOD", "METHOD-ID", "MODE", "MODULES", "MORE-LABELS", "MOVE", "MULTIPLE",
    "MULTIPLY", "NATIVE", "NATIVE_BINARY", "NEGATIVE", "NEXT", "NO", "NOT", "NULL", "NULLS",
    "NUMBER", "NUMERIC", "NUMERIC-EDITED", "OBJECT", "OBJECT-COMPUTER", "OCCURS", "OF", "OFF",
    "OMITTED", "ON", "OPEN", "OPTIONAL", "OR", "ORDER", "ORGANIZATION", "OTHER", "OUTPUT",
    "OVERFLOW", "OVERRIDE", "PACKED-DECIMAL", "PADDING", "PAGE", "PAGE-COUNTER", "PASSWORD",
    "PERFORM", "PF", "PH", "PIC", "PICTURE", "PLUS", "POINTER", "POSITION", "POSITIVE",
    "PRINTING", "PROCEDURE", "PROCEDURE-POINTER", "PROCEDURES", "PROCEED", "PROCESSING",
    "PROGRAM", "PROGRAM-ID", "PURGE", "QUEUE", "QUOTE", "QUOTES", "RANDOM", "RD", "READ", "READY",
    "RECEIVE", "RECORD", "RECORDING", "RECORDS", "RECURSIVE", "REDEFINES", "REEL", "REFERENCE",
    "REFERENCES", "RELATIVE", "RELEASE", "RELOAD", "REMAINDER", "REMOVAL", "RENAMES", "REPLACE",
    "REPLACING", "REPORT", "REPORTING", "REPORTS", "REPOSITORY", "RERUN", "RESERVE", "RESET",
    "RETURN", "RETURN-CODE", "RETURNING", "REVERSED", "REWIND", "REWRITE", "RF", "RH", "RIGHT",
    "ROUNDED", "RUN", "SAME", "SD", "SEARCH", "SECTION", "SECURITY", "SEGMENT", "SEGMENT-LIMIT",
    "SELECT", "SELF", "SEND", "SENTENCE", "SEPARATE", "SEQUENCE", "SEQUENTIAL", "SERVICE", "SET",
    "SHIFT-IN", "SHIFT-OUT", "SIGN", "SIZE", "SKIP1", "SKIP2", "SKIP3", "SORT", "SORT-CONTROL",
    "SORT-CORE-SIZE", "SORT-FILE-SIZE", "SORT-MERGE", "SORT-MESSAGE", "SORT-MODE-SIZE",
    "SORT-RETURN", "SOURCE", "SOURCE-COMPUTER", "SPACE", "SPACES", "SPECIAL-NAMES", "STANDARD",
    "STANDARD-1", "STANDARD-2", "START", "STATUS", "STOP", "STRING", "SUB-QUEUE-1",
    "SUB-QUEUE-2", "SUB-QUEUE-3", "SUBTRACT", "SUM", "SUPER", "SUPPRESS", "SYMBOLIC", "SYNC",
    "SYNCHRONIZED", "TABLE", "TALLY", "TALLYING", "TAPE", "TERMINAL", "TERMINATE", "TEST", "TEXT",
    "THAN", "THEN", "THROUGH", "THRU", "TIME", "TIMES", "TITLE", "TO", "TOP", "TRACE", "TRAILING",
    "TRUE", "TYPE", "UNIT", "UNSTRING", "UNTIL", "UP", "UPON", "USAGE", "USE", "USING", "VALUE",
    "VALUES", "VARYING", "WHEN", "WHEN-COMPILED", "WITH", "WORDS", "WORKING-STORAGE", "WRITE",
    "WRITE-ONLY", "ZERO", "ZEROES", "ZEROS",
];

fn idents() -> KeywordTable {
    KeywordTable::builder(TokenKind::Name)
        .fold(CaseFold::Lower)
        .words(KEYWORDS.iter().copied(), TokenKind::Keyword)
        .build()
}

pub(crate) fn build() -> Result<LexerDefinition, ConfigError> {
    let exp = exp();
    LexerDefinition::builder("cobol")
        .lookup_table("idents", idents())
        .state("whitespace", |s| {
            s.rule(r"\s+", TokenKind::Text)
                .rule(r"\*.*$", TokenKind::CommentSingle)
        })
        .state("dquote_string", |s| {
            s.region()
                .rule(r#"[^"\n]+"#, TokenKind::LiteralStringDouble)
                .rule(r#""""#, TokenKind::LiteralStringEscape)
                .rule_then("\"", TokenKind::LiteralStringDouble, StackOp::pop())
                .rule_then(r"\n", TokenKind::Error, StackOp::pop())
        })
        .state("attr", |s| {
            s.mixin("whitespace")
                .rule_then(ID, TokenKind::NameAttribute, StackOp::pop())
                .rule_then("", TokenKind::Text, StackOp::pop())
        })
        .state("decl_name", |s| {
            s.mixin("whitespace")
                .entry(
                    RuleSpec::emit(r"body\b", TokenKind::KeywordDeclaration)
                        .case_insensitive(),
                )
                .groups(
                    format!(r"({ID})(\.)"),
                    [TokenKind::NameNamespace, TokenKind::Punctuation],
                )
        })
        .state("root", |s| {
            s.mixin("whitespace")
                .rule(r"'.'", TokenKind::LiteralStringChar)
                .rule_then(
                    r#""[^"\n]*"#,
                    TokenKind::LiteralStringDouble,
                    StackOp::push("dquote_string"),
                )
                .rule(format!(r"{NUM}\.{NUM}{exp}"), TokenKind::LiteralNumberFloat)
                .rule(
                    format!(r"{NUM}#{XNUM}\.{XNUM}#{exp}"),
                    TokenKind::LiteralNumberFloat,
                )
                .rule(format!(r"2#[01](?:_?[01])*#{exp}"), TokenKind::LiteralNumberBin)
                .rule(format!(r"8#[0-7](?:_?[0-7])*#{exp}"), TokenKind::LiteralNumberOct)
                .rule(format!(r"16#(?:{XNUM})*#{exp}"), TokenKind::LiteralNumberHex)
                .rule(format!(r"{NUM}#{XNUM}#{exp}"), TokenKind::LiteralNumberInteger)
                .rule(format!(r"{NUM}#\w+#"), TokenKind::Error)
                .rule(format!(r"{NUM}{exp}"), TokenKind::LiteralNumberInteger)
                .rule_then("'", TokenKind::Punctuation, StackOp::push("attr"))
                .rule(format!(r"<<{ID}>>"), TokenKind::NameLabel)
                .rule(
                    r"[+*/&<=>|]|-|=>|\.\.|\*\*|[:></]=|<<|>>|<>",
                    TokenKind::Operator,
                )
                .rule(r"[.,:;()]", TokenKind::Punctuation)
                .lookup(
                    ID,
                    LookupAction::new("idents")
                        .when(TokenKind::KeywordDeclaration, StackOp::push("decl_name")),
                )
                .rule(r"\b(?:\p{Pc}|[ahlp])\w*", TokenKind::Error)
        })
        .build()
}
