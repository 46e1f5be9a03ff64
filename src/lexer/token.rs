//! Token definitions for the pseudocode tokenizer.
//!
//! Highlighting only needs a handful of syntactic categories, so the
//! tokenizer classifies source text into:
//! - Keywords (IF, FOR, FUNCTION, ...)
//! - Boolean and null literals (TRUE, FALSE, NULL)
//! - Numbers, strings and line comments
//! - Operator runs (`<=`, `!=`, `+=`, ...)
//! - Identifiers, and malformed identifiers (`invalid`)
//!
//! ## Design Notes
//!
//! The DFA is generated by `logos` from [`RawToken`]. Logos picks the
//! longest match across all patterns, which gives the word-boundary
//! behaviour we want for free: `IFFY` is one word, not `IF` + `FY`.
//! Ties are broken by pattern priority, so a keyword beats the word
//! pattern on exactly the keyword text.
//!
//! Pseudocode is case-insensitive, so keywords use `ignore(ascii_case)`.

use logos::Logos;
use std::fmt;
use std::ops::Range;

/// A classified token with its location in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The syntactic category of this token
    pub kind: TokenKind,
    /// Byte offsets of this token in the source
    pub span: Range<usize>,
    /// The original text of the token
    pub text: String,
}

impl Token {
    /// Create a new token with the given kind, span, and text.
    pub fn new(kind: TokenKind, span: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }

    /// Byte offset where this token starts.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Byte offset just past the end of this token.
    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// The highlighting categories a token can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved word such as `IF`, `WHILE`, `RETURN`
    Keyword,
    /// `TRUE`, `FALSE` or `NULL`
    Boolean,
    /// Numeric literal with optional leading minus and fraction
    Number,
    /// Single- or double-quoted string
    String,
    /// `//` line comment
    Comment,
    /// Maximal run of `+ - * / = % < > !`
    Operator,
    /// Well-formed identifier
    Identifier,
    /// Word that fails identifier validation (`2x`, `café`)
    Invalid,
}

impl TokenKind {
    /// All kinds, in classification priority order.
    pub const ALL: [TokenKind; 8] = [
        TokenKind::Keyword,
        TokenKind::Boolean,
        TokenKind::Number,
        TokenKind::String,
        TokenKind::Comment,
        TokenKind::Operator,
        TokenKind::Identifier,
        TokenKind::Invalid,
    ];

    /// The highlighting tag name used by editors for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Boolean => "bool",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::Operator => "operator",
            TokenKind::Identifier => "variable",
            TokenKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw lexemes produced by the generated DFA.
///
/// `Word` is refined into [`TokenKind::Identifier`] or
/// [`TokenKind::Invalid`] by the identifier validator; everything else
/// maps one-to-one onto [`TokenKind`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    // ==================== Keywords ====================
    #[token("IF", ignore(ascii_case))]
    #[token("THEN", ignore(ascii_case))]
    #[token("ELSE", ignore(ascii_case))]
    #[token("ELSEIF", ignore(ascii_case))]
    #[token("ENDIF", ignore(ascii_case))]
    #[token("WHILE", ignore(ascii_case))]
    #[token("FOR", ignore(ascii_case))]
    #[token("TO", ignore(ascii_case))]
    #[token("STEP", ignore(ascii_case))]
    #[token("NEXT", ignore(ascii_case))]
    #[token("REPEAT", ignore(ascii_case))]
    #[token("UNTIL", ignore(ascii_case))]
    #[token("FUNCTION", ignore(ascii_case))]
    #[token("PROCEDURE", ignore(ascii_case))]
    #[token("BEGIN", ignore(ascii_case))]
    #[token("END", ignore(ascii_case))]
    #[token("RETURN", ignore(ascii_case))]
    #[token("PRINT", ignore(ascii_case))]
    #[token("INPUT", ignore(ascii_case))]
    Keyword,

    // ==================== Literals ====================
    #[token("TRUE", ignore(ascii_case))]
    #[token("FALSE", ignore(ascii_case))]
    #[token("NULL", ignore(ascii_case))]
    Boolean,

    /// `-?digits`, with the fraction taken by the callback so that a
    /// trailing `.` never needs the DFA to back off.
    #[regex(r"-?[0-9]+", fractional_part)]
    Number,

    /// Escape-aware, stops at the first unescaped matching quote and never
    /// crosses a line break.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    String,

    #[regex(r"//[^\n]*")]
    Comment,

    #[regex(r"[+\-*/=%<>!]+")]
    Operator,

    /// Any run of word characters holding at least one letter, optionally
    /// led by digits (`2x`) or a minus and digits (`-2x`). Non-ASCII
    /// letters are part of the run so that `café` stays a single
    /// (invalid) word; other symbols such as `←` or `≤` are not.
    #[regex(r"(-[0-9]+|[0-9]*)([A-Za-z_]|\p{L})([A-Za-z0-9_]|\p{L})*")]
    Word,
}

/// Extends a number over `.digits` when present.
fn fractional_part(lex: &mut logos::Lexer<RawToken>) -> bool {
    let rest = lex.remainder().as_bytes();
    if rest.first() == Some(&b'.') {
        let digits = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 {
            lex.bump(1 + digits);
        }
    }
    true
}
