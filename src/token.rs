//! Core token types shared by the scanner, the grammar engine and the output formats.
//!
//! A token is an immutable value: its kind, the exact text it covers, the file it came
//! from and its 1-indexed line/column. Columns count characters, not bytes.

use crate::source::SourceFile;
use serde::Serialize;
use std::fmt;

/// The closed set of token classifications.
///
/// `EndOfInput` is never produced by the scanner; the parser appends one synthetic
/// token of this kind after the last significant token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Boolean,
    Identifier,
    Ignore,
    Integer,
    Separator,
    Unknown,
    EndOfInput,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Ignore => "IGNORE",
            TokenKind::Integer => "INTEGER",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::EndOfInput => "END_OF_INPUT",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A positioned token borrowing its text and file from the [`SourceFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    #[serde(skip)]
    pub file: &'src SourceFile,
    pub line: usize,
    pub column: usize,
}

impl<'src> Token<'src> {
    pub fn new(
        kind: TokenKind,
        text: &'src str,
        file: &'src SourceFile,
        line: usize,
        column: usize,
    ) -> Self {
        Token {
            kind,
            text,
            file,
            line,
            column,
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.kind == TokenKind::Ignore
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {} {:?}", self.line, self.column, self.kind, self.text)
    }
}
