//! Parse error types

use crate::source::SourceFile;
use crate::token::Token;
use thiserror::Error;

/// A single expected-versus-found mismatch at a source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{column}: Expected {expected}; Found \"{found}\"")]
pub struct MatchError<'src> {
    pub file: &'src SourceFile,
    pub line: usize,
    pub column: usize,
    pub expected: String,
    pub found: String,
}

impl<'src> MatchError<'src> {
    /// A mismatch located at `token`, which is reported as what was found.
    pub fn at(token: &Token<'src>, expected: impl Into<String>) -> Self {
        MatchError {
            file: token.file,
            line: token.line,
            column: token.column,
            expected: expected.into(),
            found: token.text.to_string(),
        }
    }
}

/// Why a parse failed.
///
/// `Mismatch` is the ordinary syntax error and takes part in ordered choice and
/// longest-match selection. `TooDeep` aborts the whole parse as soon as it is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError<'src> {
    #[error(transparent)]
    Mismatch(MatchError<'src>),

    #[error("{file}:{line}:{column}: nesting exceeds the limit of {limit} rule applications")]
    TooDeep {
        file: &'src SourceFile,
        line: usize,
        column: usize,
        limit: usize,
    },
}

impl<'src> ParseError<'src> {
    pub fn too_deep(token: &Token<'src>, limit: usize) -> Self {
        ParseError::TooDeep {
            file: token.file,
            line: token.line,
            column: token.column,
            limit,
        }
    }

    /// Fatal errors are never superseded by another alternative or repetition.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::TooDeep { .. })
    }

    pub fn as_mismatch(&self) -> Option<&MatchError<'src>> {
        match self {
            ParseError::Mismatch(err) => Some(err),
            ParseError::TooDeep { .. } => None,
        }
    }

    pub fn file(&self) -> &'src SourceFile {
        match self {
            ParseError::Mismatch(err) => err.file,
            ParseError::TooDeep { file, .. } => *file,
        }
    }

    /// 1-indexed `(line, column)` of the error.
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::Mismatch(err) => (err.line, err.column),
            ParseError::TooDeep { line, column, .. } => (*line, *column),
        }
    }
}

impl<'src> From<MatchError<'src>> for ParseError<'src> {
    fn from(err: MatchError<'src>) -> Self {
        ParseError::Mismatch(err)
    }
}
