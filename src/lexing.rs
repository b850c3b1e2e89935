//! Scanner - ordered regex patterns over source lines
//!
//!     The scanner walks the lines of a [`SourceFile`] with a cursor and, at every step, tries
//!     the token patterns in declaration order against the rest of the current line. The first
//!     pattern that matches a prefix wins. Order is load-bearing: booleans and integers come
//!     before identifiers, and the single-character `Unknown` pattern comes last so that the
//!     scanner always makes progress.
//!
//!     Ignorable tokens (whitespace, comments) and unknown characters are emitted like any
//!     other token. Dropping them is the parser's job, and keeping them here means every
//!     character of the input is accounted for by exactly one token.
//!
//!     Empty lines produce no token. Line breaks are not tokens either: a token never spans
//!     two lines.

use crate::source::SourceFile;
use crate::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Token patterns, tried in declaration order. Every pattern is anchored at the cursor.
pub const TOKEN_PATTERNS: &[(TokenKind, &str)] = &[
    (TokenKind::Boolean, r"^(?:#t|#f)"),
    (TokenKind::Integer, r"^-?\d+"),
    // `->`, `:` and brackets belong to the signature annotation syntax
    (TokenKind::Separator, r"^(?:->|[()\[\]:])"),
    (
        TokenKind::Identifier,
        r"^[a-zA-Z_+*/<>=?!][a-zA-Z0-9_+\-*/<>=?!]*",
    ),
    (TokenKind::Ignore, r"^;.*$"),
    (TokenKind::Ignore, r"^\s+"),
    (TokenKind::Unknown, r"(?s)^."),
];

static TOKEN_RULES: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    TOKEN_PATTERNS
        .iter()
        .map(|(kind, pattern)| (*kind, Regex::new(pattern).unwrap()))
        .collect()
});

/// Scan a whole file into its token sequence, ignorable tokens included.
pub fn scan(file: &SourceFile) -> Vec<Token<'_>> {
    let tokens: Vec<_> = Scanner::new(file).collect();
    debug!(file = file.name(), tokens = tokens.len(), "scanned source");
    tokens
}

/// Token iterator over a [`SourceFile`].
///
/// Tracks the cursor as a 0-indexed line, a byte offset into that line and the matching
/// character column. Emitted positions are 1-indexed.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    file: &'src SourceFile,
    line: usize,
    byte: usize,
    column: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(file: &'src SourceFile) -> Self {
        let mut scanner = Scanner {
            file,
            line: 0,
            byte: 0,
            column: 0,
        };
        scanner.skip_empty_lines();
        scanner
    }

    /// Current cursor as a 0-indexed `(line, column)` pair.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub fn is_done(&self) -> bool {
        self.line >= self.file.line_count()
    }

    fn skip_empty_lines(&mut self) {
        let lines = self.file.lines();
        while self.line < lines.len() && lines[self.line].is_empty() {
            self.line += 1;
        }
    }

    /// Classify the prefix of `rest`, returning the kind and the matched length in bytes.
    fn classify(rest: &str) -> (TokenKind, usize) {
        for (kind, regex) in TOKEN_RULES.iter() {
            if let Some(found) = regex.find(rest) {
                if !found.as_str().is_empty() {
                    return (*kind, found.end());
                }
            }
        }
        // The `Unknown` pattern matches any character; this only covers a broken table.
        let width = rest.chars().next().map_or(rest.len(), char::len_utf8);
        (TokenKind::Unknown, width)
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.is_done() {
            return None;
        }

        let line_text = self.file.lines()[self.line].as_str();
        let rest = &line_text[self.byte..];
        let (kind, len) = Self::classify(rest);
        let text = &rest[..len];

        let token = Token::new(kind, text, self.file, self.line + 1, self.column + 1);

        self.byte += len;
        self.column += text.chars().count();
        if self.byte >= line_text.len() {
            self.line += 1;
            self.byte = 0;
            self.column = 0;
            self.skip_empty_lines();
        }

        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds_and_texts(file: &SourceFile) -> Vec<(TokenKind, &str)> {
        scan(file).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[rstest]
    #[case("#t", TokenKind::Boolean)]
    #[case("#f", TokenKind::Boolean)]
    #[case("42", TokenKind::Integer)]
    #[case("-12", TokenKind::Integer)]
    #[case("(", TokenKind::Separator)]
    #[case(")", TokenKind::Separator)]
    #[case("[", TokenKind::Separator)]
    #[case("]", TokenKind::Separator)]
    #[case(":", TokenKind::Separator)]
    #[case("->", TokenKind::Separator)]
    #[case("define", TokenKind::Identifier)]
    #[case("+", TokenKind::Identifier)]
    #[case("set!", TokenKind::Identifier)]
    #[case("list->vector", TokenKind::Identifier)]
    #[case("_x9", TokenKind::Identifier)]
    #[case("; a comment (with parens)", TokenKind::Ignore)]
    #[case(" \t ", TokenKind::Ignore)]
    #[case("-", TokenKind::Unknown)]
    #[case("#", TokenKind::Unknown)]
    #[case("λ", TokenKind::Unknown)]
    fn test_single_token(#[case] text: &str, #[case] kind: TokenKind) {
        let file = SourceFile::new("single.rkt", text);
        assert_eq!(kinds_and_texts(&file), vec![(kind, text)]);
    }

    #[test]
    fn test_boolean_beats_identifier() {
        let file = SourceFile::new("b.rkt", "#true");
        assert_eq!(
            kinds_and_texts(&file),
            vec![(TokenKind::Boolean, "#t"), (TokenKind::Identifier, "rue")]
        );
    }

    #[test]
    fn test_integer_beats_identifier_and_unknown() {
        let file = SourceFile::new("i.rkt", "-7x");
        assert_eq!(
            kinds_and_texts(&file),
            vec![(TokenKind::Integer, "-7"), (TokenKind::Identifier, "x")]
        );
    }

    #[test]
    fn test_scan_mixed_file() {
        let file = SourceFile::from_lines(
            "test.txt",
            [
                "ü  \t; jk",
                "(not89_+-/*s<>=? #t) -12",
                "",
                "",
                "(hello) 35235 -+ABC",
                "",
            ],
        );

        let tokens: Vec<_> = scan(&file)
            .into_iter()
            .map(|t| (t.kind, t.text, t.line, t.column))
            .collect();

        use TokenKind::*;
        assert_eq!(
            tokens,
            vec![
                (Unknown, "ü", 1, 1),
                (Ignore, "  \t", 1, 2),
                (Ignore, "; jk", 1, 5),
                (Separator, "(", 2, 1),
                (Identifier, "not89_+-/*s<>=?", 2, 2),
                (Ignore, " ", 2, 17),
                (Boolean, "#t", 2, 18),
                (Separator, ")", 2, 20),
                (Ignore, " ", 2, 21),
                (Integer, "-12", 2, 22),
                (Separator, "(", 5, 1),
                (Identifier, "hello", 5, 2),
                (Separator, ")", 5, 7),
                (Ignore, " ", 5, 8),
                (Integer, "35235", 5, 9),
                (Ignore, " ", 5, 14),
                (Unknown, "-", 5, 15),
                (Identifier, "+ABC", 5, 16),
            ]
        );
    }

    #[test]
    fn test_tokens_reference_their_file() {
        let file = SourceFile::new("ref.rkt", "x");
        let tokens = scan(&file);
        assert!(std::ptr::eq(tokens[0].file, &file));
    }

    #[test]
    fn test_leading_empty_lines_are_skipped() {
        let file = SourceFile::new("lead.rkt", "\n\n  x");
        let tokens = scan(&file);
        assert_eq!(tokens.len(), 2);
        assert_eq!((tokens[1].line, tokens[1].column), (3, 3));
    }

    #[test]
    fn test_empty_input() {
        let file = SourceFile::new("empty.rkt", "");
        assert!(scan(&file).is_empty());
        assert!(Scanner::new(&file).is_done());
    }

    #[test]
    fn test_scanner_position_advances() {
        let file = SourceFile::new("pos.rkt", "(a)\nb");
        let mut scanner = Scanner::new(&file);
        assert_eq!(scanner.position(), (0, 0));
        scanner.next();
        assert_eq!(scanner.position(), (0, 1));
        scanner.next();
        scanner.next();
        assert_eq!(scanner.position(), (1, 0));
        scanner.next();
        assert!(scanner.is_done());
        assert_eq!(scanner.next(), None);
    }

    #[test]
    fn test_signature_line() {
        let file = SourceFile::new("sig.rkt", "(: x [X Y] (X Y -> Integer))");
        let texts: Vec<_> = scan(&file)
            .into_iter()
            .filter(|t| !t.is_ignored())
            .map(|t| t.text)
            .collect();
        assert_eq!(
            texts,
            vec!["(", ":", "x", "[", "X", "Y", "]", "(", "X", "Y", "->", "Integer", ")", ")"]
        );
    }
}
