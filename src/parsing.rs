//! Parsing - from tokens to AST
//!
//!     Parsing takes the scanner's token sequence, drops the ignorable tokens and appends one
//!     synthetic end-of-input token, then runs the [engine](engine::Matcher) from the grammar's
//!     root rule. Whitespace and comments only matter for positions, never for the grammar.
//!
//!     The result is either the root [`Node`] or a single [`ParseError`]. There is no error
//!     recovery: the first error the engine settles on aborts the parse.
//!
//!     See [language] for the grammar of the source language and [grammar] for how grammar
//!     tables are written.

pub mod ast;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod language;

pub use ast::{Ast, Fields, Node};
pub use engine::{Failure, Input, MatchResult, Matched, Matcher};
pub use error::{MatchError, ParseError};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, Item, NonTerminal, Repeat, Symbol};

use crate::lexing::scan;
use crate::source::SourceFile;
use crate::token::{Token, TokenKind};
use tracing::debug;

/// The significant tokens of one file, terminated by a synthetic end-of-input token.
#[derive(Debug, Clone)]
pub struct TokenStream<'src> {
    tokens: Vec<Token<'src>>,
}

impl<'src> TokenStream<'src> {
    /// Filter out ignorable tokens and append the end-of-input token.
    ///
    /// The end-of-input token sits just past the last character of the last non-empty line,
    /// or at 1:1 for a file without any text.
    pub fn new<I>(file: &'src SourceFile, tokens: I) -> Self
    where
        I: IntoIterator<Item = Token<'src>>,
    {
        let mut tokens: Vec<_> = tokens.into_iter().filter(|t| !t.is_ignored()).collect();
        tokens.push(end_of_input(file));
        TokenStream { tokens }
    }

    /// All tokens, the end-of-input token included.
    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    pub fn end(&self) -> &Token<'src> {
        // `new` always pushes the end token
        &self.tokens[self.tokens.len() - 1]
    }

    pub fn input(&self) -> Input<'_, 'src> {
        Input::new(&self.tokens, self.end())
    }
}

fn end_of_input(file: &SourceFile) -> Token<'_> {
    let last = file
        .lines()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, line)| !line.is_empty());
    let (line, column) = match last {
        Some((idx, text)) => (idx + 1, text.chars().count() + 1),
        None => (1, 1),
    };
    Token::new(TokenKind::EndOfInput, "", file, line, column)
}

/// Parses token streams with one grammar.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g> {
    matcher: Matcher<'g>,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Parser {
            matcher: Matcher::new(grammar),
        }
    }

    /// A parser for the source language.
    pub fn standard() -> Parser<'static> {
        Parser::new(language::grammar())
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.matcher = self.matcher.with_max_depth(max_depth);
        self
    }

    /// Parse a whole stream from the grammar's root rule.
    ///
    /// Significant tokens left over after the root rule matched are an error. A root that
    /// stops short of the end-of-input token is accepted.
    pub fn parse<'src>(&self, stream: &TokenStream<'src>) -> Result<Node<'src>, ParseError<'src>> {
        let root = self.matcher.grammar().root();
        debug!(%root, tokens = stream.tokens().len(), "parsing");

        let matched = self
            .matcher
            .apply_production(root, stream.input())
            .map_err(|failure| failure.error)?;

        let leftover = matched
            .rest
            .tokens()
            .first()
            .filter(|token| token.kind != TokenKind::EndOfInput);
        if let Some(token) = leftover {
            let leftover = Failure {
                error: MatchError::at(token, format!("<{}>", TokenKind::EndOfInput)).into(),
                rest: matched.rest.skip(1),
            };
            let failure = match matched.furthest {
                Some(swallowed) if swallowed.rest.remaining() < leftover.rest.remaining() => {
                    swallowed
                }
                _ => leftover,
            };
            return Err(failure.error);
        }

        debug!(%root, "parse succeeded");
        match matched.ast {
            Ast::Node(node) => Ok(*node),
            body => Ok(Node::new(root, body)),
        }
    }

    /// Filter, terminate and parse a raw token sequence from `file`.
    pub fn parse_tokens<'src, I>(
        &self,
        file: &'src SourceFile,
        tokens: I,
    ) -> Result<Node<'src>, ParseError<'src>>
    where
        I: IntoIterator<Item = Token<'src>>,
    {
        self.parse(&TokenStream::new(file, tokens))
    }

    /// Scan and parse a whole file.
    pub fn parse_source<'src>(&self, file: &'src SourceFile) -> Result<Node<'src>, ParseError<'src>> {
        self.parse_tokens(file, scan(file))
    }
}

/// Scan and parse a file with the standard grammar and default limits.
pub fn parse_source(file: &SourceFile) -> Result<Node<'_>, ParseError<'_>> {
    Parser::standard().parse_source(file)
}

#[cfg(test)]
mod tests {
    use super::language::*;
    use super::*;

    #[test]
    fn test_stream_filters_and_terminates() {
        let file = SourceFile::new("s.rkt", "(x ; note\n  y)\n");
        let stream = TokenStream::new(&file, scan(&file));
        let texts: Vec<_> = stream.tokens().iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["(", "x", "y", ")", ""]);

        let end = stream.end();
        assert_eq!(end.kind, TokenKind::EndOfInput);
        assert_eq!((end.line, end.column), (2, 5));
    }

    #[test]
    fn test_end_of_empty_file() {
        let file = SourceFile::new("empty.rkt", "");
        let stream = TokenStream::new(&file, scan(&file));
        assert_eq!(stream.tokens().len(), 1);
        assert_eq!((stream.end().line, stream.end().column), (1, 1));
    }

    #[test]
    fn test_empty_program() {
        let file = SourceFile::new("empty.rkt", "; nothing here\n");
        let program = parse_source(&file).unwrap();
        assert_eq!(program.rule, PROGRAM);
        assert_eq!(program.field("statements"), Some(&Ast::List(vec![])));
    }

    #[test]
    fn test_leftover_tokens_are_an_error() {
        const ROOT: NonTerminal = NonTerminal("root");
        let grammar = Grammar::builder(ROOT)
            .rule(ROOT, [TokenKind::Identifier])
            .build()
            .unwrap();

        let file = SourceFile::new("left.rkt", "a b");
        let err = Parser::new(&grammar).parse_source(&file).unwrap_err();
        let err = err.as_mismatch().unwrap();
        assert_eq!(err.expected, "<END_OF_INPUT>");
        assert_eq!(err.found, "b");
        assert_eq!((err.line, err.column), (1, 3));
    }

    #[test]
    fn test_root_without_end_of_input_accepts_exact_input() {
        const ROOT: NonTerminal = NonTerminal("root");
        let grammar = Grammar::builder(ROOT)
            .rule(ROOT, [Symbol::some(TokenKind::Integer)])
            .build()
            .unwrap();

        let file = SourceFile::new("ints.rkt", "1 2 3");
        let stream = TokenStream::new(&file, scan(&file));
        let root = Parser::new(&grammar).parse(&stream).unwrap();
        assert_eq!(root.rule, ROOT);
        assert_eq!(root.body.as_list().map(<[Ast]>::len), Some(3));
    }

    #[test]
    fn test_depth_limit_reaches_parser() {
        let source = format!("{}x{}", "(f ".repeat(40), ")".repeat(40));
        let file = SourceFile::new("deep.rkt", &source);

        assert!(Parser::standard().parse_source(&file).is_ok());

        let err = Parser::standard()
            .with_max_depth(20)
            .parse_source(&file)
            .unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { limit: 20, .. }));
    }
}
