//! # parens
//!
//! A front end for a small Scheme-like language with optional type signatures.
//!
//! The pipeline has two phases:
//!
//! 1. [Lexing](lexing): a [`SourceFile`] is scanned line by line into positioned [`Token`]s.
//!    Comments and whitespace become ignorable tokens, so every character is accounted for.
//! 2. [Parsing](parsing): ignorable tokens are dropped and a data-driven grammar is matched
//!    against the rest by a recursive-descent engine with ordered choice. The result is a
//!    generic [`Node`] tree or a single positioned [`ParseError`].
//!
//! ```ignore
//! use parens::{parse_source, SourceFile};
//!
//! let file = SourceFile::new("add.rkt", "(define (add x y) (+ x y))");
//! let program = parse_source(&file)?;
//! ```
//!
//! Around the core sit [`report`] (user-facing diagnostics), [`formats`] (token and tree
//! output) and [`config`] (layered settings for the `parens` binary).

pub mod config;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod report;
pub mod source;
pub mod token;

pub use lexing::scan;
pub use parsing::{parse_source, Ast, Node, ParseError, Parser};
pub use source::{LoaderError, SourceFile, SourceLoader};
pub use token::{Token, TokenKind};
