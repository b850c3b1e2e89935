//! The grammar of the Scheme-like source language
//!
//! Ordered alternatives matter in a few places:
//!
//! - `definition` tries `constant_def` before `sig_def`, so `(define x y)` binds `y` as a
//!   value expression rather than a type name.
//! - `statement` tries definitions and signature declarations before plain expressions,
//!   since `(define ...)` and `(: ...)` would otherwise parse as function calls.
//! - `expression` tries `lambda` before `func_call`: `(lambda (x) x)` is also a well-formed
//!   call of a function named `lambda`.
//! - `signature` tries `func_sig` before `complex_sig`; both start with `(`.
//!
//! The table is built once per process and shared by reference.

use super::grammar::{Grammar, Item, NonTerminal, Symbol};
use crate::token::TokenKind;
use once_cell::sync::Lazy;

pub const PROGRAM: NonTerminal = NonTerminal("program");
pub const STATEMENT: NonTerminal = NonTerminal("statement");
pub const DEFINITION: NonTerminal = NonTerminal("definition");
pub const CONSTANT_DEF: NonTerminal = NonTerminal("constant_def");
pub const SIG_DEF: NonTerminal = NonTerminal("sig_def");
pub const FUNC_DEF: NonTerminal = NonTerminal("func_def");
pub const FSIG_DEC: NonTerminal = NonTerminal("fsig_dec");
pub const BASIC_FSIG: NonTerminal = NonTerminal("basic_fsig");
pub const PARAM_FSIG: NonTerminal = NonTerminal("param_fsig");
pub const SIGNATURE: NonTerminal = NonTerminal("signature");
pub const FUNC_SIG: NonTerminal = NonTerminal("func_sig");
pub const COMPLEX_SIG: NonTerminal = NonTerminal("complex_sig");
pub const EXPRESSION: NonTerminal = NonTerminal("expression");
pub const LITERAL: NonTerminal = NonTerminal("literal");
pub const FUNC_CALL: NonTerminal = NonTerminal("func_call");
pub const LAMBDA: NonTerminal = NonTerminal("lambda");

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| build().unwrap());

/// The standard grammar, rooted at [`PROGRAM`].
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

fn build() -> Result<Grammar, super::grammar::GrammarError> {
    use TokenKind::{Boolean, EndOfInput, Identifier, Integer};

    Grammar::builder(PROGRAM)
        .rule(
            PROGRAM,
            [Symbol::seq([
                Item::field("statements", Symbol::many(STATEMENT)),
                Item::skip(EndOfInput),
            ])],
        )
        .rule(STATEMENT, [DEFINITION, FSIG_DEC, EXPRESSION])
        .rule(DEFINITION, [CONSTANT_DEF, FUNC_DEF, SIG_DEF])
        .rule(
            CONSTANT_DEF,
            [Symbol::seq([
                Item::skip("("),
                Item::skip("define"),
                Item::field("name", Identifier),
                Item::field("value", EXPRESSION),
                Item::skip(")"),
            ])],
        )
        .rule(
            SIG_DEF,
            [Symbol::seq([
                Item::skip("("),
                Item::skip("define"),
                Item::field("name", Identifier),
                Item::field("signature", SIGNATURE),
                Item::skip(")"),
            ])],
        )
        .rule(
            FUNC_DEF,
            [Symbol::seq([
                Item::skip("("),
                Item::skip("define"),
                Item::skip("("),
                Item::field("name", Identifier),
                Item::field("params", Symbol::many(Identifier)),
                Item::skip(")"),
                Item::field("body", EXPRESSION),
                Item::skip(")"),
            ])],
        )
        .rule(FSIG_DEC, [BASIC_FSIG, PARAM_FSIG])
        .rule(
            BASIC_FSIG,
            [Symbol::seq([
                Item::skip("("),
                Item::skip(":"),
                Item::field("name", Identifier),
                Item::field("signature", FUNC_SIG),
                Item::skip(")"),
            ])],
        )
        .rule(
            PARAM_FSIG,
            [Symbol::seq([
                Item::skip("("),
                Item::skip(":"),
                Item::field("name", Identifier),
                Item::skip("["),
                Item::field("params", Symbol::some(Identifier)),
                Item::skip("]"),
                Item::field("signature", FUNC_SIG),
                Item::skip(")"),
            ])],
        )
        .rule(
            SIGNATURE,
            [
                Symbol::rule(FUNC_SIG),
                Symbol::rule(COMPLEX_SIG),
                Symbol::kind(Identifier),
            ],
        )
        .rule(
            FUNC_SIG,
            [Symbol::seq([
                Item::skip("("),
                Item::field("param_sigs", Symbol::some(SIGNATURE)),
                Item::skip("->"),
                Item::field("ret_sig", SIGNATURE),
                Item::skip(")"),
            ])],
        )
        .rule(
            COMPLEX_SIG,
            [Symbol::seq([
                Item::skip("("),
                Item::field("name", Identifier),
                Item::field("signatures", Symbol::some(SIGNATURE)),
                Item::skip(")"),
            ])],
        )
        .rule(
            EXPRESSION,
            [
                Symbol::rule(LITERAL),
                Symbol::rule(LAMBDA),
                Symbol::rule(FUNC_CALL),
                Symbol::kind(Identifier),
            ],
        )
        .rule(LITERAL, [Boolean, Integer])
        .rule(
            FUNC_CALL,
            [Symbol::seq([
                Item::skip("("),
                Item::field("function", EXPRESSION),
                Item::field("args", Symbol::many(EXPRESSION)),
                Item::skip(")"),
            ])],
        )
        .rule(
            LAMBDA,
            [Symbol::seq([
                Item::skip("("),
                Item::skip("lambda"),
                Item::skip("("),
                Item::field("params", Symbol::some(Identifier)),
                Item::skip(")"),
                Item::field("body", EXPRESSION),
                Item::skip(")"),
            ])],
        )
        .build()
}
