//! Grammar Engine - recursive descent interpreter over a grammar table
//!
//!     The engine walks a [`Grammar`] against a token slice. It is a single generic
//!     interpreter: there is no per-rule code, only a dispatch on the [`Symbol`] variant.
//!
//!     Every match returns a [`MatchResult`]. Both arms carry the remaining input, because
//!     the remaining length is what failures are compared by:
//!
//!     - Terminals (`Kind`, `Literal`) consume the head token whether they match or not, so a
//!       failed terminal leaves the input just past the offending token.
//!     - `Rule` tries its alternatives in order, each from the same input, and returns the
//!       first success. When all fail it reports the failure that left the fewest tokens
//!       remaining, i.e. the attempt that got furthest; ties go to the earlier alternative.
//!     - `Sequence` threads the input through its items and stops at the first failure.
//!     - `Repeat` matches greedily and stops at the first failed attempt. A one-or-more
//!       repetition reports the failure of its first attempt.
//!
//!     Failures swallowed by ordered choice or by the end of a repetition are not lost: the
//!     deepest of them travels up with the successful result as `furthest`. If an enclosing
//!     sequence later fails at an earlier position, the deeper swallowed failure is reported
//!     instead. Without this, `(define (add x y)` would be reported as an unexpected `(` at
//!     the start of the file, since the statement repetition quietly stops there.
//!
//!     Recursion depth is bounded by the number of nested rule applications. Exceeding the
//!     limit raises [`ParseError::TooDeep`], which no alternative or repetition can swallow.
//!
//!     Rule results are memoized for the duration of one top-level call, keyed by rule,
//!     position and depth. Alternatives sharing a prefix (`func_sig` and `complex_sig` both
//!     open with `(` and a signature list) would otherwise re-parse nested input once per
//!     alternative, which is exponential in the nesting.

use super::ast::{Ast, Fields, Node};
use super::error::{MatchError, ParseError};
use super::grammar::{Grammar, Item, NonTerminal, Repeat, Symbol};
use crate::token::{Token, TokenKind};
use std::collections::HashMap;
use tracing::trace;

/// A view of the tokens still to be matched.
///
/// `end` is the synthetic end-of-input token; it locates failures on exhausted input.
#[derive(Debug, Clone, Copy)]
pub struct Input<'t, 'src> {
    tokens: &'t [Token<'src>],
    end: &'t Token<'src>,
}

impl<'t, 'src> Input<'t, 'src> {
    pub fn new(tokens: &'t [Token<'src>], end: &'t Token<'src>) -> Self {
        Input { tokens, end }
    }

    pub fn tokens(&self) -> &'t [Token<'src>] {
        self.tokens
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The next token, or the end-of-input token once everything is consumed.
    pub fn head(&self) -> &'t Token<'src> {
        self.tokens.first().unwrap_or(self.end)
    }

    /// Drop the first `n` tokens (fewer if the input is shorter).
    pub fn skip(self, n: usize) -> Self {
        Input {
            tokens: &self.tokens[n.min(self.tokens.len())..],
            end: self.end,
        }
    }
}

/// A successful match.
#[derive(Debug, Clone)]
pub struct Matched<'t, 'src> {
    pub ast: Ast<'src>,
    pub rest: Input<'t, 'src>,
    /// The deepest failure swallowed while producing this match.
    pub furthest: Option<Failure<'t, 'src>>,
}

/// A failed match and the input left after the furthest point it reached.
#[derive(Debug, Clone)]
pub struct Failure<'t, 'src> {
    pub error: ParseError<'src>,
    pub rest: Input<'t, 'src>,
}

pub type MatchResult<'t, 'src> = Result<Matched<'t, 'src>, Failure<'t, 'src>>;

/// Rule results of one top-level call, keyed by `(rule, remaining tokens, depth)`.
///
/// Every input seen during one call is a suffix of the same token slice, so the remaining
/// length identifies the position.
type Memo<'t, 'src> = HashMap<(NonTerminal, usize, usize), MatchResult<'t, 'src>>;

/// Keep whichever failure left fewer tokens; on a tie keep `current`.
fn deeper<'t, 'src>(
    current: Option<Failure<'t, 'src>>,
    candidate: Option<Failure<'t, 'src>>,
) -> Option<Failure<'t, 'src>> {
    match (current, candidate) {
        (Some(current), Some(candidate)) => {
            if candidate.rest.remaining() < current.rest.remaining() {
                Some(candidate)
            } else {
                Some(current)
            }
        }
        (current, None) => current,
        (None, candidate) => candidate,
    }
}

/// The failure to report when `actual` ends a sequence: a swallowed failure wins only if
/// it got strictly further.
fn report<'t, 'src>(
    actual: Failure<'t, 'src>,
    furthest: Option<Failure<'t, 'src>>,
) -> Failure<'t, 'src> {
    match furthest {
        Some(swallowed) if swallowed.rest.remaining() < actual.rest.remaining() => swallowed,
        _ => actual,
    }
}

/// Interpreter for one grammar table.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'g> {
    grammar: &'g Grammar,
    max_depth: usize,
}

impl<'g> Matcher<'g> {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    pub fn new(grammar: &'g Grammar) -> Self {
        Matcher {
            grammar,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit the number of nested rule applications.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Match any symbol against the input.
    pub fn match_symbol<'t, 'src>(
        &self,
        symbol: &Symbol,
        input: Input<'t, 'src>,
    ) -> MatchResult<'t, 'src> {
        self.symbol(symbol, input, 0, &mut Memo::new())
    }

    /// Expand a non-terminal against the input.
    pub fn apply_production<'t, 'src>(
        &self,
        rule: NonTerminal,
        input: Input<'t, 'src>,
    ) -> MatchResult<'t, 'src> {
        self.production(rule, input, 0, &mut Memo::new())
    }

    fn symbol<'t, 'src>(
        &self,
        symbol: &Symbol,
        input: Input<'t, 'src>,
        depth: usize,
        memo: &mut Memo<'t, 'src>,
    ) -> MatchResult<'t, 'src> {
        match symbol {
            Symbol::Kind(kind) => expect(input, |t| t.kind == *kind, || expected_kind(*kind)),
            Symbol::Literal(text) => {
                expect(input, |t| t.text == *text, || format!("\"{}\"", text))
            }
            Symbol::Rule(rule) => self.production(*rule, input, depth, memo),
            Symbol::Sequence(items) => self.sequence(items, input, depth, memo),
            Symbol::Repeat(mode, inner) => self.repeat(*mode, inner, input, depth, memo),
        }
    }

    fn production<'t, 'src>(
        &self,
        rule: NonTerminal,
        input: Input<'t, 'src>,
        depth: usize,
        memo: &mut Memo<'t, 'src>,
    ) -> MatchResult<'t, 'src> {
        let key = (rule, input.remaining(), depth);
        if let Some(result) = memo.get(&key) {
            trace!(%rule, remaining = input.remaining(), "memoized");
            return result.clone();
        }
        let result = self.expand(rule, input, depth, memo);
        memo.insert(key, result.clone());
        result
    }

    fn expand<'t, 'src>(
        &self,
        rule: NonTerminal,
        input: Input<'t, 'src>,
        depth: usize,
        memo: &mut Memo<'t, 'src>,
    ) -> MatchResult<'t, 'src> {
        if depth >= self.max_depth {
            return Err(Failure {
                error: ParseError::too_deep(input.head(), self.max_depth),
                rest: input,
            });
        }

        let alternatives = match self.grammar.alternatives(rule) {
            Some(alternatives) => alternatives,
            None => {
                return Err(Failure {
                    error: MatchError::at(input.head(), rule.name()).into(),
                    rest: input,
                })
            }
        };

        let mut failed: Option<Failure<'t, 'src>> = None;
        for alternative in alternatives {
            trace!(%rule, %alternative, remaining = input.remaining(), "trying alternative");
            match self.symbol(alternative, input, depth + 1, memo) {
                Ok(matched) => {
                    return Ok(Matched {
                        ast: Ast::Node(Box::new(Node::new(rule, matched.ast))),
                        rest: matched.rest,
                        furthest: deeper(failed, matched.furthest),
                    });
                }
                Err(failure) if failure.error.is_fatal() => return Err(failure),
                Err(failure) => failed = deeper(failed, Some(failure)),
            }
        }

        trace!(%rule, remaining = input.remaining(), "all alternatives failed");
        Err(failed.unwrap_or_else(|| Failure {
            error: MatchError::at(input.head(), rule.name()).into(),
            rest: input,
        }))
    }

    fn sequence<'t, 'src>(
        &self,
        items: &[Item],
        input: Input<'t, 'src>,
        depth: usize,
        memo: &mut Memo<'t, 'src>,
    ) -> MatchResult<'t, 'src> {
        let mut fields = Fields::new();
        let mut rest = input;
        let mut furthest = None;

        for item in items {
            match self.symbol(&item.symbol, rest, depth, memo) {
                Ok(matched) => {
                    if let Some(label) = item.label {
                        fields.insert(label, matched.ast);
                    }
                    rest = matched.rest;
                    furthest = deeper(furthest, matched.furthest);
                }
                Err(failure) if failure.error.is_fatal() => return Err(failure),
                Err(failure) => return Err(report(failure, furthest)),
            }
        }

        Ok(Matched {
            ast: Ast::Fields(fields),
            rest,
            furthest,
        })
    }

    fn repeat<'t, 'src>(
        &self,
        mode: Repeat,
        inner: &Symbol,
        input: Input<'t, 'src>,
        depth: usize,
        memo: &mut Memo<'t, 'src>,
    ) -> MatchResult<'t, 'src> {
        let mut items = Vec::new();
        let mut rest = input;
        let mut furthest = None;

        if mode == Repeat::OneOrMore {
            let first = self.symbol(inner, rest, depth, memo)?;
            items.push(first.ast);
            rest = first.rest;
            furthest = first.furthest;
        }

        loop {
            match self.symbol(inner, rest, depth, memo) {
                Ok(matched) => {
                    furthest = deeper(furthest, matched.furthest);
                    // a match that consumed nothing would repeat forever
                    if matched.rest.remaining() >= rest.remaining() {
                        break;
                    }
                    items.push(matched.ast);
                    rest = matched.rest;
                }
                Err(failure) if failure.error.is_fatal() => return Err(failure),
                Err(failure) => {
                    furthest = deeper(furthest, Some(failure));
                    break;
                }
            }
        }

        Ok(Matched {
            ast: Ast::List(items),
            rest,
            furthest,
        })
    }
}

fn expected_kind(kind: TokenKind) -> String {
    format!("<{}>", kind)
}

/// Match the head token against a predicate. The head is consumed either way.
fn expect<'t, 'src>(
    input: Input<'t, 'src>,
    accepts: impl FnOnce(&Token<'src>) -> bool,
    expected: impl FnOnce() -> String,
) -> MatchResult<'t, 'src> {
    let token = match input.tokens.first() {
        Some(token) => token,
        None => {
            return Err(Failure {
                error: MatchError::at(input.end, expected()).into(),
                rest: input,
            })
        }
    };

    let rest = input.skip(1);
    if accepts(token) {
        Ok(Matched {
            ast: Ast::Token(*token),
            rest,
            furthest: None,
        })
    } else {
        Err(Failure {
            error: MatchError::at(token, expected()).into(),
            rest,
        })
    }
}
