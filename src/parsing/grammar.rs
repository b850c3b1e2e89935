//! Grammar Table Definitions
//!
//! A grammar is data, not code: a table mapping each [`NonTerminal`] to its ordered list of
//! alternative productions. The [engine](super::engine) interprets the table; nothing in this
//! module knows how matching works.
//!
//! # Symbols
//!
//! - `Literal("(")` matches a token by its exact text
//! - `Kind(TokenKind::Identifier)` matches a token by its kind
//! - `Rule(nt)` expands a non-terminal through its alternatives
//! - `Sequence([...])` matches items in order; labeled items become fields of the AST node
//! - `Repeat(ZeroOrMore | OneOrMore, symbol)` matches a symbol greedily
//!
//! Alternatives are tried in declaration order and the first success wins, so declare the
//! more specific alternative first when two share a prefix.
//!
//! Tables are assembled with [`GrammarBuilder`], which validates them once at build time.

use crate::token::TokenKind;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// A named grammar symbol expanded by one or more alternative productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NonTerminal(pub &'static str);

impl NonTerminal {
    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Repetition quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    ZeroOrMore,
    OneOrMore,
}

impl Repeat {
    pub fn marker(self) -> char {
        match self {
            Repeat::ZeroOrMore => '*',
            Repeat::OneOrMore => '+',
        }
    }
}

/// A grammar symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Literal(&'static str),
    Kind(TokenKind),
    Rule(NonTerminal),
    Sequence(Vec<Item>),
    Repeat(Repeat, Box<Symbol>),
}

impl Symbol {
    pub fn literal(text: &'static str) -> Self {
        Symbol::Literal(text)
    }

    pub fn kind(kind: TokenKind) -> Self {
        Symbol::Kind(kind)
    }

    pub fn rule(rule: NonTerminal) -> Self {
        Symbol::Rule(rule)
    }

    pub fn seq<I: IntoIterator<Item = Item>>(items: I) -> Self {
        Symbol::Sequence(items.into_iter().collect())
    }

    /// Zero or more repetitions.
    pub fn many(symbol: impl Into<Symbol>) -> Self {
        Symbol::Repeat(Repeat::ZeroOrMore, Box::new(symbol.into()))
    }

    /// One or more repetitions.
    pub fn some(symbol: impl Into<Symbol>) -> Self {
        Symbol::Repeat(Repeat::OneOrMore, Box::new(symbol.into()))
    }

    /// Non-terminals referenced anywhere inside this symbol.
    fn collect_rules(&self, out: &mut Vec<NonTerminal>) {
        match self {
            Symbol::Literal(_) | Symbol::Kind(_) => {}
            Symbol::Rule(rule) => out.push(*rule),
            Symbol::Sequence(items) => {
                for item in items {
                    item.symbol.collect_rules(out);
                }
            }
            Symbol::Repeat(_, inner) => inner.collect_rules(out),
        }
    }
}

impl From<NonTerminal> for Symbol {
    fn from(rule: NonTerminal) -> Self {
        Symbol::Rule(rule)
    }
}

impl From<TokenKind> for Symbol {
    fn from(kind: TokenKind) -> Self {
        Symbol::Kind(kind)
    }
}

impl From<&'static str> for Symbol {
    fn from(text: &'static str) -> Self {
        Symbol::Literal(text)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Literal(text) => write!(f, "{:?}", text),
            Symbol::Kind(kind) => write!(f, "{}", kind),
            Symbol::Rule(rule) => write!(f, "{}", rule),
            Symbol::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" "))
            }
            Symbol::Repeat(mode, inner) => match inner.as_ref() {
                Symbol::Sequence(_) => write!(f, "({}){}", inner, mode.marker()),
                _ => write!(f, "{}{}", inner, mode.marker()),
            },
        }
    }
}

/// One element of a sequence: a symbol and the optional label its result is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub label: Option<&'static str>,
    pub symbol: Symbol,
}

impl Item {
    /// A labeled item; its result becomes a field of the enclosing node.
    pub fn field(label: &'static str, symbol: impl Into<Symbol>) -> Self {
        Item {
            label: Some(label),
            symbol: symbol.into(),
        }
    }

    /// An unlabeled item; it must match but its result is discarded.
    pub fn skip(symbol: impl Into<Symbol>) -> Self {
        Item {
            label: None,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "{}:{}", label, self.symbol),
            None => write!(f, "{}", self.symbol),
        }
    }
}

/// Definitional errors found while building a grammar table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(NonTerminal),

    #[error("rule `{0}` has no alternatives")]
    EmptyRule(NonTerminal),

    #[error("rule `{rule}` references undefined rule `{missing}`")]
    UndefinedNonTerminal {
        rule: NonTerminal,
        missing: NonTerminal,
    },

    #[error("root rule `{0}` is not defined")]
    UndefinedRoot(NonTerminal),

    #[error("rule `{rule}` uses label `{label}` twice in one sequence")]
    DuplicateLabel {
        rule: NonTerminal,
        label: &'static str,
    },

    #[error("rule `{0}` contains an empty sequence")]
    EmptySequence(NonTerminal),
}

/// An immutable, validated grammar table.
#[derive(Debug, Clone)]
pub struct Grammar {
    root: NonTerminal,
    rules: HashMap<NonTerminal, Vec<Symbol>>,
}

impl Grammar {
    pub fn builder(root: NonTerminal) -> GrammarBuilder {
        GrammarBuilder::new(root)
    }

    /// The non-terminal a whole parse starts from.
    pub fn root(&self) -> NonTerminal {
        self.root
    }

    /// The ordered alternatives of a rule.
    pub fn alternatives(&self, rule: NonTerminal) -> Option<&[Symbol]> {
        self.rules.get(&rule).map(Vec::as_slice)
    }

    /// All defined rules, sorted by name.
    pub fn rules(&self) -> Vec<NonTerminal> {
        let mut rules: Vec<_> = self.rules.keys().copied().collect();
        rules.sort();
        rules
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in self.rules() {
            let alternatives: Vec<String> = self.rules[&rule].iter().map(ToString::to_string).collect();
            writeln!(f, "{} := {}", rule, alternatives.join(" | "))?;
        }
        Ok(())
    }
}

/// Collects rules and validates them into a [`Grammar`].
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    root: NonTerminal,
    rules: Vec<(NonTerminal, Vec<Symbol>)>,
}

impl GrammarBuilder {
    pub fn new(root: NonTerminal) -> Self {
        GrammarBuilder {
            root,
            rules: Vec::new(),
        }
    }

    /// Define a rule by its ordered alternatives.
    pub fn rule<I, S>(mut self, rule: NonTerminal, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.rules
            .push((rule, alternatives.into_iter().map(Into::into).collect()));
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut rules = HashMap::with_capacity(self.rules.len());
        for (rule, alternatives) in self.rules {
            if alternatives.is_empty() {
                return Err(GrammarError::EmptyRule(rule));
            }
            for alternative in &alternatives {
                check_sequences(rule, alternative)?;
            }
            if rules.insert(rule, alternatives).is_some() {
                return Err(GrammarError::DuplicateRule(rule));
            }
        }

        if !rules.contains_key(&self.root) {
            return Err(GrammarError::UndefinedRoot(self.root));
        }

        let mut defined: Vec<_> = rules.keys().copied().collect();
        defined.sort();
        for rule in defined {
            let mut referenced = Vec::new();
            for alternative in &rules[&rule] {
                alternative.collect_rules(&mut referenced);
            }
            if let Some(missing) = referenced.into_iter().find(|r| !rules.contains_key(r)) {
                return Err(GrammarError::UndefinedNonTerminal { rule, missing });
            }
        }

        Ok(Grammar {
            root: self.root,
            rules,
        })
    }
}

/// Labels must be unique within each sequence; nested sequences are checked on their own.
fn check_sequences(rule: NonTerminal, symbol: &Symbol) -> Result<(), GrammarError> {
    match symbol {
        Symbol::Literal(_) | Symbol::Kind(_) | Symbol::Rule(_) => Ok(()),
        Symbol::Repeat(_, inner) => check_sequences(rule, inner),
        Symbol::Sequence(items) => {
            if items.is_empty() {
                return Err(GrammarError::EmptySequence(rule));
            }
            let mut seen = HashSet::new();
            for item in items {
                if let Some(label) = item.label {
                    if !seen.insert(label) {
                        return Err(GrammarError::DuplicateLabel { rule, label });
                    }
                }
                check_sequences(rule, &item.symbol)?;
            }
            Ok(())
        }
    }
}
