//! AST values built by the grammar engine
//!
//! The tree mirrors the grammar rather than a hand-designed node set: every applied rule
//! becomes a [`Node`] wrapping whatever its winning alternative produced. A sequence
//! produces [`Fields`], its labeled results in declaration order; a repetition produces a
//! list; a terminal produces the matched token.

use super::grammar::NonTerminal;
use crate::token::Token;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A sub-result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Ast<'src> {
    Token(Token<'src>),
    Node(Box<Node<'src>>),
    Fields(Fields<'src>),
    List(Vec<Ast<'src>>),
}

impl<'src> Ast<'src> {
    pub fn as_token(&self) -> Option<&Token<'src>> {
        match self {
            Ast::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node<'src>> {
        match self {
            Ast::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&Fields<'src>> {
        match self {
            Ast::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Ast<'src>]> {
        match self {
            Ast::List(items) => Some(items),
            _ => None,
        }
    }

    /// The token at the bottom of a chain of single-child nodes, e.g. the identifier in
    /// `expression -> IDENTIFIER`.
    pub fn leaf_token(&self) -> Option<&Token<'src>> {
        match self {
            Ast::Token(token) => Some(token),
            Ast::Node(node) => node.body.leaf_token(),
            _ => None,
        }
    }

    /// Every token in the tree, in source order.
    pub fn tokens(&self) -> Vec<&Token<'src>> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token<'src>>) {
        match self {
            Ast::Token(token) => out.push(token),
            Ast::Node(node) => node.body.collect_tokens(out),
            Ast::Fields(fields) => {
                for (_, value) in fields.iter() {
                    value.collect_tokens(out);
                }
            }
            Ast::List(items) => {
                for item in items {
                    item.collect_tokens(out);
                }
            }
        }
    }
}

/// A rule application: the non-terminal and the result of its winning alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node<'src> {
    pub rule: NonTerminal,
    pub body: Ast<'src>,
}

impl<'src> Node<'src> {
    pub fn new(rule: NonTerminal, body: Ast<'src>) -> Self {
        Node { rule, body }
    }

    /// Look up a labeled field of this node's body.
    pub fn field(&self, label: &str) -> Option<&Ast<'src>> {
        self.body.as_fields().and_then(|fields| fields.get(label))
    }

    /// Walk down single-child wrapper nodes until reaching a node for `rule`.
    ///
    /// `statement -> definition -> func_def` unwraps to the `func_def` node.
    pub fn find(&self, rule: NonTerminal) -> Option<&Node<'src>> {
        if self.rule == rule {
            return Some(self);
        }
        self.body.as_node().and_then(|inner| inner.find(rule))
    }
}

/// Labeled results of one sequence, in declaration order.
///
/// Labels are unique: the grammar builder rejects sequences that reuse a label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields<'src> {
    entries: Vec<(&'static str, Ast<'src>)>,
}

impl<'src> Fields<'src> {
    pub fn new() -> Self {
        Fields {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, label: &'static str, value: Ast<'src>) {
        debug_assert!(self.get(label).is_none(), "duplicate field `{}`", label);
        self.entries.push((label, value));
    }

    pub fn get(&self, label: &str) -> Option<&Ast<'src>> {
        self.entries
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, value)| value)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Ast<'src>)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFile;
    use crate::token::TokenKind;

    const OUTER: NonTerminal = NonTerminal("outer");
    const INNER: NonTerminal = NonTerminal("inner");

    #[test]
    fn test_fields_keep_insertion_order() {
        let file = SourceFile::new("f.rkt", "a b");
        let a = Token::new(TokenKind::Identifier, "a", &file, 1, 1);
        let b = Token::new(TokenKind::Identifier, "b", &file, 1, 3);

        let mut fields = Fields::new();
        fields.insert("second", Ast::Token(b));
        fields.insert("first", Ast::Token(a));

        assert_eq!(fields.labels().collect::<Vec<_>>(), vec!["second", "first"]);
        assert_eq!(fields.get("first"), Some(&Ast::Token(a)));
        assert_eq!(fields.get("third"), None);
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_find_and_leaf_token() {
        let file = SourceFile::new("f.rkt", "x");
        let x = Token::new(TokenKind::Identifier, "x", &file, 1, 1);
        let node = Node::new(
            OUTER,
            Ast::Node(Box::new(Node::new(INNER, Ast::Token(x)))),
        );

        assert_eq!(node.find(OUTER).map(|n| n.rule), Some(OUTER));
        assert_eq!(node.find(INNER).map(|n| n.rule), Some(INNER));
        assert_eq!(node.find(NonTerminal("other")), None);
        assert_eq!(Ast::Node(Box::new(node)).leaf_token(), Some(&x));
    }
}
