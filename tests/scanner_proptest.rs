//! Property-based tests for the scanner and for the parser's insensitivity to layout
//!
//! The scanner must account for every character of every non-empty line, and the parser must
//! produce the same tree no matter how whitespace and comments are laid out between tokens.

use parens::parsing::{Ast, Node};
use parens::{parse_source, scan, SourceFile, TokenKind};
use proptest::prelude::*;

/// Lines mixing every token class, including characters no pattern claims.
fn source_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9#;()\\[\\]:+*/<>=?!_ \\t\\->λ.,'\"]{0,24}", 0..6)
        .prop_map(|lines| lines.join("\n"))
}

#[derive(Debug, Clone)]
enum Expr {
    Atom(String),
    Call(Vec<Expr>),
}

impl Expr {
    fn tokens(&self, out: &mut Vec<String>) {
        match self {
            Expr::Atom(text) => out.push(text.clone()),
            Expr::Call(items) => {
                out.push("(".to_string());
                for item in items {
                    item.tokens(out);
                }
                out.push(")".to_string());
            }
        }
    }
}

fn expr() -> impl Strategy<Value = Expr> {
    let atom = prop_oneof![
        "[a-z][a-z0-9]{0,3}".prop_map(Expr::Atom),
        (-999i32..1000).prop_map(|n| Expr::Atom(n.to_string())),
        prop_oneof![Just("#t"), Just("#f")].prop_map(|b| Expr::Atom(b.to_string())),
    ];
    atom.prop_recursive(4, 24, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(Expr::Call)
    })
}

fn layout() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(" "),
        Just("   "),
        Just("\t"),
        Just("\n"),
        Just("\n\n  "),
        Just(" ; note\n"),
        Just(";(\n"),
    ]
}

/// A structural rendering of the tree without positions.
fn shape(ast: &Ast<'_>, out: &mut String) {
    match ast {
        Ast::Token(token) => out.push_str(&format!("{}:{} ", token.kind, token.text)),
        Ast::Node(node) => shape_node(node, out),
        Ast::Fields(fields) => {
            out.push('{');
            for (label, value) in fields.iter() {
                out.push_str(label);
                out.push('=');
                shape(value, out);
            }
            out.push('}');
        }
        Ast::List(items) => {
            out.push('[');
            for item in items {
                shape(item, out);
            }
            out.push(']');
        }
    }
}

fn shape_node(node: &Node<'_>, out: &mut String) {
    out.push_str(node.rule.name());
    out.push('(');
    shape(&node.body, out);
    out.push(')');
}

proptest! {
    #[test]
    fn scanner_reconstructs_every_line(text in source_text()) {
        let file = SourceFile::new("p.rkt", &text);
        let tokens = scan(&file);

        for (idx, line) in file.lines().iter().enumerate() {
            let rebuilt: String = tokens
                .iter()
                .filter(|t| t.line == idx + 1)
                .map(|t| t.text)
                .collect();
            prop_assert_eq!(&rebuilt, line);
        }
        prop_assert!(tokens.iter().all(|t| !t.text.is_empty()));
        prop_assert!(tokens.iter().all(|t| t.kind != TokenKind::EndOfInput));
    }

    #[test]
    fn token_positions_strictly_increase(text in source_text()) {
        let file = SourceFile::new("p.rkt", &text);
        let tokens = scan(&file);

        for pair in tokens.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!((a.line, a.column) < (b.line, b.column));
            if a.line == b.line {
                prop_assert_eq!(b.column, a.column + a.text.chars().count());
            } else {
                prop_assert_eq!(b.column, 1);
            }
        }
        if let Some(first) = tokens.first() {
            prop_assert_eq!(first.column, 1);
        }
    }

    #[test]
    fn layout_does_not_change_the_tree(
        program in prop::collection::vec(expr(), 1..4),
        gaps in prop::collection::vec(layout(), 128),
    ) {
        let mut tokens = Vec::new();
        for statement in &program {
            statement.tokens(&mut tokens);
        }

        let plain = tokens.join(" ");
        let mut spaced = String::from(gaps[0]);
        for (idx, token) in tokens.iter().enumerate() {
            spaced.push_str(token);
            spaced.push_str(gaps[(idx + 1) % gaps.len()]);
        }

        let plain_file = SourceFile::new("plain.rkt", &plain);
        let spaced_file = SourceFile::new("spaced.rkt", &spaced);
        let plain_tree = parse_source(&plain_file).unwrap();
        let spaced_tree = parse_source(&spaced_file).unwrap();

        let (mut expected, mut actual) = (String::new(), String::new());
        shape_node(&plain_tree, &mut expected);
        shape_node(&spaced_tree, &mut actual);
        prop_assert_eq!(expected, actual);
        prop_assert_eq!(
            plain_tree.field("statements").and_then(Ast::as_list).map(<[Ast]>::len),
            Some(program.len())
        );
    }
}
