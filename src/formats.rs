//! Output formats for token streams and parsed trees
//!
//! - `tokens`: one scanned token per line, ignorable tokens included.
//! - `tree`: an indented outline of the AST, one node per line.
//! - `json` / `yaml`: serde serialization of the AST.

use crate::parsing::{Ast, Node};
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;
use thiserror::Error;

const INDENT: &str = "  ";

/// Error that can occur during formatting
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format '{0}' not found (expected one of: tokens, tree, json, yaml)")]
    FormatNotFound(String),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Tokens,
    Tree,
    Json,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Tokens, Format::Tree, Format::Json, Format::Yaml];

    pub fn name(self) -> &'static str {
        match self {
            Format::Tokens => "tokens",
            Format::Tree => "tree",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Whether this format needs a parsed tree rather than the raw token stream.
    pub fn needs_ast(self) -> bool {
        !matches!(self, Format::Tokens)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| FormatError::FormatNotFound(s.to_string()))
    }
}

/// One token per line as `line:column KIND "text"`.
pub fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{}", token);
    }
    out
}

/// Serialize a parsed tree in one of the AST formats.
///
/// `Format::Tokens` renders the tokens the tree was built from.
pub fn render_node(node: &Node<'_>, format: Format) -> Result<String, FormatError> {
    match format {
        Format::Tokens => {
            let tokens: Vec<Token<'_>> = node.body.tokens().into_iter().copied().collect();
            Ok(render_tokens(&tokens))
        }
        Format::Tree => Ok(to_tree_str(node)),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(node)?;
            json.push('\n');
            Ok(json)
        }
        Format::Yaml => Ok(serde_yaml::to_string(node)?),
    }
}

/// Indented outline of a tree.
///
/// Rules print their name, tokens print as `KIND "text" @line:column`, lists print their
/// length as `[n]`, and field values are prefixed with their label.
pub fn to_tree_str(node: &Node<'_>) -> String {
    let mut out = String::new();
    write_node(&mut out, node, None, 0);
    out
}

fn write_node(out: &mut String, node: &Node<'_>, label: Option<&str>, depth: usize) {
    write_head(out, label, depth);
    let _ = writeln!(out, "{}", node.rule);
    match &node.body {
        Ast::Fields(fields) => {
            for (name, value) in fields.iter() {
                write_ast(out, value, Some(name), depth + 1);
            }
        }
        body => write_ast(out, body, None, depth + 1),
    }
}

fn write_ast(out: &mut String, ast: &Ast<'_>, label: Option<&str>, depth: usize) {
    match ast {
        Ast::Token(token) => {
            write_head(out, label, depth);
            let _ = writeln!(
                out,
                "{} {:?} @{}:{}",
                token.kind, token.text, token.line, token.column
            );
        }
        Ast::Node(node) => write_node(out, node, label, depth),
        Ast::Fields(fields) => {
            write_head(out, label, depth);
            out.push_str("-\n");
            for (name, value) in fields.iter() {
                write_ast(out, value, Some(name), depth + 1);
            }
        }
        Ast::List(items) => {
            write_head(out, label, depth);
            let _ = writeln!(out, "[{}]", items.len());
            for item in items {
                write_ast(out, item, None, depth + 1);
            }
        }
    }
}

fn write_head(out: &mut String, label: Option<&str>, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    if let Some(label) = label {
        out.push_str(label);
        out.push_str(": ");
    }
}
