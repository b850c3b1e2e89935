//! Syntax error reporting
//!
//! Renders a [`ParseError`] the way it is shown to users:
//!
//! ```text
//! In file "add.rkt" - 1:18
//! >>  (define (add x y)
//!                      ^
//! SyntaxError: Expected "("; Found ""
//! ```
//!
//! The offending line is reproduced verbatim and the caret is indented by `column - 1`
//! spaces under it.

use crate::parsing::ParseError;
use std::fmt::Write;
use std::process;

const LINE_PREFIX: &str = ">>  ";
const CARET_PREFIX: &str = "    ";

/// Render the diagnostic for a parse error.
pub fn render(error: &ParseError<'_>) -> String {
    let file = error.file();
    let (line, column) = error.position();

    let mut out = String::new();
    let _ = writeln!(out, "In file \"{}\" - {}:{}", file.name(), line, column);
    let _ = writeln!(out, "{}{}", LINE_PREFIX, file.line(line).unwrap_or(""));
    let _ = writeln!(
        out,
        "{}{}^",
        CARET_PREFIX,
        " ".repeat(column.saturating_sub(1))
    );
    match error {
        ParseError::Mismatch(err) => {
            let _ = writeln!(
                out,
                "SyntaxError: Expected {}; Found \"{}\"",
                err.expected, err.found
            );
        }
        ParseError::TooDeep { limit, .. } => {
            let _ = writeln!(
                out,
                "SyntaxError: Nesting too deep; at most {} rule applications are allowed",
                limit
            );
        }
    }
    out
}

/// Print the diagnostic to stderr and terminate with a failure status.
pub fn report_and_exit(error: &ParseError<'_>) -> ! {
    eprint!("{}", render(error));
    process::exit(1)
}
