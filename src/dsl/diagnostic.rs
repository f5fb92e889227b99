//! Caret diagnostics — renders a [`ParseError`] against the source it came from.
//!
//! ```text
//! error: expected ')', found end of line
//!  --> 1:6
//!   |
//! 1 | sin(x
//!   |      ^
//! ```

use std::fmt::Write;

use super::error::ParseError;

/// Render `error` with the offending source line and carets under its span.
///
/// Spans covering several lines are underlined to the end of their first
/// line. Empty spans (such as end of line) get a single caret.
pub fn render(source: &str, error: &ParseError) -> String {
    let line_no = error.start.line;
    let text = source.lines().nth(line_no.saturating_sub(1)).unwrap_or("");
    let line_len = text.chars().count();

    let first = error.start.column.saturating_sub(1);
    let last = if error.end.line == error.start.line {
        error.end.column.saturating_sub(1)
    } else {
        line_len
    };
    let width = last.saturating_sub(first).max(1);

    let gutter = line_no.to_string().len();
    let pad = " ".repeat(gutter);

    let mut out = String::new();
    let _ = writeln!(out, "error: {}", error.message);
    let _ = writeln!(out, "{pad}--> {}", error.start);
    let _ = writeln!(out, "{pad} |");
    let _ = writeln!(out, "{line_no} | {}", text.replace('\t', " "));
    let _ = writeln!(out, "{pad} | {}{}", " ".repeat(first), "^".repeat(width));
    out
}
