//! Parse pipeline integration tests — source text → Compiler → Block → diagnostics.
//!
//! These drive the public API the way a patch editor would: one node's
//! expression text in, a tree or a caret report out.

use assert_approx_eq::assert_approx_eq;

use voltage::config::ParserConfig;
use voltage::dsl::diagnostic::render;
use voltage::dsl::lexer::Lexer;
use voltage::dsl::parser::Parser;
use voltage::dsl::{
    AssignOp, Block, Compiler, ControlKind, Expression, ExpressionKind, MathOp, ParseErrorKind,
    SourcePos, TokenList,
};

fn parse_one(src: &str) -> Expression {
    let mut block = Compiler::parse(src).expect("parse failed");
    assert_eq!(block.expressions.len(), 1);
    block.expressions.remove(0)
}

fn number(e: &Expression) -> (f64, &str) {
    match &e.kind {
        ExpressionKind::Number { value, form } => (*value, form.name.as_str()),
        other => panic!("expected number, got {other:?}"),
    }
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn typical_node_body() {
    let src = "\
# simple low-pass voice
freq = \"pitch\":value * 2khz
gain = [db] -6
out = filter(osc(freq), 0.7q) * gain
";
    let block = Compiler::parse(src).unwrap();
    assert_eq!(block.expressions.len(), 3);

    let ExpressionKind::Assign { target, op, value } = &block.expressions[0].kind else {
        panic!("expected assignment");
    };
    assert_eq!(*op, AssignOp::Assign);
    assert!(matches!(&target.kind, ExpressionKind::Variable { name } if name == "freq"));
    let ExpressionKind::Math { left, op, right } = &value.kind else {
        panic!("expected product");
    };
    assert_eq!(*op, MathOp::Multiply);
    assert_eq!(
        left.kind,
        ExpressionKind::Control {
            name: "pitch".into(),
            kind: ControlKind::Value,
            property: "value".into(),
        }
    );
    let (v, form) = number(right);
    assert_approx_eq!(v, 2000.0);
    assert_eq!(form, "freq");

    let ExpressionKind::Assign { value, .. } = &block.expressions[2].kind else {
        panic!("expected assignment");
    };
    let ExpressionKind::Math { left, .. } = &value.kind else {
        panic!("expected product");
    };
    let ExpressionKind::Call { name, arguments } = &left.kind else {
        panic!("expected call");
    };
    assert_eq!(name, "filter");
    assert_eq!(arguments.len(), 2);
    assert!(matches!(&arguments[0].kind, ExpressionKind::Call { name, .. } if name == "osc"));
    assert_eq!(number(&arguments[1]), (0.7, "q"));
}

#[test]
fn suffixed_and_note_literals() {
    assert_eq!(number(&parse_one("440hz")), (440.0, "freq"));
    assert_eq!(number(&parse_one("1.5k")), (1500.0, "lin"));
    assert_eq!(number(&parse_one("3khz")), (3000.0, "freq"));
    assert_eq!(number(&parse_one("5")), (5.0, "lin"));
    assert_eq!(parse_one("a4").kind, ExpressionKind::Note { midi: 57 });
}

#[test]
fn block_serializes_to_json() {
    let block = Compiler::parse("x = 1hz").unwrap();
    let json = serde_json::to_value(&block).unwrap();
    let assign = &json["expressions"][0]["kind"]["Assign"];
    assert_eq!(assign["op"], "Assign");
    assert_eq!(assign["value"]["kind"]["Number"]["form"]["name"], "freq");
    assert_eq!(json["expressions"][0]["start"]["column"], 1);
}

#[test]
fn hash_after_identifier_starts_comment() {
    let assign = parse_one("y = x#2 comment");
    let ExpressionKind::Assign { value, .. } = &assign.kind else {
        panic!("expected assignment, got {assign:?}");
    };
    assert_eq!(
        value.kind,
        ExpressionKind::Variable { name: "x".into() }
    );
    assert_eq!(assign.end, SourcePos::new(1, 6));

    assert_eq!(
        parse_one("c#4").kind,
        ExpressionKind::Note { midi: 1 + 4 * 12 }
    );
}

#[test]
fn empty_block_round_trips_through_default() {
    assert_eq!(Compiler::parse("# nothing here\n").unwrap(), Block::default());
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn spans_stay_ordered_across_lines() {
    let block = Compiler::parse("a = 1\n  b = (a + 2) * 3\n").unwrap();
    for expr in &block.expressions {
        expr.walk(&mut |node| assert!(node.start <= node.end, "{node:?}"));
    }
    let second = &block.expressions[1];
    assert_eq!(second.start, SourcePos::new(2, 3));
    assert_eq!(second.end, SourcePos::new(2, 18));
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn increment_of_literal_reports_dedicated_error() {
    let src = "x = 3++";
    let err = Compiler::parse(src).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NotAssignable);
    let report = render(src, &err);
    assert!(report.contains("1 | x = 3++"));
    assert!(report.ends_with("  |     ^\n"));
}

#[test]
fn unknown_control_report_names_it() {
    let src = "level = :bogus";
    let err = Compiler::parse(src).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownControl);
    assert!(err.message.contains("bogus"));
    assert!(render(src, &err).ends_with("  |          ^^^^^\n"));
}

#[test]
fn lexer_errors_share_the_error_type() {
    let err = Compiler::parse("x = \"open").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Lex);
    assert_eq!(err.start, SourcePos::new(1, 5));
}

#[test]
fn error_display_includes_position() {
    let err = Compiler::parse("x = )").unwrap_err();
    assert_eq!(err.to_string(), "1:5: unexpected ')'");
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn configured_depth_limit_applies() {
    let src = format!("{}1", "-".repeat(100));
    assert!(Compiler::parse(&src).is_ok());

    let err = Compiler::parse_with(&src, &ParserConfig { max_depth: 50 }).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
}

#[test]
fn adversarial_nesting_fails_cleanly() {
    let src = "(".repeat(100_000);
    let err = Compiler::parse(&src).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
}

#[test]
fn parser_accepts_external_token_streams() {
    let tokens = Lexer::new("y -= 2\n").tokenize().unwrap();
    let mut stream = TokenList::new(tokens);
    let block = Parser::new(&mut stream).parse().unwrap();
    assert!(matches!(
        block.expressions[0].kind,
        ExpressionKind::Assign {
            op: AssignOp::Subtract,
            ..
        }
    ));
}
