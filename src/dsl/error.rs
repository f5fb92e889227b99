//! Error types for the expression front end.

use super::token::{SourcePos, Token, TokenKind};

/// What went wrong, for callers that need more than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The lexer could not form a token.
    Lex,
    /// A token that cannot start or continue an expression here.
    UnexpectedToken,
    /// A specific token kind was required.
    ExpectedToken,
    /// A control expression named a kind outside the control vocabulary.
    UnknownControl,
    /// A note literal with a letter outside the chromatic scale, or an octave too large.
    InvalidNote,
    /// Assignment or increment/decrement applied to something that can't be assigned.
    NotAssignable,
    /// Expression nesting exceeded the configured limit.
    NestingTooDeep,
}

/// An error raised while turning source text into an AST. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{start}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub start: SourcePos,
    pub end: SourcePos,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        start: SourcePos,
        end: SourcePos,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            start,
            end,
        }
    }

    pub fn lex(message: impl Into<String>, start: SourcePos, end: SourcePos) -> Self {
        Self::new(ParseErrorKind::Lex, message, start, end)
    }

    pub fn unexpected(token: &Token) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            format!("unexpected {}", describe_token(token)),
            token.start,
            token.end,
        )
    }

    pub fn expected(token: &Token, expected: TokenKind) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            format!("expected {expected}, found {}", describe_token(token)),
            token.start,
            token.end,
        )
    }

    pub fn not_assignable(start: SourcePos, end: SourcePos) -> Self {
        Self::new(
            ParseErrorKind::NotAssignable,
            "expected something that can be assigned to, like a variable",
            start,
            end,
        )
    }
}

fn describe_token(token: &Token) -> String {
    match token.kind {
        TokenKind::Number | TokenKind::Note | TokenKind::Identifier => {
            format!("{} '{}'", token.kind, token.text)
        }
        TokenKind::DoubleString => format!("string \"{}\"", token.text),
        kind => kind.to_string(),
    }
}
