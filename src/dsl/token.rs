//! Token types and the token stream consumed by the parser.

use std::fmt;

use serde::Serialize;

/// A position in source text. Lines and columns are 1-based; columns count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl SourcePos {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token produced by the lexer. `end` is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: SourcePos,
    pub end: SourcePos,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: SourcePos, end: SourcePos) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structure
    Colon,
    OpenSquare,
    CloseSquare,
    OpenBracket,
    CloseBracket,
    Comma,
    Dot,

    // Literals
    Number,
    Note,
    DoubleString,
    Identifier,
    Comment,

    // Operators
    Plus,
    Minus,
    Not,
    Increment,
    Decrement,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    EqualTo,
    NotEqualTo,
    Lt,
    Gt,
    Lte,
    Gte,
    Times,
    Divide,
    Modulo,
    Power,
    Assign,
    PlusAssign,
    MinusAssign,
    TimesAssign,
    DivideAssign,
    ModuloAssign,
    PowerAssign,
    Cast, // ->

    // Terminators
    EndOfLine,
    EndOfFile,
}

impl TokenKind {
    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Colon => "':'",
            TokenKind::OpenSquare => "'['",
            TokenKind::CloseSquare => "']'",
            TokenKind::OpenBracket => "'('",
            TokenKind::CloseBracket => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Number => "number",
            TokenKind::Note => "note",
            TokenKind::DoubleString => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Comment => "comment",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Not => "'!'",
            TokenKind::Increment => "'++'",
            TokenKind::Decrement => "'--'",
            TokenKind::BitwiseAnd => "'&'",
            TokenKind::BitwiseOr => "'|'",
            TokenKind::BitwiseXor => "'^^'",
            TokenKind::LogicalAnd => "'&&'",
            TokenKind::LogicalOr => "'||'",
            TokenKind::EqualTo => "'=='",
            TokenKind::NotEqualTo => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Lte => "'<='",
            TokenKind::Gte => "'>='",
            TokenKind::Times => "'*'",
            TokenKind::Divide => "'/'",
            TokenKind::Modulo => "'%'",
            TokenKind::Power => "'^'",
            TokenKind::Assign => "'='",
            TokenKind::PlusAssign => "'+='",
            TokenKind::MinusAssign => "'-='",
            TokenKind::TimesAssign => "'*='",
            TokenKind::DivideAssign => "'/='",
            TokenKind::ModuloAssign => "'%='",
            TokenKind::PowerAssign => "'^='",
            TokenKind::Cast => "'->'",
            TokenKind::EndOfLine => "end of line",
            TokenKind::EndOfFile => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Ordered source of tokens with one token of look-ahead.
///
/// Once the stream is exhausted, `peek` and `next` keep yielding the final
/// `EndOfFile` token.
pub trait TokenStream {
    fn peek(&mut self) -> &Token;
    fn next(&mut self) -> Token;
}

/// A [`TokenStream`] over a vector of tokens.
#[derive(Debug, Clone)]
pub struct TokenList {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenList {
    /// Wrap a token vector, appending an `EndOfFile` token if it lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfFile) {
            let at = tokens.last().map_or(SourcePos::new(1, 1), |t| t.end);
            tokens.push(Token::new(TokenKind::EndOfFile, "", at, at));
        }
        Self { tokens, pos: 0 }
    }
}

impl TokenStream for TokenList {
    fn peek(&mut self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Token {
        let t = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }
}
