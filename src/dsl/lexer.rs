//! Lexer for patch expressions.
//!
//! Converts source text into a stream of [`Token`]s. Every line ends with an
//! `EndOfLine` token and the stream ends with `EndOfLine, EndOfFile`.

use super::error::ParseError;
use super::note::{is_note_letter, is_note_literal};
use super::token::{SourcePos, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                if tokens
                    .last()
                    .map_or(true, |t: &Token| t.kind != TokenKind::EndOfLine)
                {
                    let here = self.here();
                    tokens.push(Token::new(TokenKind::EndOfLine, "", here, here));
                }
                let here = self.here();
                tokens.push(Token::new(TokenKind::EndOfFile, "", here, here));
                break;
            }

            let ch = self.peek();

            if ch == '\n' {
                let start = self.here();
                self.advance();
                tokens.push(Token::new(
                    TokenKind::EndOfLine,
                    "\n",
                    start,
                    SourcePos::new(start.line, start.column + 1),
                ));
                self.line += 1;
                self.col = 1;
                continue;
            }

            let token = match ch {
                ':' => self.single_char(TokenKind::Colon),
                '[' => self.single_char(TokenKind::OpenSquare),
                ']' => self.single_char(TokenKind::CloseSquare),
                '(' => self.single_char(TokenKind::OpenBracket),
                ')' => self.single_char(TokenKind::CloseBracket),
                ',' => self.single_char(TokenKind::Comma),
                '#' => self.lex_line_comment(),
                '"' => self.lex_string()?,
                '/' if self.peek_next() == Some('*') => self.lex_block_comment()?,
                '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
                '.' => self.single_char(TokenKind::Dot),
                '0'..='9' => self.lex_number(),
                'a'..='z' | 'A'..='Z' | '_' => self.lex_word(),
                _ => self.lex_operator()?,
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch != '\n' {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn here(&self) -> SourcePos {
        SourcePos::new(self.line, self.col)
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            let ch = self.peek();
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let start = self.here();
        let ch = self.advance();
        Token::new(kind, ch.to_string(), start, self.here())
    }

    fn lex_line_comment(&mut self) -> Token {
        let start = self.here();
        let mut s = String::new();
        while !self.is_at_end() && self.peek() != '\n' {
            s.push(self.advance());
        }
        Token::new(TokenKind::Comment, s, start, self.here())
    }

    /// `/* ... */`, possibly spanning lines.
    fn lex_block_comment(&mut self) -> Result<Token, ParseError> {
        let start = self.here();
        let mut s = String::new();
        s.push(self.advance());
        s.push(self.advance());
        loop {
            if self.is_at_end() {
                return Err(ParseError::lex("unclosed comment", start, self.here()));
            }
            if self.peek() == '*' && self.peek_next() == Some('/') {
                s.push(self.advance());
                s.push(self.advance());
                break;
            }
            let ch = self.advance();
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            }
            s.push(ch);
        }
        Ok(Token::new(TokenKind::Comment, s, start, self.here()))
    }

    fn lex_string(&mut self) -> Result<Token, ParseError> {
        let start = self.here();
        self.advance(); // consume opening '"'
        let mut s = String::new();
        while !self.is_at_end() && self.peek() != '"' && self.peek() != '\n' {
            s.push(self.advance());
        }
        if self.is_at_end() || self.peek() == '\n' {
            return Err(ParseError::lex(
                "unclosed string literal",
                start,
                self.here(),
            ));
        }
        self.advance(); // consume closing '"'
        Ok(Token::new(TokenKind::DoubleString, s, start, self.here()))
    }

    fn lex_number(&mut self) -> Token {
        let start = self.here();
        let mut s = String::new();

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance());
        }

        if !self.is_at_end()
            && self.peek() == '.'
            && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            s.push(self.advance()); // consume '.'
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance());
            }
        }

        Token::new(TokenKind::Number, s, start, self.here())
    }

    /// Identifiers and note literals. A `#` is only part of a word directly
    /// after a single note letter, as in `c#4`; anywhere else it starts a comment.
    fn lex_word(&mut self) -> Token {
        let start = self.here();
        let mut s = String::new();

        while !self.is_at_end() {
            let ch = self.peek();
            let sharp = ch == '#'
                && is_note_letter(&s)
                && self.peek_next().is_some_and(|c| c.is_ascii_digit());
            if ch.is_ascii_alphanumeric() || ch == '_' || sharp {
                s.push(self.advance());
            } else {
                break;
            }
        }

        let kind = if is_note_literal(&s) {
            TokenKind::Note
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, s, start, self.here())
    }

    fn lex_operator(&mut self) -> Result<Token, ParseError> {
        let start = self.here();
        let first = self.peek();
        let second = self.peek_next();

        let (kind, len) = match (first, second) {
            ('+', Some('+')) => (TokenKind::Increment, 2),
            ('+', Some('=')) => (TokenKind::PlusAssign, 2),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', Some('-')) => (TokenKind::Decrement, 2),
            ('-', Some('=')) => (TokenKind::MinusAssign, 2),
            ('-', Some('>')) => (TokenKind::Cast, 2),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', Some('=')) => (TokenKind::TimesAssign, 2),
            ('*', _) => (TokenKind::Times, 1),
            ('/', Some('=')) => (TokenKind::DivideAssign, 2),
            ('/', _) => (TokenKind::Divide, 1),
            ('%', Some('=')) => (TokenKind::ModuloAssign, 2),
            ('%', _) => (TokenKind::Modulo, 1),
            ('^', Some('=')) => (TokenKind::PowerAssign, 2),
            ('^', Some('^')) => (TokenKind::BitwiseXor, 2),
            ('^', _) => (TokenKind::Power, 1),
            ('&', Some('&')) => (TokenKind::LogicalAnd, 2),
            ('&', _) => (TokenKind::BitwiseAnd, 1),
            ('|', Some('|')) => (TokenKind::LogicalOr, 2),
            ('|', _) => (TokenKind::BitwiseOr, 1),
            ('!', Some('=')) => (TokenKind::NotEqualTo, 2),
            ('!', _) => (TokenKind::Not, 1),
            ('=', Some('=')) => (TokenKind::EqualTo, 2),
            ('=', _) => (TokenKind::Assign, 1),
            ('<', Some('=')) => (TokenKind::Lte, 2),
            ('<', _) => (TokenKind::Lt, 1),
            ('>', Some('=')) => (TokenKind::Gte, 2),
            ('>', _) => (TokenKind::Gt, 1),
            _ => {
                self.advance();
                return Err(ParseError::lex(
                    format!("unexpected character: '{first}'"),
                    start,
                    self.here(),
                ));
            }
        };

        let mut s = String::new();
        for _ in 0..len {
            s.push(self.advance());
        }
        Ok(Token::new(kind, s, start, self.here()))
    }
}
