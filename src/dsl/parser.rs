//! Parser for patch expressions.
//!
//! Consumes a [`TokenStream`] and produces a [`Block`] of top-level
//! expressions, one per line. Binary operators are handled by precedence
//! climbing: a prefix form is parsed first, then operators are folded in for
//! as long as they bind tighter than the current minimum.

use tracing::debug;

use super::ast::*;
use super::error::{ParseError, ParseErrorKind};
use super::note::{midi_number, split_note, NoteError};
use super::token::{SourcePos, Token, TokenKind, TokenStream};
use super::unit::{parse_suffix, DEFAULT_FORM};
use crate::config::ParserConfig;

/// Operator binding strength, loosest first.
///
/// `None` is for tokens that are not operators. `All` is the floor that
/// accepts every operator; it is the minimum for top-level expressions,
/// parenthesized sub-expressions and call arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    All,
    Assignment,
    Logical,
    Equality,
    Bitwise,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Casting,
    Unary,
}

impl Precedence {
    /// Operators at these levels group to the right: `a = b = c`, `2^3^4`, `-x++`.
    pub fn is_right_associative(self) -> bool {
        matches!(
            self,
            Precedence::Assignment | Precedence::Power | Precedence::Unary
        )
    }

    /// The precedence of `kind` when it appears after an operand.
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Cast => Precedence::Casting,
            TokenKind::Increment | TokenKind::Decrement => Precedence::Unary,
            TokenKind::BitwiseAnd | TokenKind::BitwiseOr | TokenKind::BitwiseXor => {
                Precedence::Bitwise
            }
            TokenKind::Plus => Precedence::Add,
            TokenKind::Minus => Precedence::Subtract,
            TokenKind::Times => Precedence::Multiply,
            TokenKind::Divide => Precedence::Divide,
            TokenKind::Modulo => Precedence::Modulo,
            TokenKind::Power => Precedence::Power,
            TokenKind::EqualTo
            | TokenKind::NotEqualTo
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Lte
            | TokenKind::Gte => Precedence::Equality,
            TokenKind::LogicalAnd | TokenKind::LogicalOr => Precedence::Logical,
            TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::TimesAssign
            | TokenKind::DivideAssign
            | TokenKind::ModuloAssign
            | TokenKind::PowerAssign => Precedence::Assignment,
            _ => Precedence::None,
        }
    }

    /// Whether an operator at this level continues an expression whose minimum is `min`.
    fn continues(self, min: Precedence) -> bool {
        self > min || (self == min && self.is_right_associative())
    }
}

fn math_op(kind: TokenKind) -> Option<MathOp> {
    let op = match kind {
        TokenKind::BitwiseAnd => MathOp::BitwiseAnd,
        TokenKind::BitwiseOr => MathOp::BitwiseOr,
        TokenKind::BitwiseXor => MathOp::BitwiseXor,
        TokenKind::LogicalAnd => MathOp::LogicalAnd,
        TokenKind::LogicalOr => MathOp::LogicalOr,
        TokenKind::EqualTo => MathOp::Equal,
        TokenKind::NotEqualTo => MathOp::NotEqual,
        TokenKind::Lt => MathOp::Lt,
        TokenKind::Gt => MathOp::Gt,
        TokenKind::Lte => MathOp::Lte,
        TokenKind::Gte => MathOp::Gte,
        TokenKind::Plus => MathOp::Add,
        TokenKind::Minus => MathOp::Subtract,
        TokenKind::Times => MathOp::Multiply,
        TokenKind::Divide => MathOp::Divide,
        TokenKind::Modulo => MathOp::Modulo,
        TokenKind::Power => MathOp::Power,
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::PlusAssign => AssignOp::Add,
        TokenKind::MinusAssign => AssignOp::Subtract,
        TokenKind::TimesAssign => AssignOp::Multiply,
        TokenKind::DivideAssign => AssignOp::Divide,
        TokenKind::ModuloAssign => AssignOp::Modulo,
        TokenKind::PowerAssign => AssignOp::Power,
        _ => return None,
    };
    Some(op)
}

pub struct Parser<'s, S: TokenStream + ?Sized> {
    stream: &'s mut S,
    max_depth: usize,
    depth: usize,
}

impl<'s, S: TokenStream + ?Sized> Parser<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        Self::with_config(stream, &ParserConfig::default())
    }

    pub fn with_config(stream: &'s mut S, config: &ParserConfig) -> Self {
        Self {
            stream,
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    /// Parse every line up to end of file. Stops at the first error.
    pub fn parse(&mut self) -> Result<Block, ParseError> {
        let mut block = Block::default();

        loop {
            match self.peek_kind() {
                TokenKind::EndOfFile => break,
                TokenKind::EndOfLine => {
                    self.next();
                    continue;
                }
                _ => {}
            }

            let expr = self.parse_expression()?;
            block.expressions.push(expr);
            self.expect(TokenKind::EndOfLine)?;
        }

        debug!(expressions = block.expressions.len(), "parsed block");
        Ok(block)
    }

    /// Parse a single expression with every operator allowed.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_precedence(Precedence::All)
    }

    fn parse_precedence(&mut self, min: Precedence) -> Result<Expression, ParseError> {
        if self.depth >= self.max_depth {
            let max_depth = self.max_depth;
            let t = self.peek();
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep,
                format!("expression is nested more than {max_depth} levels deep"),
                t.start,
                t.end,
            ));
        }

        self.depth += 1;
        let result = self.climb(min);
        self.depth -= 1;
        result
    }

    fn climb(&mut self, min: Precedence) -> Result<Expression, ParseError> {
        let mut result = self.parse_prefix()?;
        while Precedence::of(self.peek_kind()).continues(min) {
            result = self.parse_postfix(result)?;
        }
        Ok(result)
    }

    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        let first = self.peek().clone();

        match first.kind {
            TokenKind::Colon => self.parse_control(String::new(), first.start),
            TokenKind::OpenSquare => self.parse_prefix_cast(),
            TokenKind::Note => self.parse_note(),
            TokenKind::Number => self.parse_number(),
            TokenKind::DoubleString => {
                self.next();
                self.parse_control(first.text, first.start)
            }
            TokenKind::Plus | TokenKind::Minus | TokenKind::Not => self.parse_unary(),
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::OpenBracket => self.parse_sub_expression(),
            _ => Err(ParseError::unexpected(&first)),
        }
    }

    fn parse_postfix(&mut self, prefix: Expression) -> Result<Expression, ParseError> {
        let token = self.next();

        if token.kind == TokenKind::Cast {
            let form = self.parse_form()?;
            let start = prefix.start;
            let end = form.end;
            return Ok(Expression::new(
                ExpressionKind::Cast {
                    form,
                    operand: Box::new(prefix),
                    is_prefix: false,
                },
                start,
                end,
            ));
        }

        if let Some(op) = match token.kind {
            TokenKind::Increment => Some(PostfixOp::Increment),
            TokenKind::Decrement => Some(PostfixOp::Decrement),
            _ => None,
        } {
            if !prefix.is_assignable() {
                return Err(ParseError::not_assignable(prefix.start, prefix.end));
            }
            let start = prefix.start;
            return Ok(Expression::new(
                ExpressionKind::Postfix {
                    operand: Box::new(prefix),
                    op,
                },
                start,
                token.end,
            ));
        }

        if let Some(op) = math_op(token.kind) {
            let right = self.parse_precedence(Precedence::of(token.kind))?;
            let (start, end) = (prefix.start, right.end);
            return Ok(Expression::new(
                ExpressionKind::Math {
                    left: Box::new(prefix),
                    op,
                    right: Box::new(right),
                },
                start,
                end,
            ));
        }

        if let Some(op) = assign_op(token.kind) {
            if !prefix.is_assignable() {
                return Err(ParseError::not_assignable(prefix.start, prefix.end));
            }
            let value = self.parse_precedence(Precedence::Assignment)?;
            let (start, end) = (prefix.start, value.end);
            return Ok(Expression::new(
                ExpressionKind::Assign {
                    target: Box::new(prefix),
                    op,
                    value: Box::new(value),
                },
                start,
                end,
            ));
        }

        Err(ParseError::unexpected(&token))
    }

    fn parse_prefix_cast(&mut self) -> Result<Expression, ParseError> {
        let form = self.parse_form()?;
        let operand = self.parse_precedence(Precedence::Unary)?;
        let (start, end) = (form.start, operand.end);
        Ok(Expression::new(
            ExpressionKind::Cast {
                form,
                operand: Box::new(operand),
                is_prefix: true,
            },
            start,
            end,
        ))
    }

    /// `[name arg arg ...]` with whitespace-separated arguments.
    fn parse_form(&mut self) -> Result<Form, ParseError> {
        let open = self.expect(TokenKind::OpenSquare)?;
        let name = self.expect(TokenKind::Identifier)?;
        let mut form = Form::new(name.text, open.start, open.end);

        while !matches!(
            self.peek_kind(),
            TokenKind::CloseSquare | TokenKind::EndOfLine | TokenKind::EndOfFile
        ) {
            form.arguments
                .push(self.parse_precedence(Precedence::Unary)?);
        }

        let close = self.expect(TokenKind::CloseSquare)?;
        form.end = close.end;
        Ok(form)
    }

    fn parse_note(&mut self) -> Result<Expression, ParseError> {
        let token = self.expect(TokenKind::Note)?;
        let Some((name, octave)) = split_note(&token.text) else {
            panic!("note token '{}' is not a note literal", token.text);
        };

        let midi = midi_number(name, octave).map_err(|e| {
            let message = match e {
                NoteError::UnknownName(name) => format!("'{name}' is not a valid note"),
                NoteError::OctaveOverflow(octave) => format!("octave {octave} is too high"),
            };
            ParseError::new(ParseErrorKind::InvalidNote, message, token.start, token.end)
        })?;

        Ok(Expression::new(
            ExpressionKind::Note { midi },
            token.start,
            token.end,
        ))
    }

    fn parse_number(&mut self) -> Result<Expression, ParseError> {
        let token = self.expect(TokenKind::Number)?;
        let mut value: f64 = token.text.parse().map_err(|_| {
            ParseError::new(
                ParseErrorKind::UnexpectedToken,
                format!("'{}' is not a valid number", token.text),
                token.start,
                token.end,
            )
        })?;

        let mut form = Form::new(DEFAULT_FORM, token.start, token.end);
        let mut end = token.end;

        let next = self.peek();
        if next.kind == TokenKind::Identifier {
            if let Some(suffix) = parse_suffix(&next.text) {
                let suffix_token = self.next();
                value *= suffix.multiplier;
                form = Form::new(suffix.form_name(), suffix_token.start, suffix_token.end);
                end = suffix_token.end;
            }
        }

        Ok(Expression::new(
            ExpressionKind::Number { value, form },
            token.start,
            end,
        ))
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let token = self.next();
        let op = match token.kind {
            TokenKind::Plus => UnaryOp::Positive,
            TokenKind::Minus => UnaryOp::Negative,
            TokenKind::Not => UnaryOp::Not,
            _ => return Err(ParseError::unexpected(&token)),
        };

        let operand = self.parse_precedence(Precedence::Unary)?;
        let end = operand.end;
        Ok(Expression::new(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            token.start,
            end,
        ))
    }

    /// `name`, `name(args)`, `name:(args)` or `name:kind.property`.
    fn parse_identifier(&mut self) -> Result<Expression, ParseError> {
        let ident = self.expect(TokenKind::Identifier)?;

        match self.peek_kind() {
            TokenKind::Colon => {
                self.next();
                if self.peek_kind() == TokenKind::OpenBracket {
                    self.parse_call(ident.text, ident.start)
                } else {
                    self.parse_control_kind(ident.text, ident.start)
                }
            }
            TokenKind::OpenBracket => self.parse_call(ident.text, ident.start),
            _ => Ok(Expression::new(
                ExpressionKind::Variable { name: ident.text },
                ident.start,
                ident.end,
            )),
        }
    }

    fn parse_call(&mut self, name: String, start: SourcePos) -> Result<Expression, ParseError> {
        self.expect(TokenKind::OpenBracket)?;

        let mut arguments = Vec::new();
        if self.peek_kind() != TokenKind::CloseBracket {
            loop {
                arguments.push(self.parse_expression()?);
                if self.peek_kind() != TokenKind::Comma {
                    break;
                }
                self.next();
            }
        }

        let close = self.expect(TokenKind::CloseBracket)?;
        Ok(Expression::new(
            ExpressionKind::Call { name, arguments },
            start,
            close.end,
        ))
    }

    fn parse_sub_expression(&mut self) -> Result<Expression, ParseError> {
        let open = self.expect(TokenKind::OpenBracket)?;
        let mut expr = self.parse_expression()?;
        let close = self.expect(TokenKind::CloseBracket)?;
        expr.start = open.start;
        expr.end = close.end;
        Ok(expr)
    }

    fn parse_control(&mut self, name: String, start: SourcePos) -> Result<Expression, ParseError> {
        self.expect(TokenKind::Colon)?;
        self.parse_control_kind(name, start)
    }

    /// The part of a control expression after its colon: `kind` or `kind.property`.
    fn parse_control_kind(
        &mut self,
        name: String,
        start: SourcePos,
    ) -> Result<Expression, ParseError> {
        let kind_token = self.expect(TokenKind::Identifier)?;
        let kind = ControlKind::from_name(&kind_token.text).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnknownControl,
                format!("'{}' is not a kind of control", kind_token.text),
                kind_token.start,
                kind_token.end,
            )
        })?;

        let mut property = "value".to_string();
        let mut end = kind_token.end;
        if self.peek_kind() == TokenKind::Dot {
            self.next();
            let property_token = self.expect(TokenKind::Identifier)?;
            property = property_token.text;
            end = property_token.end;
        }

        Ok(Expression::new(
            ExpressionKind::Control {
                name,
                kind,
                property,
            },
            start,
            end,
        ))
    }

    // --- Utility methods ---

    /// The next meaningful token. Comments are consumed on the way.
    fn peek(&mut self) -> &Token {
        while self.stream.peek().kind == TokenKind::Comment {
            self.stream.next();
        }
        self.stream.peek()
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    fn next(&mut self) -> Token {
        self.peek();
        self.stream.next()
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::expected(&token, kind))
        }
    }
}

/// Parse a whole token stream with the default configuration.
pub fn parse<S: TokenStream + ?Sized>(stream: &mut S) -> Result<Block, ParseError> {
    Parser::new(stream).parse()
}
