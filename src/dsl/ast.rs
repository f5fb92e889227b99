//! Abstract Syntax Tree for patch expressions.
//!
//! Every node owns its children outright and carries the half-open source
//! span of the syntax that produced it.

use serde::Serialize;

use super::token::SourcePos;

/// A parsed unit: the top-level expressions of one source, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub expressions: Vec<Expression>,
}

/// An expression together with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub start: SourcePos,
    pub end: SourcePos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpressionKind {
    Variable {
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Postfix {
        operand: Box<Expression>,
        op: PostfixOp,
    },
    Math {
        left: Box<Expression>,
        op: MathOp,
        right: Box<Expression>,
    },
    Assign {
        target: Box<Expression>,
        op: AssignOp,
        value: Box<Expression>,
    },
    /// `[form] expr` when `is_prefix`, otherwise `expr -> [form]`.
    Cast {
        form: Form,
        operand: Box<Expression>,
        is_prefix: bool,
    },
    Call {
        name: String,
        arguments: Vec<Expression>,
    },
    /// A binding to a UI-exposed parameter, e.g. `"cutoff":value.value`.
    Control {
        name: String,
        kind: ControlKind,
        property: String,
    },
    Note {
        midi: u32,
    },
    Number {
        value: f64,
        form: Form,
    },
}

impl Expression {
    pub fn new(kind: ExpressionKind, start: SourcePos, end: SourcePos) -> Self {
        Self { kind, start, end }
    }

    /// Whether this expression may be the target of an assignment or `++`/`--`.
    pub fn is_assignable(&self) -> bool {
        matches!(self.kind, ExpressionKind::Variable { .. })
    }

    /// Visit this node and all of its descendants, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        visit(self);
        match &self.kind {
            ExpressionKind::Variable { .. }
            | ExpressionKind::Control { .. }
            | ExpressionKind::Note { .. } => {}
            ExpressionKind::Number { form, .. } => form.walk(visit),
            ExpressionKind::Unary { operand, .. } | ExpressionKind::Postfix { operand, .. } => {
                operand.walk(visit)
            }
            ExpressionKind::Math { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            ExpressionKind::Assign { target, value, .. } => {
                target.walk(visit);
                value.walk(visit);
            }
            ExpressionKind::Cast { form, operand, .. } => {
                form.walk(visit);
                operand.walk(visit);
            }
            ExpressionKind::Call { arguments, .. } => {
                for arg in arguments {
                    arg.walk(visit);
                }
            }
        }
    }
}

/// A unit/shape tag attached to a number or introduced by a cast, e.g. `[lin 0 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub start: SourcePos,
    pub end: SourcePos,
}

impl Form {
    pub fn new(name: impl Into<String>, start: SourcePos, end: SourcePos) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            start,
            end,
        }
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        for arg in &self.arguments {
            arg.walk(visit);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Positive,
    Negative,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MathOp {
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    Equal,
    NotEqual,
    Lt,
    Gt,
    Lte,
    Gte,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlKind {
    Label,
    Value,
    Toggle,
    Graph,
    Scope,
    Keys,
    Roll,
    Plug,
}

impl ControlKind {
    /// Look up a control kind by its source spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "label" => ControlKind::Label,
            "value" => ControlKind::Value,
            "toggle" => ControlKind::Toggle,
            "graph" => ControlKind::Graph,
            "scope" => ControlKind::Scope,
            "keys" => ControlKind::Keys,
            "roll" => ControlKind::Roll,
            "plug" => ControlKind::Plug,
            _ => return None,
        };
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(column: usize) -> SourcePos {
        SourcePos::new(1, column)
    }

    fn var(name: &str, column: usize) -> Expression {
        Expression::new(
            ExpressionKind::Variable { name: name.into() },
            pos(column),
            pos(column + name.len()),
        )
    }

    #[test]
    fn only_variables_are_assignable() {
        assert!(var("x", 1).is_assignable());
        let note = Expression::new(ExpressionKind::Note { midi: 57 }, pos(1), pos(3));
        assert!(!note.is_assignable());
        let call = Expression::new(
            ExpressionKind::Call {
                name: "f".into(),
                arguments: vec![],
            },
            pos(1),
            pos(4),
        );
        assert!(!call.is_assignable());
    }

    #[test]
    fn walk_visits_every_node_parent_first() {
        let sum = Expression::new(
            ExpressionKind::Math {
                left: Box::new(var("a", 1)),
                op: MathOp::Add,
                right: Box::new(var("b", 5)),
            },
            pos(1),
            pos(6),
        );
        let mut names = Vec::new();
        sum.walk(&mut |e| {
            names.push(match &e.kind {
                ExpressionKind::Variable { name } => name.clone(),
                _ => "+".to_string(),
            })
        });
        assert_eq!(names, vec!["+", "a", "b"]);
    }

    #[test]
    fn control_kinds_by_name() {
        assert_eq!(ControlKind::from_name("graph"), Some(ControlKind::Graph));
        assert_eq!(ControlKind::from_name("plug"), Some(ControlKind::Plug));
        assert_eq!(ControlKind::from_name("Value"), None);
        assert_eq!(ControlKind::from_name("bogus"), None);
    }
}
