//! Value handles produced while generating a function.

use std::fmt;

/// Scalar types understood by the code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    F32,
    F64,
    I32,
    Bool,
}

impl Type {
    pub fn is_float(self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::F32 => "f32",
            Type::F64 => "f64",
            Type::I32 => "i32",
            Type::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A compile-time constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    F32(f32),
    F64(f64),
    I32(i32),
    Bool(bool),
}

impl Constant {
    pub fn ty(&self) -> Type {
        match self {
            Constant::F32(_) => Type::F32,
            Constant::F64(_) => Type::F64,
            Constant::I32(_) => Type::I32,
            Constant::Bool(_) => Type::Bool,
        }
    }
}

/// Index of an instruction within a [`Builder`](super::builder::Builder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionId(pub usize);

/// A handle to a value: either known at compile time or computed at run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Constant(Constant),
    /// The function's `index`th parameter.
    Argument { index: usize, ty: Type },
    /// The result of an emitted instruction.
    Instruction { id: InstructionId, ty: Type },
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Constant(c) => c.ty(),
            Value::Argument { ty, .. } | Value::Instruction { ty, .. } => *ty,
        }
    }

    pub fn as_constant(&self) -> Option<Constant> {
        match self {
            Value::Constant(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<Constant> for Value {
    fn from(c: Constant) -> Self {
        Value::Constant(c)
    }
}
