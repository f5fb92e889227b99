//! Callee descriptors: a function's signature and whether it is a known intrinsic.

use super::value::Type;

/// Parameter and return types of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Type>,
    pub ret: Type,
}

impl Signature {
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Self { params, ret }
    }

    /// `arity` parameters of type `ty`, returning `ty`.
    pub fn uniform(ty: Type, arity: usize) -> Self {
        Self::new(vec![ty; arity], ty)
    }
}

/// Built-in operations the constant folder knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Sin,
    Cos,
    Tan,
    Exp,
    Exp2,
    Log,
    Log2,
    Log10,
    Sqrt,
    Fabs,
    Floor,
    Ceil,
    Round,
    Trunc,
    Pow,
    MinNum,
    MaxNum,
    CopySign,
    Fma,
    Abs,
    SMin,
    SMax,
}

impl Intrinsic {
    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::Sin => "sin",
            Intrinsic::Cos => "cos",
            Intrinsic::Tan => "tan",
            Intrinsic::Exp => "exp",
            Intrinsic::Exp2 => "exp2",
            Intrinsic::Log => "log",
            Intrinsic::Log2 => "log2",
            Intrinsic::Log10 => "log10",
            Intrinsic::Sqrt => "sqrt",
            Intrinsic::Fabs => "fabs",
            Intrinsic::Floor => "floor",
            Intrinsic::Ceil => "ceil",
            Intrinsic::Round => "round",
            Intrinsic::Trunc => "trunc",
            Intrinsic::Pow => "pow",
            Intrinsic::MinNum => "minnum",
            Intrinsic::MaxNum => "maxnum",
            Intrinsic::CopySign => "copysign",
            Intrinsic::Fma => "fma",
            Intrinsic::Abs => "abs",
            Intrinsic::SMin => "smin",
            Intrinsic::SMax => "smax",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Intrinsic::Pow
            | Intrinsic::MinNum
            | Intrinsic::MaxNum
            | Intrinsic::CopySign
            | Intrinsic::SMin
            | Intrinsic::SMax => 2,
            Intrinsic::Fma => 3,
            _ => 1,
        }
    }

    /// Integer intrinsics work on `i32`; the rest on `f32`/`f64`.
    pub fn is_integer(self) -> bool {
        matches!(self, Intrinsic::Abs | Intrinsic::SMin | Intrinsic::SMax)
    }

    /// Whether the intrinsic is defined for `signature`: the right arity, with
    /// every parameter the same type as the result.
    pub fn supports(self, signature: &Signature) -> bool {
        let type_ok = if self.is_integer() {
            signature.ret == Type::I32
        } else {
            signature.ret.is_float()
        };
        type_ok
            && signature.params.len() == self.arity()
            && signature.params.iter().all(|p| *p == signature.ret)
    }
}

/// A function that calls can be emitted against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub signature: Signature,
    /// Set when the function is a built-in with known semantics.
    pub intrinsic: Option<Intrinsic>,
}

impl Function {
    /// An opaque function; calls to it are never folded.
    pub fn external(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            intrinsic: None,
        }
    }

    /// An intrinsic over `ty`, with the uniform signature it expects.
    pub fn intrinsic(intrinsic: Intrinsic, ty: Type) -> Self {
        Self {
            name: format!("{}.{ty}", intrinsic.name()),
            signature: Signature::uniform(ty, intrinsic.arity()),
            intrinsic: Some(intrinsic),
        }
    }
}
