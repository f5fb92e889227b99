//! Compile-time evaluation of calls to known intrinsics.

use super::function::{Function, Intrinsic};
use super::value::{Constant, Type};

/// Decides which calls can be evaluated at compile time, and evaluates them.
///
/// Folding must be deterministic and free of side effects.
pub trait ConstantFolder {
    /// Whether calls to `callee` are candidates for folding at all.
    fn can_fold(&self, callee: &Function) -> bool;

    /// Evaluate `callee` on constant operands. `None` when the folder can't
    /// produce a result for these operands.
    fn fold(&self, callee: &Function, operands: &[Constant]) -> Option<Constant>;
}

/// Folds the [`Intrinsic`] set using the host's math library.
///
/// Refuses results that are NaN or infinite, so domain errors such as
/// `log(-1)` are left for the runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntrinsicFolder;

macro_rules! eval_float {
    ($intrinsic:expr, $args:expr) => {{
        let a = $args;
        match $intrinsic {
            Intrinsic::Sin => a[0].sin(),
            Intrinsic::Cos => a[0].cos(),
            Intrinsic::Tan => a[0].tan(),
            Intrinsic::Exp => a[0].exp(),
            Intrinsic::Exp2 => a[0].exp2(),
            Intrinsic::Log => a[0].ln(),
            Intrinsic::Log2 => a[0].log2(),
            Intrinsic::Log10 => a[0].log10(),
            Intrinsic::Sqrt => a[0].sqrt(),
            Intrinsic::Fabs => a[0].abs(),
            Intrinsic::Floor => a[0].floor(),
            Intrinsic::Ceil => a[0].ceil(),
            Intrinsic::Round => a[0].round(),
            Intrinsic::Trunc => a[0].trunc(),
            Intrinsic::Pow => a[0].powf(a[1]),
            Intrinsic::MinNum => a[0].min(a[1]),
            Intrinsic::MaxNum => a[0].max(a[1]),
            Intrinsic::CopySign => a[0].copysign(a[1]),
            Intrinsic::Fma => a[0].mul_add(a[1], a[2]),
            Intrinsic::Abs | Intrinsic::SMin | Intrinsic::SMax => return None,
        }
    }};
}

fn fold_f64(intrinsic: Intrinsic, operands: &[Constant]) -> Option<Constant> {
    let args = operands
        .iter()
        .map(|c| match c {
            Constant::F64(v) => Some(*v),
            _ => None,
        })
        .collect::<Option<Vec<f64>>>()?;
    let result: f64 = eval_float!(intrinsic, &args);
    result.is_finite().then_some(Constant::F64(result))
}

fn fold_f32(intrinsic: Intrinsic, operands: &[Constant]) -> Option<Constant> {
    let args = operands
        .iter()
        .map(|c| match c {
            Constant::F32(v) => Some(*v),
            _ => None,
        })
        .collect::<Option<Vec<f32>>>()?;
    let result: f32 = eval_float!(intrinsic, &args);
    result.is_finite().then_some(Constant::F32(result))
}

fn fold_i32(intrinsic: Intrinsic, operands: &[Constant]) -> Option<Constant> {
    let args = operands
        .iter()
        .map(|c| match c {
            Constant::I32(v) => Some(*v),
            _ => None,
        })
        .collect::<Option<Vec<i32>>>()?;
    let result = match intrinsic {
        Intrinsic::Abs => args[0].checked_abs()?,
        Intrinsic::SMin => args[0].min(args[1]),
        Intrinsic::SMax => args[0].max(args[1]),
        _ => return None,
    };
    Some(Constant::I32(result))
}

impl ConstantFolder for IntrinsicFolder {
    fn can_fold(&self, callee: &Function) -> bool {
        callee
            .intrinsic
            .is_some_and(|i| i.supports(&callee.signature))
    }

    fn fold(&self, callee: &Function, operands: &[Constant]) -> Option<Constant> {
        let intrinsic = callee.intrinsic?;
        let signature = &callee.signature;
        if !intrinsic.supports(signature) || operands.len() != signature.params.len() {
            return None;
        }

        match signature.ret {
            Type::F64 => fold_f64(intrinsic, operands),
            Type::F32 => fold_f32(intrinsic, operands),
            Type::I32 => fold_i32(intrinsic, operands),
            Type::Bool => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::function::Signature;
    use assert_approx_eq::assert_approx_eq;

    fn fold(intrinsic: Intrinsic, ty: Type, operands: &[Constant]) -> Option<Constant> {
        IntrinsicFolder.fold(&Function::intrinsic(intrinsic, ty), operands)
    }

    fn f64_of(c: Option<Constant>) -> f64 {
        match c {
            Some(Constant::F64(v)) => v,
            other => panic!("expected f64 constant, got {other:?}"),
        }
    }

    #[test]
    fn folds_unary_f64() {
        let sin = f64_of(fold(Intrinsic::Sin, Type::F64, &[Constant::F64(0.5)]));
        assert_approx_eq!(sin, 0.5f64.sin());
        let sqrt = f64_of(fold(Intrinsic::Sqrt, Type::F64, &[Constant::F64(16.0)]));
        assert_approx_eq!(sqrt, 4.0);
        let floor = f64_of(fold(Intrinsic::Floor, Type::F64, &[Constant::F64(-1.5)]));
        assert_approx_eq!(floor, -2.0);
    }

    #[test]
    fn folds_binary_and_ternary_f64() {
        let pow = f64_of(fold(
            Intrinsic::Pow,
            Type::F64,
            &[Constant::F64(2.0), Constant::F64(10.0)],
        ));
        assert_approx_eq!(pow, 1024.0);
        let fma = f64_of(fold(
            Intrinsic::Fma,
            Type::F64,
            &[Constant::F64(2.0), Constant::F64(3.0), Constant::F64(4.0)],
        ));
        assert_approx_eq!(fma, 10.0);
        let min = f64_of(fold(
            Intrinsic::MinNum,
            Type::F64,
            &[Constant::F64(2.0), Constant::F64(-3.0)],
        ));
        assert_approx_eq!(min, -3.0);
    }

    #[test]
    fn folds_in_single_precision() {
        let got = fold(Intrinsic::Cos, Type::F32, &[Constant::F32(1.0)]);
        assert_eq!(got, Some(Constant::F32(1.0f32.cos())));
    }

    #[test]
    fn folds_integers() {
        assert_eq!(
            fold(Intrinsic::Abs, Type::I32, &[Constant::I32(-7)]),
            Some(Constant::I32(7))
        );
        assert_eq!(
            fold(Intrinsic::SMax, Type::I32, &[Constant::I32(-7), Constant::I32(3)]),
            Some(Constant::I32(3))
        );
        assert_eq!(fold(Intrinsic::Abs, Type::I32, &[Constant::I32(i32::MIN)]), None);
    }

    #[test]
    fn refuses_non_finite_results() {
        assert_eq!(fold(Intrinsic::Log, Type::F64, &[Constant::F64(-1.0)]), None);
        assert_eq!(fold(Intrinsic::Log, Type::F64, &[Constant::F64(0.0)]), None);
        assert_eq!(fold(Intrinsic::Sqrt, Type::F32, &[Constant::F32(-4.0)]), None);
        assert_eq!(
            fold(Intrinsic::Pow, Type::F64, &[Constant::F64(10.0), Constant::F64(400.0)]),
            None
        );
    }

    #[test]
    fn refuses_mismatched_operands() {
        assert_eq!(fold(Intrinsic::Sin, Type::F64, &[Constant::F32(1.0)]), None);
        assert_eq!(fold(Intrinsic::Pow, Type::F64, &[Constant::F64(1.0)]), None);
        assert_eq!(fold(Intrinsic::Sin, Type::F64, &[]), None);
    }

    #[test]
    fn only_supported_intrinsics_can_fold() {
        let folder = IntrinsicFolder;
        assert!(folder.can_fold(&Function::intrinsic(Intrinsic::Exp, Type::F32)));

        let opaque = Function::external("noise", Signature::uniform(Type::F64, 0));
        assert!(!folder.can_fold(&opaque));
        assert_eq!(folder.fold(&opaque, &[]), None);

        let mut wrong = Function::intrinsic(Intrinsic::Sin, Type::F64);
        wrong.signature = Signature::uniform(Type::I32, 1);
        assert!(!folder.can_fold(&wrong));
        assert_eq!(folder.fold(&wrong, &[Constant::I32(1)]), None);
    }

    #[test]
    fn folding_is_deterministic() {
        let f = Function::intrinsic(Intrinsic::Tan, Type::F64);
        let first = IntrinsicFolder.fold(&f, &[Constant::F64(0.3)]);
        for _ in 0..10 {
            assert_eq!(IntrinsicFolder.fold(&f, &[Constant::F64(0.3)]), first);
        }
    }
}
