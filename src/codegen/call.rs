//! Call emission with constant folding at the point of emission.

use tracing::{debug, trace, warn};

use super::builder::Builder;
use super::fold::ConstantFolder;
use super::function::Function;
use super::value::{Constant, Value};

/// Emit a call to `callee`, or its folded result.
///
/// When `folder` accepts the callee and every operand is a constant, the
/// folded constant is returned and nothing is inserted. Otherwise, including
/// when folding fails, exactly one call instruction is inserted into
/// `builder` and its handle returned.
pub fn create_call<F>(
    builder: &mut Builder,
    folder: &F,
    callee: &Function,
    operands: &[Value],
    name: &str,
) -> Value
where
    F: ConstantFolder + ?Sized,
{
    if !operands.iter().map(Value::ty).eq(callee.signature.params.iter().copied()) {
        warn!(callee = %callee.name, "operand types do not match the callee's signature");
    }

    if !folder.can_fold(callee) {
        return builder.insert_call(callee, operands, name);
    }

    let Some(constants) = operands
        .iter()
        .map(Value::as_constant)
        .collect::<Option<Vec<Constant>>>()
    else {
        trace!(callee = %callee.name, "operands not constant, emitting call");
        return builder.insert_call(callee, operands, name);
    };

    match folder.fold(callee, &constants) {
        Some(result) => {
            debug!(callee = %callee.name, ?result, "folded call");
            Value::Constant(result)
        }
        None => {
            debug!(callee = %callee.name, "fold failed, emitting call");
            builder.insert_call(callee, operands, name)
        }
    }
}
