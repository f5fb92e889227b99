//! Code generation support — value handles, callees and folding call emission.

pub mod builder;
pub mod call;
pub mod fold;
pub mod function;
pub mod value;

pub use builder::{Builder, Instruction};
pub use call::create_call;
pub use fold::{ConstantFolder, IntrinsicFolder};
pub use function::{Function, Intrinsic, Signature};
pub use value::{Constant, InstructionId, Type, Value};
