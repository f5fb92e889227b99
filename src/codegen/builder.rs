//! Instruction buffer for the function being generated.

use super::function::Function;
use super::value::{InstructionId, Type, Value};

/// A call emitted into a function body.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub callee: String,
    pub operands: Vec<Value>,
    pub ty: Type,
    /// Name hint for the result, may be empty.
    pub name: String,
}

/// Accumulates the instructions of one function, in emission order.
#[derive(Debug, Default)]
pub struct Builder {
    instructions: Vec<Instruction>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction at the current position and return a handle to its result.
    pub fn insert(&mut self, instruction: Instruction) -> Value {
        let id = InstructionId(self.instructions.len());
        let ty = instruction.ty;
        self.instructions.push(instruction);
        Value::Instruction { id, ty }
    }

    /// Emit a runtime call to `callee`.
    pub fn insert_call(&mut self, callee: &Function, operands: &[Value], name: &str) -> Value {
        self.insert(Instruction {
            callee: callee.name.clone(),
            operands: operands.to_vec(),
            ty: callee.signature.ret,
            name: name.to_string(),
        })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
