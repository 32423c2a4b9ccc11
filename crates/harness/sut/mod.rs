//! Systems under test and the engines that back the in-process ones.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wordcheck_common::{Opcode, OpcodeMask, OperandVector, Word256};
use wordcheck_vm::VM;

use crate::{errors::InvocationError, oracle::ReferenceOracle};

pub mod bit_flip;
pub mod in_process;
pub mod loopback;

pub use bit_flip::BitFlip;
pub use in_process::InProcess;
pub use loopback::Loopback;

/// Result of a batch invocation, in wire order.
///
/// When `passing` is false the remaining fields describe the first failing
/// comparison: `opcode_index` uses the fixed opcode numbering and `want` is the
/// value the system under test expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchVerdict {
    pub passing: bool,
    pub opcode_index: u64,
    pub have: Word256,
    pub want: Word256,
    pub x: Word256,
    pub y: Word256,
    pub z: Word256,
}

impl BatchVerdict {
    pub fn passed() -> Self {
        Self {
            passing: true,
            opcode_index: 0,
            have: Word256::ZERO,
            want: Word256::ZERO,
            x: Word256::ZERO,
            y: Word256::ZERO,
            z: Word256::ZERO,
        }
    }

    pub fn failed(opcode: Opcode, have: Word256, want: Word256, vector: &OperandVector) -> Self {
        Self {
            passing: false,
            opcode_index: u64::from(opcode.index()),
            have,
            want,
            x: vector.x,
            y: vector.y,
            z: vector.z,
        }
    }

    pub fn vector(&self) -> OperandVector {
        OperandVector::new(self.x, self.y, self.z)
    }
}

/// An implementation of the word opcodes being validated.
#[async_trait]
pub trait SystemUnderTest: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(&self, opcode: Opcode, operands: OperandVector) -> Result<Word256, InvocationError>;

    /// Runs every enabled opcode over every `(x, y, z)` group of `words` and
    /// reports the first failure.
    async fn invoke_batch(
        &self,
        _words: &[Word256],
        _mask: OpcodeMask,
    ) -> Result<BatchVerdict, InvocationError> {
        Err(InvocationError::BatchUnsupported)
    }
}

/// A synchronous word-opcode implementation.
pub trait WordEngine: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self, opcode: Opcode, operands: &OperandVector) -> Result<Word256, InvocationError>;
}

impl WordEngine for ReferenceOracle {
    fn name(&self) -> &str {
        "reference"
    }

    fn execute(&self, opcode: Opcode, operands: &OperandVector) -> Result<Word256, InvocationError> {
        Ok(ReferenceOracle::evaluate_vector(opcode, operands))
    }
}

/// The `wordcheck-vm` interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evm;

impl WordEngine for Evm {
    fn name(&self) -> &str {
        "evm"
    }

    fn execute(&self, opcode: Opcode, operands: &OperandVector) -> Result<Word256, InvocationError> {
        Ok(VM::execute_vector(opcode, operands)?)
    }
}
