use std::collections::HashSet;

use tracing::trace;
use wordcheck_common::{Opcode, OperandVector, Word256, constants::WORD_BITS};

use crate::{errors::InvocationError, sut::WordEngine};

/// Fault injector: flips one bit of the results `target` produces.
///
/// With a trigger set, only the listed operand vectors are corrupted, which
/// lets a test plant a mismatch at a known position.
#[derive(Debug, Clone)]
pub struct BitFlip<E> {
    engine: E,
    target: Opcode,
    bit: u32,
    triggers: Option<HashSet<OperandVector>>,
    name: String,
}

impl<E: WordEngine> BitFlip<E> {
    /// `bit` is taken modulo 256.
    pub fn new(engine: E, target: Opcode, bit: u32) -> Self {
        let name = format!("{}+bitflip({target})", engine.name());
        Self {
            engine,
            target,
            bit: bit % WORD_BITS,
            triggers: None,
            name,
        }
    }

    #[must_use]
    pub fn only_for(mut self, vectors: impl IntoIterator<Item = OperandVector>) -> Self {
        self.triggers = Some(vectors.into_iter().collect());
        self
    }

    fn corrupts(&self, opcode: Opcode, operands: &OperandVector) -> bool {
        opcode == self.target
            && self
                .triggers
                .as_ref()
                .is_none_or(|triggers| triggers.contains(operands))
    }
}

impl<E: WordEngine> WordEngine for BitFlip<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, opcode: Opcode, operands: &OperandVector) -> Result<Word256, InvocationError> {
        let result = self.engine.execute(opcode, operands)?;
        if !self.corrupts(opcode, operands) {
            return Ok(result);
        }
        trace!(%opcode, bit = self.bit, "Flipping result bit");
        Ok(result ^ (Word256::ONE << self.bit))
    }
}
