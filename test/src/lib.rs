//! Fixtures shared by the integration suite.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use async_trait::async_trait;
use wordcheck_common::{Opcode, OperandVector, Word256};
use wordcheck_harness::{InvocationError, ReferenceOracle, SystemUnderTest};

pub fn word(value: u64) -> Word256 {
    Word256::from_u64(value)
}

pub fn vector(x: u64, y: u64, z: u64) -> OperandVector {
    OperandVector::new(word(x), word(y), word(z))
}

/// `count` pairwise distinct vectors with small operands.
pub fn sequential_vectors(count: u64) -> Vec<OperandVector> {
    (0..count).map(|i| vector(i + 1, i % 5, i + 3)).collect()
}

/// A system under test that answers like the oracle except where told
/// otherwise, per operand vector.
#[derive(Debug, Default)]
pub struct ScriptedSut {
    delays: HashMap<OperandVector, Duration>,
    failures: HashMap<OperandVector, InvocationError>,
    corruptions: HashSet<(OperandVector, Opcode)>,
}

impl ScriptedSut {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn delay(mut self, vector: OperandVector, delay: Duration) -> Self {
        self.delays.insert(vector, delay);
        self
    }

    #[must_use]
    pub fn fail(mut self, vector: OperandVector, error: InvocationError) -> Self {
        self.failures.insert(vector, error);
        self
    }

    /// Flips the low bit of `opcode`'s result for `vector`.
    #[must_use]
    pub fn corrupt(mut self, vector: OperandVector, opcode: Opcode) -> Self {
        self.corruptions.insert((vector, opcode));
        self
    }
}

#[async_trait]
impl SystemUnderTest for ScriptedSut {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, opcode: Opcode, operands: OperandVector) -> Result<Word256, InvocationError> {
        if let Some(delay) = self.delays.get(&operands) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(error) = self.failures.get(&operands) {
            return Err(error.clone());
        }

        let result = ReferenceOracle::evaluate_vector(opcode, &operands);
        if self.corruptions.contains(&(operands, opcode)) {
            return Ok(result ^ Word256::ONE);
        }
        Ok(result)
    }
}
