use async_trait::async_trait;
use wordcheck_common::{Opcode, OpcodeMask, OperandVector, Word256};

use crate::{
    errors::InvocationError,
    oracle::ReferenceOracle,
    sut::{BatchVerdict, SystemUnderTest, WordEngine},
    wire::WireError,
};

/// Exposes a synchronous engine as a system under test.
///
/// The batch form compares the engine against the reference oracle in
/// process, vectors in order and enabled opcodes in index order within each
/// vector, and stops at the first disagreement.
#[derive(Debug, Clone)]
pub struct InProcess<E> {
    engine: E,
}

impl<E: WordEngine> InProcess<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

/// Shared by every adapter that evaluates a batch against the oracle itself.
pub(crate) fn run_batch<E: WordEngine + ?Sized>(
    engine: &E,
    words: &[Word256],
    mask: OpcodeMask,
) -> Result<BatchVerdict, InvocationError> {
    let vectors = OperandVector::from_flat(words)
        .map_err(|_| WireError::RaggedOperands(words.len()))?;

    for vector in &vectors {
        for opcode in mask.iter() {
            let have = engine.execute(opcode, vector)?;
            let want = ReferenceOracle::evaluate_vector(opcode, vector);
            if have != want {
                return Ok(BatchVerdict::failed(opcode, have, want, vector));
            }
        }
    }
    Ok(BatchVerdict::passed())
}

#[async_trait]
impl<E: WordEngine> SystemUnderTest for InProcess<E> {
    fn name(&self) -> &str {
        self.engine.name()
    }

    async fn invoke(&self, opcode: Opcode, operands: OperandVector) -> Result<Word256, InvocationError> {
        self.engine.execute(opcode, &operands)
    }

    async fn invoke_batch(
        &self,
        words: &[Word256],
        mask: OpcodeMask,
    ) -> Result<BatchVerdict, InvocationError> {
        run_batch(&self.engine, words, mask)
    }
}
