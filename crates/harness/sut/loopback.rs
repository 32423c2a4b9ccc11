use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;
use wordcheck_common::{Opcode, OpcodeMask, OperandVector, Word256};

use crate::{
    errors::InvocationError,
    oracle::ReferenceOracle,
    sut::{BatchVerdict, SystemUnderTest, WordEngine, in_process::run_batch},
    wire,
};

/// Routes every call through the wire format: the request is encoded, decoded
/// by a length-checking endpoint that runs the engine, and the endpoint's
/// encoded response is decoded again on the way back.
#[derive(Debug, Clone)]
pub struct Loopback<E> {
    engine: E,
    latency: Option<Duration>,
    name: String,
}

impl<E: WordEngine> Loopback<E> {
    pub fn new(engine: E) -> Self {
        let name = format!("loopback({})", engine.name());
        Self {
            engine,
            latency: None,
            name,
        }
    }

    /// Delays every response, standing in for a slow transport.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn round_trip(&self, request: &Bytes) {
        trace!(request = %hex::encode(request), "Loopback request");
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn serve_call(&self, opcode: Opcode, request: &[u8]) -> Result<Bytes, InvocationError> {
        let operands = wire::decode_call(opcode, request)?;
        let vector = ReferenceOracle::operand_vector(opcode, &operands)?;
        let result = self.engine.execute(opcode, &vector)?;
        Ok(wire::encode_result(result))
    }

    fn serve_batch(&self, request: &[u8]) -> Result<Bytes, InvocationError> {
        let (words, mask) = wire::decode_batch_call(request)?;
        let verdict = run_batch(&self.engine, &words, mask)?;
        Ok(wire::encode_batch_result(&verdict))
    }
}

#[async_trait]
impl<E: WordEngine> SystemUnderTest for Loopback<E> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, opcode: Opcode, operands: OperandVector) -> Result<Word256, InvocationError> {
        let request = wire::encode_call(&operands.operands(opcode));
        self.round_trip(&request).await;
        let response = self.serve_call(opcode, &request)?;
        Ok(wire::decode_result(&response)?)
    }

    async fn invoke_batch(
        &self,
        words: &[Word256],
        mask: OpcodeMask,
    ) -> Result<BatchVerdict, InvocationError> {
        let request = wire::encode_batch_call(words, mask);
        self.round_trip(&request).await;
        let response = self.serve_batch(&request)?;
        Ok(wire::decode_batch_result(&response)?)
    }
}
