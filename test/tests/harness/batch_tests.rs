use std::sync::Arc;

use async_trait::async_trait;
use wordcheck_common::{ConfigurationError, Opcode, OpcodeMask, OperandVector, Word256};
use wordcheck_harness::{
    BatchVerdict, BitFlip, DifferentialHarness, DispatchMode, Evm, HarnessConfig, HarnessError,
    InvocationError, Loopback, ReferenceOracle, ReportMode, SystemUnderTest, Verdict,
};
use wordcheck_test::sequential_vectors;

fn batched(chunk_size: usize) -> HarnessConfig {
    HarnessConfig {
        dispatch: DispatchMode::Batched { chunk_size },
        ..Default::default()
    }
}

/// Answers every batch with the same verdict.
struct FixedVerdict(BatchVerdict);

#[async_trait]
impl SystemUnderTest for FixedVerdict {
    fn name(&self) -> &str {
        "fixed-verdict"
    }

    async fn invoke(&self, _: Opcode, _: OperandVector) -> Result<Word256, InvocationError> {
        Err(InvocationError::Engine("single calls are not served".to_string()))
    }

    async fn invoke_batch(&self, _: &[Word256], _: OpcodeMask) -> Result<BatchVerdict, InvocationError> {
        Ok(self.0)
    }
}

async fn run_fixed(verdict: BatchVerdict, config: HarnessConfig) -> Result<Verdict, HarnessError> {
    let harness = DifferentialHarness::new(Arc::new(FixedVerdict(verdict)), config)?;
    Ok(harness.run_vectors(sequential_vectors(4)).await?.verdict)
}

#[tokio::test]
async fn batched_loopback_passes() {
    let harness = DifferentialHarness::new(Arc::new(Loopback::new(Evm)), batched(7)).unwrap();
    let report = harness.run_vectors(sequential_vectors(20)).await.unwrap();
    assert_eq!(report.verdict, Verdict::AllPassed);
    assert_eq!(report.comparisons, 20 * 25);
}

#[tokio::test]
async fn batched_fault_is_located() {
    let vectors = sequential_vectors(20);
    let faulty = BitFlip::new(Evm, Opcode::SignExtend, 255).only_for([vectors[13]]);
    let harness = DifferentialHarness::new(Arc::new(Loopback::new(faulty)), batched(5)).unwrap();

    let report = harness.run_vectors(vectors).await.unwrap();
    let mismatch = report.first_mismatch().unwrap();
    assert_eq!(mismatch.vector_index, 13);
    assert_eq!(mismatch.outcome.opcode, Opcode::SignExtend);
    assert_eq!(report.comparisons, 13 * 25 + usize::from(Opcode::SignExtend.index()) + 1);
}

#[tokio::test]
async fn exhaustive_batches_report_one_mismatch_per_chunk() {
    let vectors = sequential_vectors(12);
    let faulty = BitFlip::new(Evm, Opcode::Not, 3).only_for([vectors[1], vectors[2], vectors[9]]);
    let config = HarnessConfig {
        report: ReportMode::Exhaustive,
        ..batched(4)
    };
    let harness = DifferentialHarness::new(Arc::new(Loopback::new(faulty)), config).unwrap();

    let report = harness.run_vectors(vectors).await.unwrap();
    let indices: Vec<_> = match &report.verdict {
        Verdict::Mismatch(discrepancies) => discrepancies.iter().map(|d| d.vector_index).collect(),
        Verdict::AllPassed => Vec::new(),
    };
    // Vectors 1 and 2 share the first chunk, so only vector 1 is reported.
    assert_eq!(indices, vec![1, 9]);
}

#[tokio::test]
async fn unknown_opcode_index_is_a_configuration_error() {
    let vectors = sequential_vectors(4);
    let mut verdict = BatchVerdict::failed(Opcode::Add, Word256::ZERO, Word256::ONE, &vectors[0]);
    verdict.opcode_index = 30;
    assert!(matches!(
        run_fixed(verdict, batched(4)).await,
        Err(HarnessError::Configuration(ConfigurationError::UnknownOpcodeIndex(30)))
    ));
}

#[tokio::test]
async fn disabled_opcode_is_a_configuration_error() {
    let vectors = sequential_vectors(4);
    let want = ReferenceOracle::evaluate_vector(Opcode::Exp, &vectors[0]);
    let verdict = BatchVerdict::failed(Opcode::Exp, Word256::ZERO, want, &vectors[0]);
    let config = HarnessConfig {
        mask: OpcodeMask::from_opcodes([Opcode::Add, Opcode::Mul]),
        ..batched(4)
    };
    assert!(matches!(
        run_fixed(verdict, config).await,
        Err(HarnessError::Configuration(ConfigurationError::ReportedOpcodeNotEnabled(9)))
    ));
}

#[tokio::test]
async fn shifted_numbering_is_detected() {
    // The system under test numbers Sub where the harness numbers Mul: it
    // reports a Sub failure whose expected value is really the product.
    let vectors = sequential_vectors(4);
    let product = ReferenceOracle::evaluate_vector(Opcode::Mul, &vectors[2]);
    let verdict = BatchVerdict::failed(Opcode::Sub, Word256::MAX, product, &vectors[2]);
    assert!(matches!(
        run_fixed(verdict, batched(4)).await,
        Err(HarnessError::Configuration(ConfigurationError::NumberingMismatch { .. }))
    ));
}

#[tokio::test]
async fn consistent_verdict_is_accepted() {
    let vectors = sequential_vectors(4);
    let want = ReferenceOracle::evaluate_vector(Opcode::Lt, &vectors[3]);
    let verdict = BatchVerdict::failed(Opcode::Lt, Word256::MAX, want, &vectors[3]);
    let Ok(Verdict::Mismatch(discrepancies)) = run_fixed(verdict, batched(4)).await else {
        panic!("expected a mismatch");
    };
    assert_eq!(discrepancies[0].vector_index, 3);
    assert_eq!(discrepancies[0].outcome.have, Word256::MAX);
}
