use std::{sync::Arc, time::Duration};

use wordcheck_common::{Opcode, OpcodeMask};
use wordcheck_harness::{
    BatchReport, BitFlip, DifferentialHarness, Evm, HarnessConfig, InProcess, ReportMode, StimulusConfig,
    Verdict,
};
use wordcheck_test::{ScriptedSut, sequential_vectors, vector};

fn add_mul_config(report: ReportMode) -> HarnessConfig {
    HarnessConfig {
        mask: OpcodeMask::from_opcodes([Opcode::Add, Opcode::Mul]),
        report,
        concurrency: 8,
        ..Default::default()
    }
}

/// Vector 3 mismatches on Add but answers late; vector 7 mismatches on Mul
/// right away.
fn slow_early_mismatch() -> ScriptedSut {
    let vectors = sequential_vectors(10);
    ScriptedSut::new()
        .corrupt(vectors[3], Opcode::Add)
        .delay(vectors[3], Duration::from_millis(50))
        .corrupt(vectors[7], Opcode::Mul)
}

#[tokio::test(start_paused = true)]
async fn fail_fast_reports_lowest_ordered_mismatch() {
    let harness =
        DifferentialHarness::new(Arc::new(slow_early_mismatch()), add_mul_config(ReportMode::FailFast))
            .unwrap();
    let report = harness.run_vectors(sequential_vectors(10)).await.unwrap();

    let Verdict::Mismatch(discrepancies) = &report.verdict else {
        panic!("expected a mismatch, got {:?}", report.verdict);
    };
    assert_eq!(discrepancies.len(), 1);
    assert_eq!(discrepancies[0].vector_index, 3);
    assert_eq!(discrepancies[0].outcome.opcode, Opcode::Add);
    // Vectors 0 to 2 on both opcodes, then the failing comparison.
    assert_eq!(report.comparisons, 7);
}

#[tokio::test(start_paused = true)]
async fn exhaustive_lists_mismatches_in_order() {
    let harness = DifferentialHarness::new(
        Arc::new(slow_early_mismatch()),
        add_mul_config(ReportMode::Exhaustive),
    )
    .unwrap();
    let report = harness.run_vectors(sequential_vectors(10)).await.unwrap();

    let ordinals: Vec<_> = match &report.verdict {
        Verdict::Mismatch(discrepancies) => discrepancies.iter().map(|d| d.ordinal()).collect(),
        Verdict::AllPassed => Vec::new(),
    };
    assert_eq!(
        ordinals,
        vec![(3, Opcode::Add.index()), (7, Opcode::Mul.index())]
    );
    assert_eq!(report.comparisons, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn verdict_does_not_depend_on_concurrency() {
    let vectors = sequential_vectors(40);
    let faulty = || {
        InProcess::new(BitFlip::new(Evm, Opcode::Sar, 200).only_for([vectors[11], vectors[29]]))
    };

    let mut verdicts = Vec::new();
    for concurrency in [1, 3, 64] {
        let config = HarnessConfig {
            concurrency,
            ..Default::default()
        };
        let harness = DifferentialHarness::new(Arc::new(faulty()), config).unwrap();
        let report = harness.run_vectors(vectors.clone()).await.unwrap();
        verdicts.push((report.verdict, report.comparisons));
    }

    assert_eq!(verdicts[0], verdicts[1]);
    assert_eq!(verdicts[0], verdicts[2]);
    let (verdict, comparisons) = &verdicts[0];
    assert_eq!(verdict.outcomes().next().map(|o| o.opcode), Some(Opcode::Sar));
    assert_eq!(*comparisons, 11 * 25 + usize::from(Opcode::Sar.index()) + 1);
}

async fn run_with_faulty_mulmod(config: HarnessConfig) -> BatchReport {
    let faulty = InProcess::new(BitFlip::new(Evm, Opcode::MulMod, 17));
    DifferentialHarness::new(Arc::new(faulty), config)
        .unwrap()
        .run()
        .await
        .unwrap()
}

#[tokio::test]
async fn seeded_runs_replay() {
    let config = HarnessConfig {
        vectors: 30,
        report: ReportMode::Exhaustive,
        stimulus: StimulusConfig {
            seed: Some(0x5eed),
            ..Default::default()
        },
        ..Default::default()
    };

    let first = run_with_faulty_mulmod(config.clone()).await;
    let second = run_with_faulty_mulmod(config).await;
    assert_eq!(first.seed, Some(0x5eed));
    assert_eq!(first.verdict, second.verdict);
    // Every vector fails MulMod and nothing else.
    assert_eq!(first.verdict.outcomes().count(), 30);
    assert!(first.verdict.outcomes().all(|o| o.opcode == Opcode::MulMod));
}

#[tokio::test]
async fn add_and_mulmod_over_sixty_vectors_pass() {
    let config = HarnessConfig {
        vectors: 60,
        mask: OpcodeMask::from_names(["ADD", "mulmod"]).unwrap(),
        ..Default::default()
    };
    let harness = DifferentialHarness::new(Arc::new(InProcess::new(Evm)), config).unwrap();
    let report = harness.run().await.unwrap();

    assert_eq!(report.verdict, Verdict::AllPassed);
    assert_eq!(report.comparisons, 120);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn corrupted_add_is_reported_with_its_operands() {
    let injected = vector(41, 1, 0);
    let faulty = InProcess::new(BitFlip::new(Evm, Opcode::Add, 0).only_for([injected]));
    let harness = DifferentialHarness::new(Arc::new(faulty), HarnessConfig::default()).unwrap();

    let mut vectors = sequential_vectors(5);
    vectors.insert(2, injected);
    let report = harness.run_vectors(vectors).await.unwrap();

    let mismatch = report.first_mismatch().unwrap();
    assert!(!mismatch.outcome.passing);
    assert_eq!(mismatch.vector_index, 2);
    assert_eq!(mismatch.outcome.opcode, Opcode::Add);
    assert_eq!(mismatch.outcome.x, injected.x);
    assert_eq!(mismatch.outcome.y, injected.y);
    assert_eq!(mismatch.outcome.want, wordcheck_test::word(42));
    assert_eq!(mismatch.outcome.have, wordcheck_test::word(43));
}
