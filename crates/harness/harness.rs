use std::{
    collections::BTreeMap,
    future::Future,
    ops::Bound,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, error, info, warn};
use wordcheck_common::{ConfigurationError, Opcode, OpcodeMask, OperandVector, Word256};

use crate::{
    config::{DispatchMode, HarnessConfig, InvocationPolicy, ReportMode},
    errors::{HarnessError, InvocationError, InvocationTarget},
    oracle::ReferenceOracle,
    report::{BatchReport, Discrepancy, SkippedInvocation, TestOutcome, Verdict},
    stimulus::StimulusGenerator,
    sut::{BatchVerdict, SystemUnderTest},
};

/// Position of a unit of work in (vector index, opcode index) order.
type Ordinal = (usize, u8);

/// One invocation of the system under test.
#[derive(Debug)]
enum Job {
    Single {
        vector_index: usize,
        opcode: Opcode,
        vector: OperandVector,
    },
    Chunk {
        first_vector: usize,
        vectors: Vec<OperandVector>,
    },
}

impl Job {
    fn ordinal(&self) -> Ordinal {
        match self {
            Job::Single {
                vector_index,
                opcode,
                ..
            } => (*vector_index, opcode.index()),
            Job::Chunk { first_vector, .. } => (*first_vector, 0),
        }
    }

    fn target(&self) -> InvocationTarget {
        match self {
            Job::Single {
                vector_index,
                opcode,
                ..
            } => InvocationTarget::Single {
                vector_index: *vector_index,
                opcode: *opcode,
            },
            Job::Chunk {
                first_vector,
                vectors,
            } => InvocationTarget::Batch {
                first_vector: *first_vector,
                count: vectors.len(),
            },
        }
    }

    fn skipped(&self, mask: OpcodeMask, reason: &InvocationError) -> SkippedInvocation {
        match self {
            Job::Single {
                vector_index,
                opcode,
                ..
            } => SkippedInvocation {
                first_vector: *vector_index,
                opcode: Some(*opcode),
                comparisons: 1,
                reason: reason.to_string(),
            },
            Job::Chunk {
                first_vector,
                vectors,
            } => SkippedInvocation {
                first_vector: *first_vector,
                opcode: None,
                comparisons: vectors.len() * mask.len(),
                reason: reason.to_string(),
            },
        }
    }
}

#[derive(Debug)]
enum Completion {
    Compared {
        comparisons: usize,
        discrepancy: Option<Discrepancy>,
    },
    Failed(InvocationError),
}

/// Runs operand vectors through a system under test and compares every
/// enabled opcode against the reference oracle.
///
/// Invocations run concurrently, at most `concurrency` at a time, and are
/// admitted in (vector index, opcode index) order. The report does not depend
/// on completion order: under fail-fast the mismatch reported is always the
/// lowest-ordered one.
pub struct DifferentialHarness<S: ?Sized> {
    sut: Arc<S>,
    config: HarnessConfig,
}

impl<S> DifferentialHarness<S>
where
    S: SystemUnderTest + ?Sized + 'static,
{
    pub fn new(sut: Arc<S>, config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self { sut, config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Generates `config.vectors` operand vectors and runs them.
    pub async fn run(&self) -> Result<BatchReport, HarnessError> {
        let mut generator = StimulusGenerator::new(&self.config.stimulus);
        let vectors = generator.generate(self.config.vectors);
        self.execute(vectors, Some(generator.seed())).await
    }

    /// Runs caller-supplied operand vectors.
    pub async fn run_vectors(&self, vectors: Vec<OperandVector>) -> Result<BatchReport, HarnessError> {
        if vectors.is_empty() {
            return Err(ConfigurationError::ZeroLimit("vectors").into());
        }
        self.execute(vectors, None).await
    }

    fn plan(&self, vectors: Vec<OperandVector>) -> Vec<Job> {
        let mask = self.config.mask;
        match self.config.dispatch {
            DispatchMode::PerOpcode => vectors
                .into_iter()
                .enumerate()
                .flat_map(|(vector_index, vector)| {
                    mask.iter().map(move |opcode| Job::Single {
                        vector_index,
                        opcode,
                        vector,
                    })
                })
                .collect(),
            DispatchMode::Batched { chunk_size } => vectors
                .chunks(chunk_size)
                .enumerate()
                .map(|(i, chunk)| Job::Chunk {
                    first_vector: i * chunk_size,
                    vectors: chunk.to_vec(),
                })
                .collect(),
        }
    }

    fn spawn(&self, tasks: &mut JoinSet<(Job, Result<Completion, ConfigurationError>)>, job: Job) -> AbortHandle {
        let sut = Arc::clone(&self.sut);
        let timeout = self.config.invocation_timeout;
        let mask = self.config.mask;

        tasks.spawn(async move {
            let completion = match &job {
                Job::Single {
                    vector_index,
                    opcode,
                    vector,
                } => match with_timeout(timeout, sut.invoke(*opcode, *vector)).await {
                    Ok(have) => Ok(compare_single(*vector_index, *opcode, vector, have)),
                    Err(err) => Ok(Completion::Failed(err)),
                },
                Job::Chunk {
                    first_vector,
                    vectors,
                } => {
                    let words = OperandVector::flatten(vectors);
                    match with_timeout(timeout, sut.invoke_batch(&words, mask)).await {
                        Ok(verdict) => resolve_batch(*first_vector, vectors, mask, &verdict),
                        Err(err) => Ok(Completion::Failed(err)),
                    }
                }
            };
            (job, completion)
        })
    }

    async fn execute(
        &self,
        vectors: Vec<OperandVector>,
        seed: Option<u64>,
    ) -> Result<BatchReport, HarnessError> {
        let start = Instant::now();
        let config = &self.config;
        let fail_fast = config.report == ReportMode::FailFast;
        let abort_on_error = config.on_invocation_error == InvocationPolicy::Abort;
        let vector_count = vectors.len();

        info!(
            sut = self.sut.name(),
            vectors = vector_count,
            mask = %config.mask,
            dispatch = ?config.dispatch,
            concurrency = config.concurrency,
            seed = ?seed,
            "Starting differential run"
        );

        let mut jobs = self.plan(vectors).into_iter();
        let mut tasks = JoinSet::new();
        let mut in_flight: BTreeMap<Ordinal, AbortHandle> = BTreeMap::new();
        let mut completions: BTreeMap<Ordinal, (Job, Completion)> = BTreeMap::new();
        // Lowest ordinal of an event that ends the run early.
        let mut cutoff: Option<Ordinal> = None;

        loop {
            if cutoff.is_none() {
                while tasks.len() < config.concurrency {
                    let Some(job) = jobs.next() else {
                        break;
                    };
                    debug!(invocation = %job.target(), "Dispatching invocation");
                    let ordinal = job.ordinal();
                    let handle = self.spawn(&mut tasks, job);
                    in_flight.insert(ordinal, handle);
                }
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };
            let (job, completion) = match joined {
                Ok(done) => done,
                Err(err) if err.is_cancelled() => continue,
                Err(err) => {
                    tasks.abort_all();
                    return Err(HarnessError::Task(err.to_string()));
                }
            };
            let ordinal = job.ordinal();
            in_flight.remove(&ordinal);

            let completion = match completion {
                Ok(completion) => completion,
                Err(err) => {
                    tasks.abort_all();
                    return Err(err.into());
                }
            };

            let stop_at = match &completion {
                Completion::Compared {
                    discrepancy: Some(discrepancy),
                    ..
                } if fail_fast => Some(discrepancy.ordinal()),
                Completion::Failed(_) if abort_on_error => Some(ordinal),
                _ => None,
            };
            if let Some(stop_at) = stop_at {
                if cutoff.is_none_or(|current| stop_at < current) {
                    debug!(?stop_at, "Stopping admission, draining earlier invocations");
                    cutoff = Some(stop_at);
                    in_flight
                        .range((Bound::Excluded(stop_at), Bound::Unbounded))
                        .for_each(|(_, handle)| handle.abort());
                }
            }

            completions.insert(ordinal, (job, completion));
        }

        // Every unit ordered before the cutoff has completed, so walking the
        // completions in order gives the same report for any interleaving.
        let mut comparisons = 0;
        let mut discrepancies = Vec::new();
        let mut skipped = Vec::new();
        for (job, completion) in completions.into_values() {
            match completion {
                Completion::Compared {
                    comparisons: compared,
                    discrepancy,
                } => {
                    comparisons += compared;
                    if let Some(discrepancy) = discrepancy {
                        let outcome = &discrepancy.outcome;
                        error!(
                            vector = discrepancy.vector_index,
                            opcode = %outcome.opcode,
                            have = %outcome.have,
                            want = %outcome.want,
                            x = %outcome.x,
                            y = %outcome.y,
                            z = %outcome.z,
                            "Value mismatch"
                        );
                        discrepancies.push(discrepancy);
                        if fail_fast {
                            break;
                        }
                    }
                }
                Completion::Failed(source) if abort_on_error => {
                    return Err(HarnessError::Invocation {
                        target: job.target(),
                        source,
                    });
                }
                Completion::Failed(source) => {
                    warn!(invocation = %job.target(), error = %source, "Skipping failed invocation");
                    skipped.push(job.skipped(config.mask, &source));
                }
            }
        }

        let verdict = if discrepancies.is_empty() {
            Verdict::AllPassed
        } else {
            Verdict::Mismatch(discrepancies)
        };
        let report = BatchReport {
            sut: self.sut.name().to_string(),
            seed,
            vectors: vector_count,
            verdict,
            comparisons,
            skipped,
            elapsed: start.elapsed(),
        };

        info!(
            passed = report.verdict.is_pass(),
            comparisons = report.comparisons,
            skipped = report.skipped_comparisons(),
            elapsed = ?report.elapsed,
            "Differential run finished"
        );
        Ok(report)
    }
}

async fn with_timeout<T>(
    limit: Option<Duration>,
    call: impl Future<Output = Result<T, InvocationError>>,
) -> Result<T, InvocationError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(InvocationError::Timeout(limit))),
        None => call.await,
    }
}

fn compare_single(
    vector_index: usize,
    opcode: Opcode,
    vector: &OperandVector,
    have: Word256,
) -> Completion {
    let want = ReferenceOracle::evaluate_vector(opcode, vector);
    let outcome = TestOutcome::new(opcode, vector, have, want);
    Completion::Compared {
        comparisons: 1,
        discrepancy: (!outcome.passing).then_some(Discrepancy {
            vector_index,
            outcome,
        }),
    }
}

/// Checks a batch verdict against the submitted chunk and the oracle.
///
/// A failing verdict must name an enabled opcode, carry operands from the
/// chunk, and expect exactly what the oracle computes; anything else means the
/// two sides disagree on the opcode numbering or the operand layout.
fn resolve_batch(
    first_vector: usize,
    vectors: &[OperandVector],
    mask: OpcodeMask,
    verdict: &BatchVerdict,
) -> Result<Completion, ConfigurationError> {
    if verdict.passing {
        return Ok(Completion::Compared {
            comparisons: vectors.len() * mask.len(),
            discrepancy: None,
        });
    }

    let opcode = Opcode::from_index(verdict.opcode_index)?;
    if !mask.contains(opcode) {
        return Err(ConfigurationError::ReportedOpcodeNotEnabled(verdict.opcode_index));
    }
    let numbering_mismatch = || ConfigurationError::NumberingMismatch {
        opcode: opcode.name().to_string(),
    };

    let vector = verdict.vector();
    let want = ReferenceOracle::evaluate_vector(opcode, &vector);
    if verdict.want != want || verdict.have == want {
        return Err(numbering_mismatch());
    }
    let position = vectors
        .iter()
        .position(|candidate| *candidate == vector)
        .ok_or_else(numbering_mismatch)?;

    let opcodes_before = mask.iter().take_while(|enabled| *enabled != opcode).count();
    Ok(Completion::Compared {
        comparisons: position * mask.len() + opcodes_before + 1,
        discrepancy: Some(Discrepancy {
            vector_index: first_vector + position,
            outcome: TestOutcome::new(opcode, &vector, verdict.have, want),
        }),
    })
}
