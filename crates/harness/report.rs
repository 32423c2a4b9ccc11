use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use wordcheck_common::{Opcode, OperandVector, Word256};

/// Result of one (vector, opcode) comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub passing: bool,
    pub opcode: Opcode,
    pub have: Word256,
    pub want: Word256,
    pub x: Word256,
    pub y: Word256,
    pub z: Word256,
}

impl TestOutcome {
    pub fn new(opcode: Opcode, vector: &OperandVector, have: Word256, want: Word256) -> Self {
        Self {
            passing: have == want,
            opcode,
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

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Opcode: {}", self.opcode)?;
        writeln!(f, "have: {}", self.have)?;
        writeln!(f, "want: {}", self.want)?;
        writeln!(f, "x: {}", self.x)?;
        writeln!(f, "y: {}", self.y)?;
        write!(f, "z: {}", self.z)
    }
}

/// A failing comparison and the position of its vector in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub vector_index: usize,
    #[serde(flatten)]
    pub outcome: TestOutcome,
}

impl Discrepancy {
    /// Position in (vector index, opcode index) order.
    pub fn ordinal(&self) -> (usize, u8) {
        (self.vector_index, self.outcome.opcode.index())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "mismatches", rename_all = "snake_case")]
pub enum Verdict {
    AllPassed,
    /// Failing comparisons in (vector index, opcode index) order.
    Mismatch(Vec<Discrepancy>),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::AllPassed)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &TestOutcome> {
        let discrepancies: &[Discrepancy] = match self {
            Verdict::AllPassed => &[],
            Verdict::Mismatch(discrepancies) => discrepancies,
        };
        discrepancies.iter().map(|discrepancy| &discrepancy.outcome)
    }
}

/// Comparisons that could not be made because the invocation failed under the
/// skip policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedInvocation {
    pub first_vector: usize,
    /// `None` for a batch invocation covering every enabled opcode.
    pub opcode: Option<Opcode>,
    pub comparisons: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub sut: String,
    pub seed: Option<u64>,
    pub vectors: usize,
    pub verdict: Verdict,
    /// Comparisons actually evaluated.
    pub comparisons: usize,
    pub skipped: Vec<SkippedInvocation>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn skipped_comparisons(&self) -> usize {
        self.skipped.iter().map(|skip| skip.comparisons).sum()
    }

    pub fn first_mismatch(&self) -> Option<&Discrepancy> {
        match &self.verdict {
            Verdict::AllPassed => None,
            Verdict::Mismatch(discrepancies) => discrepancies.first(),
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verdict {
            Verdict::AllPassed => writeln!(f, "Test passed!")?,
            Verdict::Mismatch(discrepancies) => {
                writeln!(f, "Test failed. Here's the data:")?;
                for discrepancy in discrepancies {
                    writeln!(f, "Vector: {}", discrepancy.vector_index)?;
                    writeln!(f, "{}", discrepancy.outcome)?;
                }
            }
        }
        write!(
            f,
            "{} comparisons over {} vectors against {} in {:?}",
            self.comparisons, self.vectors, self.sut, self.elapsed
        )?;
        if !self.skipped.is_empty() {
            write!(f, ", {} skipped", self.skipped_comparisons())?;
        }
        Ok(())
    }
}
