use std::{fmt, time::Duration};

use thiserror::Error;
use wordcheck_common::{ConfigurationError, Opcode};

use crate::wire::WireError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Invocation failed for {target}: {source}")]
    Invocation {
        target: InvocationTarget,
        #[source]
        source: InvocationError,
    },
    #[error("Comparison task failed: {0}")]
    Task(String),
}

/// Failure to obtain a result from the system under test. Never a verdict on
/// the arithmetic itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Malformed payload: {0}")]
    Malformed(#[from] WireError),
    #[error("Batch invocation is not supported by this system under test")]
    BatchUnsupported,
    #[error("Engine failure: {0}")]
    Engine(String),
    #[error("Rejected operands: {0}")]
    Operands(#[from] OracleError),
}

impl From<wordcheck_vm::VMError> for InvocationError {
    fn from(err: wordcheck_vm::VMError) -> Self {
        InvocationError::Engine(err.to_string())
    }
}

/// Raised when the oracle is asked to evaluate outside its arithmetic domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("{opcode} takes {expected} operands, got {got}")]
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        got: usize,
    },
}

/// What a failed invocation was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationTarget {
    Single { vector_index: usize, opcode: Opcode },
    Batch { first_vector: usize, count: usize },
}

impl fmt::Display for InvocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationTarget::Single {
                vector_index,
                opcode,
            } => write!(f, "{opcode} on vector {vector_index}"),
            InvocationTarget::Batch {
                first_vector,
                count,
            } => write!(
                f,
                "batch of vectors {first_vector}..{}",
                first_vector + count
            ),
        }
    }
}
