//! # wordcheck-harness
//!
//! Differential testing of 256-bit word-opcode implementations.
//!
//! A [`DifferentialHarness`] feeds operand vectors from the
//! [`StimulusGenerator`] to a [`SystemUnderTest`], compares each result with
//! the [`ReferenceOracle`] and summarizes the run in a [`BatchReport`].

pub mod config;
pub mod errors;
pub mod harness;
pub mod oracle;
pub mod report;
pub mod stimulus;
pub mod sut;
pub mod wire;

pub use config::{DispatchMode, HarnessConfig, InvocationPolicy, ReportMode, StimulusConfig};
pub use errors::{HarnessError, InvocationError, InvocationTarget, OracleError};
pub use harness::DifferentialHarness;
pub use oracle::ReferenceOracle;
pub use report::{BatchReport, Discrepancy, SkippedInvocation, TestOutcome, Verdict};
pub use stimulus::StimulusGenerator;
pub use sut::{BatchVerdict, BitFlip, Evm, InProcess, Loopback, SystemUnderTest, WordEngine};
