pub mod cli;
pub mod initializers;

use std::fs;

use eyre::WrapErr;
use tracing::info;
use wordcheck_harness::{BatchReport, DifferentialHarness};

use crate::{cli::Options, initializers::init_sut};

pub const EXIT_ALL_PASSED: u8 = 0;
pub const EXIT_MISMATCH: u8 = 1;
pub const EXIT_ERROR: u8 = 2;

/// Runs one differential batch as described by the command line.
pub async fn run(opts: &Options) -> eyre::Result<BatchReport> {
    let config = opts.harness_config()?;
    let harness = DifferentialHarness::new(init_sut(opts), config)?;
    let report = harness.run().await?;

    if let Some(path) = &opts.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .wrap_err_with(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    Ok(report)
}

/// Process exit status for the outcome of [`run`].
pub fn exit_code(outcome: &eyre::Result<BatchReport>) -> u8 {
    match outcome {
        Ok(report) if report.verdict.is_pass() => EXIT_ALL_PASSED,
        Ok(_) => EXIT_MISMATCH,
        Err(_) => EXIT_ERROR,
    }
}
