use std::{fs, path::PathBuf, time::Duration};

use clap::{ArgAction, Parser as ClapParser, ValueEnum};
use eyre::WrapErr;
use tracing::Level;
use wordcheck_common::{Opcode, OpcodeMask, serde_utils};
use wordcheck_harness::{DispatchMode, HarnessConfig, InvocationPolicy, ReportMode};

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

#[allow(clippy::upper_case_acronyms)]
#[derive(ClapParser)]
#[command(name = "wordcheck", author, version = VERSION_STRING, about = "Differential tester for the 256-bit EVM word opcodes", long_about = None)]
pub struct CLI {
    #[command(flatten)]
    pub opts: Options,
}

/// Which implementation the harness is pointed at.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SutKind {
    /// The stack VM, called in process.
    #[default]
    Vm,
    /// The stack VM behind the word wire codec.
    Loopback,
    /// The stack VM with one opcode corrupted by a bit flip.
    Faulty,
}

#[derive(ClapParser, Debug)]
pub struct Options {
    #[arg(
        long = "config",
        value_name = "CONFIG_FILE",
        env = "WORDCHECK_CONFIG",
        help = "JSON harness configuration. Flags override its fields."
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long = "vectors",
        short = 'n',
        value_name = "COUNT",
        env = "WORDCHECK_VECTORS",
        help = "Number of random operand vectors."
    )]
    pub vectors: Option<usize>,
    #[arg(
        long = "opcodes",
        value_name = "OPCODE_LIST",
        value_delimiter = ',',
        num_args = 1..,
        env = "WORDCHECK_OPCODES",
        help = "Comma separated opcode names to enable. All opcodes by default."
    )]
    pub opcodes: Vec<String>,
    #[arg(long = "seed", value_name = "SEED", env = "WORDCHECK_SEED")]
    pub seed: Option<u64>,
    #[arg(
        long = "boundaries",
        action = ArgAction::SetTrue,
        help = "Prepend the boundary-value vectors to the random ones."
    )]
    pub boundaries: bool,
    #[arg(long = "concurrency", value_name = "TASKS", env = "WORDCHECK_CONCURRENCY")]
    pub concurrency: Option<usize>,
    #[arg(
        long = "chunk-size",
        value_name = "VECTORS",
        help = "Use batched dispatch with this many vectors per invocation."
    )]
    pub chunk_size: Option<usize>,
    #[arg(
        long = "exhaustive",
        action = ArgAction::SetTrue,
        help = "Report every mismatch instead of stopping at the first one."
    )]
    pub exhaustive: bool,
    #[arg(
        long = "timeout",
        value_name = "DURATION",
        value_parser = parse_timeout,
        help = "Per-invocation timeout, e.g. 250ms or 2s."
    )]
    pub timeout: Option<Duration>,
    #[arg(long = "on-invocation-error", value_name = "POLICY", help = "`abort` or `skip`.")]
    pub on_invocation_error: Option<InvocationPolicy>,
    #[arg(long = "sut", value_enum, default_value_t = SutKind::Vm, value_name = "SUT")]
    pub sut: SutKind,
    #[arg(
        long = "fault.opcode",
        default_value = "add",
        value_name = "OPCODE",
        help_heading = "Fault injection"
    )]
    pub fault_opcode: Opcode,
    #[arg(
        long = "fault.bit",
        default_value_t = 0,
        value_name = "BIT",
        help_heading = "Fault injection"
    )]
    pub fault_bit: u32,
    #[arg(long = "report", value_name = "REPORT_FILE", help = "Write the JSON report here.")]
    pub report: Option<PathBuf>,
    #[arg(long = "log.level", default_value_t = Level::INFO, value_name = "LOG_LEVEL")]
    pub log_level: Level,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: None,
            vectors: None,
            opcodes: Vec::new(),
            seed: None,
            boundaries: false,
            concurrency: None,
            chunk_size: None,
            exhaustive: false,
            timeout: None,
            on_invocation_error: None,
            sut: SutKind::default(),
            fault_opcode: Opcode::Add,
            fault_bit: 0,
            report: None,
            log_level: Level::INFO,
        }
    }
}

impl Options {
    /// Loads the config file, if any, and applies the command line overrides.
    pub fn harness_config(&self) -> eyre::Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
                HarnessConfig::from_json(&json)
                    .wrap_err_with(|| format!("Invalid config file {}", path.display()))?
            }
            None => HarnessConfig::default(),
        };

        if let Some(vectors) = self.vectors {
            config.vectors = vectors;
        }
        if !self.opcodes.is_empty() {
            config.mask = OpcodeMask::from_names(&self.opcodes)?;
        }
        if let Some(seed) = self.seed {
            config.stimulus.seed = Some(seed);
        }
        if self.boundaries {
            config.stimulus.include_boundaries = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.dispatch = DispatchMode::Batched { chunk_size };
        }
        if self.exhaustive {
            config.report = ReportMode::Exhaustive;
        }
        if let Some(timeout) = self.timeout {
            config.invocation_timeout = Some(timeout);
        }
        if let Some(policy) = self.on_invocation_error {
            config.on_invocation_error = policy;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_timeout(input: &str) -> Result<Duration, String> {
    serde_utils::parse_duration(input).ok_or_else(|| format!("Invalid duration: {input}"))
}
