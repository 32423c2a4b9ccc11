use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use wordcheck_common::{ConfigurationError, OpcodeMask, serde_utils};

pub const DEFAULT_VECTORS: usize = 60;
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const DEFAULT_RESTRICTED_FRACTION: f64 = 1.0 / 6.0;

/// How mismatches are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ReportMode {
    /// Only the first mismatch in (vector index, opcode index) order.
    #[default]
    FailFast,
    /// Every mismatch, in (vector index, opcode index) order.
    Exhaustive,
}

/// What to do when the system under test fails to produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum InvocationPolicy {
    #[default]
    Abort,
    /// Record the affected comparisons as skipped and carry on.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchMode {
    /// One invocation per (vector, enabled opcode).
    #[default]
    PerOpcode,
    /// Chunks of vectors sent through the batch entry point.
    Batched { chunk_size: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StimulusConfig {
    /// Fixed seed for replayable runs; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    pub byte_index_fraction: f64,
    pub shift_fraction: f64,
    pub include_boundaries: bool,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            seed: None,
            byte_index_fraction: DEFAULT_RESTRICTED_FRACTION,
            shift_fraction: DEFAULT_RESTRICTED_FRACTION,
            include_boundaries: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub vectors: usize,
    #[serde(with = "mask_repr")]
    pub mask: OpcodeMask,
    pub report: ReportMode,
    pub dispatch: DispatchMode,
    pub concurrency: usize,
    #[serde(with = "serde_utils::duration::opt")]
    pub invocation_timeout: Option<Duration>,
    pub on_invocation_error: InvocationPolicy,
    pub stimulus: StimulusConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            vectors: DEFAULT_VECTORS,
            mask: OpcodeMask::ALL,
            report: ReportMode::default(),
            dispatch: DispatchMode::default(),
            concurrency: DEFAULT_CONCURRENCY,
            invocation_timeout: None,
            on_invocation_error: InvocationPolicy::default(),
            stimulus: StimulusConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rejects configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.vectors == 0 {
            return Err(ConfigurationError::ZeroLimit("vectors"));
        }
        if self.mask.is_empty() {
            return Err(ConfigurationError::EmptyMask);
        }
        if self.concurrency == 0 {
            return Err(ConfigurationError::ZeroLimit("concurrency"));
        }
        if let DispatchMode::Batched { chunk_size: 0 } = self.dispatch {
            return Err(ConfigurationError::ZeroLimit("chunk_size"));
        }
        if self.invocation_timeout == Some(Duration::ZERO) {
            return Err(ConfigurationError::ZeroLimit("invocation_timeout"));
        }

        let stimulus = &self.stimulus;
        check_fraction("byte_index_fraction", stimulus.byte_index_fraction)?;
        check_fraction("shift_fraction", stimulus.shift_fraction)?;
        check_fraction(
            "byte_index_fraction + shift_fraction",
            stimulus.byte_index_fraction + stimulus.shift_fraction,
        )?;

        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::FractionOutOfRange { name, value })
    }
}

/// Masks are written as a list of opcode names and read from either a name
/// list or raw bits.
mod mask_repr {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use wordcheck_common::{Opcode, OpcodeMask};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Bits(u64),
        Names(Vec<String>),
    }

    pub fn serialize<S>(mask: &OpcodeMask, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(mask.iter().map(Opcode::name))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<OpcodeMask, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mask = match Repr::deserialize(d)? {
            Repr::Bits(bits) => OpcodeMask::from_bits(bits),
            Repr::Names(names) => OpcodeMask::from_names(names),
        };
        mask.map_err(D::Error::custom)
    }
}
