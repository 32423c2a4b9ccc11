use crate::constants::{NUM_OPCODES, WORDS_PER_VECTOR};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWordError {
    #[error("empty input")]
    Empty,
    #[error("invalid digit {0:?}")]
    InvalidDigit(char),
    #[error("value does not fit in 256 bits")]
    Overflow,
}

/// Fatal misconfiguration of a differential run. Raised before any comparison
/// is made whenever it can be detected up front.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown opcode name `{0}`")]
    UnknownOpcode(String),
    #[error("opcode index {0} is outside the {n} word opcodes", n = NUM_OPCODES)]
    UnknownOpcodeIndex(u64),
    #[error("opcode mask {0:#x} sets bits beyond the {n} word opcodes", n = NUM_OPCODES)]
    MaskOutOfRange(u64),
    #[error("opcode mask selects no opcodes")]
    EmptyMask,
    #[error("operand array of {0} words is not a multiple of {n}", n = WORDS_PER_VECTOR)]
    RaggedOperandArray(usize),
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("{name} fraction {value} is outside [0, 1]")]
    FractionOutOfRange { name: &'static str, value: f64 },
    #[error(
        "system under test reported a failure for opcode index {0}, which the mask does not enable"
    )]
    ReportedOpcodeNotEnabled(u64),
    #[error(
        "system under test's expected value for {opcode} disagrees with the reference; opcode numbering mismatch"
    )]
    NumberingMismatch { opcode: String },
}
