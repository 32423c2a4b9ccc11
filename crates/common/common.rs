//! # wordcheck-common
//!
//! Fixed-width 256-bit words and the EVM word opcodes defined over them.
//!
//! - [`Word256`]: four little-endian `u64` limbs with wrapping arithmetic
//! - [`Word512`]: double-width intermediate for `ADDMOD` and `MULMOD`
//! - [`ops`]: the 25 word opcodes with their EVM conventions
//! - [`Opcode`] / [`OpcodeMask`]: the fixed opcode numbering and selection mask

pub mod constants;
pub mod errors;
pub mod opcode;
pub mod ops;
pub mod serde_utils;
pub mod word;

pub use errors::{ConfigurationError, ParseWordError};
pub use opcode::{Opcode, OpcodeMask, OperandVector};
pub use word::{Word256, Word512};
