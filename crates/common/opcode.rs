use std::{fmt, ops::BitOr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoEnumIterator, IntoStaticStr};

use crate::{
    constants::{NUM_OPCODES, OPCODE_MASK_BITS, WORDS_PER_VECTOR},
    errors::ConfigurationError,
    word::Word256,
};

/// The word opcodes under test.
///
/// The discriminant is the opcode's bit in an [`OpcodeMask`] and the index a
/// batch-capable system under test reports back. The numbering is shared with
/// every implementation under test and must never be reordered.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    Display,
    EnumIter,
    EnumCount,
    FromRepr,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Opcode {
    // Arithmetic Operations
    Add = 0,
    Mul = 1,
    Sub = 2,
    Div = 3,
    SDiv = 4,
    Mod = 5,
    SMod = 6,
    AddMod = 7,
    MulMod = 8,
    Exp = 9,
    SignExtend = 10,

    // Comparison Operations
    Lt = 11,
    Gt = 12,
    Slt = 13,
    Sgt = 14,
    Eq = 15,
    IsZero = 16,

    // Bitwise Operations
    And = 17,
    Or = 18,
    Xor = 19,
    Not = 20,
    Byte = 21,
    Shl = 22,
    Shr = 23,
    Sar = 24,
}

const _: () = assert!(Opcode::COUNT == NUM_OPCODES);

impl Opcode {
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Number of words the opcode consumes.
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Not | Opcode::IsZero => 1,
            Opcode::AddMod | Opcode::MulMod => 3,
            _ => 2,
        }
    }

    /// Whether `y` is the byte index or shift amount applied to the value in `x`.
    ///
    /// Holds for `SignExtend`, `Byte`, `Shl`, `Shr` and `Sar`, whose EVM stack
    /// order puts the index above the value.
    pub const fn y_is_index(self) -> bool {
        matches!(
            self,
            Opcode::SignExtend | Opcode::Byte | Opcode::Shl | Opcode::Shr | Opcode::Sar
        )
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn from_index(index: u64) -> Result<Self, ConfigurationError> {
        u8::try_from(index)
            .ok()
            .and_then(Opcode::from_repr)
            .ok_or(ConfigurationError::UnknownOpcodeIndex(index))
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        name.trim()
            .parse()
            .map_err(|_| ConfigurationError::UnknownOpcode(name.to_string()))
    }

    pub fn all() -> impl Iterator<Item = Opcode> {
        Opcode::iter()
    }
}

/// Set of enabled opcodes, bit `i` standing for the opcode with discriminant `i`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct OpcodeMask(u32);

impl OpcodeMask {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(OPCODE_MASK_BITS);

    /// Builds a mask from raw bits, rejecting bits beyond the last opcode.
    pub fn from_bits(bits: u64) -> Result<Self, ConfigurationError> {
        match u32::try_from(bits) {
            Ok(bits) if bits & !OPCODE_MASK_BITS == 0 => Ok(Self(bits)),
            _ => Err(ConfigurationError::MaskOutOfRange(bits)),
        }
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn from_opcodes(opcodes: impl IntoIterator<Item = Opcode>) -> Self {
        opcodes.into_iter().fold(Self::EMPTY, Self::with)
    }

    /// ORs together the bit of every named opcode.
    pub fn from_names<I, S>(names: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::EMPTY, |mask, name| {
            Opcode::from_name(name.as_ref()).map(|opcode| mask.with(opcode))
        })
    }

    #[must_use]
    pub const fn with(self, opcode: Opcode) -> Self {
        Self(self.0 | opcode.bit())
    }

    pub fn insert(&mut self, opcode: Opcode) {
        self.0 |= opcode.bit();
    }

    pub const fn contains(self, opcode: Opcode) -> bool {
        self.0 & opcode.bit() != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Enabled opcodes in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = Opcode> {
        Opcode::iter().filter(move |opcode| self.contains(*opcode))
    }
}

impl BitOr for OpcodeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl FromIterator<Opcode> for OpcodeMask {
    fn from_iter<T: IntoIterator<Item = Opcode>>(iter: T) -> Self {
        Self::from_opcodes(iter)
    }
}

impl TryFrom<u32> for OpcodeMask {
    type Error = ConfigurationError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::from_bits(u64::from(bits))
    }
}

impl From<OpcodeMask> for u32 {
    fn from(mask: OpcodeMask) -> Self {
        mask.0
    }
}

impl fmt::Display for OpcodeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Opcode::name).collect();
        write!(f, "{}", names.join(","))
    }
}

impl fmt::Debug for OpcodeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpcodeMask({:#09x}: {self})", self.0)
    }
}

/// Operands of one test case. `z` is ignored by 1- and 2-ary opcodes and `y`
/// by 1-ary ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OperandVector {
    pub x: Word256,
    pub y: Word256,
    pub z: Word256,
}

impl OperandVector {
    pub const fn new(x: Word256, y: Word256, z: Word256) -> Self {
        Self { x, y, z }
    }

    pub const fn words(&self) -> [Word256; WORDS_PER_VECTOR] {
        [self.x, self.y, self.z]
    }

    /// The leading `opcode.arity()` words.
    pub fn operands(&self, opcode: Opcode) -> Vec<Word256> {
        self.words()[..opcode.arity()].to_vec()
    }

    /// Operands in EVM stack order, top of the stack first.
    pub fn stack_operands(&self, opcode: Opcode) -> Vec<Word256> {
        if opcode.y_is_index() {
            vec![self.y, self.x]
        } else {
            self.operands(opcode)
        }
    }

    /// Splits a flat word array into consecutive `(x, y, z)` groups.
    pub fn from_flat(words: &[Word256]) -> Result<Vec<Self>, ConfigurationError> {
        if words.len() % WORDS_PER_VECTOR != 0 {
            return Err(ConfigurationError::RaggedOperandArray(words.len()));
        }
        Ok(words
            .chunks_exact(WORDS_PER_VECTOR)
            .map(|group| Self::new(group[0], group[1], group[2]))
            .collect())
    }

    pub fn flatten(vectors: &[Self]) -> Vec<Word256> {
        vectors.iter().flat_map(Self::words).collect()
    }
}
