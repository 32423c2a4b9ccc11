use std::fmt;

use crate::constants::WORD_LIMBS;

use super::{division, word256::Word256};

/// A 512-bit unsigned integer, the exact intermediate of a 256-bit sum with
/// carry or a full 256 × 256 product.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Word512([u64; 2 * WORD_LIMBS]);

impl Word512 {
    pub const ZERO: Self = Self([0; 2 * WORD_LIMBS]);

    pub const fn from_limbs(limbs: [u64; 2 * WORD_LIMBS]) -> Self {
        Self(limbs)
    }

    pub const fn into_limbs(self) -> [u64; 2 * WORD_LIMBS] {
        self.0
    }

    pub fn from_halves(low: Word256, high: Word256) -> Self {
        let mut limbs = [0u64; 2 * WORD_LIMBS];
        limbs[..WORD_LIMBS].copy_from_slice(low.as_limbs());
        limbs[WORD_LIMBS..].copy_from_slice(high.as_limbs());
        Self(limbs)
    }

    /// The 257-bit result of a 256-bit addition: `sum + carry * 2^256`.
    pub fn from_carried_sum(sum: Word256, carry: bool) -> Self {
        Self::from_halves(sum, Word256::from(carry))
    }

    pub fn low(self) -> Word256 {
        Word256::from_limbs([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn high(self) -> Word256 {
        Word256::from_limbs([self.0[4], self.0[5], self.0[6], self.0[7]])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&limb| limb == 0)
    }

    /// Quotient and remainder by a 256-bit divisor, or `None` when it is zero.
    pub fn checked_div_rem(self, divisor: Word256) -> Option<(Self, Word256)> {
        if divisor.is_zero() {
            return None;
        }
        let (quotient, remainder) = division::div_rem(&self.0, divisor.as_limbs());
        Some((Self(quotient), Word256::from_limbs(remainder)))
    }

    /// Remainder by a 256-bit modulus, or `None` when it is zero.
    pub fn checked_rem(self, modulus: Word256) -> Option<Word256> {
        self.checked_div_rem(modulus)
            .map(|(_, remainder)| remainder)
    }
}

impl From<Word256> for Word512 {
    fn from(value: Word256) -> Self {
        Self::from_halves(value, Word256::ZERO)
    }
}

impl fmt::Debug for Word512 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word512 {{ high: {:#x}, low: {:#x} }}", self.high(), self.low())
    }
}
