use std::{
    cmp::Ordering,
    fmt,
    ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr},
    str::FromStr,
};

use crate::{
    constants::{WORD_BITS, WORD_BYTES, WORD_LIMBS},
    errors::ParseWordError,
};

use super::{division, word512::Word512};

/// A 256-bit unsigned integer stored as four little-endian `u64` limbs.
///
/// Arithmetic wraps modulo 2^256. The signed helpers ([`Word256::is_negative`],
/// [`Word256::negate`], [`Word256::abs`], [`Word256::signed_cmp`]) reinterpret
/// the same bits as a two's-complement value without changing storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Word256([u64; WORD_LIMBS]);

impl Word256 {
    pub const ZERO: Self = Self([0; WORD_LIMBS]);
    pub const ONE: Self = Self([1, 0, 0, 0]);
    pub const MAX: Self = Self([u64::MAX; WORD_LIMBS]);
    /// `2^255`: the most negative value under the signed view.
    pub const SIGN_BIT: Self = Self([0, 0, 0, 1 << 63]);
    /// `2^255 - 1`: the most positive value under the signed view.
    pub const SIGNED_MAX: Self = Self([u64::MAX, u64::MAX, u64::MAX, u64::MAX >> 1]);

    pub const fn from_limbs(limbs: [u64; WORD_LIMBS]) -> Self {
        Self(limbs)
    }

    pub const fn into_limbs(self) -> [u64; WORD_LIMBS] {
        self.0
    }

    pub const fn as_limbs(&self) -> &[u64; WORD_LIMBS] {
        &self.0
    }

    pub const fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    /// Two's-complement encoding of a signed value, e.g. `from_i64(-1) == MAX`.
    pub fn from_i64(value: i64) -> Self {
        let magnitude = Self::from_u64(value.unsigned_abs());
        if value < 0 {
            magnitude.negate()
        } else {
            magnitude
        }
    }

    /// Converts a big endian byte array into a word.
    pub fn from_be_bytes(bytes: [u8; WORD_BYTES]) -> Self {
        let mut limbs = [0u64; WORD_LIMBS];
        let mut limb_bytes = [0u8; 8];
        for (i, limb) in limbs.iter_mut().rev().enumerate() {
            limb_bytes.copy_from_slice(&bytes[8 * i..8 * i + 8]);
            *limb = u64::from_be_bytes(limb_bytes);
        }
        Self(limbs)
    }

    /// Converts a big endian slice of at most 32 bytes, left-padding with zeros.
    pub fn from_be_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() > WORD_BYTES {
            return None;
        }
        let mut padded = [0u8; WORD_BYTES];
        padded[WORD_BYTES - slice.len()..].copy_from_slice(slice);
        Some(Self::from_be_bytes(padded))
    }

    /// Converts the word to a big endian byte array.
    pub fn to_be_bytes(self) -> [u8; WORD_BYTES] {
        let mut bytes = [0u8; WORD_BYTES];
        for (i, limb) in self.0.iter().rev().enumerate() {
            bytes[8 * i..8 * i + 8].copy_from_slice(&limb.to_be_bytes());
        }
        bytes
    }

    pub const fn low_u64(self) -> u64 {
        self.0[0]
    }

    /// Returns the value as a `u64` if it fits.
    pub const fn to_u64(self) -> Option<u64> {
        if self.0[1] | self.0[2] | self.0[3] == 0 {
            Some(self.0[0])
        } else {
            None
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.0[0] | self.0[1] | self.0[2] | self.0[3] == 0
    }

    /// Bit at `index`, counting from the least significant bit. Out-of-range
    /// indices read as zero.
    pub const fn bit(self, index: u32) -> bool {
        if index >= WORD_BITS {
            return false;
        }
        (self.0[(index / 64) as usize] >> (index % 64)) & 1 == 1
    }

    /// Byte at `index`, counting from the least significant byte. Out-of-range
    /// indices read as zero.
    pub const fn byte(self, index: usize) -> u8 {
        if index >= WORD_BYTES {
            return 0;
        }
        (self.0[index / 8] >> (8 * (index % 8))) as u8
    }

    pub fn leading_zeros(self) -> u32 {
        let mut zeros = 0;
        for limb in self.0.iter().rev() {
            if *limb != 0 {
                return zeros + limb.leading_zeros();
            }
            zeros += 64;
        }
        zeros
    }

    /// Number of significant bits.
    pub fn bits(self) -> u32 {
        WORD_BITS - self.leading_zeros()
    }

    /// Shifts the value to the right by 255 bits and checks the most significant bit is a 1
    pub const fn is_negative(self) -> bool {
        self.0[3] >> 63 == 1
    }

    /// Negates a number in two's complement
    pub fn negate(self) -> Self {
        (!self).wrapping_add(Self::ONE)
    }

    pub fn abs(self) -> Self {
        if self.is_negative() {
            self.negate()
        } else {
            self
        }
    }

    /// Ordering under the two's-complement signed view.
    pub fn signed_cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            _ => self.cmp(other),
        }
    }

    pub fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let mut limbs = [0u64; WORD_LIMBS];
        let mut carry = false;
        for (i, limb) in limbs.iter_mut().enumerate() {
            let (sum, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (sum, c2) = sum.overflowing_add(u64::from(carry));
            *limb = sum;
            carry = c1 || c2;
        }
        (Self(limbs), carry)
    }

    pub fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    pub fn overflowing_sub(self, rhs: Self) -> (Self, bool) {
        let mut limbs = [0u64; WORD_LIMBS];
        let mut borrow = false;
        for (i, limb) in limbs.iter_mut().enumerate() {
            let (diff, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (diff, b2) = diff.overflowing_sub(u64::from(borrow));
            *limb = diff;
            borrow = b1 || b2;
        }
        (Self(limbs), borrow)
    }

    pub fn wrapping_sub(self, rhs: Self) -> Self {
        self.overflowing_sub(rhs).0
    }

    /// Full 512-bit product.
    pub fn full_mul(self, rhs: Self) -> Word512 {
        let mut limbs = [0u64; 2 * WORD_LIMBS];
        for i in 0..WORD_LIMBS {
            let mut carry = 0u128;
            for j in 0..WORD_LIMBS {
                let t = u128::from(self.0[i]) * u128::from(rhs.0[j])
                    + u128::from(limbs[i + j])
                    + carry;
                limbs[i + j] = t as u64;
                carry = t >> 64;
            }
            limbs[i + WORD_LIMBS] = carry as u64;
        }
        Word512::from_limbs(limbs)
    }

    pub fn overflowing_mul(self, rhs: Self) -> (Self, bool) {
        let product = self.full_mul(rhs);
        (product.low(), !product.high().is_zero())
    }

    pub fn wrapping_mul(self, rhs: Self) -> Self {
        self.overflowing_mul(rhs).0
    }

    /// Quotient and remainder, or `None` when `rhs` is zero.
    pub fn checked_div_rem(self, rhs: Self) -> Option<(Self, Self)> {
        if rhs.is_zero() {
            return None;
        }
        if self < rhs {
            return Some((Self::ZERO, self));
        }
        let (quotient, remainder) = division::div_rem(&self.0, &rhs.0);
        Some((
            Self([quotient[0], quotient[1], quotient[2], quotient[3]]),
            Self(remainder),
        ))
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.checked_div_rem(rhs).map(|(quotient, _)| quotient)
    }

    pub fn checked_rem(self, rhs: Self) -> Option<Self> {
        self.checked_div_rem(rhs).map(|(_, remainder)| remainder)
    }

    /// Short division by a `u64`, used for decimal formatting.
    pub(crate) fn div_rem_u64(self, divisor: u64) -> (Self, u64) {
        let d = u128::from(divisor);
        let mut limbs = [0u64; WORD_LIMBS];
        let mut rem = 0u128;
        for i in (0..WORD_LIMBS).rev() {
            let current = (rem << 64) | u128::from(self.0[i]);
            limbs[i] = (current / d) as u64;
            rem = current % d;
        }
        (Self(limbs), rem as u64)
    }

    /// `self^exponent mod 2^256` by square-and-multiply.
    pub fn wrapping_pow(self, exponent: Self) -> Self {
        let mut result = Self::ONE;
        let mut base = self;
        for i in 0..exponent.bits() {
            if exponent.bit(i) {
                result = result.wrapping_mul(base);
            }
            base = base.wrapping_mul(base);
        }
        result
    }
}

impl Ord for Word256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for Word256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for Word256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u8> for Word256 {
    fn from(value: u8) -> Self {
        Self::from_u64(u64::from(value))
    }
}

impl From<bool> for Word256 {
    fn from(value: bool) -> Self {
        Self::from_u64(u64::from(value))
    }
}

impl From<[u8; WORD_BYTES]> for Word256 {
    fn from(bytes: [u8; WORD_BYTES]) -> Self {
        Self::from_be_bytes(bytes)
    }
}

impl Not for Word256 {
    type Output = Self;

    fn not(self) -> Self {
        Self(self.0.map(|limb| !limb))
    }
}

impl BitAnd for Word256 {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}

impl BitOr for Word256 {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}

impl BitXor for Word256 {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] ^ rhs.0[i]))
    }
}

/// Logical left shift; shifting by 256 or more yields zero.
impl Shl<u32> for Word256 {
    type Output = Self;

    fn shl(self, shift: u32) -> Self {
        if shift >= WORD_BITS {
            return Self::ZERO;
        }
        let limb_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        let mut limbs = [0u64; WORD_LIMBS];
        for i in limb_shift..WORD_LIMBS {
            let src = i - limb_shift;
            let mut limb = self.0[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                limb |= self.0[src - 1] >> (64 - bit_shift);
            }
            limbs[i] = limb;
        }
        Self(limbs)
    }
}

/// Logical right shift; shifting by 256 or more yields zero.
impl Shr<u32> for Word256 {
    type Output = Self;

    fn shr(self, shift: u32) -> Self {
        if shift >= WORD_BITS {
            return Self::ZERO;
        }
        let limb_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        let mut limbs = [0u64; WORD_LIMBS];
        for (i, limb) in limbs.iter_mut().enumerate().take(WORD_LIMBS - limb_shift) {
            let src = i + limb_shift;
            let mut value = self.0[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < WORD_LIMBS {
                value |= self.0[src + 1] << (64 - bit_shift);
            }
            *limb = value;
        }
        Self(limbs)
    }
}

impl FromStr for Word256 {
    type Err = ParseWordError;

    /// Parses a decimal string, or a hex string when prefixed with `0x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            if digits.is_empty() {
                return Err(ParseWordError::Empty);
            }
            let mut value = Self::ZERO;
            for c in digits.chars() {
                let digit = c.to_digit(16).ok_or(ParseWordError::InvalidDigit(c))?;
                if value.0[3] >> 60 != 0 {
                    return Err(ParseWordError::Overflow);
                }
                value = (value << 4) | Self::from_u64(u64::from(digit));
            }
            return Ok(value);
        }

        if s.is_empty() {
            return Err(ParseWordError::Empty);
        }
        let ten = Self::from_u64(10);
        let mut value = Self::ZERO;
        for c in s.chars() {
            let digit = c.to_digit(10).ok_or(ParseWordError::InvalidDigit(c))?;
            let (shifted, overflow) = value.overflowing_mul(ten);
            if overflow {
                return Err(ParseWordError::Overflow);
            }
            let (next, overflow) = shifted.overflowing_add(Self::from_u64(u64::from(digit)));
            if overflow {
                return Err(ParseWordError::Overflow);
            }
            value = next;
        }
        Ok(value)
    }
}

/// Decimal representation.
impl fmt::Display for Word256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CHUNK: u64 = 10_000_000_000_000_000_000;

        let mut chunks = Vec::new();
        let mut rest = *self;
        loop {
            let (quotient, chunk) = rest.div_rem_u64(CHUNK);
            chunks.push(chunk);
            if quotient.is_zero() {
                break;
            }
            rest = quotient;
        }

        let mut digits = String::with_capacity(chunks.len() * 19);
        for (i, chunk) in chunks.iter().rev().enumerate() {
            if i == 0 {
                digits.push_str(&chunk.to_string());
            } else {
                digits.push_str(&format!("{chunk:019}"));
            }
        }
        f.pad_integral(true, "", &digits)
    }
}

impl fmt::LowerHex for Word256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = match self.0.iter().rposition(|&limb| limb != 0) {
            None => "0".to_string(),
            Some(top) => {
                let mut digits = format!("{:x}", self.0[top]);
                for limb in self.0[..top].iter().rev() {
                    digits.push_str(&format!("{limb:016x}"));
                }
                digits
            }
        };
        f.pad_integral(true, "0x", &digits)
    }
}

impl fmt::Debug for Word256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word256({self:#x})")
    }
}
