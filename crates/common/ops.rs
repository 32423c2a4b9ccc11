//! # Word opcodes
//!
//! The 25 EVM integer, comparison and bitwise opcodes over [`Word256`].
//!
//! Every function is total. Division or modulus by zero yields zero, shift
//! amounts of 256 or more saturate, and out-of-range byte indices read as
//! zero. Operand names follow the EVM stack order (`byte(index, value)`,
//! `shl(shift, value)`, `signextend(byte_index, value)`).

use std::cmp::Ordering;

use crate::word::{Word256, Word512};

// Arithmetic Operations (11)
// Opcodes: ADD, MUL, SUB, DIV, SDIV, MOD, SMOD, ADDMOD, MULMOD, EXP, SIGNEXTEND

#[inline]
pub fn add(augend: Word256, addend: Word256) -> Word256 {
    augend.wrapping_add(addend)
}

#[inline]
pub fn mul(multiplicand: Word256, multiplier: Word256) -> Word256 {
    multiplicand.wrapping_mul(multiplier)
}

#[inline]
pub fn sub(minuend: Word256, subtrahend: Word256) -> Word256 {
    minuend.wrapping_sub(subtrahend)
}

pub fn div(dividend: Word256, divisor: Word256) -> Word256 {
    dividend.checked_div(divisor).unwrap_or_default()
}

/// Signed division truncating toward zero. `sdiv(-2^255, -1)` wraps to `-2^255`.
pub fn sdiv(dividend: Word256, divisor: Word256) -> Word256 {
    if divisor.is_zero() || dividend.is_zero() {
        return Word256::ZERO;
    }

    let quotient = div(dividend.abs(), divisor.abs());
    if dividend.is_negative() ^ divisor.is_negative() {
        quotient.negate()
    } else {
        quotient
    }
}

/// `MOD`; named `modulo` because `mod` is a keyword.
pub fn modulo(dividend: Word256, divisor: Word256) -> Word256 {
    dividend.checked_rem(divisor).unwrap_or_default()
}

/// Signed remainder; the result takes the sign of the dividend.
pub fn smod(dividend: Word256, divisor: Word256) -> Word256 {
    if divisor.is_zero() || dividend.is_zero() {
        return Word256::ZERO;
    }

    let remainder = modulo(dividend.abs(), divisor.abs());
    if dividend.is_negative() {
        remainder.negate()
    } else {
        remainder
    }
}

/// `(augend + addend) mod modulus` over the exact 257-bit sum.
pub fn addmod(augend: Word256, addend: Word256, modulus: Word256) -> Word256 {
    let (sum, carry) = augend.overflowing_add(addend);
    Word512::from_carried_sum(sum, carry)
        .checked_rem(modulus)
        .unwrap_or_default()
}

/// `(multiplicand * multiplier) mod modulus` over the exact 512-bit product.
pub fn mulmod(multiplicand: Word256, multiplier: Word256, modulus: Word256) -> Word256 {
    if modulus.is_zero() {
        return Word256::ZERO;
    }
    multiplicand
        .full_mul(multiplier)
        .checked_rem(modulus)
        .unwrap_or_default()
}

#[inline]
pub fn exp(base: Word256, exponent: Word256) -> Word256 {
    base.wrapping_pow(exponent)
}

/// Sign-extends the low `byte_index + 1` bytes of `value`. Indices of 31 or
/// more return `value` unchanged.
pub fn signextend(byte_index: Word256, value: Word256) -> Word256 {
    let byte_index = match byte_index.to_u64() {
        Some(index) if index < 31 => index as u32,
        _ => return value,
    };

    let sign_bit_index = byte_index * 8 + 7;
    let mask = Word256::MAX >> (255 - sign_bit_index);
    if value.bit(sign_bit_index) {
        value | !mask
    } else {
        value & mask
    }
}

// Comparison Operations (6)
// Opcodes: LT, GT, SLT, SGT, EQ, ISZERO

#[inline]
pub fn lt(lhs: Word256, rhs: Word256) -> Word256 {
    Word256::from(lhs < rhs)
}

#[inline]
pub fn gt(lhs: Word256, rhs: Word256) -> Word256 {
    Word256::from(lhs > rhs)
}

#[inline]
pub fn slt(lhs: Word256, rhs: Word256) -> Word256 {
    Word256::from(lhs.signed_cmp(&rhs) == Ordering::Less)
}

#[inline]
pub fn sgt(lhs: Word256, rhs: Word256) -> Word256 {
    Word256::from(lhs.signed_cmp(&rhs) == Ordering::Greater)
}

#[inline]
pub fn eq(lhs: Word256, rhs: Word256) -> Word256 {
    Word256::from(lhs == rhs)
}

#[inline]
pub fn iszero(value: Word256) -> Word256 {
    Word256::from(value.is_zero())
}

// Bitwise Operations (8)
// Opcodes: AND, OR, XOR, NOT, BYTE, SHL, SHR, SAR

#[inline]
pub fn and(lhs: Word256, rhs: Word256) -> Word256 {
    lhs & rhs
}

#[inline]
pub fn or(lhs: Word256, rhs: Word256) -> Word256 {
    lhs | rhs
}

#[inline]
pub fn xor(lhs: Word256, rhs: Word256) -> Word256 {
    lhs ^ rhs
}

#[inline]
pub fn not(value: Word256) -> Word256 {
    !value
}

/// Byte `index` of `value`, counting from the most significant byte.
pub fn byte(index: Word256, value: Word256) -> Word256 {
    match index.to_u64() {
        Some(index) if index < 32 => Word256::from(value.byte(31 - index as usize)),
        _ => Word256::ZERO,
    }
}

pub fn shl(shift: Word256, value: Word256) -> Word256 {
    match shift.to_u64() {
        Some(shift) if shift < 256 => value << shift as u32,
        _ => Word256::ZERO,
    }
}

pub fn shr(shift: Word256, value: Word256) -> Word256 {
    match shift.to_u64() {
        Some(shift) if shift < 256 => value >> shift as u32,
        _ => Word256::ZERO,
    }
}

/// Arithmetic right shift; saturates to all ones for negative values.
pub fn sar(shift: Word256, value: Word256) -> Word256 {
    match (shift.to_u64(), value.is_negative()) {
        (Some(shift), false) if shift < 256 => value >> shift as u32,
        (Some(shift), true) if shift < 256 => !(!value >> shift as u32),
        (_, false) => Word256::ZERO,
        (_, true) => Word256::MAX,
    }
}
