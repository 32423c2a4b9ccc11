//! # Arithmetic operations
//!
//! Includes the following opcodes:
//!   - `ADD`
//!   - `MUL`
//!   - `SUB`
//!   - `DIV`
//!   - `SDIV`
//!   - `MOD`
//!   - `SMOD`
//!   - `ADDMOD`
//!   - `MULMOD`
//!   - `EXP`
//!   - `SIGNEXTEND`

use ethereum_types::{U256, U512};

use crate::{
    errors::{OpcodeResult, VMError},
    gas_cost,
    opcode_handlers::{OpcodeHandler, apply},
    vm::VM,
};

/// Implementation for the `ADD` opcode.
pub struct OpAddHandler;
impl OpcodeHandler for OpAddHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::ADD, |[a, b]| a.overflowing_add(b).0)
    }
}

/// Implementation for the `SUB` opcode.
pub struct OpSubHandler;
impl OpcodeHandler for OpSubHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SUB, |[a, b]| a.overflowing_sub(b).0)
    }
}

/// Implementation for the `MUL` opcode.
pub struct OpMulHandler;
impl OpcodeHandler for OpMulHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::MUL, |[a, b]| a.overflowing_mul(b).0)
    }
}

/// Implementation for the `DIV` opcode.
pub struct OpDivHandler;
impl OpcodeHandler for OpDivHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::DIV, |[a, b]| a.checked_div(b).unwrap_or_default())
    }
}

/// Implementation for the `SDIV` opcode.
pub struct OpSDivHandler;
impl OpcodeHandler for OpSDivHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SDIV, |[a, b]| signed_div(a, b))
    }
}

/// Implementation for the `MOD` opcode.
pub struct OpModHandler;
impl OpcodeHandler for OpModHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::MOD, |[a, b]| a.checked_rem(b).unwrap_or_default())
    }
}

/// Implementation for the `SMOD` opcode.
pub struct OpSModHandler;
impl OpcodeHandler for OpSModHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SMOD, |[a, b]| signed_rem(a, b))
    }
}

/// Implementation for the `ADDMOD` opcode.
pub struct OpAddModHandler;
impl OpcodeHandler for OpAddModHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::ADDMOD, |[a, b, n]| {
            reduce_wide(U512::from(a) + U512::from(b), n)
        })
    }
}

/// Implementation for the `MULMOD` opcode.
pub struct OpMulModHandler;
impl OpcodeHandler for OpMulModHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::MULMOD, |[a, b, n]| reduce_wide(a.full_mul(b), n))
    }
}

/// Implementation for the `EXP` opcode. Gas depends on the exponent, so the
/// operands are read before charging.
pub struct OpExpHandler;
impl OpcodeHandler for OpExpHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        let frame = &mut vm.current_call_frame;
        let [base, exponent] = *frame.stack.pop()?;
        frame.increase_consumed_gas(gas_cost::exp(exponent)?)?;
        frame.stack.push(base.overflowing_pow(exponent).0)?;
        Ok(OpcodeResult::Continue)
    }
}

/// Implementation for the `SIGNEXTEND` opcode.
pub struct OpSignExtendHandler;
impl OpcodeHandler for OpSignExtendHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SIGNEXTEND, |[width, value]| sign_extend(width, value))
    }
}

/// `a / b` on two's complement words, truncating towards zero.
fn signed_div(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let quotient = magnitude(a) / magnitude(b);
    if a.bit(255) != b.bit(255) {
        twos_negate(quotient)
    } else {
        quotient
    }
}

/// `a % b` on two's complement words; the result takes the sign of `a`.
fn signed_rem(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let remainder = magnitude(a) % magnitude(b);
    if a.bit(255) {
        twos_negate(remainder)
    } else {
        remainder
    }
}

/// Extends the sign bit of byte `width` (counted from the least significant
/// end) through the high bytes. Widths of 31 and up leave `value` unchanged.
fn sign_extend(width: U256, value: U256) -> U256 {
    let Some(width) = u32::try_from(width).ok().filter(|w| *w < 31) else {
        return value;
    };
    let sign_bit = width * 8 + 7;
    let low_bits = (U256::one() << sign_bit) - U256::one();
    if value.bit(sign_bit as usize) {
        value | !low_bits
    } else {
        value & low_bits
    }
}

fn twos_negate(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

fn magnitude(value: U256) -> U256 {
    if value.bit(255) {
        twos_negate(value)
    } else {
        value
    }
}

/// Reduces a double-width value modulo `modulus`, which is zero-safe.
fn reduce_wide(value: U512, modulus: U256) -> U256 {
    if modulus.is_zero() {
        return U256::zero();
    }
    let U512([l0, l1, l2, l3, ..]) = value % U512::from(modulus);
    U256([l0, l1, l2, l3])
}
