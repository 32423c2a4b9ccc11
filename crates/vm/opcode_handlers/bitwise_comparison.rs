//! # Bitwise and comparison operations
//!
//! Includes the following opcodes:
//!   - `LT`
//!   - `GT`
//!   - `SLT`
//!   - `SGT`
//!   - `EQ`
//!   - `ISZERO`
//!   - `AND`
//!   - `OR`
//!   - `XOR`
//!   - `NOT`
//!   - `BYTE`
//!   - `SHL`
//!   - `SHR`
//!   - `SAR`

use std::cmp::Ordering;

use ethereum_types::U256;

use crate::{
    errors::{OpcodeResult, VMError},
    gas_cost,
    opcode_handlers::{OpcodeHandler, apply},
    vm::VM,
};

/// Implementation for the `LT` opcode.
pub struct OpLtHandler;
impl OpcodeHandler for OpLtHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::LT, |[a, b]| flag(a < b))
    }
}

/// Implementation for the `GT` opcode.
pub struct OpGtHandler;
impl OpcodeHandler for OpGtHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::GT, |[a, b]| flag(a > b))
    }
}

/// Implementation for the `SLT` opcode.
pub struct OpSLtHandler;
impl OpcodeHandler for OpSLtHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SLT, |[a, b]| {
            flag(signed_cmp(a, b) == Ordering::Less)
        })
    }
}

/// Implementation for the `SGT` opcode.
pub struct OpSGtHandler;
impl OpcodeHandler for OpSGtHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SGT, |[a, b]| {
            flag(signed_cmp(a, b) == Ordering::Greater)
        })
    }
}

/// Implementation for the `EQ` opcode.
pub struct OpEqHandler;
impl OpcodeHandler for OpEqHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::EQ, |[a, b]| flag(a == b))
    }
}

/// Implementation for the `ISZERO` opcode.
pub struct OpIsZeroHandler;
impl OpcodeHandler for OpIsZeroHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::ISZERO, |[a]| flag(a.is_zero()))
    }
}

/// Implementation for the `AND` opcode.
pub struct OpAndHandler;
impl OpcodeHandler for OpAndHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::AND, |[a, b]| a & b)
    }
}

/// Implementation for the `OR` opcode.
pub struct OpOrHandler;
impl OpcodeHandler for OpOrHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::OR, |[a, b]| a | b)
    }
}

/// Implementation for the `XOR` opcode.
pub struct OpXorHandler;
impl OpcodeHandler for OpXorHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::XOR, |[a, b]| a ^ b)
    }
}

/// Implementation for the `NOT` opcode.
pub struct OpNotHandler;
impl OpcodeHandler for OpNotHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::NOT, |[a]| !a)
    }
}

/// Implementation for the `BYTE` opcode. Byte 0 is the most significant.
pub struct OpByteHandler;
impl OpcodeHandler for OpByteHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::BYTE, |[index, value]| match small(index, 32) {
            Some(i) => value.byte(31 - i).into(),
            None => U256::zero(),
        })
    }
}

/// Implementation for the `SHL` opcode.
pub struct OpShlHandler;
impl OpcodeHandler for OpShlHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SHL, |[shift, value]| match small(shift, 256) {
            Some(shift) => value << shift,
            None => U256::zero(),
        })
    }
}

/// Implementation for the `SHR` opcode.
pub struct OpShrHandler;
impl OpcodeHandler for OpShrHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SHR, |[shift, value]| match small(shift, 256) {
            Some(shift) => value >> shift,
            None => U256::zero(),
        })
    }
}

/// Implementation for the `SAR` opcode.
pub struct OpSarHandler;
impl OpcodeHandler for OpSarHandler {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        apply(vm, gas_cost::SAR, |[shift, value]| {
            // Shifting the complement keeps the vacated high bits set.
            let negative = value.bit(255);
            match (small(shift, 256), negative) {
                (Some(shift), false) => value >> shift,
                (Some(shift), true) => !(!value >> shift),
                (None, false) => U256::zero(),
                (None, true) => U256::MAX,
            }
        })
    }
}

fn flag(condition: bool) -> U256 {
    U256::from(u8::from(condition))
}

/// `value` as a `usize` when it is below `bound`.
fn small(value: U256, bound: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|v| *v < bound)
}

/// Two's complement ordering: a set sign bit sorts below a clear one.
fn signed_cmp(a: U256, b: U256) -> Ordering {
    match (a.bit(255), b.bit(255)) {
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        _ => a.cmp(&b),
    }
}
