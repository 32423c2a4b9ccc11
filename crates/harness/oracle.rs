//! Trusted evaluation of the word opcodes.
//!
//! Operand layout: `x`, `y`, `z` feed the opcode's arguments in order, except
//! for `SignExtend`, `Byte`, `Shl`, `Shr` and `Sar`, where `x` is the value and
//! `y` the byte index or shift amount.

use wordcheck_common::{Opcode, OperandVector, Word256, ops};

use crate::errors::OracleError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceOracle;

impl ReferenceOracle {
    /// Evaluates `opcode` over `(x, y, z)`, ignoring the words beyond its arity.
    pub fn evaluate(opcode: Opcode, x: Word256, y: Word256, z: Word256) -> Word256 {
        match opcode {
            Opcode::Add => ops::add(x, y),
            Opcode::Mul => ops::mul(x, y),
            Opcode::Sub => ops::sub(x, y),
            Opcode::Div => ops::div(x, y),
            Opcode::SDiv => ops::sdiv(x, y),
            Opcode::Mod => ops::modulo(x, y),
            Opcode::SMod => ops::smod(x, y),
            Opcode::AddMod => ops::addmod(x, y, z),
            Opcode::MulMod => ops::mulmod(x, y, z),
            Opcode::Exp => ops::exp(x, y),
            Opcode::SignExtend => ops::signextend(y, x),
            Opcode::Lt => ops::lt(x, y),
            Opcode::Gt => ops::gt(x, y),
            Opcode::Slt => ops::slt(x, y),
            Opcode::Sgt => ops::sgt(x, y),
            Opcode::Eq => ops::eq(x, y),
            Opcode::IsZero => ops::iszero(x),
            Opcode::And => ops::and(x, y),
            Opcode::Or => ops::or(x, y),
            Opcode::Xor => ops::xor(x, y),
            Opcode::Not => ops::not(x),
            Opcode::Byte => ops::byte(y, x),
            Opcode::Shl => ops::shl(y, x),
            Opcode::Shr => ops::shr(y, x),
            Opcode::Sar => ops::sar(y, x),
        }
    }

    pub fn evaluate_vector(opcode: Opcode, vector: &OperandVector) -> Word256 {
        Self::evaluate(opcode, vector.x, vector.y, vector.z)
    }

    /// Evaluates over an exact operand list, rejecting a count that differs
    /// from the opcode's arity.
    pub fn evaluate_operands(opcode: Opcode, operands: &[Word256]) -> Result<Word256, OracleError> {
        let vector = Self::operand_vector(opcode, operands)?;
        Ok(Self::evaluate_vector(opcode, &vector))
    }

    /// Lays an exact operand list out as `(x, y, z)`, zero-filling the words
    /// beyond the opcode's arity.
    pub fn operand_vector(opcode: Opcode, operands: &[Word256]) -> Result<OperandVector, OracleError> {
        if operands.len() != opcode.arity() {
            return Err(OracleError::ArityMismatch {
                opcode,
                expected: opcode.arity(),
                got: operands.len(),
            });
        }

        let word = |i: usize| operands.get(i).copied().unwrap_or_default();
        Ok(OperandVector::new(word(0), word(1), word(2)))
    }
}
