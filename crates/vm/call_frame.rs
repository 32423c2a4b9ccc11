use bytes::Bytes;
use ethereum_types::U256;

use crate::{
    errors::{ExceptionalHalt, VMError},
    opcodes::Opcode,
};

pub const STACK_LIMIT: usize = 1024;

/// Word stack growing downwards from the end of a fixed buffer.
///
/// `values[offset]` is the top of the stack; an empty stack has
/// `offset == STACK_LIMIT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    values: Box<[U256; STACK_LIMIT]>,
    offset: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self {
            values: Box::new([U256::zero(); STACK_LIMIT]),
            offset: STACK_LIMIT,
        }
    }
}

impl Stack {
    /// Pops `N` words, top of the stack first.
    #[inline]
    pub fn pop<const N: usize>(&mut self) -> Result<&[U256; N], ExceptionalHalt> {
        let next_offset = self
            .offset
            .checked_add(N)
            .ok_or(ExceptionalHalt::StackUnderflow)?;

        let values: &[U256; N] = self
            .values
            .get(self.offset..next_offset)
            .ok_or(ExceptionalHalt::StackUnderflow)?
            .try_into()
            .map_err(|_| ExceptionalHalt::StackUnderflow)?;
        self.offset = next_offset;

        Ok(values)
    }

    #[inline]
    pub fn pop1(&mut self) -> Result<U256, ExceptionalHalt> {
        let [value] = *self.pop::<1>()?;
        Ok(value)
    }

    #[inline]
    pub fn push(&mut self, value: U256) -> Result<(), ExceptionalHalt> {
        let next_offset = self
            .offset
            .checked_sub(1)
            .ok_or(ExceptionalHalt::StackOverflow)?;
        let slot = self
            .values
            .get_mut(next_offset)
            .ok_or(ExceptionalHalt::StackOverflow)?;
        *slot = value;
        self.offset = next_offset;

        Ok(())
    }

    pub fn len(&self) -> usize {
        STACK_LIMIT.saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.offset == STACK_LIMIT
    }
}

/// Execution context of a single program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub bytecode: Bytes,
    pub pc: usize,
    pub stack: Stack,
    pub gas_limit: u64,
    pub gas_used: u64,
}

impl CallFrame {
    pub fn new(bytecode: Bytes, gas_limit: u64) -> Self {
        Self {
            bytecode,
            pc: 0,
            stack: Stack::default(),
            gas_limit,
            gas_used: 0,
        }
    }

    /// Raw byte at the program counter. Reading past the end yields `STOP`.
    #[inline]
    pub fn next_opcode_byte(&self) -> u8 {
        self.bytecode
            .get(self.pc)
            .copied()
            .unwrap_or(Opcode::STOP as u8)
    }

    pub fn increase_consumed_gas(&mut self, gas: u64) -> Result<(), VMError> {
        let gas_used = self
            .gas_used
            .checked_add(gas)
            .ok_or(ExceptionalHalt::OutOfGas)?;
        if gas_used > self.gas_limit {
            return Err(ExceptionalHalt::OutOfGas.into());
        }
        self.gas_used = gas_used;
        Ok(())
    }
}
