use bytes::{BufMut, Bytes, BytesMut};
use ethereum_types::U256;
use tracing::trace;
use wordcheck_common::{Opcode as WordOpcode, OperandVector, Word256};

use crate::{
    call_frame::CallFrame,
    errors::{InternalError, OpcodeResult, VMError},
    gas_cost,
    opcodes::{OpCodeFn, Opcode},
    utils::{u256_to_big_endian, u256_to_word, word_to_u256},
};

/// Outcome of a program that halted normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionReport {
    /// The single word left on the stack.
    pub output: U256,
    pub gas_used: u64,
}

pub struct VM {
    pub current_call_frame: CallFrame,
    opcode_table: [OpCodeFn; 256],
}

impl VM {
    pub fn new(bytecode: Bytes, gas_limit: u64) -> Self {
        Self {
            current_call_frame: CallFrame::new(bytecode, gas_limit),
            opcode_table: const { VM::build_opcode_table() },
        }
    }

    /// Runs the loaded program until `STOP` or an exceptional halt. The
    /// program must leave exactly one word on the stack.
    pub fn run_execution(&mut self) -> Result<ExecutionReport, VMError> {
        loop {
            let byte = self.current_call_frame.next_opcode_byte();
            self.current_call_frame.pc = self.current_call_frame.pc.wrapping_add(1);

            #[allow(clippy::indexing_slicing)]
            let handler = self.opcode_table[usize::from(byte)];
            match handler.call(self)? {
                OpcodeResult::Continue => {}
                OpcodeResult::Halt => break,
            }
        }

        let frame = &mut self.current_call_frame;
        match frame.stack.len() {
            0 => Err(InternalError::EmptyStackOnHalt.into()),
            1 => Ok(ExecutionReport {
                output: frame.stack.pop1()?,
                gas_used: frame.gas_used,
            }),
            n => Err(InternalError::UnbalancedStack(n).into()),
        }
    }

    /// Executes a single word opcode over `operands`, given in stack order
    /// (top of the stack first).
    pub fn execute(opcode: WordOpcode, operands: &[Word256]) -> Result<ExecutionReport, VMError> {
        if operands.len() != opcode.arity() {
            return Err(InternalError::OperandCount {
                expected: opcode.arity(),
                got: operands.len(),
            }
            .into());
        }

        let bytecode = word_program(Opcode::from(opcode), operands);
        let mut vm = VM::new(bytecode, gas_cost::WORD_PROGRAM_GAS_LIMIT);
        let report = vm.run_execution()?;
        trace!(
            opcode = %opcode,
            gas_used = report.gas_used,
            output = %report.output,
            "Executed word program"
        );
        Ok(report)
    }

    /// Executes `opcode` over an operand vector, laying the operands out on
    /// the stack the way the EVM expects them.
    pub fn execute_vector(opcode: WordOpcode, vector: &OperandVector) -> Result<Word256, VMError> {
        let report = VM::execute(opcode, &vector.stack_operands(opcode))?;
        Ok(u256_to_word(report.output))
    }
}

/// Assembles `PUSH32 operand ... opcode STOP`. Operands are pushed in reverse
/// so the first one ends up on top of the stack.
pub fn word_program(opcode: Opcode, operands: &[Word256]) -> Bytes {
    let mut code = BytesMut::with_capacity(operands.len() * 33 + 2);
    for operand in operands.iter().rev() {
        code.put_u8(Opcode::PUSH32.into());
        code.put_slice(&u256_to_big_endian(word_to_u256(*operand)));
    }
    code.put_u8(opcode.into());
    code.put_u8(Opcode::STOP.into());
    code.freeze()
}
