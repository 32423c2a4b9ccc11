use crate::{
    errors::{OpcodeResult, VMError},
    gas_cost,
    opcode_handlers::OpcodeHandler,
    utils::u256_from_big_endian_const,
    vm::VM,
};

// Push Operations
// Opcodes: PUSH32

/// Implementation for `PUSHN`, reading `N` immediate bytes after the opcode.
///
/// Immediates running past the end of the bytecode are zero-padded on the
/// right, as if the code were followed by zeros.
pub struct OpPushHandler<const N: usize>;
impl<const N: usize> OpcodeHandler for OpPushHandler<N> {
    #[inline(always)]
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        let current_call_frame = &mut vm.current_call_frame;
        current_call_frame.increase_consumed_gas(gas_cost::PUSHN)?;

        let start = current_call_frame.pc;
        let end = start.saturating_add(N);

        let mut immediate = [0u8; N];
        if let Some(available) = current_call_frame
            .bytecode
            .get(start..end.min(current_call_frame.bytecode.len()))
        {
            #[allow(clippy::indexing_slicing)]
            immediate[..available.len()].copy_from_slice(available);
        }

        current_call_frame
            .stack
            .push(u256_from_big_endian_const(immediate))?;
        current_call_frame.pc = end;

        Ok(OpcodeResult::Continue)
    }
}
