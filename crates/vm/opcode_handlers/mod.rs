use ethereum_types::U256;

use crate::{
    errors::{ExceptionalHalt, OpcodeResult, VMError},
    vm::VM,
};

pub mod arithmetic;
pub mod bitwise_comparison;
pub mod push;

pub trait OpcodeHandler {
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError>;
}

/// Charges `gas`, pops `N` words (top of the stack first) and pushes `op` of
/// them.
#[inline(always)]
pub(crate) fn apply<const N: usize>(
    vm: &mut VM,
    gas: u64,
    op: impl FnOnce([U256; N]) -> U256,
) -> Result<OpcodeResult, VMError> {
    let frame = &mut vm.current_call_frame;
    frame.increase_consumed_gas(gas)?;
    let operands = *frame.stack.pop::<N>()?;
    frame.stack.push(op(operands))?;
    Ok(OpcodeResult::Continue)
}

pub struct OpStopHandler;
impl OpcodeHandler for OpStopHandler {
    fn eval(_vm: &mut VM) -> Result<OpcodeResult, VMError> {
        Ok(OpcodeResult::Halt)
    }
}

pub struct OpInvalidHandler;
impl OpcodeHandler for OpInvalidHandler {
    fn eval(vm: &mut VM) -> Result<OpcodeResult, VMError> {
        let frame = &vm.current_call_frame;
        // The interpreter has already stepped past the offending byte.
        let byte = frame
            .bytecode
            .get(frame.pc.saturating_sub(1))
            .copied()
            .unwrap_or_default();
        Err(ExceptionalHalt::InvalidOpcode(byte).into())
    }
}
