use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VMError {
    #[error("Exceptional halt: {0}")]
    ExceptionalHalt(#[from] ExceptionalHalt),
    #[error("Internal error: {0}")]
    Internal(#[from] InternalError),
}

/// Conditions that stop execution of a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExceptionalHalt {
    #[error("Stack underflow")]
    StackUnderflow,
    #[error("Stack overflow")]
    StackOverflow,
    #[error("Invalid opcode 0x{0:02x}")]
    InvalidOpcode(u8),
    #[error("Out of gas")]
    OutOfGas,
    #[error("Very large number")]
    VeryLargeNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("Program halted with an empty stack")]
    EmptyStackOnHalt,
    #[error("Program halted with {0} words on the stack, expected one")]
    UnbalancedStack(usize),
    #[error("Operand count {got} does not match the opcode arity {expected}")]
    OperandCount { expected: usize, got: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeResult {
    Continue,
    Halt,
}
