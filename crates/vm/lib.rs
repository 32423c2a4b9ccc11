//! # wordcheck-vm
//!
//! A small stack machine executing the EVM word opcodes on
//! [`ethereum_types::U256`].
//!
//! Each word opcode is compiled into a straight-line program
//! (`PUSH32` operands, the opcode, `STOP`) and run through a per-opcode
//! handler table, the same way a full EVM interpreter dispatches. The engine
//! shares no arithmetic with `wordcheck_common::ops`, which makes it a useful
//! independent implementation to hold the reference against.
//!
//! ## Core Types
//!
//! - [`vm::VM`]: interpreter loop and handler table
//! - [`call_frame::CallFrame`]: bytecode, program counter, stack and gas used
//! - [`call_frame::Stack`]: fixed-capacity word stack
//! - [`opcodes::Opcode`]: the supported instruction bytes
//! - [`errors::VMError`]: halting conditions

pub mod call_frame;
pub mod errors;
pub mod gas_cost;
pub mod opcode_handlers;
pub mod opcodes;
pub mod utils;
pub mod vm;

pub use ethereum_types::U256;
pub use errors::{ExceptionalHalt, VMError};
pub use vm::{ExecutionReport, VM};
