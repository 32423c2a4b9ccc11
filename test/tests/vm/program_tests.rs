use bytes::Bytes;
use hex_literal::hex;
use wordcheck_common::{Opcode as WordOpcode, Word256};
use wordcheck_vm::{
    ExceptionalHalt, U256, VM, VMError,
    errors::InternalError,
    gas_cost,
    opcodes::Opcode,
    vm::word_program,
};

fn run(code: &[u8]) -> Result<wordcheck_vm::ExecutionReport, VMError> {
    VM::new(Bytes::copy_from_slice(code), gas_cost::WORD_PROGRAM_GAS_LIMIT).run_execution()
}

#[test]
fn word_program_layout() {
    let program = word_program(Opcode::SHL, &[Word256::from_u64(4), Word256::ONE]);
    assert_eq!(program.len(), 2 * 33 + 2);
    assert_eq!(program[0], u8::from(Opcode::PUSH32));
    // The last operand is pushed first.
    assert_eq!(program[32], 0x01);
    assert_eq!(program[65], 0x04);
    assert_eq!(&program[66..], &[0x1b, 0x00]);
}

#[test]
fn shl_program_uses_top_as_shift() {
    let report = VM::execute(WordOpcode::Shl, &[Word256::from_u64(4), Word256::from_u64(0xf)]).unwrap();
    assert_eq!(report.output, U256::from(0xf0));
    assert_eq!(report.gas_used, 2 * gas_cost::PUSHN + gas_cost::SHL);
}

#[test]
fn exp_charges_per_exponent_byte() {
    let report = VM::execute(WordOpcode::Exp, &[Word256::from_u64(3), Word256::from_u64(0x100)]).unwrap();
    assert_eq!(
        report.gas_used,
        2 * gas_cost::PUSHN + gas_cost::EXP_STATIC + 2 * gas_cost::EXP_DYNAMIC_BASE
    );
}

#[test]
fn underflow_halts() {
    // PUSH32 1, ADD
    let mut code = vec![0x7f];
    code.extend_from_slice(&hex!(
        "0000000000000000000000000000000000000000000000000000000000000001"
    ));
    code.push(0x01);
    assert_eq!(run(&code), Err(VMError::ExceptionalHalt(ExceptionalHalt::StackUnderflow)));
}

#[test]
fn unknown_byte_is_invalid() {
    assert_eq!(run(&[0x0c]), Err(VMError::ExceptionalHalt(ExceptionalHalt::InvalidOpcode(0x0c))));
    assert_eq!(run(&[0xfe]), Err(VMError::ExceptionalHalt(ExceptionalHalt::InvalidOpcode(0xfe))));
}

#[test]
fn program_must_leave_one_word() {
    assert_eq!(run(&[0x00]), Err(VMError::Internal(InternalError::EmptyStackOnHalt)));

    let mut code = vec![0x7f];
    code.extend_from_slice(&[0u8; 32]);
    code.push(0x7f);
    code.extend_from_slice(&[0u8; 32]);
    assert_eq!(run(&code), Err(VMError::Internal(InternalError::UnbalancedStack(2))));
}

#[test]
fn operand_count_is_checked() {
    assert_eq!(
        VM::execute(WordOpcode::AddMod, &[Word256::ONE, Word256::ONE]),
        Err(VMError::Internal(InternalError::OperandCount { expected: 3, got: 2 }))
    );
}

#[test]
fn out_of_gas() {
    let code = word_program(Opcode::ADD, &[Word256::ONE, Word256::ONE]);
    let mut vm = VM::new(code, gas_cost::PUSHN * 2);
    assert_eq!(vm.run_execution(), Err(VMError::ExceptionalHalt(ExceptionalHalt::OutOfGas)));
}

#[test]
fn signed_and_out_of_range_edges() {
    let minus_one = Word256::MAX;
    let cases = [
        // Operands are in stack order, top first.
        (WordOpcode::SDiv, [Word256::SIGN_BIT, minus_one], U256::one() << 255),
        (WordOpcode::SMod, [minus_one, Word256::from_u64(2)], U256::MAX),
        (WordOpcode::SDiv, [Word256::from_u64(7), Word256::ZERO], U256::zero()),
        (WordOpcode::Sar, [Word256::from_u64(300), Word256::SIGN_BIT], U256::MAX),
        (WordOpcode::Shr, [Word256::from_u64(256), minus_one], U256::zero()),
        (WordOpcode::Byte, [Word256::from_u64(32), minus_one], U256::zero()),
        (WordOpcode::SignExtend, [Word256::from_u64(31), Word256::from_u64(0x80)], U256::from(0x80)),
        (WordOpcode::SignExtend, [Word256::ZERO, Word256::from_u64(0x80)], U256::MAX - U256::from(0x7f)),
        (WordOpcode::Slt, [minus_one, Word256::ONE], U256::one()),
        (WordOpcode::Sgt, [minus_one, Word256::ONE], U256::zero()),
    ];
    for (opcode, operands, want) in cases {
        let report = VM::execute(opcode, &operands).unwrap();
        assert_eq!(report.output, want, "{opcode}");
    }
}

#[test]
fn modular_ops_reduce_at_double_width() {
    let max = Word256::MAX;
    let report = VM::execute(WordOpcode::AddMod, &[max, max, Word256::from_u64(7)]).unwrap();
    // (2^256 - 1) * 2 mod 7, with 2^256 = 2 (mod 7).
    assert_eq!(report.output, U256::from(2));
    let report = VM::execute(WordOpcode::MulMod, &[max, max, Word256::ZERO]).unwrap();
    assert_eq!(report.output, U256::zero());
}
