use strum::{Display, EnumString};
use wordcheck_common::Opcode as WordOpcode;

use crate::{
    errors::{OpcodeResult, VMError},
    opcode_handlers::{
        OpInvalidHandler, OpStopHandler, OpcodeHandler, arithmetic::*, bitwise_comparison::*,
        push::*,
    },
    vm::VM,
};

/// Instruction bytes understood by the interpreter.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, EnumString, Display, Hash)]
#[repr(u8)]
pub enum Opcode {
    // Stop and Arithmetic Operations
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,
    SDIV = 0x05,
    MOD = 0x06,
    SMOD = 0x07,
    ADDMOD = 0x08,
    MULMOD = 0x09,
    EXP = 0x0A,
    SIGNEXTEND = 0x0B,

    // Comparison & Bitwise Logic Operations
    LT = 0x10,
    GT = 0x11,
    SLT = 0x12,
    SGT = 0x13,
    EQ = 0x14,
    ISZERO = 0x15,
    AND = 0x16,
    OR = 0x17,
    XOR = 0x18,
    NOT = 0x19,
    BYTE = 0x1A,
    SHL = 0x1B,
    SHR = 0x1C,
    SAR = 0x1D,

    // Push Operations
    PUSH32 = 0x7F,

    INVALID = 0xFE,
}

impl From<u8> for Opcode {
    #[allow(clippy::as_conversions)]
    fn from(byte: u8) -> Self {
        // Lookup table instead of a match over every byte.
        const OPCODE_TABLE: [Opcode; 256] = const {
            let mut table = [Opcode::INVALID; 256];
            table[0x00] = Opcode::STOP;
            table[0x01] = Opcode::ADD;
            table[0x02] = Opcode::MUL;
            table[0x03] = Opcode::SUB;
            table[0x04] = Opcode::DIV;
            table[0x05] = Opcode::SDIV;
            table[0x06] = Opcode::MOD;
            table[0x07] = Opcode::SMOD;
            table[0x08] = Opcode::ADDMOD;
            table[0x09] = Opcode::MULMOD;
            table[0x0A] = Opcode::EXP;
            table[0x0B] = Opcode::SIGNEXTEND;
            table[0x10] = Opcode::LT;
            table[0x11] = Opcode::GT;
            table[0x12] = Opcode::SLT;
            table[0x13] = Opcode::SGT;
            table[0x14] = Opcode::EQ;
            table[0x15] = Opcode::ISZERO;
            table[0x16] = Opcode::AND;
            table[0x17] = Opcode::OR;
            table[0x18] = Opcode::XOR;
            table[0x19] = Opcode::NOT;
            table[0x1A] = Opcode::BYTE;
            table[0x1B] = Opcode::SHL;
            table[0x1C] = Opcode::SHR;
            table[0x1D] = Opcode::SAR;
            table[0x7F] = Opcode::PUSH32;
            table
        };
        OPCODE_TABLE[byte as usize]
    }
}

impl From<Opcode> for u8 {
    #[allow(clippy::as_conversions)]
    fn from(opcode: Opcode) -> Self {
        opcode as u8
    }
}

impl From<WordOpcode> for Opcode {
    fn from(opcode: WordOpcode) -> Self {
        match opcode {
            WordOpcode::Add => Opcode::ADD,
            WordOpcode::Mul => Opcode::MUL,
            WordOpcode::Sub => Opcode::SUB,
            WordOpcode::Div => Opcode::DIV,
            WordOpcode::SDiv => Opcode::SDIV,
            WordOpcode::Mod => Opcode::MOD,
            WordOpcode::SMod => Opcode::SMOD,
            WordOpcode::AddMod => Opcode::ADDMOD,
            WordOpcode::MulMod => Opcode::MULMOD,
            WordOpcode::Exp => Opcode::EXP,
            WordOpcode::SignExtend => Opcode::SIGNEXTEND,
            WordOpcode::Lt => Opcode::LT,
            WordOpcode::Gt => Opcode::GT,
            WordOpcode::Slt => Opcode::SLT,
            WordOpcode::Sgt => Opcode::SGT,
            WordOpcode::Eq => Opcode::EQ,
            WordOpcode::IsZero => Opcode::ISZERO,
            WordOpcode::And => Opcode::AND,
            WordOpcode::Or => Opcode::OR,
            WordOpcode::Xor => Opcode::XOR,
            WordOpcode::Not => Opcode::NOT,
            WordOpcode::Byte => Opcode::BYTE,
            WordOpcode::Shl => Opcode::SHL,
            WordOpcode::Shr => Opcode::SHR,
            WordOpcode::Sar => Opcode::SAR,
        }
    }
}

/// Function pointer to an opcode handler.
#[derive(Clone, Copy)]
pub struct OpCodeFn(fn(&mut VM) -> Result<OpcodeResult, VMError>);

impl OpCodeFn {
    pub const fn new<T>() -> Self
    where
        T: OpcodeHandler,
    {
        Self(T::eval)
    }

    #[inline(always)]
    pub fn call(self, vm: &mut VM) -> Result<OpcodeResult, VMError> {
        (self.0)(vm)
    }
}

impl VM {
    /// Builds the handler table indexed by instruction byte. Unknown bytes
    /// map to the invalid-opcode handler.
    #[allow(clippy::as_conversions, clippy::indexing_slicing)]
    pub(crate) const fn build_opcode_table() -> [OpCodeFn; 256] {
        let mut opcode_table: [OpCodeFn; 256] = [OpCodeFn::new::<OpInvalidHandler>(); 256];

        opcode_table[Opcode::STOP as usize] = OpCodeFn::new::<OpStopHandler>();
        opcode_table[Opcode::PUSH32 as usize] = OpCodeFn::new::<OpPushHandler<32>>();

        opcode_table[Opcode::ADD as usize] = OpCodeFn::new::<OpAddHandler>();
        opcode_table[Opcode::MUL as usize] = OpCodeFn::new::<OpMulHandler>();
        opcode_table[Opcode::SUB as usize] = OpCodeFn::new::<OpSubHandler>();
        opcode_table[Opcode::DIV as usize] = OpCodeFn::new::<OpDivHandler>();
        opcode_table[Opcode::SDIV as usize] = OpCodeFn::new::<OpSDivHandler>();
        opcode_table[Opcode::MOD as usize] = OpCodeFn::new::<OpModHandler>();
        opcode_table[Opcode::SMOD as usize] = OpCodeFn::new::<OpSModHandler>();
        opcode_table[Opcode::ADDMOD as usize] = OpCodeFn::new::<OpAddModHandler>();
        opcode_table[Opcode::MULMOD as usize] = OpCodeFn::new::<OpMulModHandler>();
        opcode_table[Opcode::EXP as usize] = OpCodeFn::new::<OpExpHandler>();
        opcode_table[Opcode::SIGNEXTEND as usize] = OpCodeFn::new::<OpSignExtendHandler>();

        opcode_table[Opcode::LT as usize] = OpCodeFn::new::<OpLtHandler>();
        opcode_table[Opcode::GT as usize] = OpCodeFn::new::<OpGtHandler>();
        opcode_table[Opcode::SLT as usize] = OpCodeFn::new::<OpSLtHandler>();
        opcode_table[Opcode::SGT as usize] = OpCodeFn::new::<OpSGtHandler>();
        opcode_table[Opcode::EQ as usize] = OpCodeFn::new::<OpEqHandler>();
        opcode_table[Opcode::ISZERO as usize] = OpCodeFn::new::<OpIsZeroHandler>();
        opcode_table[Opcode::AND as usize] = OpCodeFn::new::<OpAndHandler>();
        opcode_table[Opcode::OR as usize] = OpCodeFn::new::<OpOrHandler>();
        opcode_table[Opcode::XOR as usize] = OpCodeFn::new::<OpXorHandler>();
        opcode_table[Opcode::NOT as usize] = OpCodeFn::new::<OpNotHandler>();
        opcode_table[Opcode::BYTE as usize] = OpCodeFn::new::<OpByteHandler>();
        opcode_table[Opcode::SHL as usize] = OpCodeFn::new::<OpShlHandler>();
        opcode_table[Opcode::SHR as usize] = OpCodeFn::new::<OpShrHandler>();
        opcode_table[Opcode::SAR as usize] = OpCodeFn::new::<OpSarHandler>();

        opcode_table
    }
}
