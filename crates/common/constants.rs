// === Word layout ===

/// Size of an EVM word in bytes.
pub const WORD_BYTES: usize = 32;

/// Size of an EVM word in bits.
pub const WORD_BITS: u32 = 256;

/// Number of 64-bit limbs in a [`crate::Word256`].
pub const WORD_LIMBS: usize = 4;

// === Opcode numbering ===

/// Number of word opcodes; also the width of an [`crate::OpcodeMask`].
pub const NUM_OPCODES: usize = 25;

/// Every bit an [`crate::OpcodeMask`] may carry.
pub const OPCODE_MASK_BITS: u32 = (1 << NUM_OPCODES) - 1;

// === Operand shaping ===

/// Number of words consumed by one test case in a flat operand array.
pub const WORDS_PER_VECTOR: usize = 3;

/// `y` reduction used to keep BYTE and SIGNEXTEND indices interesting.
pub const BYTE_INDEX_MODULUS: u64 = 255;

/// `y` reduction used to keep SHL, SHR and SAR amounts below the word width.
pub const SHIFT_AMOUNT_MODULUS: u64 = 30;
