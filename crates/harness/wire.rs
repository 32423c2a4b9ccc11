//! Word-level wire format of the system under test.
//!
//! Every value travels as a 32-byte big-endian word.
//!
//! | Message | Layout |
//! |---------|--------|
//! | single call | `arity` operand words |
//! | single result | one word |
//! | batch call | mask word, count word, `count` operand words |
//! | batch result | `passing`, `opcode_index`, `have`, `want`, `x`, `y`, `z` |

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use wordcheck_common::{
    Opcode, OpcodeMask, Word256,
    constants::{WORD_BYTES, WORDS_PER_VECTOR},
};

use crate::sut::BatchVerdict;

pub const BATCH_RESULT_WORDS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("Expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("Payload of {0} bytes is not a whole number of words")]
    RaggedPayload(usize),
    #[error("Batch header declares {declared} words but {actual} follow")]
    CountMismatch { declared: Word256, actual: usize },
    #[error("Operand array of {0} words is not a multiple of three")]
    RaggedOperands(usize),
    #[error("Flag word {0:#x} is neither 0 nor 1")]
    InvalidFlag(Word256),
    #[error("Opcode index word {0:#x} does not fit in 64 bits")]
    InvalidOpcodeIndex(Word256),
    #[error("Mask word {0:#x} has bits beyond the last opcode")]
    InvalidMask(Word256),
}

pub fn encode_words(words: &[Word256]) -> Bytes {
    let mut buf = BytesMut::with_capacity(words.len() * WORD_BYTES);
    for word in words {
        buf.put_slice(&word.to_be_bytes());
    }
    buf.freeze()
}

pub fn decode_words(payload: &[u8]) -> Result<Vec<Word256>, WireError> {
    if payload.len() % WORD_BYTES != 0 {
        return Err(WireError::RaggedPayload(payload.len()));
    }
    Ok(payload
        .chunks_exact(WORD_BYTES)
        .filter_map(Word256::from_be_slice)
        .collect())
}

fn expect_len(payload: &[u8], words: usize) -> Result<(), WireError> {
    let expected = words * WORD_BYTES;
    if payload.len() != expected {
        return Err(WireError::InvalidLength {
            expected,
            got: payload.len(),
        });
    }
    Ok(())
}

pub fn encode_call(operands: &[Word256]) -> Bytes {
    encode_words(operands)
}

/// Decodes a single-opcode call, which must carry exactly `arity` words.
pub fn decode_call(opcode: Opcode, payload: &[u8]) -> Result<Vec<Word256>, WireError> {
    expect_len(payload, opcode.arity())?;
    decode_words(payload)
}

pub fn encode_result(result: Word256) -> Bytes {
    encode_words(&[result])
}

pub fn decode_result(payload: &[u8]) -> Result<Word256, WireError> {
    expect_len(payload, 1)?;
    Word256::from_be_slice(payload).ok_or(WireError::InvalidLength {
        expected: WORD_BYTES,
        got: payload.len(),
    })
}

pub fn encode_batch_call(words: &[Word256], mask: OpcodeMask) -> Bytes {
    let mut buf = BytesMut::with_capacity((words.len() + 2) * WORD_BYTES);
    buf.put_slice(&Word256::from(u64::from(mask.bits())).to_be_bytes());
    buf.put_slice(&Word256::from(words.len() as u64).to_be_bytes());
    buf.put_slice(&encode_words(words));
    buf.freeze()
}

/// Decodes a batch call into its flat operand array and mask.
pub fn decode_batch_call(payload: &[u8]) -> Result<(Vec<Word256>, OpcodeMask), WireError> {
    let words = decode_words(payload)?;
    let [mask_word, count_word, operands @ ..] = words.as_slice() else {
        return Err(WireError::InvalidLength {
            expected: 2 * WORD_BYTES,
            got: payload.len(),
        });
    };

    let mask = mask_word
        .to_u64()
        .and_then(|bits| OpcodeMask::from_bits(bits).ok())
        .ok_or(WireError::InvalidMask(*mask_word))?;

    if count_word.to_u64() != Some(operands.len() as u64) {
        return Err(WireError::CountMismatch {
            declared: *count_word,
            actual: operands.len(),
        });
    }
    if operands.len() % WORDS_PER_VECTOR != 0 {
        return Err(WireError::RaggedOperands(operands.len()));
    }

    Ok((operands.to_vec(), mask))
}

pub fn encode_batch_result(verdict: &BatchVerdict) -> Bytes {
    encode_words(&[
        Word256::from(verdict.passing),
        Word256::from(verdict.opcode_index),
        verdict.have,
        verdict.want,
        verdict.x,
        verdict.y,
        verdict.z,
    ])
}

pub fn decode_batch_result(payload: &[u8]) -> Result<BatchVerdict, WireError> {
    expect_len(payload, BATCH_RESULT_WORDS)?;
    let words = decode_words(payload)?;
    let [passing, opcode_index, have, want, x, y, z] = words.as_slice() else {
        return Err(WireError::InvalidLength {
            expected: BATCH_RESULT_WORDS * WORD_BYTES,
            got: payload.len(),
        });
    };

    let passing = match passing.to_u64() {
        Some(0) => false,
        Some(1) => true,
        _ => return Err(WireError::InvalidFlag(*passing)),
    };
    let opcode_index = opcode_index
        .to_u64()
        .ok_or(WireError::InvalidOpcodeIndex(*opcode_index))?;

    Ok(BatchVerdict {
        passing,
        opcode_index,
        have: *have,
        want: *want,
        x: *x,
        y: *y,
        z: *z,
    })
}
