use hex_literal::hex;
use wordcheck_common::{Word256, ops};
use wordcheck_test::word;

fn minus(value: i64) -> Word256 {
    Word256::from_i64(-value)
}

#[test]
fn add_wraps_around_max() {
    assert_eq!(ops::add(Word256::MAX, Word256::ONE), Word256::ZERO);
}

#[test]
fn sdiv_of_min_by_minus_one_wraps() {
    assert_eq!(ops::sdiv(Word256::SIGN_BIT, minus(1)), Word256::SIGN_BIT);
    assert_eq!(ops::smod(Word256::SIGN_BIT, minus(1)), Word256::ZERO);
}

#[test]
fn sar_fills_with_sign() {
    assert_eq!(ops::sar(word(1), minus(2)), minus(1));
    assert_eq!(ops::sar(word(300), minus(2)), Word256::MAX);
    assert_eq!(ops::sar(word(300), word(2)), Word256::ZERO);
}

#[test]
fn signed_division_truncates_toward_zero() {
    assert_eq!(ops::sdiv(minus(7), word(2)), minus(3));
    assert_eq!(ops::sdiv(word(7), minus(2)), minus(3));
    assert_eq!(ops::smod(minus(7), word(2)), minus(1));
    assert_eq!(ops::smod(word(7), minus(2)), word(1));
}

#[test]
fn modular_arithmetic_is_exact() {
    // (2^256 - 1) * (2^256 - 1) mod (2^256 - 2) == 1
    let modulus = Word256::MAX.wrapping_sub(Word256::ONE);
    assert_eq!(ops::mulmod(Word256::MAX, Word256::MAX, modulus), Word256::ONE);
    assert_eq!(ops::addmod(Word256::MAX, word(2), word(10)), word(7));
}

#[test]
fn exp_wraps() {
    assert_eq!(ops::exp(word(2), word(255)), Word256::SIGN_BIT);
    assert_eq!(ops::exp(word(2), word(256)), Word256::ZERO);
    assert_eq!(ops::exp(Word256::ZERO, Word256::ZERO), Word256::ONE);
}

#[test]
fn signextend_fixed_vectors() {
    let value = Word256::from_be_bytes(hex!(
        "00000000000000000000000000000000000000000000000000000000000080ff"
    ));
    assert_eq!(
        ops::signextend(word(1), value),
        Word256::from_be_bytes(hex!(
            "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff80ff"
        ))
    );
    assert_eq!(ops::signextend(word(0), value), Word256::MAX);
    assert_eq!(ops::signextend(word(2), value), value);
}

#[test]
fn byte_reads_big_endian() {
    let value = Word256::from_be_bytes(hex!(
        "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"
    ));
    assert_eq!(ops::byte(word(0), value), word(0x01));
    assert_eq!(ops::byte(word(31), value), word(0x20));
    assert_eq!(ops::byte(word(32), value), Word256::ZERO);
    assert_eq!(ops::byte(Word256::MAX, value), Word256::ZERO);
}

#[test]
fn comparisons_return_booleans() {
    assert_eq!(ops::lt(word(1), word(2)), Word256::ONE);
    assert_eq!(ops::gt(word(1), word(2)), Word256::ZERO);
    assert_eq!(ops::slt(minus(1), word(0)), Word256::ONE);
    assert_eq!(ops::sgt(minus(1), word(0)), Word256::ZERO);
    assert_eq!(ops::eq(Word256::MAX, Word256::MAX), Word256::ONE);
    assert_eq!(ops::iszero(Word256::ZERO), Word256::ONE);
    assert_eq!(ops::iszero(Word256::SIGN_BIT), Word256::ZERO);
}

#[test]
fn shifts_move_bits() {
    assert_eq!(ops::shl(word(255), Word256::ONE), Word256::SIGN_BIT);
    assert_eq!(ops::shr(word(255), Word256::SIGN_BIT), Word256::ONE);
    assert_eq!(ops::shl(word(4), word(0xf)), word(0xf0));
    assert_eq!(ops::shr(Word256::MAX, Word256::MAX), Word256::ZERO);
}
