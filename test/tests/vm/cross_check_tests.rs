use ethereum_types::{U256, U512};
use proptest::prelude::*;
use wordcheck_common::{Opcode, OperandVector, Word256, ops};
use wordcheck_harness::ReferenceOracle;
use wordcheck_vm::{
    VM,
    utils::{u256_to_word, word_to_u256},
};

fn any_word() -> impl Strategy<Value = Word256> {
    prop_oneof![
        any::<[u64; 4]>().prop_map(Word256::from_limbs),
        (0u64..300).prop_map(Word256::from_u64),
        Just(Word256::MAX),
        Just(Word256::SIGN_BIT),
    ]
}

fn any_vector() -> impl Strategy<Value = OperandVector> {
    (any_word(), any_word(), any_word()).prop_map(|(x, y, z)| OperandVector::new(x, y, z))
}

proptest! {
    #[test]
    fn vm_agrees_with_oracle(vector in any_vector()) {
        for opcode in Opcode::all() {
            let have = VM::execute_vector(opcode, &vector).unwrap();
            let want = ReferenceOracle::evaluate_vector(opcode, &vector);
            prop_assert_eq!(have, want, "{} disagrees on {:?}", opcode, vector);
        }
    }

    #[test]
    fn limb_conversion_matches_u256(limbs in any::<[u64; 4]>()) {
        let word = Word256::from_limbs(limbs);
        prop_assert_eq!(word_to_u256(word), U256(limbs));
        prop_assert_eq!(u256_to_word(U256(limbs)), word);
    }

    #[test]
    fn wide_arithmetic_matches_u256(x in any_word(), y in any_word(), m in any_word()) {
        let (a, b, n) = (word_to_u256(x), word_to_u256(y), word_to_u256(m));
        prop_assert_eq!(word_to_u256(x.wrapping_mul(y)), a.overflowing_mul(b).0);
        if !n.is_zero() {
            let wide = a.full_mul(b) % U512::from(n);
            let expected = U256::try_from(wide).unwrap();
            prop_assert_eq!(word_to_u256(ops::mulmod(x, y, m)), expected);
        }
    }
}

#[test]
fn vm_agrees_on_boundary_vectors() {
    for vector in wordcheck_harness::stimulus::boundary_vectors() {
        for opcode in Opcode::all() {
            assert_eq!(
                VM::execute_vector(opcode, &vector).unwrap(),
                ReferenceOracle::evaluate_vector(opcode, &vector),
                "{opcode} on {vector:?}"
            );
        }
    }
}
