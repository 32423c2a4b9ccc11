use proptest::prelude::*;
use wordcheck_common::{Word256, ops};

fn any_word() -> impl Strategy<Value = Word256> {
    any::<[u64; 4]>().prop_map(Word256::from_limbs)
}

fn large_shift() -> impl Strategy<Value = Word256> {
    prop_oneof![
        (256u64..=u64::MAX).prop_map(Word256::from_u64),
        any::<[u64; 4]>().prop_map(|mut limbs| {
            limbs[3] |= 1;
            Word256::from_limbs(limbs)
        }),
    ]
}

proptest! {
    #[test]
    fn add_and_mul_commute(x in any_word(), y in any_word()) {
        prop_assert_eq!(ops::add(x, y), ops::add(y, x));
        prop_assert_eq!(ops::mul(x, y), ops::mul(y, x));
    }

    #[test]
    fn sub_undoes_add(x in any_word(), y in any_word()) {
        prop_assert_eq!(ops::sub(ops::add(x, y), y), x);
    }

    #[test]
    fn zero_divisor_gives_zero(x in any_word()) {
        prop_assert_eq!(ops::div(x, Word256::ZERO), Word256::ZERO);
        prop_assert_eq!(ops::modulo(x, Word256::ZERO), Word256::ZERO);
        prop_assert_eq!(ops::sdiv(x, Word256::ZERO), Word256::ZERO);
        prop_assert_eq!(ops::smod(x, Word256::ZERO), Word256::ZERO);
        prop_assert_eq!(ops::addmod(x, Word256::ZERO, Word256::ZERO), Word256::ZERO);
        prop_assert_eq!(ops::mulmod(x, Word256::ZERO, Word256::ZERO), Word256::ZERO);
    }

    #[test]
    fn addmod_with_zero_addend_is_mod(x in any_word(), m in any_word()) {
        prop_assume!(!m.is_zero());
        prop_assert_eq!(ops::addmod(x, Word256::ZERO, m), ops::modulo(x, m));
    }

    #[test]
    fn division_identity(x in any_word(), y in any_word()) {
        prop_assume!(!y.is_zero());
        let reconstructed = ops::add(ops::mul(ops::div(x, y), y), ops::modulo(x, y));
        prop_assert_eq!(reconstructed, x);
        prop_assert!(ops::modulo(x, y) < y);
    }

    #[test]
    fn exp_by_zero_is_one(x in any_word()) {
        prop_assert_eq!(ops::exp(x, Word256::ZERO), Word256::ONE);
    }

    #[test]
    fn not_is_an_involution(x in any_word()) {
        prop_assert_eq!(ops::not(ops::not(x)), x);
        prop_assert_eq!(ops::xor(x, ops::not(x)), Word256::MAX);
    }

    #[test]
    fn large_shifts_clear(x in any_word(), shift in large_shift()) {
        prop_assert_eq!(ops::shl(shift, x), Word256::ZERO);
        prop_assert_eq!(ops::shr(shift, x), Word256::ZERO);
        let fill = if x.is_negative() { Word256::MAX } else { Word256::ZERO };
        prop_assert_eq!(ops::sar(shift, x), fill);
    }

    #[test]
    fn signextend_top_byte_is_identity(x in any_word()) {
        prop_assert_eq!(ops::signextend(Word256::from_u64(31), x), x);
    }

    #[test]
    fn signed_results_match_negation(x in any_word(), y in any_word()) {
        prop_assume!(!y.is_zero() && y != Word256::SIGN_BIT);
        prop_assert_eq!(ops::sdiv(x, y.negate()), ops::sdiv(x, y).negate());
    }
}
