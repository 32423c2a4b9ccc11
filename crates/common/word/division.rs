//! Long division over little-endian 64-bit limbs.
//!
//! This is Knuth's algorithm D (TAOCP vol. 2, 4.3.1) with 128-bit
//! intermediates for the two-by-one limb steps. Numerators of up to eight limbs
//! are supported so that the same routine reduces both 256-bit values and the
//! 512-bit intermediates of `ADDMOD` and `MULMOD`.

const BASE: u128 = 1 << 64;

/// Number of limbs up to and including the most significant non-zero one.
pub(crate) fn significant_limbs(limbs: &[u64]) -> usize {
    limbs.iter().rposition(|&limb| limb != 0).map_or(0, |i| i + 1)
}

#[inline]
fn shl_pair(high: u64, low: u64, shift: u32) -> u64 {
    if shift == 0 {
        high
    } else {
        (high << shift) | (low >> (64 - shift))
    }
}

#[inline]
fn shr_pair(low: u64, high: u64, shift: u32) -> u64 {
    if shift == 0 {
        low
    } else {
        (low >> shift) | (high << (64 - shift))
    }
}

/// Divides `numerator` (at most eight limbs) by a non-zero 256-bit `divisor`,
/// returning `(quotient, remainder)`.
///
/// Callers guarantee `divisor` is non-zero; a zero divisor yields a zero
/// quotient and remainder instead of panicking.
#[allow(clippy::indexing_slicing)]
pub(crate) fn div_rem(numerator: &[u64], divisor: &[u64; 4]) -> ([u64; 8], [u64; 4]) {
    let mut quotient = [0u64; 8];
    let mut remainder = [0u64; 4];

    let n = significant_limbs(divisor);
    let m = significant_limbs(numerator);
    if n == 0 || numerator.len() > 8 {
        return (quotient, remainder);
    }

    if m < n {
        remainder[..m].copy_from_slice(&numerator[..m]);
        return (quotient, remainder);
    }

    if n == 1 {
        let d = u128::from(divisor[0]);
        let mut rem: u128 = 0;
        for j in (0..m).rev() {
            let current = (rem << 64) | u128::from(numerator[j]);
            quotient[j] = (current / d) as u64;
            rem = current % d;
        }
        remainder[0] = rem as u64;
        return (quotient, remainder);
    }

    // Normalize so the divisor's top limb has its high bit set.
    let shift = divisor[n - 1].leading_zeros();
    let mut dn = [0u64; 4];
    for i in (1..n).rev() {
        dn[i] = shl_pair(divisor[i], divisor[i - 1], shift);
    }
    dn[0] = divisor[0] << shift;

    let mut un = [0u64; 9];
    un[m] = if shift == 0 {
        0
    } else {
        numerator[m - 1] >> (64 - shift)
    };
    for i in (1..m).rev() {
        un[i] = shl_pair(numerator[i], numerator[i - 1], shift);
    }
    un[0] = numerator[0] << shift;

    let top = u128::from(dn[n - 1]);
    let next = u128::from(dn[n - 2]);

    for j in (0..=m - n).rev() {
        let head = (u128::from(un[j + n]) << 64) | u128::from(un[j + n - 1]);
        let mut qhat = head / top;
        let mut rhat = head % top;

        while qhat >= BASE || qhat * next > ((rhat << 64) | u128::from(un[j + n - 2])) {
            qhat -= 1;
            rhat += top;
            if rhat >= BASE {
                break;
            }
        }

        // un[j..=j+n] -= qhat * dn
        let mut borrow = 0u64;
        let mut carry = 0u128;
        for i in 0..n {
            let product = qhat * u128::from(dn[i]) + carry;
            carry = product >> 64;
            let (diff, b1) = un[i + j].overflowing_sub(product as u64);
            let (diff, b2) = diff.overflowing_sub(borrow);
            un[i + j] = diff;
            borrow = u64::from(b1) + u64::from(b2);
        }
        let (diff, b1) = un[j + n].overflowing_sub(carry as u64);
        let (diff, b2) = diff.overflowing_sub(borrow);
        un[j + n] = diff;

        // qhat was one too large: add the divisor back once.
        if b1 || b2 {
            qhat -= 1;
            let mut carry = 0u128;
            for i in 0..n {
                let sum = u128::from(un[i + j]) + u128::from(dn[i]) + carry;
                un[i + j] = sum as u64;
                carry = sum >> 64;
            }
            un[j + n] = un[j + n].wrapping_add(carry as u64);
        }

        quotient[j] = qhat as u64;
    }

    for i in 0..n {
        remainder[i] = shr_pair(un[i], un[i + 1], shift);
    }

    (quotient, remainder)
}
