//! Extended-precision helpers for the BFV scale-and-round step.
//!
//! The schoolbook ciphertext product accumulates into 128 bits; scaling the
//! folded coefficient by the plaintext modulus t widens it to 192 bits, and
//! the rounded division by q needs the full two-limb quotient reduced mod q.
//! Everything here is plain u128 limb arithmetic, so the routines behave
//! identically on every target.

/// Full 128-bit product of two 64-bit operands.
#[inline(always)]
pub(crate) fn mul_wide(a: u64, b: u64) -> u128 {
    a as u128 * b as u128
}

/// Unsigned 192-bit integer as three 64-bit limbs, least significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Uint192 {
    pub lo: u64,
    pub mid: u64,
    pub hi: u64,
}

impl Uint192 {
    /// Full 192-bit product of a 128-bit and a 64-bit operand.
    ///
    /// Two widening multiplies; the mid limbs are summed with the carry
    /// propagated into the high limb.
    pub(crate) fn mul_128x64(a: u128, b: u64) -> Uint192 {
        let p_lo = mul_wide(a as u64, b);
        let p_hi = mul_wide((a >> 64) as u64, b);

        let mid_sum = (p_lo >> 64) + (p_hi as u64 as u128);

        Uint192 {
            lo: p_lo as u64,
            mid: mid_sum as u64,
            hi: (p_hi >> 64) as u64 + (mid_sum >> 64) as u64,
        }
    }

    /// Add a 64-bit scalar, carrying through all three limbs.
    pub(crate) fn add_u64(self, s: u64) -> Uint192 {
        let (lo, carry_lo) = self.lo.overflowing_add(s);
        let (mid, carry_mid) = self.mid.overflowing_add(carry_lo as u64);
        Uint192 {
            lo,
            mid,
            hi: self.hi.wrapping_add(carry_mid as u64),
        }
    }
}

/// Compute ⌊num / q⌋ mod q.
///
/// Three-limb long division by q (each step is a native u128-by-u64
/// divide), then the up-to-128-bit quotient is folded mod q limb by limb.
/// The high quotient limb participates in the reduction: truncating it
/// silently corrupts every coefficient whose scaled value exceeds 64 bits.
/// The division remainder is discarded: the caller has already added ⌊q/2⌋
/// to make the division round to nearest.
pub(crate) fn div192_by_64_mod_q(num: Uint192, q: u64) -> u64 {
    debug_assert!(q > 1);
    let q = q as u128;

    let quot_hi = num.hi as u128 / q;
    let rem = num.hi as u128 % q;

    let cur = (rem << 64) | num.mid as u128;
    let quot_mid = cur / q; // < 2^64 since cur < q·2^64
    let rem = cur % q;

    let cur = (rem << 64) | num.lo as u128;
    let quot_lo = cur / q;

    // quotient = quot_hi·2^128 + quot_mid·2^64 + quot_lo; fold mod q from
    // the top limb down (acc < q < 2^64, so each fold fits in u128)
    let mut acc = quot_hi % q;
    acc = ((acc << 64) | quot_mid) % q;
    acc = ((acc << 64) | quot_lo) % q;
    acc as u64
}
