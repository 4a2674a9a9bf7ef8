//! BFV ciphertext multiplication with exact scale-and-round
//!
//! Multiplying two BFV ciphertexts (c0, c1) ⊗ (c0', c1') produces the
//! degree-3 ciphertext (d0, d1, d2) with each component scaled by t/q:
//!
//!   d0 = ⌊t·(c0·c0')/q⌉, d1 = ⌊t·(c0·c1')/q⌉ + ⌊t·(c1·c0')/q⌉,
//!   d2 = ⌊t·(c1·c1')/q⌉
//!
//! The scaling must happen over the true integers, not modulo q: the
//! schoolbook product is accumulated exactly in 128 bits, folded into the
//! negacyclic ring with an explicit sign, widened to 192 bits by the
//! multiplication with t, rounded with ⌊q/2⌋ and only then divided by q and
//! reduced. Collapsing any of these steps into modular arithmetic destroys
//! the rounding and with it decryption correctness.
//!
//! Relinearization back to a degree-2 ciphertext uses base-2^w key
//! switching: d2 is split into ⌈bits(q)/w⌉ digits and each digit is paired
//! with a key component encrypting B^i·s².

use crate::error::FheError;
use crate::modmath::mod_sub;
use crate::ntt::NttContext;
use crate::wide::{div192_by_64_mod_q, mul_wide, Uint192};

/// Evaluation-key material for relinearization.
///
/// Component i is the polynomial pair (b_i, a_i) with
/// b_i + a_i·s ≈ B^i·s² (mod q) for the decomposition base B = 2^base_bits.
/// The key is produced by an external key generator; this crate only
/// consumes it.
#[derive(Clone, Debug)]
pub struct RelinearizationKey {
    /// log₂ of the decomposition base B
    pub base_bits: u32,
    /// (b_i, a_i) pairs, one per digit, lowest digit first
    pub components: Vec<(Vec<u64>, Vec<u64>)>,
}

impl RelinearizationKey {
    /// Number of base-2^base_bits digits needed to cover values in [0, q).
    pub fn digit_count(q: u64, base_bits: u32) -> usize {
        let q_bits = 64 - q.leading_zeros();
        ((q_bits + base_bits - 1) / base_bits) as usize
    }
}

/// BFV ciphertext multiplier for a fixed (N, q, t).
///
/// Owns an `NttContext` for the ring operations; all state is immutable
/// after construction.
#[derive(Clone, Debug)]
pub struct BfvMultiplier {
    n: usize,
    q: u64,
    t: u64,
    delta: u64,
    ntt: NttContext,
}

impl BfvMultiplier {
    /// Create a multiplier for ring dimension n, ciphertext modulus q and
    /// plaintext modulus t.
    ///
    /// # Errors
    /// `InvalidParameter` when the NTT context cannot be built for (n, q),
    /// when t is outside 1 < t < q, or when N·(q−1)² does not fit in 128
    /// bits, the width the schoolbook accumulator is sized to.
    pub fn new(n: usize, q: u64, t: u64) -> Result<Self, FheError> {
        let ntt = NttContext::new(n, q)?;

        if t < 2 || t >= q {
            return Err(FheError::InvalidParameter(format!(
                "plaintext modulus must satisfy 1 < t < q, got t={}, q={}",
                t, q
            )));
        }

        // Each accumulator slot absorbs up to N products of (q-1)² values.
        // The 192-bit bound (N·(q−1)²)·t + ⌊q/2⌋ < 2^192 then follows from
        // t < q < 2^63.
        let max_product = (q - 1) as u128 * (q - 1) as u128;
        if max_product.checked_mul(n as u128).is_none() {
            return Err(FheError::InvalidParameter(format!(
                "N·(q-1)² must fit in 128 bits: N={}, q={}",
                n, q
            )));
        }

        let delta = q / t;

        Ok(Self { n, q, t, delta, ntt })
    }

    /// Ring dimension N.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Ciphertext modulus q.
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Plaintext modulus t.
    pub fn t(&self) -> u64 {
        self.t
    }

    /// Plaintext scaling factor Δ = ⌊q/t⌋.
    pub fn delta(&self) -> u64 {
        self.delta
    }

    /// The NTT engine backing the ring arithmetic.
    pub fn ntt(&self) -> &NttContext {
        &self.ntt
    }

    /// Multiply two ciphertexts, producing a degree-3 ciphertext.
    ///
    /// # Arguments
    /// * `c1_0`, `c1_1` - components of the first ciphertext
    /// * `c2_0`, `c2_1` - components of the second ciphertext
    ///
    /// # Returns
    /// (d0, d1, d2) with d1 the modular sum of the two cross terms.
    pub fn multiply_ciphertexts(
        &self,
        c1_0: &[u64],
        c1_1: &[u64],
        c2_0: &[u64],
        c2_1: &[u64],
    ) -> Result<(Vec<u64>, Vec<u64>, Vec<u64>), FheError> {
        for poly in [c1_0, c1_1, c2_0, c2_1] {
            self.check_len(poly)?;
        }

        let d0 = self.mul_scale(c1_0, c2_0);
        let cross_a = self.mul_scale(c1_0, c2_1);
        let cross_b = self.mul_scale(c1_1, c2_0);
        let d1 = self.ntt.add(&cross_a, &cross_b)?;
        let d2 = self.mul_scale(c1_1, c2_1);

        Ok((d0, d1, d2))
    }

    /// Negacyclic product of a and b scaled by t/q with round-to-nearest.
    ///
    /// 1. Schoolbook accumulation of all N² cross products into a 2N-slot
    ///    128-bit accumulator (exact: N·(q−1)² < 2^128 by construction).
    /// 2. Negacyclic fold: coefficient i of the ring product is
    ///    acc[i] − acc[N+i]; the subtraction is done on magnitudes with the
    ///    sign carried separately so the intermediate stays unsigned.
    /// 3. Widen to 192 bits by t, add ⌊q/2⌋, divide by q, reduce mod q.
    /// 4. Reapply the sign modulo q.
    fn mul_scale(&self, a: &[u64], b: &[u64]) -> Vec<u64> {
        let n = self.n;

        let mut acc = vec![0u128; 2 * n];
        for i in 0..n {
            for j in 0..n {
                acc[i + j] += mul_wide(a[i], b[j]);
            }
        }

        let half_q = self.q / 2;
        let mut res = vec![0u64; n];

        for i in 0..n {
            let low = acc[i];
            let high = acc[n + i];
            let (abs, negative) = if low >= high {
                (low - high, false)
            } else {
                (high - low, true)
            };

            let num = Uint192::mul_128x64(abs, self.t).add_u64(half_q);
            let scaled = div192_by_64_mod_q(num, self.q);

            res[i] = if negative {
                mod_sub(0, scaled, self.q)
            } else {
                scaled
            };
        }

        res
    }

    /// Collapse a degree-3 ciphertext back to degree 2 with an evaluation
    /// key.
    ///
    /// d2 is decomposed coefficient-wise into base-B digits
    /// (d2 = Σ_i digit_i·B^i), each digit is multiplied with its key
    /// component and accumulated:
    ///
    ///   c0 = d0 + Σ_i digit_i · b_i,  c1 = d1 + Σ_i digit_i · a_i
    ///
    /// With b_i + a_i·s = B^i·s² this yields c0 + c1·s = d0 + d1·s + d2·s².
    ///
    /// # Errors
    /// `InvalidParameter` for a base outside 2 ≤ B < q or a key with fewer
    /// components than ⌈bits(q)/base_bits⌉ digits; `ShapeMismatch` for any
    /// polynomial of the wrong length.
    pub fn relinearize(
        &self,
        d0: &[u64],
        d1: &[u64],
        d2: &[u64],
        key: &RelinearizationKey,
    ) -> Result<(Vec<u64>, Vec<u64>), FheError> {
        self.check_len(d0)?;
        self.check_len(d1)?;
        self.check_len(d2)?;

        if key.base_bits == 0 || key.base_bits >= 63 || (1u64 << key.base_bits) >= self.q {
            return Err(FheError::InvalidParameter(format!(
                "decomposition base 2^{} must satisfy 2 <= B < q={}",
                key.base_bits, self.q
            )));
        }

        let digits = RelinearizationKey::digit_count(self.q, key.base_bits);
        if key.components.len() < digits {
            return Err(FheError::InvalidParameter(format!(
                "relinearization key has {} components, need {} for base 2^{}",
                key.components.len(),
                digits,
                key.base_bits
            )));
        }

        let mask = (1u64 << key.base_bits) - 1;
        let mut c0 = d0.to_vec();
        let mut c1 = d1.to_vec();

        for (idx, (b_i, a_i)) in key.components[..digits].iter().enumerate() {
            self.check_len(b_i)?;
            self.check_len(a_i)?;

            let shift = idx as u32 * key.base_bits;
            let digit: Vec<u64> = d2.iter().map(|&c| (c >> shift) & mask).collect();

            c0 = self.ntt.add(&c0, &self.ntt.multiply(&digit, b_i)?)?;
            c1 = self.ntt.add(&c1, &self.ntt.multiply(&digit, a_i)?)?;
        }

        Ok((c0, c1))
    }

    #[inline]
    fn check_len(&self, a: &[u64]) -> Result<(), FheError> {
        if a.len() != self.n {
            return Err(FheError::ShapeMismatch {
                expected: self.n,
                got: a.len(),
            });
        }
        Ok(())
    }
}

/// Scale a ciphertext coefficient back to the plaintext domain:
/// ⌊(c·t + ⌊q/2⌋)/q⌉ mod t. Decryption-side counterpart of the t/q scaling,
/// useful for checking trivial (noiseless) ciphertexts.
pub fn scale_to_plaintext(c: u64, q: u64, t: u64) -> u64 {
    let num = c as u128 * t as u128 + (q / 2) as u128;
    ((num / q as u128) % t as u128) as u64
}
