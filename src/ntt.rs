//! Negacyclic Number-Theoretic Transform over Z_q[X]/(X^N + 1)
//!
//! The NTT is the finite-field analogue of the DFT: with a primitive N-th
//! root of unity ω in Z_q it turns polynomial multiplication into O(N log N)
//! pointwise multiplication. BFV works in the negacyclic ring (X^N ≡ −1),
//! which the plain cyclic transform does not compute; the standard fix is
//! the ψ-twist:
//!
//! 1. Multiply coefficient i by ψ^i (ψ a primitive 2N-th root, ψ² = ω)
//! 2. Run the cyclic NTT with ω
//! 3. After the inverse transform, multiply coefficient i by N⁻¹·ψ^{-i}
//!
//! A context precomputes all four power tables once per (N, q); every
//! operation afterwards is read-only, so a context can be shared freely
//! across threads.

use crate::error::FheError;
use crate::modmath::{bit_reverse, is_prime_u64, mod_add, mod_inv, mod_mul, mod_pow, mod_sub};

/// NTT context: precomputed data for transforms over a fixed (N, q) pair.
///
/// q must be prime with q ≡ 1 (mod 2N), the existence condition for a
/// primitive 2N-th root of unity, and must fit in 63 bits so sums stay
/// inside u64 before reduction.
#[derive(Clone, Debug)]
pub struct NttContext {
    /// Polynomial degree (power of 2, ≥ 2)
    pub n: usize,

    /// Prime modulus, q ≡ 1 (mod 2n), q < 2^63
    pub q: u64,

    /// Primitive 2n-th root of unity: ψ^(2n) ≡ 1, ψ^n ≡ -1 (mod q)
    pub psi: u64,

    /// ψ^(-1) mod q
    pub psi_inv: u64,

    /// n-th root of unity ω = ψ² used by the cyclic transform core
    pub omega: u64,

    /// ω^(-1) mod q
    pub omega_inv: u64,

    /// n^(-1) mod q, the inverse-transform scaling factor
    pub n_inv: u64,

    /// log₂(n) - number of butterfly stages
    log_n: usize,

    // Twiddle tables, immutable after construction: omega powers drive the
    // cyclic core, psi powers the negacyclic pre/post twist.
    omega_powers: Vec<u64>,
    omega_inv_powers: Vec<u64>,
    psi_powers: Vec<u64>,
    psi_inv_powers: Vec<u64>,
}

impl NttContext {
    /// Create an NTT context for a given ring dimension and prime modulus.
    ///
    /// # Arguments
    /// * `n` - Polynomial degree (power of 2, ≥ 2)
    /// * `q` - Prime modulus with q ≡ 1 (mod 2n), q < 2^63
    ///
    /// # Errors
    /// `InvalidParameter` when n is not a power of two, q is out of range,
    /// q ≢ 1 (mod 2n), or q is composite.
    pub fn new(n: usize, q: u64) -> Result<Self, FheError> {
        if n < 2 || !n.is_power_of_two() {
            return Err(FheError::InvalidParameter(format!(
                "ring dimension must be a power of two >= 2, got {}",
                n
            )));
        }
        if q >> 63 != 0 {
            return Err(FheError::InvalidParameter(format!(
                "modulus must fit in 63 bits, got {}",
                q
            )));
        }
        if (q.wrapping_sub(1)) % (2 * n as u64) != 0 {
            return Err(FheError::InvalidParameter(format!(
                "modulus must satisfy q ≡ 1 (mod 2N): q={}, N={}",
                q, n
            )));
        }
        if !is_prime_u64(q) {
            return Err(FheError::InvalidParameter(format!(
                "modulus must be prime, got {}",
                q
            )));
        }

        let log_n = n.trailing_zeros() as usize;

        let psi = find_primitive_root(n, q).ok_or_else(|| {
            FheError::InvalidParameter(format!(
                "no primitive 2N-th root of unity modulo {} for N={}",
                q, n
            ))
        })?;
        let psi_inv = mod_inv(psi, q);

        let omega = mod_mul(psi, psi, q);
        let omega_inv = mod_inv(omega, q);
        let n_inv = mod_inv(n as u64, q);

        let mut omega_powers = Vec::with_capacity(n);
        let mut omega_inv_powers = Vec::with_capacity(n);
        let mut psi_powers = Vec::with_capacity(n);
        let mut psi_inv_powers = Vec::with_capacity(n);

        let mut curr_omega = 1u64;
        let mut curr_omega_inv = 1u64;
        let mut curr_psi = 1u64;
        let mut curr_psi_inv = 1u64;

        for _ in 0..n {
            omega_powers.push(curr_omega);
            omega_inv_powers.push(curr_omega_inv);
            psi_powers.push(curr_psi);
            psi_inv_powers.push(curr_psi_inv);

            curr_omega = mod_mul(curr_omega, omega, q);
            curr_omega_inv = mod_mul(curr_omega_inv, omega_inv, q);
            curr_psi = mod_mul(curr_psi, psi, q);
            curr_psi_inv = mod_mul(curr_psi_inv, psi_inv, q);
        }

        Ok(Self {
            n,
            q,
            psi,
            psi_inv,
            omega,
            omega_inv,
            n_inv,
            log_n,
            omega_powers,
            omega_inv_powers,
            psi_powers,
            psi_inv_powers,
        })
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

    /// In-place iterative Cooley–Tukey over the supplied root table.
    ///
    /// The orientation (forward vs inverse) is determined solely by which
    /// table is passed; `roots[j * (n/m)]` supplies the stage-s twiddles.
    fn ntt_core(&self, a: &mut [u64], roots: &[u64]) {
        let n = self.n;
        let q = self.q;

        // Bit-reverse permutation
        for i in 0..n {
            let j = bit_reverse(i, self.log_n);
            if i < j {
                a.swap(i, j);
            }
        }

        let mut m = 2;
        while m <= n {
            let m2 = m >> 1;
            let root_step = n / m;

            for k in (0..n).step_by(m) {
                for j in 0..m2 {
                    let w = roots[j * root_step];
                    let t = mod_mul(w, a[k + j + m2], q);
                    let u = a[k + j];

                    a[k + j] = mod_add(u, t, q);
                    a[k + j + m2] = mod_sub(u, t, q);
                }
            }
            m <<= 1;
        }
    }

    /// Forward negacyclic transform, in place.
    ///
    /// Applies the ψ-twist, then the cyclic NTT. Coefficients must lie in
    /// [0, q).
    pub fn forward(&self, a: &mut [u64]) -> Result<(), FheError> {
        self.check_len(a)?;

        for i in 0..self.n {
            a[i] = mod_mul(a[i], self.psi_powers[i], self.q);
        }
        self.ntt_core(a, &self.omega_powers);
        Ok(())
    }

    /// Inverse negacyclic transform, in place.
    ///
    /// Runs the cyclic inverse NTT, then removes the twist and the
    /// transform gain in one fused pass: a[i] ← a[i]·n⁻¹·ψ^{-i}.
    pub fn inverse(&self, a: &mut [u64]) -> Result<(), FheError> {
        self.check_len(a)?;

        self.ntt_core(a, &self.omega_inv_powers);
        for i in 0..self.n {
            let scaled = mod_mul(a[i], self.n_inv, self.q);
            a[i] = mod_mul(scaled, self.psi_inv_powers[i], self.q);
        }
        Ok(())
    }

    /// Multiply two polynomials in Z_q[X]/(X^N + 1).
    ///
    /// Transforms copies of both inputs, multiplies pointwise, transforms
    /// back. O(N log N).
    pub fn multiply(&self, a: &[u64], b: &[u64]) -> Result<Vec<u64>, FheError> {
        self.check_len(a)?;
        self.check_len(b)?;

        let mut a_ntt = a.to_vec();
        let mut b_ntt = b.to_vec();

        self.forward(&mut a_ntt)?;
        self.forward(&mut b_ntt)?;

        for i in 0..self.n {
            a_ntt[i] = mod_mul(a_ntt[i], b_ntt[i], self.q);
        }

        self.inverse(&mut a_ntt)?;
        Ok(a_ntt)
    }

    /// Pointwise addition: (a + b) mod q
    pub fn add(&self, a: &[u64], b: &[u64]) -> Result<Vec<u64>, FheError> {
        self.check_len(a)?;
        self.check_len(b)?;
        Ok(a
            .iter()
            .zip(b)
            .map(|(&x, &y)| mod_add(x, y, self.q))
            .collect())
    }

    /// Pointwise subtraction: (a - b) mod q
    pub fn sub(&self, a: &[u64], b: &[u64]) -> Result<Vec<u64>, FheError> {
        self.check_len(a)?;
        self.check_len(b)?;
        Ok(a
            .iter()
            .zip(b)
            .map(|(&x, &y)| mod_sub(x, y, self.q))
            .collect())
    }

    /// Multiply every coefficient by a scalar: (a[i] · s) mod q
    pub fn scalar_mul(&self, a: &[u64], scalar: u64) -> Result<Vec<u64>, FheError> {
        self.check_len(a)?;
        Ok(a.iter().map(|&x| mod_mul(x, scalar, self.q)).collect())
    }
}

/// Find a primitive 2n-th root of unity modulo q.
///
/// Walks generator candidates g = 2, 3, … and tests whether
/// g^((q-1)/(2n)) has exact order 2n (value^(2n) ≡ 1 and value^n ≢ 1).
/// Setup cost only, once per context; for a prime q the walk terminates at
/// a small g in practice, though the worst case is O(q).
fn find_primitive_root(n: usize, q: u64) -> Option<u64> {
    let target_order = 2 * n as u64;
    let exponent = (q - 1) / target_order;

    for g in 2..q {
        let candidate = mod_pow(g, exponent, q);
        if mod_pow(candidate, target_order, q) == 1 && mod_pow(candidate, n as u64, q) != 1 {
            return Some(candidate);
        }
    }
    None
}
