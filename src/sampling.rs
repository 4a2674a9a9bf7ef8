//! Deterministic polynomial sampling using SHAKE128
//!
//! Instead of drawing coefficients one-by-one from a system RNG, expand a
//! 32-byte seed through the SHAKE128 XOF and parse the stream: the same
//! seed always yields the same polynomial, which is what tests, benches and
//! key-generation collaborators want. Coefficients are returned as ring
//! representatives in [0, q), so the output feeds straight into the NTT
//! engine and the multiplier.
//!
//! **Sampling method**: rejection sampling throughout. Uniform values are
//! masked to the bit width of q, ternary values use 2 bits per draw, and
//! bounded errors read as many bits as the span needs.

use rand::RngCore;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake128,
};

/// Sample a uniform polynomial from SHAKE128
///
/// **Input**: 32-byte seed
/// **Output**: n coefficients, each uniform in [0, q)
pub fn sample_uniform_shake128(seed: &[u8; 32], n: usize, q: u64) -> Vec<u64> {
    assert!(q >= 2, "modulus must be at least 2");

    let mut shake = Shake128::default();
    shake.update(seed);
    let mut reader = shake.finalize_xof();

    // Mask candidates down to bits(q-1) so the rejection rate stays < 1/2
    let bits = 64 - (q - 1).leading_zeros();
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };

    let mut coeffs = Vec::with_capacity(n);
    let mut byte_buffer = [0u8; 8];

    while coeffs.len() < n {
        reader.read(&mut byte_buffer);
        let value = u64::from_le_bytes(byte_buffer) & mask;
        if value < q {
            coeffs.push(value);
        }
    }

    coeffs
}

/// Sample a ternary polynomial from SHAKE128
///
/// **Output**: n coefficients in {-1, 0, 1} represented in [0, q) as
/// {q-1, 0, 1}
///
/// 2 bits per draw: 00 → -1, 01 → 0, 10 → 1, 11 → reject.
pub fn sample_ternary_shake128(seed: &[u8; 32], n: usize, q: u64) -> Vec<u64> {
    assert!(q >= 3, "modulus must be at least 3");

    let mut shake = Shake128::default();
    shake.update(seed);
    let mut reader = shake.finalize_xof();

    let mut coeffs = Vec::with_capacity(n);
    let mut byte_buffer = [0u8; 1];

    let mut i = 0;
    while i < n {
        reader.read(&mut byte_buffer);
        let byte = byte_buffer[0];

        // 4 samples per byte
        for shift in (0..8).step_by(2) {
            if i >= n {
                break;
            }

            match (byte >> shift) & 0b11 {
                0b00 => {
                    coeffs.push(q - 1);
                    i += 1;
                }
                0b01 => {
                    coeffs.push(0);
                    i += 1;
                }
                0b10 => {
                    coeffs.push(1);
                    i += 1;
                }
                _ => {
                    // 0b11 → reject and resample
                }
            }
        }
    }

    coeffs
}

/// Sample a small error polynomial from SHAKE128
///
/// **Output**: n coefficients in {-bound, …, bound} represented in [0, q)
///
/// Draws ⌈log₂(2·bound+1)⌉ bits per candidate and rejects values outside
/// the span.
pub fn sample_bounded_error_shake128(seed: &[u8; 32], n: usize, bound: u64, q: u64) -> Vec<u64> {
    assert!(bound < q / 2, "error bound must be below q/2");

    let span = 2 * bound + 1;
    let bits = (64 - (span - 1).leading_zeros()).max(1);

    let mut shake = Shake128::default();
    shake.update(seed);
    let mut reader = shake.finalize_xof();

    let mut coeffs = Vec::with_capacity(n);
    let mut byte_buffer = [0u8; 1];
    let mut bit_buffer = 0u128;
    let mut bits_available = 0u32;

    while coeffs.len() < n {
        while bits_available < bits {
            reader.read(&mut byte_buffer);
            bit_buffer |= (byte_buffer[0] as u128) << bits_available;
            bits_available += 8;
        }

        let sample = (bit_buffer & ((1u128 << bits) - 1)) as u64;
        bit_buffer >>= bits;
        bits_available -= bits;

        if sample < span {
            // sample - bound, mapped into [0, q)
            coeffs.push(if sample >= bound {
                sample - bound
            } else {
                q - (bound - sample)
            });
        }
    }

    coeffs
}

/// Generate a random 32-byte seed from the system RNG.
#[inline]
pub fn generate_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut seed);
    seed
}
