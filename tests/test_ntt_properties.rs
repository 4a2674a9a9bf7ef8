//! NTT engine integration tests: round-trips, negacyclic products against a
//! schoolbook reference, and parameter validation.

use fhe_engine::error::FheError;
use fhe_engine::modmath::{mod_add, mod_mul, mod_pow, mod_sub};
use fhe_engine::ntt::NttContext;
use fhe_engine::sampling::sample_uniform_shake128;

/// 60-bit NTT-friendly prime (q - 1 divisible by 2^18)
const Q_60BIT: u64 = 1152921504606584833;

/// O(N²) negacyclic reference: a · b mod (X^N + 1, q)
fn schoolbook_negacyclic(a: &[u64], b: &[u64], q: u64) -> Vec<u64> {
    let n = a.len();
    let mut res = vec![0u64; n];
    for i in 0..n {
        for j in 0..n {
            let prod = mod_mul(a[i], b[j], q);
            let idx = i + j;
            if idx < n {
                res[idx] = mod_add(res[idx], prod, q);
            } else {
                res[idx - n] = mod_sub(res[idx - n], prod, q);
            }
        }
    }
    res
}

#[test]
fn test_roundtrip_n8_q17() {
    // Smallest textbook setup: 17 ≡ 1 (mod 16)
    let ntt = NttContext::new(8, 17).unwrap();

    let original = vec![1u64, 2, 3, 4, 5, 6, 7, 8];
    let mut coeffs = original.clone();

    ntt.forward(&mut coeffs).unwrap();
    ntt.inverse(&mut coeffs).unwrap();

    assert_eq!(coeffs, original);
}

#[test]
fn test_roundtrip_n2_minimal_ring() {
    // N = 2 with q = 17 (17 ≡ 1 mod 4): the smallest ring the engine
    // accepts
    let ntt = NttContext::new(2, 17).unwrap();

    for a in 0..17u64 {
        for b in 0..17u64 {
            let mut coeffs = vec![a, b];
            ntt.forward(&mut coeffs).unwrap();
            ntt.inverse(&mut coeffs).unwrap();
            assert_eq!(coeffs, vec![a, b], "round-trip failed for [{}, {}]", a, b);
        }
    }
}

#[test]
fn test_multiply_one_plus_x_squared() {
    // (1 + X)² mod (X^4 + 1, 97) = 1 + 2X + X²
    let ntt = NttContext::new(4, 97).unwrap();

    let a = vec![1u64, 1, 0, 0];
    let c = ntt.multiply(&a, &a).unwrap();

    assert_eq!(c, vec![1, 2, 1, 0]);
}

#[test]
fn test_multiply_wraparound_x3_times_x() {
    // X³ · X = X⁴ ≡ -1 mod (X^4 + 1), so the result is [q-1, 0, 0, 0]
    let ntt = NttContext::new(4, 97).unwrap();

    let a = vec![0u64, 0, 0, 1];
    let b = vec![0u64, 1, 0, 0];
    let c = ntt.multiply(&a, &b).unwrap();

    assert_eq!(c, vec![96, 0, 0, 0]);
}

#[test]
fn test_roundtrip_random_60bit() {
    let ntt = NttContext::new(1024, Q_60BIT).unwrap();

    for seed_byte in 0..4u8 {
        let seed = [seed_byte; 32];
        let original = sample_uniform_shake128(&seed, 1024, Q_60BIT);
        let mut coeffs = original.clone();

        ntt.forward(&mut coeffs).unwrap();
        ntt.inverse(&mut coeffs).unwrap();

        assert_eq!(coeffs, original, "round-trip failed for seed {}", seed_byte);
    }
}

#[test]
fn test_roundtrip_boundary_coefficients() {
    // Coefficients pinned to the edges of [0, q) must survive exactly
    let ntt = NttContext::new(8, 17).unwrap();
    let original: Vec<u64> = (0..8).map(|i| if i % 2 == 0 { 0 } else { 16 }).collect();
    let mut coeffs = original.clone();

    ntt.forward(&mut coeffs).unwrap();
    ntt.inverse(&mut coeffs).unwrap();
    assert_eq!(coeffs, original);

    let ntt = NttContext::new(64, Q_60BIT).unwrap();
    let original: Vec<u64> = (0..64)
        .map(|i| if i % 2 == 0 { Q_60BIT - 1 } else { 0 })
        .collect();
    let mut coeffs = original.clone();

    ntt.forward(&mut coeffs).unwrap();
    ntt.inverse(&mut coeffs).unwrap();
    assert_eq!(coeffs, original);
}

#[test]
fn test_multiply_matches_schoolbook() {
    let n = 64;
    let ntt = NttContext::new(n, Q_60BIT).unwrap();

    for seed_byte in 0..4u8 {
        let a = sample_uniform_shake128(&[seed_byte; 32], n, Q_60BIT);
        let b = sample_uniform_shake128(&[seed_byte + 100; 32], n, Q_60BIT);

        let fast = ntt.multiply(&a, &b).unwrap();
        let reference = schoolbook_negacyclic(&a, &b, Q_60BIT);

        assert_eq!(fast, reference, "NTT multiply diverged for seed {}", seed_byte);
    }
}

#[test]
fn test_scalar_mul_distributes_over_add() {
    let n = 64;
    let ntt = NttContext::new(n, Q_60BIT).unwrap();

    let a = sample_uniform_shake128(&[11u8; 32], n, Q_60BIT);
    let b = sample_uniform_shake128(&[22u8; 32], n, Q_60BIT);
    let k = 987654321u64;

    let lhs = ntt.scalar_mul(&ntt.add(&a, &b).unwrap(), k).unwrap();
    let rhs = ntt
        .add(&ntt.scalar_mul(&a, k).unwrap(), &ntt.scalar_mul(&b, k).unwrap())
        .unwrap();

    assert_eq!(lhs, rhs);
}

#[test]
fn test_primitive_root_order() {
    for (n, q) in [(8usize, 17u64), (4, 97), (4, 7681), (1024, Q_60BIT)] {
        let ntt = NttContext::new(n, q).unwrap();
        let n64 = n as u64;

        assert_eq!(mod_pow(ntt.psi, 2 * n64, q), 1, "psi^(2N) != 1 for q={}", q);
        assert_eq!(mod_pow(ntt.psi, n64, q), q - 1, "psi^N != -1 for q={}", q);
    }
}

#[test]
fn test_construction_rejects_invalid_parameters() {
    // q = 16 at N = 4: not ≡ 1 (mod 8) and not prime
    assert!(matches!(
        NttContext::new(4, 16),
        Err(FheError::InvalidParameter(_))
    ));
    // q ≡ 1 (mod 2N) but composite
    assert!(matches!(
        NttContext::new(4, 33),
        Err(FheError::InvalidParameter(_))
    ));
    // prime but q ≢ 1 (mod 2N)
    assert!(matches!(
        NttContext::new(8, 23),
        Err(FheError::InvalidParameter(_))
    ));
    // N not a power of two
    assert!(matches!(
        NttContext::new(12, 97),
        Err(FheError::InvalidParameter(_))
    ));
}

#[test]
fn test_operations_reject_wrong_length() {
    let ntt = NttContext::new(8, 17).unwrap();
    let mut long = vec![0u64; 16];

    assert_eq!(
        ntt.forward(&mut long),
        Err(FheError::ShapeMismatch { expected: 8, got: 16 })
    );
    assert!(ntt.multiply(&long, &long).is_err());
    assert!(ntt.sub(&long, &long).is_err());
}
