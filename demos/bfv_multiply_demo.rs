//! Walk through a BFV ciphertext multiplication step by step:
//! trivial ciphertexts in, degree-3 product, relinearization, scale-back.

use fhe_engine::bfv::{scale_to_plaintext, BfvMultiplier, RelinearizationKey};
use fhe_engine::modmath::mod_pow;
use fhe_engine::sampling::sample_ternary_shake128;

fn main() -> Result<(), fhe_engine::FheError> {
    let n = 8;
    let q = 7681u64;
    let t = 16u64;

    let bfv = BfvMultiplier::new(n, q, t)?;
    let delta = bfv.delta();

    println!("=== BFV Multiplication Demo ===\n");
    println!("Parameters: N={}, q={}, t={}, Δ=⌊q/t⌋={}", n, q, t, delta);
    println!("NTT root:   ψ={} (2N-th primitive root mod q)\n", bfv.ntt().psi);

    // Trivial (noiseless) ciphertexts: ct = (Δ·m, 0)
    let m1 = 3u64;
    let m2 = 5u64;
    let mut c1_0 = vec![0u64; n];
    c1_0[0] = delta * m1;
    let mut c2_0 = vec![0u64; n];
    c2_0[0] = delta * m2;
    let zero = vec![0u64; n];

    println!("Plaintexts: m1={}, m2={}", m1, m2);
    println!("Ciphertext 1: c0[0]=Δ·m1={}, c1=0", c1_0[0]);
    println!("Ciphertext 2: c0[0]=Δ·m2={}, c1=0\n", c2_0[0]);

    // Degree-3 product with exact t/q scaling
    let (d0, d1, d2) = bfv.multiply_ciphertexts(&c1_0, &zero, &c2_0, &zero)?;
    println!("Degree-3 product:");
    println!("  d0[0] = {} (≈ Δ·m1·m2 = {})", d0[0], delta * m1 * m2);
    println!("  d1    = all zero: {}", d1.iter().all(|&c| c == 0));
    println!("  d2    = all zero: {}\n", d2.iter().all(|&c| c == 0));

    // Relinearize with a noiseless evaluation key for a ternary secret:
    // b_i = B^i·s² with a_i = 0, base B = 2^7
    let ntt = bfv.ntt();
    let s = sample_ternary_shake128(&[42u8; 32], n, q);
    let s_squared = ntt.multiply(&s, &s)?;

    let base_bits = 7;
    let digits = RelinearizationKey::digit_count(q, base_bits);
    let mut components = Vec::new();
    for i in 0..digits {
        let scale = mod_pow(2, base_bits as u64 * i as u64, q);
        components.push((ntt.scalar_mul(&s_squared, scale)?, vec![0u64; n]));
    }
    let key = RelinearizationKey { base_bits, components };

    let (c0, c1) = bfv.relinearize(&d0, &d1, &d2, &key)?;
    println!(
        "Relinearized back to degree 2 (base 2^{}, {} digits)",
        base_bits, digits
    );

    // Noiseless decryption of the trivial result: c1 is zero here, so the
    // phase is just c0
    let phase = ntt.add(&c0, &ntt.multiply(&c1, &s)?)?;
    let recovered = scale_to_plaintext(phase[0], q, t);
    println!("Scale-back: ⌊(c0[0]·t + ⌊q/2⌋)/q⌋ mod t = {}\n", recovered);

    assert_eq!(recovered, (m1 * m2) % t);
    println!("✓ Recovered m1·m2 = {} mod {}", recovered, t);
    Ok(())
}
