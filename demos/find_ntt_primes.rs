//! Find NTT-friendly primes: q prime with q ≡ 1 (mod 2N)

use fhe_engine::modmath::is_prime_u64;

fn main() {
    let n: usize = 1024;
    let target_bits = 59;
    let count = 10;

    let step = 2 * n as u64; // candidates must stay ≡ 1 (mod 2N)
    let base = 1u64 << target_bits;

    println!(
        "Finding {} NTT-friendly {}-bit primes (q ≡ 1 mod {}) starting at 2^{}...\n",
        count, target_bits, step, target_bits
    );

    let mut primes = Vec::new();
    let mut candidate = base + 1;

    while primes.len() < count && candidate < base * 2 {
        if is_prime_u64(candidate) {
            println!(
                "Found prime #{}: {} (hex: 0x{:X})",
                primes.len() + 1,
                candidate,
                candidate
            );
            println!("  Bits: {}", 64 - candidate.leading_zeros());
            println!("  q mod {} = {}", step, candidate % step);
            println!();
            primes.push(candidate);
        }
        candidate += step;
    }

    if primes.len() == count {
        println!("✓ Found {} NTT-friendly primes!\n", count);
        println!("Rust array:");
        println!("let moduli = vec![");
        for (i, p) in primes.iter().enumerate() {
            println!("    {},  // q_{} ({}-bit, NTT-friendly)", p, i, target_bits);
        }
        println!("];");
    } else {
        println!("✗ Only found {} primes", primes.len());
    }
}
