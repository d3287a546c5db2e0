//! Seed strings for reproducible runs
//!
//! A run is fully determined by its seed. Seeds are shared as short
//! human-readable strings (`"7KQ2F-X09BD"`), hashed to the `u64` that
//! feeds the ChaCha8 generator.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEED_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh seed string of `sections` groups of `n` characters
pub fn make_seed(n: usize, sections: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut parts = Vec::with_capacity(sections);
    for _ in 0..sections {
        let part: String = (0..n)
            .map(|_| SEED_ALPHABET[rng.gen_range(0..SEED_ALPHABET.len())] as char)
            .collect();
        parts.push(part);
    }
    parts.join("-")
}

/// Hash a seed string to a `u64` (FNV-1a)
///
/// Case-insensitive so a retyped seed still reproduces the run.
pub fn hash_seed(seed: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in seed.bytes() {
        hash ^= byte.to_ascii_uppercase() as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Build the deterministic generator for a seed string
pub fn rng_from_seed(seed: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_format() {
        let seed = make_seed(5, 2);
        assert_eq!(seed.len(), 11);
        assert_eq!(seed.matches('-').count(), 1);
        assert!(seed
            .chars()
            .all(|c| c == '-' || c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_hash_is_stable_and_case_insensitive() {
        assert_eq!(hash_seed("7KQ2F-X09BD"), hash_seed("7kq2f-x09bd"));
        assert_ne!(hash_seed("7KQ2F-X09BD"), hash_seed("7KQ2F-X09BE"));
    }

    #[test]
    fn test_rng_reproducible() {
        let mut a = rng_from_seed("AAAAA-BBBBB");
        let mut b = rng_from_seed("AAAAA-BBBBB");
        for _ in 0..16 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }
}
