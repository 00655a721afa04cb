//! Synthetic test data generation.
//!
//! Generates deterministic byte corpora with different redundancy profiles.
//! All functions produce reproducible output suitable for regression testing.

#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniformly random bytes: essentially incompressible.
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(data.as_mut_slice());
    data
}

/// Random bytes drawn from a small alphabet: many short matches.
pub fn small_alphabet(len: usize, alphabet: u8, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..alphabet)).collect()
}

/// A single byte repeated.
pub fn run(len: usize, byte: u8) -> Vec<u8> {
    vec![byte; len]
}

/// `pattern` repeated until `len` bytes.
pub fn periodic(len: usize, pattern: &[u8]) -> Vec<u8> {
    pattern.iter().copied().cycle().take(len).collect()
}

/// Words from a fixed vocabulary separated by spaces, like English prose.
pub fn text(len: usize, seed: u64) -> Vec<u8> {
    const WORDS: [&str; 24] = [
        "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "and", "a", "compressor",
        "window", "match", "literal", "symbol", "tree", "weight", "of", "to", "in", "is", "that",
        "stream", "bits",
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(len + 16);
    while data.len() < len {
        let word = WORDS[rng.gen_range(0..WORDS.len())];
        data.extend_from_slice(word.as_bytes());
        data.push(if rng.gen_ratio(1, 12) { b'\n' } else { b' ' });
    }
    data.truncate(len);
    data
}

/// Random blocks copied back from far away: exercises long distances.
pub fn far_repeats(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = random_bytes(4096.min(len), seed ^ 0x5EED);
    while data.len() < len {
        let block = rng.gen_range(3..300).min(len - data.len());
        let back = rng.gen_range(1..=data.len().min(70_000));
        let start = data.len() - back;
        for i in 0..block {
            let byte = data[start + i];
            data.push(byte);
        }
        let noise = rng.gen_range(0..8).min(len - data.len());
        for _ in 0..noise {
            data.push(rng.gen());
        }
    }
    data
}

/// A mix of the generators above, concatenated.
pub fn mixed(len: usize, seed: u64) -> Vec<u8> {
    let part = len / 4;
    let mut data = text(part, seed);
    data.extend(random_bytes(part, seed + 1));
    data.extend(periodic(part, b"\x00\x01\x02\x03\xFF"));
    data.extend(far_repeats(len - 3 * part, seed + 2));
    data
}
