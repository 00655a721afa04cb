//! Fuzz target for the match finder.
//!
//! The greedy tokenization must reconstruct its input, and every match must
//! be the one the brute-force search picks.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lzcomp::arena::Arena;
use lzcomp::compress::lz77::{find_best_match_naive, tokenize, Token};

fuzz_target!(|data: &[u8]| {
    // The brute-force check is quadratic
    if data.len() > 16 * 1024 {
        return;
    }

    let tokens = tokenize(data, &Arena::default()).expect("default arena fits 16 KiB");

    let mut reconstructed = Vec::with_capacity(data.len());
    for token in &tokens {
        let pos = reconstructed.len();
        match *token {
            Token::Literal(byte) => {
                assert_eq!(find_best_match_naive(data, pos), None, "missed match at {pos}");
                reconstructed.push(byte);
            }
            Token::Match(m) => {
                assert_eq!(find_best_match_naive(data, pos), Some(m), "wrong match at {pos}");
                let start = pos - m.distance;
                for i in 0..m.length {
                    let byte = reconstructed[start + i];
                    reconstructed.push(byte);
                }
            }
        }
    }

    assert_eq!(
        reconstructed, data,
        "tokens do not reconstruct original data"
    );
});
