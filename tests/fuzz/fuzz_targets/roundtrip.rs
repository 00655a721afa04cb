//! Fuzz target for compress/decompress round trips.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Structured input for round-trip fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundtripInput {
    /// Repeat the data this many times (mod 8) to exercise long matches
    repeat: u8,
    /// Raw data to compress
    data: Vec<u8>,
}

fuzz_target!(|input: RoundtripInput| {
    // Limit input size to avoid OOM
    if input.data.len() > 256 * 1024 {
        return;
    }

    let data = input.data.repeat(usize::from(input.repeat % 8) + 1);
    let compressed = lzcomp::compress(&data).expect("compress failed");
    let decompressed = lzcomp::decompress(&compressed).expect("decompress failed");
    assert_eq!(decompressed, data, "round trip changed the data");

    // Dropping the last byte must always be detected
    let err = lzcomp::decompress(&compressed[..compressed.len() - 1])
        .expect_err("truncated stream decoded");
    assert_eq!(*err.kind(), lzcomp::ErrorKind::UnexpectedEndOfStream);
});
