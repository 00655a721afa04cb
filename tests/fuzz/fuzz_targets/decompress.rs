//! Fuzz target for the decompressor.
//!
//! Arbitrary bytes must be rejected with an error, never a panic, and
//! anything accepted must satisfy the header's length.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lzcomp::Options;

fuzz_target!(|data: &[u8]| {
    // Keep declared lengths small so the fuzzer explores the decoder, not the allocator
    let options = Options::default().with_max_output_size(1 << 20);

    if let Ok(output) = lzcomp::decompress_with(data, &options) {
        let declared = u32::from_be_bytes([data[1], data[2], data[3], data[4]]);
        assert_eq!(output.len(), declared as usize);
    }
});
