//! Compression side: the matcher, the adaptive models and the encoder that
//! drives them.

pub mod adler32;
pub mod encoder;
pub mod huffman;
pub mod lz77;
pub mod symbols;

pub use adler32::adler32;
pub use encoder::{compress, compress_with, compress_with_stats, CompressStats};
