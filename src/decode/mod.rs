//! Decompression side.

pub mod bit_reader;
pub mod decoder;

pub use decoder::{decompress, decompress_with};
