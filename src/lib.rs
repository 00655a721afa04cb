//! # lzcomp
//!
//! A lossless byte-stream compressor pairing LZ77 dictionary matching with
//! adaptive Huffman coding.
//!
//! The matcher finds, at each position, the longest earlier occurrence of the
//! upcoming bytes in a 64 KiB window. Literals, match lengths and match
//! distances are coded through self-adjusting Huffman models that both sides
//! update in lockstep, so no code tables are ever transmitted.
//!
//! ## Features
//!
//! - **Single-call API**: [`compress`] and [`decompress`] take a byte slice
//!   and return an owned buffer
//! - **Bounded memory**: every working buffer of a call is charged to a
//!   per-call [`arena::Arena`] budget
//! - **Integrity checks**: a length and an Adler-32 checksum in the header
//! - Optional `cli` feature builds the `lzcomp` binary
//! - Optional `timing` feature records wall time in [`CompressStats`]
//!
//! ## Example
//!
//! ```rust
//! let data = b"to be or not to be, that is the question";
//! let packed = lzcomp::compress(data).unwrap();
//! let unpacked = lzcomp::decompress(&packed).unwrap();
//! assert_eq!(unpacked, data);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod arena;
pub mod bits;
pub mod compress;
pub mod decode;
pub mod error;
pub mod format;
pub mod options;

pub use compress::{compress, compress_with, compress_with_stats, CompressStats};
pub use decode::{decompress, decompress_with};
pub use error::{Error, ErrorKind, Result};
pub use options::Options;
