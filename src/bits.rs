//! Bit-level output for the coded payload.
//!
//! Bits are packed most-significant first: the first bit written lands in
//! bit 7 of the first payload byte. The reader in
//! [`crate::decode::bit_reader`] consumes them in the same order.

use crate::arena::Arena;
use crate::error::CodecResult;

/// A bit writer that packs bits MSB first into a growable byte buffer.
#[derive(Debug)]
pub struct BitWriter {
    buffer: Vec<u8>,
    current_byte: u8,
    bit_position: u8, // Counts from 8 down to 0
    bits_written: u64,
}

impl BitWriter {
    /// Create a new bit writer with default capacity.
    pub fn new() -> Self {
        Self::with_buffer(Vec::with_capacity(1024))
    }

    /// Create a bit writer that appends after the bytes already in `buffer`.
    ///
    /// Used to write the payload directly behind a pre-written header.
    pub fn with_buffer(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            current_byte: 0,
            bit_position: 8,
            bits_written: 0,
        }
    }

    /// Write the low `num_bits` bits of `value`, most significant first.
    ///
    /// # Arguments
    /// * `value` - The value to write (only lower `num_bits` are used)
    /// * `num_bits` - Number of bits to write (0-32)
    #[inline]
    pub fn write_bits(&mut self, value: u32, num_bits: u8) {
        debug_assert!(num_bits <= 32);

        let mut remaining = num_bits;

        while remaining > 0 {
            let to_write = remaining.min(self.bit_position);

            // Take the top `to_write` of the remaining bits.
            let shift = remaining - to_write;
            let mask = (1u32 << to_write) - 1;
            let bits = ((value >> shift) & mask) as u8;

            self.bit_position -= to_write;
            self.current_byte |= bits << self.bit_position;
            remaining -= to_write;

            if self.bit_position == 0 {
                self.buffer.push(self.current_byte);
                self.current_byte = 0;
                self.bit_position = 8;
            }
        }

        self.bits_written += u64::from(num_bits);
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u32, 1);
    }

    /// Pads the partial byte with zero bits.
    pub fn flush(&mut self) {
        if self.bit_position < 8 {
            self.buffer.push(self.current_byte);
            self.current_byte = 0;
            self.bit_position = 8;
        }
    }

    /// Flush and return the buffer.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }

    /// Returns length in bytes (not counting partial byte).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing, not even a partial byte, is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.bit_position == 8
    }

    /// Make sure `bytes` more whole bytes fit without reallocating, charging
    /// any growth to `arena`.
    pub fn reserve_in(&mut self, arena: &Arena, bytes: usize) -> CodecResult<()> {
        arena.grow(&mut self.buffer, bytes)
    }

    /// Bytes the buffer can take before it must reallocate.
    pub fn spare_capacity(&self) -> usize {
        self.buffer.capacity() - self.buffer.len()
    }

    /// Number of payload bits written so far (excludes any initial buffer).
    pub fn bit_len(&self) -> u64 {
        self.bits_written
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
