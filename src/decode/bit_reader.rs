//! Bit-level reader for the coded payload.
//!
//! Mirrors [`crate::bits::BitWriter`]: bits come out most-significant first.

use crate::error::{CodecResult, ErrorKind};

/// Bit reader for MSB-first bit streams.
///
/// Maintains a bit buffer filled from the input byte stream.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_buf: u64,
    bits_in_buf: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit_buf: 0,
            bits_in_buf: 0,
        }
    }

    /// Ensure at least `n` bits are available in the buffer.
    ///
    /// On failure no bits are consumed; whatever was loaded stays buffered.
    #[inline]
    fn ensure(&mut self, n: u8) -> CodecResult<()> {
        while self.bits_in_buf < n {
            if self.pos >= self.data.len() {
                return Err(ErrorKind::UnexpectedEndOfStream);
            }
            // MSB-first: new byte goes to the right of what is buffered
            self.bit_buf = (self.bit_buf << 8) | self.data[self.pos] as u64;
            self.pos += 1;
            self.bits_in_buf += 8;
        }
        Ok(())
    }

    /// Peek at the next `n` bits without consuming them.
    #[inline]
    pub fn peek_bits(&mut self, n: u8) -> CodecResult<u32> {
        debug_assert!(n <= 32);
        if n == 0 {
            return Ok(0);
        }
        self.ensure(n)?;
        let shift = self.bits_in_buf - n;
        Ok(((self.bit_buf >> shift) & ((1u64 << n) - 1)) as u32)
    }

    /// Consume `n` bits from the buffer.
    #[inline]
    pub fn consume(&mut self, n: u8) {
        debug_assert!(n <= self.bits_in_buf);
        self.bits_in_buf -= n;
        self.bit_buf &= (1u64 << self.bits_in_buf) - 1;
    }

    /// Read `n` bits, most significant first.
    #[inline]
    pub fn read_bits(&mut self, n: u8) -> CodecResult<u32> {
        let val = self.peek_bits(n)?;
        self.consume(n);
        Ok(val)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> CodecResult<bool> {
        self.read_bits(1).map(|b| b == 1)
    }

    /// Total bits consumed so far.
    pub fn bits_consumed(&self) -> u64 {
        self.pos as u64 * 8 - self.bits_in_buf as u64
    }

    /// Bits still available, including buffered ones.
    pub fn remaining_bits(&self) -> u64 {
        (self.data.len() - self.pos) as u64 * 8 + self.bits_in_buf as u64
    }

    /// Whole bytes left after the byte holding the cursor.
    pub fn remaining_whole_bytes(&self) -> usize {
        (self.remaining_bits() / 8) as usize
    }
}
