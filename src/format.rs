//! Container header.
//!
//! ```text
//! +-------+----------------+-------------+---------------------+
//! | magic | original len   | adler-32    | payload ...         |
//! | 1B    | 4B big-endian  | 4B big-end. | MSB-first bitstream |
//! +-------+----------------+-------------+---------------------+
//! ```
//!
//! The magic byte carries the format identifier in its high nibble and the
//! version in its low nibble.

use crate::compress::symbols::MAX_MATCH_LENGTH;
use crate::error::{CodecResult, ErrorKind};

/// Format identifier and version.
pub const MAGIC: u8 = 0xC1;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 9;

/// Fixed-size header preceding the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Exact size of the decompressed data.
    pub original_len: u32,
    /// Adler-32 of the decompressed data.
    pub checksum: u32,
}

impl Header {
    /// Append the encoded header to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(MAGIC);
        out.extend_from_slice(&self.original_len.to_be_bytes());
        out.extend_from_slice(&self.checksum.to_be_bytes());
    }

    /// Parse the header at the start of `data`; returns it with the payload.
    ///
    /// A buffer too short to hold a header is treated as truncated, not as a
    /// foreign format.
    pub fn parse(data: &[u8]) -> CodecResult<(Header, &[u8])> {
        let Some(&magic) = data.first() else {
            return Err(ErrorKind::UnexpectedEndOfStream);
        };
        if magic != MAGIC {
            return Err(ErrorKind::MalformedHeader(format!(
                "unknown magic/version byte 0x{magic:02X}, expected 0x{MAGIC:02X}"
            )));
        }
        if data.len() < HEADER_LEN {
            return Err(ErrorKind::UnexpectedEndOfStream);
        }

        let original_len = u32::from_be_bytes([data[1], data[2], data[3], data[4]]);
        let checksum = u32::from_be_bytes([data[5], data[6], data[7], data[8]]);
        Ok((
            Header {
                original_len,
                checksum,
            },
            &data[HEADER_LEN..],
        ))
    }

    /// Most output a payload of `payload_len` bytes can describe.
    ///
    /// Every code is at least one bit long, so one bit yields at most one
    /// literal and two bits at most one maximal match, and end of stream
    /// takes a bit of its own. One extra payload byte is allowed so a stream
    /// cut short by a byte still reads as truncated.
    pub fn max_decodable_len(payload_len: usize) -> u64 {
        let bits = (payload_len as u64).saturating_add(1).saturating_mul(8);
        (bits - 1).saturating_mul(MAX_MATCH_LENGTH as u64 / 2)
    }

    /// Reject a declared length that `payload` cannot possibly hold.
    pub fn check_payload(&self, payload: &[u8]) -> CodecResult<()> {
        let max = Self::max_decodable_len(payload.len());
        if u64::from(self.original_len) > max {
            return Err(ErrorKind::MalformedHeader(format!(
                "declared length {} exceeds the {max} bytes a {}-byte payload can encode",
                self.original_len,
                payload.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = Header {
            original_len: 0x0102_0304,
            checksum: 0xA0B0_C0D0,
        };
        let mut out = Vec::new();
        header.write(&mut out);
        assert_eq!(out, [0xC1, 1, 2, 3, 4, 0xA0, 0xB0, 0xC0, 0xD0]);
        assert_eq!(out.len(), HEADER_LEN);
    }

    #[test]
    fn test_parse_splits_payload() {
        let mut data = Vec::new();
        Header {
            original_len: 5,
            checksum: 1,
        }
        .write(&mut data);
        data.extend_from_slice(&[0xAA, 0xBB]);

        let (header, payload) = Header::parse(&data).unwrap();
        assert_eq!(header.original_len, 5);
        assert_eq!(header.checksum, 1);
        assert_eq!(payload, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_parse_rejects_foreign_magic() {
        let data = [0x78, 0x9C, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            Header::parse(&data),
            Err(ErrorKind::MalformedHeader(_))
        ));
        // Same family, unknown version
        let data = [0xC2, 0, 0, 0, 0, 0, 0, 0, 1];
        assert!(matches!(
            Header::parse(&data),
            Err(ErrorKind::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_parse_short_input() {
        assert_eq!(Header::parse(&[]), Err(ErrorKind::UnexpectedEndOfStream));
        assert_eq!(
            Header::parse(&[MAGIC, 0, 0, 0, 0, 0, 0, 1]),
            Err(ErrorKind::UnexpectedEndOfStream)
        );
    }

    #[test]
    fn test_declared_length_must_fit_payload() {
        let header = Header {
            original_len: 512 << 20,
            checksum: 1,
        };
        assert!(matches!(
            header.check_payload(&[0]),
            Err(ErrorKind::MalformedHeader(_))
        ));
        assert!(header.check_payload(&vec![0; 4 << 20]).is_ok());

        let empty = Header {
            original_len: 0,
            checksum: 1,
        };
        assert!(empty.check_payload(&[]).is_ok());
    }

    #[test]
    fn test_max_decodable_len() {
        // Two payload bytes plus the truncation allowance: 23 usable bits.
        assert_eq!(Header::max_decodable_len(2), 23 * 129);
        assert_eq!(Header::max_decodable_len(0), 7 * 129);
        assert!(Header::max_decodable_len(usize::MAX) > u64::from(u32::MAX));
    }
}
