//! Adler-32 checksum (RFC 1950), stored in the header to catch corrupted payloads.

const MOD_ADLER: u32 = 65_521;

/// Largest n such that 255*n*(n+1)/2 + (n+1)*(65520) <= 2^32-1.
const NMAX: usize = 5552;

/// Calculate the Adler-32 checksum of `data`.
///
/// Modulo reductions are deferred to [`NMAX`]-byte chunk boundaries.
#[inline]
#[must_use]
pub fn adler32(data: &[u8]) -> u32 {
    let mut s1: u32 = 1;
    let mut s2: u32 = 0;

    for chunk in data.chunks(NMAX) {
        for &b in chunk {
            s1 += b as u32;
            s2 += s1;
        }
        s1 %= MOD_ADLER;
        s2 %= MOD_ADLER;
    }

    (s2 << 16) | s1
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reduces after every byte; slow but obviously right.
    fn adler32_reference(data: &[u8]) -> u32 {
        let (mut s1, mut s2) = (1u32, 0u32);
        for &b in data {
            s1 = (s1 + b as u32) % MOD_ADLER;
            s2 = (s2 + s1) % MOD_ADLER;
        }
        (s2 << 16) | s1
    }

    #[test]
    fn test_adler32_empty() {
        assert_eq!(adler32(&[]), 1);
    }

    #[test]
    fn test_adler32_known_values() {
        assert_eq!(adler32(b"hello"), 0x062C0215);
        assert_eq!(adler32(b"Adler-32"), 0x0C34027B);
        assert_eq!(adler32(b"123456789"), 0x091E01DE);
    }

    #[test]
    fn test_adler32_chunk_boundaries() {
        for len in [NMAX - 1, NMAX, NMAX + 1, NMAX * 3] {
            let data = vec![0xFF; len];
            assert_eq!(adler32(&data), adler32_reference(&data), "len {len}");
        }
    }

    #[test]
    fn test_adler32_detects_single_flip() {
        let mut data: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let before = adler32(&data);
        data[4321] ^= 0x10;
        assert_ne!(adler32(&data), before);
        assert_eq!(adler32(&data), adler32_reference(&data));
    }
}
