//! Compressor: greedy LZ77 parse coded through two adaptive Huffman models.
//!
//! Tokens are coded as they are found; no token list is materialized. Each
//! match becomes a main-model length symbol plus raw length bits, then a
//! distance-model symbol plus raw distance bits, or the repeat-distance
//! symbol when the distance equals the previous match's.

#[cfg(feature = "timing")]
use std::time::{Duration, Instant};

use crate::arena::Arena;
use crate::bits::BitWriter;
use crate::compress::adler32::adler32;
use crate::compress::huffman::AdaptiveHuffman;
use crate::compress::lz77::{Match, MatchFinder, Token};
use crate::compress::symbols::{
    distance_slot, length_slot, END_OF_STREAM, FIRST_LENGTH_SYMBOL, NUM_DISTANCE_SYMBOLS,
    NUM_MAIN_SYMBOLS, REPEAT_DISTANCE,
};
use crate::error::{CodecResult, Error, ErrorKind, Result};
use crate::format::{Header, HEADER_LEN};
use crate::options::Options;

/// Accounting for a single compress call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressStats {
    /// Number of literal tokens.
    pub literal_count: usize,
    /// Number of match tokens.
    pub match_count: usize,
    /// Matches coded with the repeat-distance symbol.
    pub repeat_distance_count: usize,
    /// Input bytes covered by matches.
    pub matched_bytes: usize,
    /// Weight halvings across both models.
    pub rescales: u32,
    /// Encoded size including the header.
    pub output_size: usize,
    /// Highest arena usage during the call.
    pub arena_peak: usize,
    /// Wall time of the call.
    #[cfg(feature = "timing")]
    pub elapsed: Duration,
}

/// Compress `data` with default [`Options`].
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with(data, &Options::default())
}

/// Compress `data` under the limits in `options`.
pub fn compress_with(data: &[u8], options: &Options) -> Result<Vec<u8>> {
    compress_with_stats(data, options).map(|(encoded, _)| encoded)
}

/// Compress `data` and report what the encoder did.
pub fn compress_with_stats(data: &[u8], options: &Options) -> Result<(Vec<u8>, CompressStats)> {
    #[cfg(feature = "timing")]
    let start = Instant::now();

    let max = options.effective_max_input();
    let result = if data.len() > max {
        Err(ErrorKind::InputTooLarge {
            len: data.len(),
            max,
        })
    } else {
        Ok(())
    };

    let arena = Arena::new(options.memory_limit);
    let result = result
        .and_then(|()| Encoder::new(data, &arena))
        .and_then(Encoder::run);

    match result {
        Ok((encoded, mut stats)) => {
            stats.arena_peak = arena.peak_usage();
            #[cfg(feature = "timing")]
            {
                stats.elapsed = start.elapsed();
            }
            tracing::debug!(
                input = data.len(),
                output = encoded.len(),
                literals = stats.literal_count,
                matches = stats.match_count,
                rescales = stats.rescales,
                arena_peak = stats.arena_peak,
                "compressed"
            );
            Ok((encoded, stats))
        }
        Err(kind) => {
            tracing::debug!(input = data.len(), error = %kind, "compression failed");
            Err(Error::CompressionFailure(kind))
        }
    }
}

/// Output room reserved before each token: a length code and a distance
/// code of at most 64 bits each, plus 5 + 14 extra bits.
const MAX_TOKEN_BYTES: usize = 24;

/// Working state of one compress call. Every buffer here is charged to the
/// call's arena, including output growth.
struct Encoder<'a> {
    data: &'a [u8],
    arena: &'a Arena,
    finder: MatchFinder,
    main: AdaptiveHuffman,
    distances: AdaptiveHuffman,
    writer: BitWriter,
    last_distance: Option<usize>,
    stats: CompressStats,
}

impl<'a> Encoder<'a> {
    /// Set up models and matcher, and write the header. `data` must fit the
    /// header's 32-bit length field.
    fn new(data: &'a [u8], arena: &'a Arena) -> CodecResult<Self> {
        // Typical input codes to well under half its size; growth past this
        // estimate is charged as it happens.
        let mut out = arena.alloc_with_capacity(HEADER_LEN + data.len() / 2 + 16)?;
        Header {
            original_len: data.len() as u32,
            checksum: adler32(data),
        }
        .write(&mut out);

        Ok(Self {
            data,
            arena,
            finder: MatchFinder::new(arena)?,
            main: AdaptiveHuffman::new(NUM_MAIN_SYMBOLS, arena)?,
            distances: AdaptiveHuffman::new(NUM_DISTANCE_SYMBOLS, arena)?,
            writer: BitWriter::with_buffer(out),
            last_distance: None,
            stats: CompressStats::default(),
        })
    }

    fn run(mut self) -> CodecResult<(Vec<u8>, CompressStats)> {
        let data = self.data;
        let mut pos = 0;
        while pos < data.len() {
            self.reserve_output()?;
            let token = self.finder.next_token(data, pos);
            match token {
                Token::Match(m) => self.encode_match(m),
                Token::Literal(byte) => {
                    self.main.encode(u16::from(byte), &mut self.writer);
                    self.stats.literal_count += 1;
                }
            }
            pos += token.input_len();
        }
        self.reserve_output()?;
        self.main.encode(END_OF_STREAM, &mut self.writer);

        let encoded = self.writer.finish();
        self.stats.rescales = self.main.rescales() + self.distances.rescales();
        self.stats.output_size = encoded.len();
        Ok((encoded, self.stats))
    }

    /// Room for the next token, charged to the arena when the buffer grows.
    #[inline]
    fn reserve_output(&mut self) -> CodecResult<()> {
        if self.writer.spare_capacity() < MAX_TOKEN_BYTES {
            self.writer.reserve_in(self.arena, MAX_TOKEN_BYTES)?;
        }
        Ok(())
    }

    fn encode_match(&mut self, m: Match) {
        let writer = &mut self.writer;
        let length = length_slot(m.length);
        self.main.encode(FIRST_LENGTH_SYMBOL + length.slot, writer);
        writer.write_bits(length.extra_value, length.extra_bits);

        if self.last_distance == Some(m.distance) {
            self.distances.encode(REPEAT_DISTANCE, writer);
            self.stats.repeat_distance_count += 1;
        } else {
            let distance = distance_slot(m.distance);
            self.distances.encode(distance.slot, writer);
            writer.write_bits(distance.extra_value, distance.extra_bits);
        }
        self.last_distance = Some(m.distance);

        self.stats.match_count += 1;
        self.stats.matched_bytes += m.length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::huffman::RESCALE_THRESHOLD;
    use crate::compress::lz77::tokenize;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_empty_input_is_header_plus_eos() {
        let encoded = compress(&[]).unwrap();
        // All 286 initial codes are 8 or 9 bits.
        assert!(encoded.len() == HEADER_LEN + 1 || encoded.len() == HEADER_LEN + 2);
        let (header, _) = Header::parse(&encoded).unwrap();
        assert_eq!(header.original_len, 0);
        assert_eq!(header.checksum, 1);
    }

    #[test]
    fn test_header_records_length_and_checksum() {
        let data = b"header check, header check";
        let encoded = compress(data).unwrap();
        let (header, _) = Header::parse(&encoded).unwrap();
        assert_eq!(header.original_len as usize, data.len());
        assert_eq!(header.checksum, adler32(data));
    }

    #[test]
    fn test_stats_account_for_every_byte() {
        let data = b"abcabcabcabc xyz xyz xyz abcabc";
        let (encoded, stats) = compress_with_stats(data, &Options::default()).unwrap();
        assert_eq!(stats.literal_count + stats.matched_bytes, data.len());
        assert!(stats.match_count > 0);
        assert_eq!(stats.output_size, encoded.len());
        assert!(stats.arena_peak > 0);
    }

    #[test]
    fn test_repeat_distance_used_for_periodic_data() {
        // Period 7 with a break every 40 bytes: matches keep the same distance.
        let mut data = Vec::new();
        for block in 0..50u8 {
            data.extend_from_slice(b"0123456012345601234560123456012345601234");
            data.push(block);
        }
        let (_, stats) = compress_with_stats(&data, &Options::default()).unwrap();
        assert!(stats.repeat_distance_count > 0);
        assert!(stats.repeat_distance_count <= stats.match_count);
    }

    #[test]
    fn test_rescales_reported() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut noise = vec![0u8; RESCALE_THRESHOLD as usize * 2];
        rng.fill(noise.as_mut_slice());
        let (_, stats) = compress_with_stats(&noise, &Options::default()).unwrap();
        assert!(stats.rescales > 0);
    }

    #[test]
    fn test_input_limit() {
        let opts = Options::default().with_max_input_size(4);
        let err = compress_with(b"12345", &opts).unwrap_err();
        assert_eq!(
            err,
            Error::CompressionFailure(ErrorKind::InputTooLarge { len: 5, max: 4 })
        );
        assert!(compress_with(b"1234", &opts).is_ok());
    }

    #[test]
    fn test_memory_limit_too_small() {
        let opts = Options::default().with_memory_limit(1024);
        let err = compress_with(b"anything", &opts).unwrap_err();
        assert!(matches!(
            err,
            Error::CompressionFailure(ErrorKind::AllocationFailure { .. })
        ));
        assert!(err.is_resource_exhaustion());
    }

    #[test]
    fn test_output_growth_charged_to_arena() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut noise = vec![0u8; 1 << 20];
        rng.fill(noise.as_mut_slice());

        let (encoded, stats) = compress_with_stats(&noise, &Options::default()).unwrap();
        // Random bytes expand; the whole output buffer sits on top of the
        // 512 KiB of hash tables.
        assert!(encoded.len() > noise.len());
        assert!(stats.arena_peak >= encoded.len() + (512 << 10));

        // Output alone, then output plus hash tables: neither leaves room for
        // the models.
        for limit in [encoded.len(), encoded.len() + (512 << 10)] {
            let opts = Options::default().with_memory_limit(limit);
            let err = compress_with(&noise, &opts).unwrap_err();
            assert!(
                matches!(
                    err,
                    Error::CompressionFailure(ErrorKind::AllocationFailure { .. })
                ),
                "limit {limit}: {err}"
            );
        }
        let opts = Options::default().with_memory_limit(stats.arena_peak);
        assert_eq!(compress_with(&noise, &opts).unwrap(), encoded);
    }

    #[test]
    fn test_stats_follow_the_greedy_parse() {
        let mut data = b"greedy parse, greedy parse, ".repeat(40);
        data.extend((0..3000u32).map(|i| (i * 7 % 251) as u8));
        data.extend(std::iter::repeat(b'z').take(1000));

        let tokens = tokenize(&data, &Arena::default()).unwrap();
        let (_, stats) = compress_with_stats(&data, &Options::default()).unwrap();
        let literals = tokens
            .iter()
            .filter(|t| matches!(t, Token::Literal(_)))
            .count();
        assert_eq!(stats.literal_count, literals);
        assert_eq!(stats.match_count, tokens.len() - literals);
        assert_eq!(stats.matched_bytes, data.len() - literals);
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 13 + i / 97) as u8).collect();
        assert_eq!(compress(&data).unwrap(), compress(&data).unwrap());
    }
}
