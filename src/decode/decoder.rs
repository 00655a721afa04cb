//! Decompressor: replays the encoder's model updates while rebuilding the output.
//!
//! The end-of-stream symbol terminates decoding. The header's length is a
//! promise the stream must keep exactly: producing more fails immediately,
//! producing less fails at end of stream.

use crate::arena::Arena;
use crate::compress::adler32::adler32;
use crate::compress::huffman::AdaptiveHuffman;
use crate::compress::symbols::{
    distance_base, length_base, END_OF_STREAM, FIRST_LENGTH_SYMBOL, NUM_DISTANCE_SYMBOLS,
    NUM_MAIN_SYMBOLS, REPEAT_DISTANCE,
};
use crate::decode::bit_reader::BitReader;
use crate::error::{CodecResult, Error, ErrorKind, Result};
use crate::format::Header;
use crate::options::Options;

/// Decompress `data` with default [`Options`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with(data, &Options::default())
}

/// Decompress `data` under the limits in `options`.
pub fn decompress_with(data: &[u8], options: &Options) -> Result<Vec<u8>> {
    match decode(data, options) {
        Ok(output) => {
            tracing::debug!(input = data.len(), output = output.len(), "decompressed");
            Ok(output)
        }
        Err(kind) => {
            tracing::debug!(input = data.len(), error = %kind, "decompression failed");
            Err(Error::DecompressionFailure(kind))
        }
    }
}

fn decode(data: &[u8], options: &Options) -> CodecResult<Vec<u8>> {
    let (header, payload) = Header::parse(data)?;
    let expected = header.original_len as usize;
    if expected > options.max_output_size {
        return Err(ErrorKind::LimitExceeded {
            what: "declared output length",
            value: expected,
            max: options.max_output_size,
        });
    }
    header.check_payload(payload)?;

    let arena = Arena::new(options.memory_limit);
    let output = Decoder::new(payload, expected, &arena)?.run()?;

    let actual = adler32(&output);
    if actual != header.checksum {
        return Err(ErrorKind::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }
    Ok(output)
}

/// Working state of one decompress call.
struct Decoder<'a> {
    reader: BitReader<'a>,
    main: AdaptiveHuffman,
    distances: AdaptiveHuffman,
    /// Output so far; doubles as the match window.
    output: Vec<u8>,
    expected: usize,
    last_distance: Option<usize>,
}

impl<'a> Decoder<'a> {
    fn new(payload: &'a [u8], expected: usize, arena: &Arena) -> CodecResult<Self> {
        Ok(Self {
            reader: BitReader::new(payload),
            main: AdaptiveHuffman::new(NUM_MAIN_SYMBOLS, arena)?,
            distances: AdaptiveHuffman::new(NUM_DISTANCE_SYMBOLS, arena)?,
            output: arena.alloc_with_capacity(expected)?,
            expected,
            last_distance: None,
        })
    }

    fn run(mut self) -> CodecResult<Vec<u8>> {
        loop {
            let symbol = self.main.decode(&mut self.reader)?;
            if symbol < END_OF_STREAM {
                self.reserve(1)?;
                self.output.push(symbol as u8);
            } else if symbol == END_OF_STREAM {
                break;
            } else {
                self.copy_match(symbol - FIRST_LENGTH_SYMBOL)?;
            }
        }

        if self.output.len() != self.expected {
            return Err(ErrorKind::LengthMismatch {
                expected: self.expected,
                actual: self.output.len(),
            });
        }
        let trailing = self.reader.remaining_whole_bytes();
        if trailing > 0 {
            return Err(ErrorKind::TrailingData { bytes: trailing });
        }

        tracing::trace!(
            main_rescales = self.main.rescales(),
            distance_rescales = self.distances.rescales(),
            "end of stream"
        );
        Ok(self.output)
    }

    fn copy_match(&mut self, length_slot: u16) -> CodecResult<()> {
        let (base, extra) = length_base(length_slot as usize).ok_or_else(|| {
            ErrorKind::InvalidSymbol(format!("length slot {length_slot} out of range"))
        })?;
        let length = base + self.reader.read_bits(extra)? as usize;

        let distance = match self.distances.decode(&mut self.reader)? {
            REPEAT_DISTANCE => self.last_distance.ok_or_else(|| {
                ErrorKind::InvalidSymbol("repeat-distance symbol before any match".into())
            })?,
            slot => {
                let (base, extra) = distance_base(slot as usize).ok_or_else(|| {
                    ErrorKind::InvalidSymbol(format!("distance slot {slot} out of range"))
                })?;
                base + self.reader.read_bits(extra)? as usize
            }
        };

        let available = self.output.len();
        if distance > available {
            return Err(ErrorKind::DistanceTooFar {
                distance,
                available,
            });
        }
        self.reserve(length)?;

        // Byte by byte: the source may overlap what is being written.
        let start = available - distance;
        for i in 0..length {
            let byte = self.output[start + i];
            self.output.push(byte);
        }
        self.last_distance = Some(distance);
        Ok(())
    }

    /// Fail before the output would grow past the declared length.
    fn reserve(&self, additional: usize) -> CodecResult<()> {
        let actual = self.output.len() + additional;
        if actual > self.expected {
            return Err(ErrorKind::LengthMismatch {
                expected: self.expected,
                actual,
            });
        }
        Ok(())
    }
}
