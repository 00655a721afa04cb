//! LZ77 match finding over a sliding window.
//!
//! For each position the matcher returns the longest earlier occurrence of
//! the upcoming bytes within [`WINDOW_SIZE`], preferring the nearest one when
//! several have the same length. Hash chains link every indexed position to
//! the previous position with the same 3-byte hash; the chain is walked
//! nearest first and in full, so the answer is exactly the brute-force one.
//!
//! # Cost
//!
//! The full walk is O(window) per position when the input has few distinct
//! 3-byte strings: a two-symbol alphabet has only eight, so every chain holds
//! an eighth of the window and compression runs at seconds per MiB. The walk
//! stops as soon as a candidate reaches the maximum length, which keeps runs
//! and short periods fast. Typical text and binary data stay linear in
//! practice because their chains are short.

use crate::arena::Arena;
use crate::compress::symbols::{MAX_MATCH_LENGTH, MIN_MATCH_LENGTH, WINDOW_SIZE};
use crate::error::CodecResult;

/// Size of the hash table (power of 2 for fast modulo).
const HASH_SIZE: usize = 1 << 16;

const NO_POS: u32 = u32::MAX;

/// LZ77 token representing either a literal or a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte that couldn't be compressed.
    Literal(u8),
    /// A back-reference.
    Match(Match),
}

impl Token {
    /// Number of input bytes the token stands for.
    #[inline]
    pub fn input_len(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match(m) => m.length,
        }
    }
}

/// A back-reference into already-seen data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Length of the match (3-258).
    pub length: usize,
    /// Distance back to the match (1-65536).
    pub distance: usize,
}

/// Hash of the 3 bytes at `pos`.
#[inline]
fn hash3(data: &[u8], pos: usize) -> usize {
    let val = u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], 0]);
    // Multiplicative hash; 0x1E35_A7BD is used in several LZ implementations.
    (val.wrapping_mul(0x1E35_A7BD) >> 16) as usize & (HASH_SIZE - 1)
}

/// Hash-chain index over the input, fed one position at a time.
pub struct MatchFinder {
    /// Hash table: maps hash -> most recent position
    head: Vec<u32>,
    /// Chain links: prev[pos % window] -> previous position with same hash
    prev: Vec<u32>,
}

impl MatchFinder {
    /// Create an empty index with buffers drawn from `arena`.
    ///
    /// Inputs are limited to `u32::MAX` bytes, which the positions stored
    /// here rely on.
    pub fn new(arena: &Arena) -> CodecResult<Self> {
        Ok(Self {
            head: arena.alloc_filled(HASH_SIZE, NO_POS)?,
            prev: arena.alloc_filled(WINDOW_SIZE, NO_POS)?,
        })
    }

    /// Index position `pos` so later searches can find it.
    ///
    /// Positions must be inserted in increasing order. Positions with fewer
    /// than 3 bytes left cannot start a match and are skipped.
    #[inline]
    pub fn insert(&mut self, data: &[u8], pos: usize) {
        if pos + MIN_MATCH_LENGTH > data.len() {
            return;
        }

        let hash = hash3(data, pos);
        self.prev[pos % WINDOW_SIZE] = self.head[hash];
        self.head[hash] = pos as u32;
    }

    /// Find the best match for `data[pos..]` among indexed positions.
    ///
    /// Every position before `pos` must already be inserted. Returns the
    /// longest match of at least [`MIN_MATCH_LENGTH`] bytes, the nearest one
    /// on ties.
    pub fn find_best_match(&self, data: &[u8], pos: usize) -> Option<Match> {
        if pos + MIN_MATCH_LENGTH > data.len() {
            return None;
        }

        let max_len = (data.len() - pos).min(MAX_MATCH_LENGTH);
        let mut chain_pos = self.head[hash3(data, pos)];
        let mut best_length = MIN_MATCH_LENGTH - 1;
        let mut best_distance = 0;

        while chain_pos != NO_POS {
            let match_pos = chain_pos as usize;
            if match_pos >= pos {
                // Stale entry from a later position; cannot happen when
                // positions are inserted in order.
                break;
            }
            let distance = pos - match_pos;
            if distance > WINDOW_SIZE {
                break;
            }

            // Cheap reject: a longer match must also agree on the byte just
            // past the current best.
            if data[match_pos + best_length] == data[pos + best_length] {
                let length = match_length(data, match_pos, pos, max_len);
                // Strictly longer only, so the nearest candidate wins ties.
                if length > best_length {
                    best_length = length;
                    best_distance = distance;
                    if length == max_len {
                        break;
                    }
                }
            }

            chain_pos = self.prev[match_pos % WINDOW_SIZE];
        }

        if best_length >= MIN_MATCH_LENGTH {
            Some(Match {
                length: best_length,
                distance: best_distance,
            })
        } else {
            None
        }
    }

    /// One step of the greedy parse: the token starting at `pos`.
    ///
    /// Every position the token covers is indexed before returning, so the
    /// next call continues at `pos + token.input_len()`.
    pub fn next_token(&mut self, data: &[u8], pos: usize) -> Token {
        let token = match self.find_best_match(data, pos) {
            Some(m) => Token::Match(m),
            None => Token::Literal(data[pos]),
        };
        for i in pos..pos + token.input_len() {
            self.insert(data, i);
        }
        token
    }
}

/// Brute-force reference: scan every distance from nearest to farthest.
///
/// Same contract as [`MatchFinder::find_best_match`]. Used to check the
/// indexed search.
pub fn find_best_match_naive(data: &[u8], pos: usize) -> Option<Match> {
    if pos + MIN_MATCH_LENGTH > data.len() {
        return None;
    }
    let max_len = (data.len() - pos).min(MAX_MATCH_LENGTH);
    let mut best: Option<Match> = None;
    for distance in 1..=pos.min(WINDOW_SIZE) {
        let length = match_length(data, pos - distance, pos, max_len);
        if length >= MIN_MATCH_LENGTH && best.map_or(true, |b| length > b.length) {
            best = Some(Match { length, distance });
        }
    }
    best
}

/// Number of equal bytes at `pos1` and `pos2`, capped at `max_len`.
///
/// `pos1 < pos2`; the compared ranges may overlap.
#[inline]
fn match_length(data: &[u8], pos1: usize, pos2: usize, max_len: usize) -> usize {
    let mut length = 0;

    // Compare 8 bytes at a time using u64
    while length + 8 <= max_len {
        let a = u64::from_le_bytes(read8(data, pos1 + length));
        let b = u64::from_le_bytes(read8(data, pos2 + length));
        if a != b {
            // Little-endian load: the first differing byte is the lowest set byte.
            return length + ((a ^ b).trailing_zeros() / 8) as usize;
        }
        length += 8;
    }

    // Handle remaining bytes one at a time
    while length < max_len && data[pos1 + length] == data[pos2 + length] {
        length += 1;
    }

    length
}

#[inline]
fn read8(data: &[u8], pos: usize) -> [u8; 8] {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[pos..pos + 8]);
    buf
}

/// Greedy tokenization of `data`: the best match at each position, else a literal.
///
/// This is the parse the compressor encodes.
pub fn tokenize(data: &[u8], arena: &Arena) -> CodecResult<Vec<Token>> {
    let mut finder = MatchFinder::new(arena)?;
    let mut tokens = arena.alloc_with_capacity(data.len())?;
    let mut pos = 0;
    while pos < data.len() {
        let token = finder.next_token(data, pos);
        pos += token.input_len();
        tokens.push(token);
    }
    Ok(tokens)
}
