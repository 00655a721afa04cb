//! Symbol alphabets and length/distance slot tables.
//!
//! The main model codes literals, end of stream and match lengths. A match
//! length is split into a slot (part of the coded symbol) and raw extra bits.
//! Distances go through a second model the same way, plus one symbol meaning
//! "same distance as the previous match".

/// Minimum match length worth encoding.
pub const MIN_MATCH_LENGTH: usize = 3;

/// Maximum match length.
pub const MAX_MATCH_LENGTH: usize = 258;

/// Maximum distance to look back for matches (64KB window).
pub const WINDOW_SIZE: usize = 65536;

/// Main-alphabet symbol terminating the stream.
pub const END_OF_STREAM: u16 = 256;

/// First main-alphabet symbol for matches.
pub const FIRST_LENGTH_SYMBOL: u16 = 257;

/// Number of length slots.
pub const NUM_LENGTH_SLOTS: usize = 29;

/// Size of the main alphabet: 256 literals, end of stream, length slots.
pub const NUM_MAIN_SYMBOLS: usize = FIRST_LENGTH_SYMBOL as usize + NUM_LENGTH_SLOTS;

/// Number of distance slots.
pub const NUM_DISTANCE_SLOTS: usize = 32;

/// Distance-alphabet symbol reusing the previous match distance.
pub const REPEAT_DISTANCE: u16 = NUM_DISTANCE_SLOTS as u16;

/// Size of the distance alphabet.
pub const NUM_DISTANCE_SYMBOLS: usize = NUM_DISTANCE_SLOTS + 1;

const LENGTH_BASE: [u16; NUM_LENGTH_SLOTS] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

const LENGTH_EXTRA: [u8; NUM_LENGTH_SLOTS] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

const DISTANCE_BASE: [u32; NUM_DISTANCE_SLOTS] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577, 32769, 49153,
];

const DISTANCE_EXTRA: [u8; NUM_DISTANCE_SLOTS] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13, 14, 14,
];

/// Lookup table for length slots: (length-3) -> slot.
const LENGTH_LOOKUP: [u8; MAX_MATCH_LENGTH - MIN_MATCH_LENGTH + 1] = {
    let mut table = [0u8; MAX_MATCH_LENGTH - MIN_MATCH_LENGTH + 1];
    let mut i = 0usize;
    while i < table.len() {
        let length = i + MIN_MATCH_LENGTH;
        let mut slot = 0usize;
        while slot < NUM_LENGTH_SLOTS - 1 {
            if length < LENGTH_BASE[slot + 1] as usize {
                break;
            }
            slot += 1;
        }
        table[i] = slot as u8;
        i += 1;
    }
    table
};

/// A value split into a coded slot and raw extra bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCode {
    /// Slot index.
    pub slot: u16,
    /// Number of raw bits following the coded symbol.
    pub extra_bits: u8,
    /// Value of the raw bits.
    pub extra_value: u32,
}

/// Split a match length into its slot and extra bits.
#[inline]
pub fn length_slot(length: usize) -> SlotCode {
    debug_assert!((MIN_MATCH_LENGTH..=MAX_MATCH_LENGTH).contains(&length));
    let slot = LENGTH_LOOKUP[length - MIN_MATCH_LENGTH] as usize;
    SlotCode {
        slot: slot as u16,
        extra_bits: LENGTH_EXTRA[slot],
        extra_value: (length - LENGTH_BASE[slot] as usize) as u32,
    }
}

/// Split a match distance into its slot and extra bits.
#[inline]
pub fn distance_slot(distance: usize) -> SlotCode {
    debug_assert!((1..=WINDOW_SIZE).contains(&distance));
    let n = (distance - 1) as u32;
    let slot: usize = if n < 4 {
        n as usize
    } else {
        let top = 31 - n.leading_zeros();
        (2 * top + ((n >> (top - 1)) & 1)) as usize
    };
    SlotCode {
        slot: slot as u16,
        extra_bits: DISTANCE_EXTRA[slot],
        extra_value: distance as u32 - DISTANCE_BASE[slot],
    }
}

/// Base length and extra-bit count of a length slot, `None` when out of range.
#[inline]
pub fn length_base(slot: usize) -> Option<(usize, u8)> {
    Some((*LENGTH_BASE.get(slot)? as usize, LENGTH_EXTRA[slot]))
}

/// Base distance and extra-bit count of a distance slot, `None` when out of range.
#[inline]
pub fn distance_base(slot: usize) -> Option<(usize, u8)> {
    Some((*DISTANCE_BASE.get(slot)? as usize, DISTANCE_EXTRA[slot]))
}
