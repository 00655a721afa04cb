//! Adaptive Huffman model.
//!
//! The code tree is rebuilt incrementally after every symbol, so the encoder
//! and decoder stay in lockstep without ever transmitting a table. Both sides
//! start from the same tree and apply the same update to the same symbol
//! sequence, which makes every code assignment reproducible.
//!
//! Nodes live in a flat vector addressed by index. A node's index is its rank:
//! weights never decrease from one slot to the next, siblings share a parent
//! slot, and the root is the last slot. Incrementing a leaf keeps that order
//! by first swapping the node with the highest-ranked node of equal weight,
//! then moving on to the parent.
//!
//! When the root weight reaches [`RESCALE_THRESHOLD`], every leaf weight is
//! halved (rounding up) and the tree is rebuilt. This bounds code lengths and
//! lets the model follow drifting statistics.

use std::mem;

use crate::arena::Arena;
use crate::bits::BitWriter;
use crate::decode::bit_reader::BitReader;
use crate::error::{CodecResult, ErrorKind};

/// Root weight at which all weights are halved.
pub const RESCALE_THRESHOLD: u32 = 0x8000;

/// Longest possible code. Weights are at least 1 and the root stays at or
/// below [`RESCALE_THRESHOLD`], so the Fibonacci bound keeps depth far below this.
const MAX_CODE_LENGTH: u8 = 64;

const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Leaf(u16),
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    weight: u32,
    parent: usize,
    kind: NodeKind,
}

/// Self-adjusting Huffman code over symbols `0..num_symbols`.
#[derive(Debug, Clone)]
pub struct AdaptiveHuffman {
    /// Slot order is rank order (nondecreasing weight).
    nodes: Vec<Node>,
    /// Rebuild workspace, same capacity as `nodes`.
    scratch: Vec<Node>,
    /// Symbol -> slot of its leaf.
    leaf_of: Vec<usize>,
    rescales: u32,
}

impl AdaptiveHuffman {
    /// Build the initial model: every symbol has weight 1.
    ///
    /// Buffers come from `arena`. Leaves start in ascending symbol order, so
    /// the initial codes depend only on `num_symbols`, which must be in
    /// `2..=65535`.
    pub fn new(num_symbols: usize, arena: &Arena) -> CodecResult<Self> {
        if !(2..=u16::MAX as usize).contains(&num_symbols) {
            return Err(ErrorKind::UnsupportedAlphabet {
                symbols: num_symbols,
            });
        }
        let total = 2 * num_symbols - 1;

        let mut nodes = arena.alloc_with_capacity(total)?;
        let scratch = arena.alloc_with_capacity(total)?;
        let leaf_of = arena.alloc_filled(num_symbols, NIL)?;

        nodes.extend((0..num_symbols).map(|symbol| Node {
            weight: 1,
            parent: NIL,
            kind: NodeKind::Leaf(symbol as u16),
        }));

        let mut model = Self {
            nodes,
            scratch,
            leaf_of,
            rescales: 0,
        };
        model.rebuild();
        Ok(model)
    }

    /// Write the code for `symbol`, then update the model.
    pub fn encode(&mut self, symbol: u16, writer: &mut BitWriter) {
        let (code, length) = self.code(symbol);
        if length > 32 {
            writer.write_bits((code >> 32) as u32, length - 32);
            writer.write_bits(code as u32, 32);
        } else {
            writer.write_bits(code as u32, length);
        }
        self.update(symbol);
    }

    /// Read one code, walking from the root, then update the model.
    pub fn decode(&mut self, reader: &mut BitReader) -> CodecResult<u16> {
        let mut slot = self.root();
        let mut depth = 0u8;
        loop {
            match self.nodes[slot].kind {
                NodeKind::Leaf(symbol) => {
                    let index = symbol as usize;
                    if index >= self.leaf_of.len() || self.leaf_of[index] != slot {
                        return Err(ErrorKind::InvalidSymbol(format!(
                            "leaf at slot {slot} does not map back to symbol {symbol}"
                        )));
                    }
                    self.update(symbol);
                    return Ok(symbol);
                }
                NodeKind::Internal { left, right } => {
                    let next = if reader.read_bit()? { right } else { left };
                    depth += 1;
                    if next >= self.nodes.len() || depth > MAX_CODE_LENGTH {
                        return Err(ErrorKind::InvalidSymbol(format!(
                            "code path left the tree at depth {depth}"
                        )));
                    }
                    slot = next;
                }
            }
        }
    }

    /// Record one occurrence of `symbol`.
    pub fn update(&mut self, symbol: u16) {
        if self.nodes[self.root()].weight >= RESCALE_THRESHOLD {
            self.rescale();
        }

        let mut slot = self.leaf_of[symbol as usize];
        loop {
            let weight = self.nodes[slot].weight;

            // Highest-ranked node of the same weight. Never an ancestor: every
            // ancestor outweighs its descendants because all weights are >= 1.
            let mut leader = slot;
            while leader + 1 < self.nodes.len() && self.nodes[leader + 1].weight == weight {
                leader += 1;
            }
            if leader != slot {
                self.swap_slots(slot, leader);
                slot = leader;
            }

            self.nodes[slot].weight += 1;

            match self.nodes[slot].parent {
                NIL => break,
                parent => slot = parent,
            }
        }
    }

    /// Current code length of `symbol` in bits.
    pub fn code_length(&self, symbol: u16) -> u8 {
        self.code(symbol).1
    }

    /// Current weight of `symbol`.
    pub fn weight(&self, symbol: u16) -> u32 {
        self.nodes[self.leaf_of[symbol as usize]].weight
    }

    /// Sum of all leaf weights.
    pub fn total_weight(&self) -> u32 {
        self.nodes[self.root()].weight
    }

    /// Number of times weights have been halved.
    pub fn rescales(&self) -> u32 {
        self.rescales
    }

    /// Alphabet size.
    pub fn symbol_count(&self) -> usize {
        self.leaf_of.len()
    }

    fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Root-to-leaf path of `symbol`, right-aligned, first bit most significant.
    fn code(&self, symbol: u16) -> (u64, u8) {
        let mut slot = self.leaf_of[symbol as usize];
        let mut code = 0u64;
        let mut length = 0u8;
        while self.nodes[slot].parent != NIL {
            let parent = self.nodes[slot].parent;
            if let NodeKind::Internal { right, .. } = self.nodes[parent].kind {
                if right == slot {
                    code |= 1 << length;
                }
            }
            length += 1;
            slot = parent;
        }
        debug_assert!(length <= MAX_CODE_LENGTH);
        (code, length)
    }

    /// Exchange the subtrees held by two slots of equal weight.
    fn swap_slots(&mut self, a: usize, b: usize) {
        debug_assert_eq!(self.nodes[a].weight, self.nodes[b].weight);
        let kind = self.nodes[a].kind;
        self.nodes[a].kind = self.nodes[b].kind;
        self.nodes[b].kind = kind;
        self.relink(a);
        self.relink(b);
    }

    /// Point the children (or the symbol map) of `slot` back at it.
    fn relink(&mut self, slot: usize) {
        match self.nodes[slot].kind {
            NodeKind::Leaf(symbol) => self.leaf_of[symbol as usize] = slot,
            NodeKind::Internal { left, right } => {
                self.nodes[left].parent = slot;
                self.nodes[right].parent = slot;
            }
        }
    }

    fn rescale(&mut self) {
        for node in self.nodes.iter_mut() {
            if let NodeKind::Leaf(_) = node.kind {
                node.weight = (node.weight + 1) / 2;
            }
        }
        self.rebuild();
        self.rescales += 1;
        tracing::trace!(rescales = self.rescales, "adaptive Huffman weights halved");
    }

    /// Rebuild the tree from the leaves currently stored in `nodes`.
    ///
    /// Leaves are taken in slot order, which is nondecreasing weight with
    /// ties in their existing order. Pairs `(0, 1), (2, 3), ...` of the growing
    /// list become the children of a new node, inserted after every entry
    /// whose weight is less than or equal to its own.
    fn rebuild(&mut self) {
        let num_symbols = self.leaf_of.len();
        let total = 2 * num_symbols - 1;

        self.scratch.clear();
        self.scratch.extend(
            self.nodes
                .iter()
                .filter(|node| matches!(node.kind, NodeKind::Leaf(_)))
                .map(|node| Node {
                    weight: node.weight,
                    parent: NIL,
                    kind: node.kind,
                }),
        );
        debug_assert_eq!(self.scratch.len(), num_symbols);

        let mut next_pair = 0;
        while self.scratch.len() < total {
            let weight = self.scratch[next_pair].weight + self.scratch[next_pair + 1].weight;
            let mut at = self.scratch.len();
            while self.scratch[at - 1].weight > weight {
                at -= 1;
            }
            // `at` is past both children, so no stored child index moves.
            self.scratch.insert(
                at,
                Node {
                    weight,
                    parent: NIL,
                    kind: NodeKind::Internal {
                        left: next_pair,
                        right: next_pair + 1,
                    },
                },
            );
            next_pair += 2;
        }

        mem::swap(&mut self.nodes, &mut self.scratch);
        for slot in 0..self.nodes.len() {
            self.relink(slot);
        }
        let root = self.root();
        self.nodes[root].parent = NIL;
    }
}
