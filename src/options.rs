//! Per-call limits.
//!
//! None of these settings affect the encoded format; they only bound what a
//! single call may accept or allocate.

use crate::arena::DEFAULT_ARENA_SIZE;

/// Default cap on the declared length a decompress call will honor: 1 GiB.
pub const DEFAULT_MAX_OUTPUT_SIZE: usize = 1 << 30;

/// Limits applied to one `compress`/`decompress` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Largest input `compress` accepts. Never above `u32::MAX`, the most the
    /// header can describe.
    pub max_input_size: usize,
    /// Largest declared original length `decompress` will decode.
    pub max_output_size: usize,
    /// Byte budget of the call's arena.
    pub memory_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_input_size: u32::MAX as usize,
            max_output_size: DEFAULT_MAX_OUTPUT_SIZE,
            memory_limit: DEFAULT_ARENA_SIZE,
        }
    }
}

impl Options {
    /// Set the largest input `compress` accepts.
    pub fn with_max_input_size(mut self, max: usize) -> Self {
        self.max_input_size = max;
        self
    }

    /// Set the largest declared length `decompress` decodes.
    pub fn with_max_output_size(mut self, max: usize) -> Self {
        self.max_output_size = max;
        self
    }

    /// Set the arena budget in bytes.
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Input size limit after clamping to what the header can hold.
    pub(crate) fn effective_max_input(&self) -> usize {
        self.max_input_size.min(u32::MAX as usize)
    }
}
