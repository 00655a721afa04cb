//! Call-scoped memory budget.
//!
//! Every `compress`/`decompress` call creates one [`Arena`] and draws all of
//! its working buffers (hash tables, tree nodes, output) through it. The
//! buffers live in the call's working state and drop together with the
//! arena when the call returns, whichever way it returns.

use std::cell::Cell;
use std::mem;

use crate::error::{CodecResult, ErrorKind};

/// Default budget: 2 GiB.
pub const DEFAULT_ARENA_SIZE: usize = 2 << 30;

/// Byte-budgeted allocation context for a single call.
#[derive(Debug)]
pub struct Arena {
    capacity: usize,
    usage: Cell<usize>,
    peak: Cell<usize>,
}

impl Arena {
    /// Create an arena that hands out at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            usage: Cell::new(0),
            peak: Cell::new(0),
        }
    }

    /// Arena with [`DEFAULT_ARENA_SIZE`].
    pub fn with_default_size() -> Self {
        Self::new(DEFAULT_ARENA_SIZE)
    }

    /// Allocate a vector of `len` copies of `value`.
    pub fn alloc_filled<T: Clone>(&self, len: usize, value: T) -> CodecResult<Vec<T>> {
        let mut buf = self.alloc_with_capacity(len)?;
        buf.resize(len, value);
        Ok(buf)
    }

    /// Allocate an empty vector able to hold `capacity` elements without
    /// reallocating.
    ///
    /// The whole capacity is charged against the budget up front. Buffers
    /// that must grow later do so through [`Arena::grow`].
    pub fn alloc_with_capacity<T>(&self, capacity: usize) -> CodecResult<Vec<T>> {
        let bytes = self.charge(capacity, mem::size_of::<T>())?;
        let mut buf = Vec::new();
        self.reserve_charged(&mut buf, capacity, bytes)?;
        Ok(buf)
    }

    /// Make room for `additional` more elements in `buf`, charging the added
    /// capacity.
    ///
    /// Capacity at least doubles while the budget allows it, so repeated
    /// small requests reallocate rarely. Near the end of the budget the
    /// buffer takes whatever is left, as long as that covers the request.
    pub fn grow<T>(&self, buf: &mut Vec<T>, additional: usize) -> CodecResult<()> {
        let capacity = buf.capacity();
        let needed = buf
            .len()
            .checked_add(additional)
            .ok_or(ErrorKind::AllocationFailure {
                requested: usize::MAX,
                available: self.remaining(),
            })?;
        if needed <= capacity {
            return Ok(());
        }

        let elem_size = mem::size_of::<T>();
        let affordable = match elem_size {
            0 => usize::MAX,
            size => capacity.saturating_add(self.remaining() / size),
        };
        let target = capacity
            .saturating_mul(2)
            .max(needed)
            .min(affordable.max(needed));
        let bytes = self.charge(target - capacity, elem_size)?;
        self.reserve_charged(buf, target - buf.len(), bytes)
    }

    /// Reserve after `bytes` were charged; refund them if the allocator refuses.
    fn reserve_charged<T>(
        &self,
        buf: &mut Vec<T>,
        additional: usize,
        bytes: usize,
    ) -> CodecResult<()> {
        if buf.try_reserve_exact(additional).is_err() {
            self.usage.set(self.usage.get() - bytes);
            return Err(ErrorKind::AllocationFailure {
                requested: bytes,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn charge(&self, count: usize, elem_size: usize) -> CodecResult<usize> {
        let available = self.remaining();
        let bytes = count
            .checked_mul(elem_size)
            .ok_or(ErrorKind::AllocationFailure {
                requested: usize::MAX,
                available,
            })?;
        if bytes > available {
            return Err(ErrorKind::AllocationFailure {
                requested: bytes,
                available,
            });
        }
        let usage = self.usage.get() + bytes;
        self.usage.set(usage);
        self.peak.set(self.peak.get().max(usage));
        Ok(bytes)
    }

    /// Bytes currently charged.
    pub fn usage(&self) -> usize {
        self.usage.get()
    }

    /// Highest usage seen during the call.
    pub fn peak_usage(&self) -> usize {
        self.peak.get()
    }

    /// Total budget.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Budget left.
    pub fn remaining(&self) -> usize {
        self.capacity - self.usage.get()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::with_default_size()
    }
}
