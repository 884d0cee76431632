//! Record batching
//!
//! Accumulates encoded items and hands them off in groups of a fixed
//! maximum size. The batcher owns its buffer; the caller is responsible for
//! writing a returned batch to the destination before offering more items,
//! which is what bounds in-flight work to a single batch.

use crate::convert::Item;

/// The destination store's batch-write ceiling
pub const MAX_BATCH_SIZE: usize = 25;

/// Bounded buffer that emits full batches.
///
/// A given item appears in exactly one emitted batch, in arrival order;
/// batches are never merged or split after emission.
#[derive(Debug)]
pub struct Batcher {
    buffer: Vec<Item>,
    capacity: usize,
}

impl Batcher {
    /// Create a batcher; the capacity is clamped to `1..=MAX_BATCH_SIZE`
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_BATCH_SIZE);
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item; returns the full buffer exactly when capacity is
    /// reached, resetting it for the next batch.
    pub fn offer(&mut self, item: Item) -> Option<Vec<Item>> {
        self.buffer.push(item);
        if self.buffer.len() >= self.capacity {
            Some(std::mem::replace(
                &mut self.buffer,
                Vec::with_capacity(self.capacity),
            ))
        } else {
            None
        }
    }

    /// Hand off whatever is buffered, without waiting for capacity.
    ///
    /// Returns `None` when the buffer is empty, so an end-of-stream flush
    /// on an empty buffer emits nothing.
    pub fn flush(&mut self) -> Option<Vec<Item>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Items currently buffered
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// The configured batch capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
