//! Batching of expansion concepts for translation calls

use crate::error::TranslateError;
use crate::result::Result;

/// Splits a concept list into contiguous, order-preserving groups
#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    batch_size: usize,
}

impl Batcher {
    /// Create a batcher; a batch size of zero is a configuration error
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(TranslateError::config_error(
                "batch size must be at least 1",
            ));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Groups of `batch_size` items, the last one possibly shorter
    pub fn partition<'a, T>(&self, items: &'a [T]) -> impl ExactSizeIterator<Item = &'a [T]> {
        items.chunks(self.batch_size)
    }

    /// Number of groups `partition` yields for `len` items
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }
}
