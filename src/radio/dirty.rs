use bitmaps::Bitmap;
use log::trace;

use crate::radio::{
    RadioError,
    helpers::block_span,
    image::BLOCK_COUNT,
};

/// Set of 256-byte image blocks changed since the last confirmed upload.
///
/// Backed by a fixed bitmap, so membership is unique and iteration is
/// always in ascending block order. Each [`Thd72`](crate::radio::Thd72)
/// session owns its own set.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DirtyBlocks {
    bits: Bitmap<BLOCK_COUNT>,
}

impl DirtyBlocks {
    pub fn new() -> Self {
        Self {
            bits: Bitmap::new(),
        }
    }

    /// Marks the block containing `offset` dirty.
    pub fn mark(&mut self, offset: usize) -> Result<(), RadioError> {
        self.mark_range(offset, 1)
    }

    /// Marks every block overlapping `offset..offset + len` dirty.
    pub fn mark_range(&mut self, offset: usize, len: usize) -> Result<(), RadioError> {
        let (sb, eb) = block_span(offset, len)?;
        for block in sb..=eb {
            self.bits.set(block, true);
        }
        trace!("dirty blocks: {:?}", self);
        Ok(())
    }

    /// Removes each successfully written block from the set.
    pub fn clear<I>(&mut self, written: I)
    where
        I: IntoIterator<Item = usize>,
    {
        for block in written {
            if block < BLOCK_COUNT {
                self.bits.set(block, false);
            }
        }
    }

    pub fn contains(&self, block: usize) -> bool {
        block < BLOCK_COUNT && self.bits.get(block)
    }

    /// Returns true if no block is dirty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Dirty block indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.bits.first_index();
        core::iter::from_fn(move || {
            let block = next?;
            next = self.bits.next_index(block);
            Some(block)
        })
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl Default for DirtyBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for DirtyBlocks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
