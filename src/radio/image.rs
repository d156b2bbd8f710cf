use crate::radio::{
    RadioError,
    dirty::DirtyBlocks,
    helpers::range_span,
    slice::{ROSlice, RWSlice},
};

/// Size of the radio's flat memory image.
pub const IMAGE_SIZE: usize = 0x10000;
/// Transfer and dirty-tracking granularity.
pub const BLOCK_SIZE: usize = 256;
/// Number of blocks in the image.
pub const BLOCK_COUNT: usize = IMAGE_SIZE / BLOCK_SIZE;

/// Erased flash reads back as all ones.
pub const FILL_BYTE: u8 = 0xFF;

/// The radio's 64 KiB memory image plus its dirty-block set.
///
/// Edits through [`with_rw_slice`](Self::with_rw_slice) mark the touched
/// blocks dirty. Data arriving from the radio goes through
/// [`load`](Self::load), which leaves the dirty set alone.
#[derive(Clone)]
pub struct MemoryImage {
    bytes: Box<[u8]>,
    dirty: DirtyBlocks,
}

impl MemoryImage {
    /// A blank (erased) image.
    pub fn new() -> Self {
        Self {
            bytes: vec![FILL_BYTE; IMAGE_SIZE].into_boxed_slice(),
            dirty: DirtyBlocks::new(),
        }
    }

    /// Wraps a full image, e.g. one read back from a saved file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, RadioError> {
        if data.len() != IMAGE_SIZE {
            return Err(RadioError::InvalidValue {
                field: "image length",
                value: data.len().to_string(),
            });
        }
        Ok(Self {
            bytes: data.to_vec().into_boxed_slice(),
            dirty: DirtyBlocks::new(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes of a single block.
    ///
    /// # Panics
    /// Panics if `block >= BLOCK_COUNT`.
    pub fn block(&self, block: usize) -> &[u8] {
        let off = block * BLOCK_SIZE;
        &self.bytes[off..off + BLOCK_SIZE]
    }

    /// Provides zero-copy read access to a range.
    pub fn with_ro_slice<F, R>(&self, addr: usize, len: usize, f: F) -> Result<R, RadioError>
    where
        F: FnOnce(ROSlice<'_>) -> R,
    {
        let (offset, end) = range_span(addr, len)?;
        Ok(f(ROSlice::new(&self.bytes[offset..end])))
    }

    /// Provides read-write access to a range and marks it dirty.
    pub fn with_rw_slice<F, R>(&mut self, addr: usize, len: usize, f: F) -> Result<R, RadioError>
    where
        F: FnOnce(RWSlice<'_>) -> R,
    {
        let (offset, end) = range_span(addr, len)?;
        let r = f(RWSlice::new(&mut self.bytes[offset..end]));
        self.dirty.mark_range(addr, len)?;
        Ok(r)
    }

    /// Copies data into the image without marking dirty.
    pub fn load(&mut self, addr: usize, data: &[u8]) -> Result<(), RadioError> {
        let (offset, end) = range_span(addr, data.len())?;
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    pub fn dirty(&self) -> &DirtyBlocks {
        &self.dirty
    }

    pub fn dirty_mut(&mut self) -> &mut DirtyBlocks {
        &mut self.dirty
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MemoryImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryImage")
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
