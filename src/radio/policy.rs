use crate::radio::image::BLOCK_COUNT;

/// Decides which image blocks an upload may write.
pub trait UploadPolicy {
    /// Returns true if `block` may be sent to the radio.
    fn can_write_block(&self, block: usize) -> bool;
}

/// Default policy: never write the last two blocks of the image.
///
/// Those blocks are outside the data this crate models and are left
/// exactly as the radio has them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProtectTrailingBlocks {}

impl ProtectTrailingBlocks {
    pub const PROTECTED: usize = 2;
}

impl UploadPolicy for ProtectTrailingBlocks {
    fn can_write_block(&self, block: usize) -> bool {
        block < BLOCK_COUNT - Self::PROTECTED
    }
}

/// Allows every block in the image to be written.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllBlocks {}

impl UploadPolicy for AllowAllBlocks {
    fn can_write_block(&self, block: usize) -> bool {
        block < BLOCK_COUNT
    }
}
