use super::macros::{impl_read_le, impl_slice_ro};

/// Read-only view of a record's bytes inside the image.
pub struct ROSlice<'a>(&'a [u8]);

impl<'a> ROSlice<'a> {
    #[inline]
    pub fn new(slice: &'a [u8]) -> Self {
        Self(slice)
    }

    /// Returns the underlying bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    impl_slice_ro!();
}
