use super::macros::{impl_read_le, impl_slice_ro, impl_slice_wo, impl_write_le};

/// Read-write view of a record's bytes inside the image.
#[derive(Debug)]
pub struct RWSlice<'a>(&'a mut [u8]);

impl<'a> RWSlice<'a> {
    #[inline]
    pub fn new(slice: &'a mut [u8]) -> Self {
        Self(slice)
    }

    impl_slice_ro!();
    impl_slice_wo!();
}
