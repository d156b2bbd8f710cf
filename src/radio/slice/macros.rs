/// Generates a little-endian read method for one integer type.
///
/// The radio stores every multi-byte field little-endian, so there are
/// no big-endian variants.
macro_rules! impl_read_le {
    (u8) => {
        /// Reads a `u8` at the given offset.
        ///
        /// # Panics
        /// Panics if `offset >= len()`.
        #[inline]
        pub fn read_u8_at(&self, offset: usize) -> u8 {
            self.0[offset]
        }
    };
    ($type:ty, $size:literal) => {
        paste::paste! {
            #[doc = "Reads a little-endian `" $type "` at the given offset."]
            #[doc = ""]
            #[doc = "# Panics"]
            #[doc = "Panics if `offset + " $size " > len()`."]
            #[inline]
            pub fn [<read_ $type _le_at>](&self, offset: usize) -> $type {
                let mut raw = [0u8; $size];
                raw.copy_from_slice(&self.0[offset..offset + $size]);
                <$type>::from_le_bytes(raw)
            }
        }
    };
}

/// Generates a little-endian write method for one integer type.
macro_rules! impl_write_le {
    (u8) => {
        /// Writes a `u8` at the given offset.
        ///
        /// # Panics
        /// Panics if `offset >= len()`.
        #[inline]
        pub fn write_u8_at(&mut self, offset: usize, value: u8) {
            self.0[offset] = value;
        }
    };
    ($type:ty, $size:literal) => {
        paste::paste! {
            #[doc = "Writes a little-endian `" $type "` at the given offset."]
            #[doc = ""]
            #[doc = "# Panics"]
            #[doc = "Panics if `offset + " $size " > len()`."]
            #[inline]
            pub fn [<write_ $type _le_at>](&mut self, offset: usize, value: $type) {
                self.0[offset..offset + $size].copy_from_slice(&value.to_le_bytes());
            }
        }
    };
}

/// Generates read methods shared by every slice wrapper.
macro_rules! impl_slice_ro {
    () => {
        /// Returns the length of the slice.
        #[inline]
        pub fn len(&self) -> usize {
            self.0.len()
        }

        /// Returns true if the slice is empty.
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        /// Copies `N` bytes starting at `offset` into a fixed array.
        ///
        /// # Panics
        /// Panics if the range exceeds slice bounds.
        #[inline]
        pub fn read_array_at<const N: usize>(&self, offset: usize) -> [u8; N] {
            let mut out = [0u8; N];
            out.copy_from_slice(&self.0[offset..offset + N]);
            out
        }

        impl_read_le!(u8);
        impl_read_le!(u16, 2);
        impl_read_le!(u32, 4);
    };
}

/// Generates write methods for mutable slice wrappers.
macro_rules! impl_slice_wo {
    () => {
        /// Copies `src` into the slice starting at `offset`.
        ///
        /// # Panics
        /// Panics if the range exceeds slice bounds.
        #[inline]
        pub fn copy_from_slice_at(&mut self, offset: usize, src: &[u8]) {
            self.0[offset..offset + src.len()].copy_from_slice(src);
        }

        /// Fills the entire slice with the given value.
        #[inline]
        pub fn fill(&mut self, value: u8) {
            self.0.fill(value);
        }

        impl_write_le!(u8);
        impl_write_le!(u16, 2);
        impl_write_le!(u32, 4);
    };
}

pub(super) use impl_read_le;
pub(super) use impl_slice_ro;
pub(super) use impl_slice_wo;
pub(super) use impl_write_le;
