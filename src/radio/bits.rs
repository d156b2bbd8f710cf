//! Sub-byte field layout.
//!
//! Packed bytes in the image list their fields most-significant first, so
//! in `disabled:7, unknown:1` the 7-bit field occupies bits 7..1 and the
//! trailing flag is bit 0.

/// A field of `width` bits starting `shift` bits above the LSB of a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    shift: u8,
    width: u8,
}

impl BitField {
    /// # Panics
    /// Panics (at compile time when used in a `const`) if the field does not
    /// fit in one byte.
    pub const fn new(shift: u8, width: u8) -> Self {
        assert!(width > 0 && shift + width <= 8, "bit field must fit in a byte");
        Self { shift, width }
    }

    /// Mask of the field's value, before shifting.
    pub const fn mask(&self) -> u8 {
        (((1u16 << self.width) - 1) & 0xFF) as u8
    }

    /// Largest value the field can hold.
    pub const fn max(&self) -> u8 {
        self.mask()
    }

    /// Extracts the field from `byte`.
    pub const fn get(&self, byte: u8) -> u8 {
        (byte >> self.shift) & self.mask()
    }

    /// Returns `byte` with the field replaced by `value` (truncated to width).
    /// Bits outside the field are preserved.
    pub const fn set(&self, byte: u8, value: u8) -> u8 {
        let mask = self.mask() << self.shift;
        (byte & !mask) | ((value << self.shift) & mask)
    }
}
