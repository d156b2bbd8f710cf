//! Typed records at fixed offsets in the memory image.
//!
//! ```text
//! 0x0000  frontmatter        version, password, custom-image flags
//! 0x0C00  flag[1032]         2 bytes: disabled:7 unknown:1, skip
//! 0x1500  memory[1032]       16 bytes per channel, see ChannelRecord
//! 0x5E00  channel_name[1000] 8 bytes
//! 0x7DE0  wx_name[10]        8 bytes
//! 0x7ED0  group_name[10]     8 bytes
//! ```
//!
//! Slot indices outside a table are programming errors and panic; callers
//! validate locations before reaching this module.

use crate::radio::{
    MemoryImage, RadioError,
    bits::BitField,
    slice::{ROSlice, RWSlice},
    special::SLOT_COUNT,
};

/// `disabled` code marking an empty slot.
pub const DISABLED_EMPTY: u8 = 0x7F;

const FLAG_DISABLED: BitField = BitField::new(1, 7);
const FLAG_UNKNOWN: BitField = BitField::new(0, 1);
const TONE_MODE: BitField = BitField::new(4, 4);
const DUPLEX: BitField = BitField::new(0, 4);

/// A fixed-size record that lives in the image.
pub trait Record: Sized {
    const SIZE: usize;

    fn decode(slice: ROSlice<'_>) -> Self;

    /// Writes every field this record models. Unmodelled bytes are kept.
    fn encode(&self, slice: RWSlice<'_>);
}

/// An array of records starting at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub base: usize,
    pub stride: usize,
    pub count: usize,
}

impl Table {
    /// Byte offset of entry `index`.
    ///
    /// # Panics
    /// Panics if `index >= count`.
    pub fn offset(&self, index: usize) -> usize {
        assert!(
            index < self.count,
            "table index {} out of range 0..{}",
            index,
            self.count
        );
        self.base + index * self.stride
    }

    /// Reads entry `index`.
    pub fn read<R: Record>(&self, image: &MemoryImage, index: usize) -> Result<R, RadioError> {
        image.with_ro_slice(self.offset(index), R::SIZE, R::decode)
    }

    /// Writes entry `index`, marking its block dirty.
    pub fn write<R: Record>(
        &self,
        image: &mut MemoryImage,
        index: usize,
        record: &R,
    ) -> Result<(), RadioError> {
        image.with_rw_slice(self.offset(index), R::SIZE, |slice| record.encode(slice))
    }

    /// Raw bytes of entry `index`.
    pub fn raw<'a>(&self, image: &'a MemoryImage, index: usize) -> &'a [u8] {
        let off = self.offset(index);
        &image.as_bytes()[off..off + self.stride]
    }
}

pub const FRONTMATTER_OFFSET: usize = 0x0000;

pub const FLAGS: Table = Table {
    base: 0x0C00,
    stride: FlagRecord::SIZE,
    count: SLOT_COUNT,
};

pub const CHANNELS: Table = Table {
    base: 0x1500,
    stride: ChannelRecord::SIZE,
    count: SLOT_COUNT,
};

pub const CHANNEL_NAMES: Table = Table {
    base: 0x5E00,
    stride: NameRecord::SIZE,
    count: 1000,
};

pub const WX_NAMES: Table = Table {
    base: 0x7DE0,
    stride: NameRecord::SIZE,
    count: 10,
};

pub const GROUP_NAMES: Table = Table {
    base: 0x7ED0,
    stride: NameRecord::SIZE,
    count: 10,
};

/// Image header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub version: u16,
    pub shouldbe32: u8,
    pub efs: [u8; 11],
    pub radio_custom_image: u8,
    pub gps_custom_image: u8,
    pub passwd: [u8; 6],
}

impl Frontmatter {
    pub fn read(image: &MemoryImage) -> Result<Self, RadioError> {
        image.with_ro_slice(FRONTMATTER_OFFSET, Self::SIZE, Self::decode)
    }
}

impl Record for Frontmatter {
    const SIZE: usize = 32;

    fn decode(s: ROSlice<'_>) -> Self {
        Self {
            version: s.read_u16_le_at(0),
            shouldbe32: s.read_u8_at(2),
            efs: s.read_array_at(3),
            // 14..17 unknown
            radio_custom_image: s.read_u8_at(17),
            gps_custom_image: s.read_u8_at(18),
            // 19..26 unknown
            passwd: s.read_array_at(26),
        }
    }

    fn encode(&self, mut s: RWSlice<'_>) {
        s.write_u16_le_at(0, self.version);
        s.write_u8_at(2, self.shouldbe32);
        s.copy_from_slice_at(3, &self.efs);
        s.write_u8_at(17, self.radio_custom_image);
        s.write_u8_at(18, self.gps_custom_image);
        s.copy_from_slice_at(26, &self.passwd);
    }
}

/// Per-slot flag pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagRecord {
    /// 7-bit code; [`DISABLED_EMPTY`] marks an empty slot.
    pub disabled: u8,
    pub unknown: u8,
    pub skip: u8,
}

impl FlagRecord {
    pub fn is_empty(&self) -> bool {
        self.disabled == DISABLED_EMPTY
    }
}

impl Record for FlagRecord {
    const SIZE: usize = 2;

    fn decode(s: ROSlice<'_>) -> Self {
        let packed = s.read_u8_at(0);
        Self {
            disabled: FLAG_DISABLED.get(packed),
            unknown: FLAG_UNKNOWN.get(packed),
            skip: s.read_u8_at(1),
        }
    }

    fn encode(&self, mut s: RWSlice<'_>) {
        let packed = FLAG_UNKNOWN.set(FLAG_DISABLED.set(0, self.disabled), self.unknown);
        s.write_u8_at(0, packed);
        s.write_u8_at(1, self.skip);
    }
}

/// Channel record.
///
/// ```text
/// 0 1 2 3  4 5     6            7     8     9    a          b c d e   f
/// [freq ]  ? mode  tmode/duplex rtone ctone dtcs cross_mode [offset]  ?
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRecord {
    pub freq: u32,
    pub unknown1: u8,
    pub mode: u8,
    pub tone_mode: u8,
    pub duplex: u8,
    pub rtone: u8,
    pub ctone: u8,
    pub dtcs: u8,
    pub cross_mode: u8,
    pub offset: u32,
    pub unknown2: u8,
}

impl ChannelRecord {
    /// Bytes the firmware expects in a slot that is reused after being blanked.
    pub const REINIT: [u8; 16] = [
        0x80, 0xC8, 0xB3, 0x08, 0x00, 0x01, 0x00, 0x08, 0x08, 0x00, 0xC0, 0x27, 0x09, 0x00, 0x00,
        0xFF,
    ];

    /// The record the firmware expects in a freshly reused slot.
    pub fn reinit() -> Self {
        Self::decode(ROSlice::new(&Self::REINIT))
    }
}

impl Record for ChannelRecord {
    const SIZE: usize = 16;

    fn decode(s: ROSlice<'_>) -> Self {
        let packed = s.read_u8_at(6);
        Self {
            freq: s.read_u32_le_at(0),
            unknown1: s.read_u8_at(4),
            mode: s.read_u8_at(5),
            tone_mode: TONE_MODE.get(packed),
            duplex: DUPLEX.get(packed),
            rtone: s.read_u8_at(7),
            ctone: s.read_u8_at(8),
            dtcs: s.read_u8_at(9),
            cross_mode: s.read_u8_at(10),
            offset: s.read_u32_le_at(11),
            unknown2: s.read_u8_at(15),
        }
    }

    fn encode(&self, mut s: RWSlice<'_>) {
        s.write_u32_le_at(0, self.freq);
        s.write_u8_at(4, self.unknown1);
        s.write_u8_at(5, self.mode);
        s.write_u8_at(6, DUPLEX.set(TONE_MODE.set(0, self.tone_mode), self.duplex));
        s.write_u8_at(7, self.rtone);
        s.write_u8_at(8, self.ctone);
        s.write_u8_at(9, self.dtcs);
        s.write_u8_at(10, self.cross_mode);
        s.write_u32_le_at(11, self.offset);
        s.write_u8_at(15, self.unknown2);
    }
}

/// 8-byte label, padded with 0xFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRecord(pub [u8; 8]);

impl NameRecord {
    pub const PAD: u8 = 0xFF;

    /// Text up to the first pad byte, right-trimmed.
    pub fn text(&self) -> String {
        let end = self
            .0
            .iter()
            .position(|&b| b == Self::PAD)
            .unwrap_or(self.0.len());
        self.0[..end]
            .iter()
            .map(|&b| char::from(b))
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    /// Truncates to 8 characters and pads with 0xFF.
    ///
    /// Characters are stored as Latin-1, the inverse of [`text`](Self::text).
    /// `U+00FF` is the pad byte and anything above it has no encoding; both
    /// are rejected.
    pub fn from_text(text: &str) -> Result<Self, RadioError> {
        let mut raw = [Self::PAD; 8];
        for (dst, c) in raw.iter_mut().zip(text.chars()) {
            *dst = match u8::try_from(c) {
                Ok(b) if b != Self::PAD => b,
                _ => {
                    return Err(RadioError::InvalidValue {
                        field: "name",
                        value: text.to_string(),
                    });
                }
            };
        }
        Ok(Self(raw))
    }
}

impl Record for NameRecord {
    const SIZE: usize = 8;

    fn decode(s: ROSlice<'_>) -> Self {
        Self(s.read_array_at(0))
    }

    fn encode(&self, mut s: RWSlice<'_>) {
        s.copy_from_slice_at(0, &self.0);
    }
}
