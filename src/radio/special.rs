//! Fixed-function channel slots above the ordinary range.
//!
//! Numbering is set by the radio firmware:
//!
//! | slots      | names                         |
//! |------------|-------------------------------|
//! | 1000..1019 | `L0`, `U0`, `L1`, `U1` .. `U9` |
//! | 1020..1029 | `WX1` .. `WX10`               |
//! | 1030, 1031 | `C VHF`, `C UHF`              |

use crate::radio::RadioError;

/// First special slot.
pub const SPECIAL_BASE: usize = 1000;
/// First weather slot.
pub const WX_BASE: usize = 1020;
/// First band-scope slot.
pub const BAND_SCOPE_BASE: usize = 1030;
/// Highest slot number.
pub const MAX_SLOT: usize = 1031;
/// Number of slots in the channel and flag tables.
pub const SLOT_COUNT: usize = MAX_SLOT + 1;
/// Reserved slot between ordinary and special channels.
pub const RESERVED_SLOT: usize = 999;

const SCAN_NAMES: [&str; 20] = [
    "L0", "U0", "L1", "U1", "L2", "U2", "L3", "U3", "L4", "U4", "L5", "U5", "L6", "U6", "L7", "U7",
    "L8", "U8", "L9", "U9",
];
const WX_NAMES: [&str; 10] = [
    "WX1", "WX2", "WX3", "WX4", "WX5", "WX6", "WX7", "WX8", "WX9", "WX10",
];
const BAND_SCOPE_NAMES: [&str; 2] = ["C VHF", "C UHF"];

/// The role of a slot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// User channel 0..998.
    Ordinary,
    /// Slot 999.
    Reserved,
    /// Programmable scan edge `L0..L9` / `U0..U9`.
    ScanEdge,
    /// Weather channel `WX1..WX10`; only the name is editable.
    Weather,
    /// Band-scope centre `C VHF` / `C UHF`.
    BandScope,
}

impl SlotKind {
    /// Classifies a slot number.
    pub fn of(slot: usize) -> Result<Self, RadioError> {
        match slot {
            0..RESERVED_SLOT => Ok(SlotKind::Ordinary),
            RESERVED_SLOT => Ok(SlotKind::Reserved),
            SPECIAL_BASE..WX_BASE => Ok(SlotKind::ScanEdge),
            WX_BASE..BAND_SCOPE_BASE => Ok(SlotKind::Weather),
            BAND_SCOPE_BASE..=MAX_SLOT => Ok(SlotKind::BandScope),
            _ => Err(RadioError::InvalidLocation(format!(
                "number must be between 0 and {MAX_SLOT}, got {slot}"
            ))),
        }
    }

    pub fn is_special(self) -> bool {
        matches!(
            self,
            SlotKind::ScanEdge | SlotKind::Weather | SlotKind::BandScope
        )
    }
}

/// Resolves a special-location name to its slot.
pub fn slot_for_name(name: &str) -> Result<usize, RadioError> {
    let table = SCAN_NAMES
        .iter()
        .chain(WX_NAMES.iter())
        .chain(BAND_SCOPE_NAMES.iter());
    table
        .zip(SPECIAL_BASE..)
        .find(|(n, _)| **n == name)
        .map(|(_, slot)| slot)
        .ok_or_else(|| RadioError::InvalidLocation(format!("unknown channel {name}")))
}

/// The special-location name of a slot, if it has one.
pub fn name_for_slot(slot: usize) -> Option<&'static str> {
    match slot {
        SPECIAL_BASE..WX_BASE => Some(SCAN_NAMES[slot - SPECIAL_BASE]),
        WX_BASE..BAND_SCOPE_BASE => Some(WX_NAMES[slot - WX_BASE]),
        BAND_SCOPE_BASE..=MAX_SLOT => Some(BAND_SCOPE_NAMES[slot - BAND_SCOPE_BASE]),
        _ => None,
    }
}

/// All special-location names, sorted.
pub fn special_locations() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = SCAN_NAMES
        .iter()
        .chain(WX_NAMES.iter())
        .chain(BAND_SCOPE_NAMES.iter())
        .copied()
        .collect();
    names.sort_unstable();
    names
}

/// A channel address given either by number or by special-location name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location<'a> {
    Number(usize),
    Name(&'a str),
}

impl Location<'_> {
    /// Resolves to a validated slot number.
    pub fn resolve(self) -> Result<usize, RadioError> {
        let slot = match self {
            Location::Number(n) => n,
            Location::Name(name) => slot_for_name(name)?,
        };
        SlotKind::of(slot)?;
        Ok(slot)
    }
}

impl From<usize> for Location<'_> {
    fn from(n: usize) -> Self {
        Location::Number(n)
    }
}

impl<'a> From<&'a str> for Location<'a> {
    fn from(name: &'a str) -> Self {
        Location::Name(name)
    }
}
