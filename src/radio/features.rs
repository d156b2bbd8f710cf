use core::ops::RangeInclusive;

use crate::radio::{
    special::{self, MAX_SLOT},
    tables::{CrossMode, Duplex, Mode, Skip, ToneMode},
};

/// Characters the radio's name editor offers.
pub const NAME_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Static description of what the radio supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioFeatures {
    pub memory_bounds: (usize, usize),
    /// Tunable ranges in hertz.
    pub valid_bands: [RangeInclusive<u32>; 2],
    pub has_bank: bool,
    pub has_cross: bool,
    pub has_dtcs_polarity: bool,
    pub has_tuning_step: bool,
    pub can_odd_split: bool,
    pub valid_characters: &'static str,
    pub valid_name_length: usize,
    pub valid_tmodes: &'static [ToneMode],
    pub valid_duplexes: &'static [Duplex],
    pub valid_modes: &'static [Mode],
    pub valid_cross_modes: &'static [CrossMode],
    /// `Priority` decodes but cannot be chosen by a host.
    pub valid_skips: &'static [Skip],
    pub valid_special_chans: Vec<&'static str>,
}

impl RadioFeatures {
    pub fn th_d72() -> Self {
        Self {
            memory_bounds: (0, MAX_SLOT),
            valid_bands: [118_000_000..=174_000_000, 320_000_000..=524_000_000],
            has_bank: false,
            has_cross: true,
            has_dtcs_polarity: false,
            has_tuning_step: false,
            can_odd_split: true,
            valid_characters: NAME_CHARSET,
            valid_name_length: 8,
            valid_tmodes: ToneMode::ALL,
            valid_duplexes: Duplex::ALL,
            valid_modes: Mode::ALL,
            valid_cross_modes: CrossMode::ALL,
            valid_skips: &[Skip::Scan, Skip::Skip],
            valid_special_chans: special::special_locations(),
        }
    }

    /// Whether `freq` (Hz) falls in a tunable band.
    pub fn in_band(&self, freq: u32) -> bool {
        self.valid_bands.iter().any(|b| b.contains(&freq))
    }
}

impl Default for RadioFeatures {
    fn default() -> Self {
        Self::th_d72()
    }
}
