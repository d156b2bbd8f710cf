//! Raw code tables for the channel record.
//!
//! Each enumeration converts both ways with an exhaustive `match`, so an
//! unmapped raw code surfaces as `None` at decode time instead of a
//! silent default.

/// CTCSS tones in tenths of a hertz, indexed by raw tone code.
pub const TONES: [u16; 50] = [
    670, 693, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148,
    1188, 1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 1598, 1622, 1655, 1679, 1713, 1738,
    1773, 1799, 1835, 1862, 1899, 1928, 1966, 1995, 2035, 2065, 2107, 2181, 2257, 2291, 2336,
    2418, 2503, 2541,
];

/// DCS codes (octal digits written as decimal), indexed by raw code.
pub const DTCS_CODES: [u16; 104] = [
    23, 25, 26, 31, 32, 36, 43, 47, 51, 53, 54, 65, 71, 72, 73, 74, 114, 115, 116, 122, 125, 131,
    132, 134, 143, 145, 152, 155, 156, 162, 165, 172, 174, 205, 212, 223, 225, 226, 243, 244, 245,
    246, 251, 252, 255, 261, 263, 265, 266, 271, 274, 306, 311, 315, 325, 331, 332, 343, 346, 351,
    356, 364, 365, 371, 411, 412, 413, 423, 431, 432, 445, 446, 452, 454, 455, 462, 464, 465, 466,
    503, 506, 516, 523, 526, 532, 546, 565, 606, 612, 624, 627, 631, 632, 654, 662, 664, 703, 712,
    723, 731, 732, 734, 743, 754,
];

/// Looks up a tone by raw code.
pub fn tone(code: u8) -> Option<u16> {
    TONES.get(code as usize).copied()
}

/// Raw code for a tone in tenths of a hertz.
pub fn tone_code(tone: u16) -> Option<u8> {
    TONES.iter().position(|&t| t == tone).map(|i| i as u8)
}

/// Looks up a DCS code by raw code.
pub fn dtcs(code: u8) -> Option<u16> {
    DTCS_CODES.get(code as usize).copied()
}

/// Raw code for a DCS code.
pub fn dtcs_code(dtcs: u16) -> Option<u8> {
    DTCS_CODES.iter().position(|&d| d == dtcs).map(|i| i as u8)
}

/// Generates a bidirectional code table for a fieldless enum.
macro_rules! code_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = ($code:literal, $label:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in raw-code table order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Decodes a raw code, or `None` if the radio never writes it.
            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Raw code stored in the image.
            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Label used by host front ends.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

code_table! {
    /// Tone squelch mode, high nibble of the tone/duplex byte.
    pub enum ToneMode {
        Off = (0x00, ""),
        Tone = (0x08, "Tone"),
        Tsql = (0x04, "TSQL"),
        Dtcs = (0x02, "DTCS"),
        Cross = (0x01, "Cross"),
    }
}

code_table! {
    /// Repeater offset direction, low nibble of the tone/duplex byte.
    pub enum Duplex {
        Simplex = (0x00, ""),
        Plus = (0x01, "+"),
        Minus = (0x02, "-"),
        Split = (0x04, "split"),
    }
}

code_table! {
    /// Modulation.
    pub enum Mode {
        Fm = (0x00, "FM"),
        Nfm = (0x01, "NFM"),
        Am = (0x02, "AM"),
    }
}

code_table! {
    /// How the TX and RX squelch combine when the tone mode is `Cross`.
    pub enum CrossMode {
        ToneTone = (0x00, "Tone->Tone"),
        DtcsOff = (0x01, "DTCS->"),
        OffDtcs = (0x02, "->DTCS"),
        ToneDtcs = (0x03, "Tone->DTCS"),
        DtcsTone = (0x04, "DTCS->Tone"),
        OffTone = (0x05, "->Tone"),
        DtcsDtcs = (0x06, "DTCS->DTCS"),
        ToneOff = (0x07, "Tone->"),
    }
}

code_table! {
    /// Scan-skip setting from the flag record.
    pub enum Skip {
        Scan = (0x00, ""),
        Skip = (0x01, "S"),
        Priority = (0x02, "P"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_tables_round_trip() {
        assert_eq!(tone(0), Some(670));
        assert_eq!(tone(8), Some(885));
        assert_eq!(tone(49), Some(2541));
        assert_eq!(tone(50), None);

        for code in 0..TONES.len() as u8 {
            assert_eq!(tone_code(tone(code).unwrap()), Some(code));
        }
        assert_eq!(tone_code(886), None);
    }

    #[test]
    fn dtcs_tables_round_trip() {
        assert_eq!(dtcs(0), Some(23));
        assert_eq!(dtcs(103), Some(754));
        assert_eq!(dtcs(104), None);

        for code in 0..DTCS_CODES.len() as u8 {
            assert_eq!(dtcs_code(dtcs(code).unwrap()), Some(code));
        }
        assert_eq!(dtcs_code(24), None);
    }

    #[test]
    fn tone_mode_codes() {
        assert_eq!(ToneMode::from_code(0x08), Some(ToneMode::Tone));
        assert_eq!(ToneMode::from_code(0x04), Some(ToneMode::Tsql));
        assert_eq!(ToneMode::from_code(0x03), None);
        assert_eq!(ToneMode::Cross.code(), 0x01);
        assert_eq!(ToneMode::Off.label(), "");
        assert_eq!(ToneMode::from_label("TSQL"), Some(ToneMode::Tsql));
    }

    #[test]
    fn every_variant_round_trips() {
        for &m in ToneMode::ALL {
            assert_eq!(ToneMode::from_code(m.code()), Some(m));
            assert_eq!(ToneMode::from_label(m.label()), Some(m));
        }
        for &d in Duplex::ALL {
            assert_eq!(Duplex::from_code(d.code()), Some(d));
        }
        for &m in Mode::ALL {
            assert_eq!(Mode::from_code(m.code()), Some(m));
        }
        for &c in CrossMode::ALL {
            assert_eq!(CrossMode::from_code(c.code()), Some(c));
        }
        for &s in Skip::ALL {
            assert_eq!(Skip::from_code(s.code()), Some(s));
        }
    }

    #[test]
    fn duplex_split_is_four() {
        assert_eq!(Duplex::Split.code(), 0x04);
        assert_eq!(Duplex::from_code(0x03), None);
        assert_eq!(Duplex::Minus.to_string(), "-");
    }
}
