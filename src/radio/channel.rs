use core::fmt::Write as _;

use heapless::Vec;
use log::debug;

use crate::radio::{
    MemoryImage, RadioError,
    layout::{
        CHANNEL_NAMES, CHANNELS, ChannelRecord, DISABLED_EMPTY, FLAGS, FlagRecord, NameRecord,
        WX_NAMES,
    },
    special::{SlotKind, WX_BASE, name_for_slot},
    tables::{self, CrossMode, Duplex, Mode, Skip, ToneMode},
};

/// Channel attributes a host may not change on a given slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Number,
    Bank,
    ExtdNumber,
    CrossMode,
    Freq,
    Offset,
    Tone,
    Mode,
    Tmode,
    Ctone,
    Skip,
    Name,
}

/// Locked on weather slots: everything but the name.
const WEATHER_IMMUTABLE: [Field; 11] = [
    Field::Number,
    Field::Bank,
    Field::ExtdNumber,
    Field::CrossMode,
    Field::Freq,
    Field::Offset,
    Field::Tone,
    Field::Mode,
    Field::Tmode,
    Field::Ctone,
    Field::Skip,
];

/// Locked on scan edge and band scope slots.
const NAMED_SPECIAL_IMMUTABLE: [Field; 5] = [
    Field::Number,
    Field::Bank,
    Field::ExtdNumber,
    Field::CrossMode,
    Field::Name,
];

/// Locked on every slot.
const BASE_IMMUTABLE: [Field; 4] = [
    Field::Number,
    Field::Bank,
    Field::ExtdNumber,
    Field::CrossMode,
];

/// Sized for the largest immutable set (weather slots).
pub type ImmutableFields = Vec<Field, { WEATHER_IMMUTABLE.len() }>;

const _: () = assert!(NAMED_SPECIAL_IMMUTABLE.len() <= WEATHER_IMMUTABLE.len());
const _: () = assert!(BASE_IMMUTABLE.len() <= WEATHER_IMMUTABLE.len());

/// Logical view of one channel slot.
///
/// Tones are in tenths of a hertz (885 = 88.5 Hz); frequencies and
/// offsets are in hertz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub number: usize,
    /// Special-location name for slots 1000 and up.
    pub extd_number: Option<&'static str>,
    /// When set, no other field is meaningful.
    pub empty: bool,
    pub name: String,
    pub freq: u32,
    pub tmode: ToneMode,
    pub rtone: u16,
    pub ctone: u16,
    pub dtcs: u16,
    pub cross_mode: CrossMode,
    pub duplex: Duplex,
    pub offset: u32,
    pub mode: Mode,
    pub skip: Skip,
    pub immutable: ImmutableFields,
}

impl Channel {
    /// A blank channel for `number` with the usual defaults.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            extd_number: name_for_slot(number),
            empty: false,
            name: String::new(),
            freq: 0,
            tmode: ToneMode::Off,
            rtone: 885,
            ctone: 885,
            dtcs: 23,
            cross_mode: CrossMode::ToneTone,
            duplex: Duplex::Simplex,
            offset: 0,
            mode: Mode::Fm,
            skip: Skip::Scan,
            immutable: Vec::new(),
        }
    }

    /// An empty-slot marker.
    pub fn empty(number: usize) -> Self {
        Self {
            empty: true,
            ..Self::new(number)
        }
    }

    pub fn is_immutable(&self, field: Field) -> bool {
        self.immutable.contains(&field)
    }

    /// Decodes slot `slot` from the image.
    ///
    /// Empty slots stop after the flag record; nothing else is read.
    pub fn decode(image: &MemoryImage, slot: usize) -> Result<Self, RadioError> {
        let kind = SlotKind::of(slot)?;
        let flag: FlagRecord = FLAGS.read(image, slot)?;
        if flag.is_empty() {
            return Ok(Self::empty(slot));
        }

        let rec: ChannelRecord = CHANNELS.read(image, slot)?;
        let corrupt =
            |field: &'static str, code: u8| RadioError::CorruptField { slot, field, code };

        let mut ch = Self::new(slot);
        ch.name = channel_name(image, slot)?;
        ch.freq = rec.freq;
        ch.tmode = ToneMode::from_code(rec.tone_mode)
            .ok_or_else(|| corrupt("tone_mode", rec.tone_mode))?;
        ch.rtone = tables::tone(rec.rtone).ok_or_else(|| corrupt("rtone", rec.rtone))?;
        ch.ctone = tables::tone(rec.ctone).ok_or_else(|| corrupt("ctone", rec.ctone))?;
        ch.dtcs = tables::dtcs(rec.dtcs).ok_or_else(|| corrupt("dtcs", rec.dtcs))?;
        ch.duplex = Duplex::from_code(rec.duplex).ok_or_else(|| corrupt("duplex", rec.duplex))?;
        ch.offset = rec.offset;
        ch.mode = Mode::from_code(rec.mode).ok_or_else(|| corrupt("mode", rec.mode))?;

        match kind {
            SlotKind::Ordinary => {
                ch.skip = Skip::from_code(flag.skip).ok_or_else(|| corrupt("skip", flag.skip))?;
                ch.cross_mode = CrossMode::from_code(rec.cross_mode)
                    .ok_or_else(|| corrupt("cross_mode", rec.cross_mode))?;
            }
            SlotKind::Reserved => {}
            SlotKind::ScanEdge | SlotKind::BandScope | SlotKind::Weather => {
                ch.cross_mode = CrossMode::ToneTone;
                ch.immutable = immutable_fields(kind);
            }
        }

        Ok(ch)
    }

    /// Writes this channel into the image, marking touched blocks dirty.
    ///
    /// Weather slots only take a new name; every other field is ignored.
    /// Values with no raw encoding are rejected before anything is written.
    pub fn encode(&self, image: &mut MemoryImage) -> Result<(), RadioError> {
        let slot = self.number;
        let kind = SlotKind::of(slot)?;
        debug!("set channel {slot}");

        if kind == SlotKind::Weather {
            return set_channel_name(image, slot, &self.name);
        }

        let mut flag: FlagRecord = FLAGS.read(image, slot)?;
        let was_empty = flag.is_empty();
        if self.empty {
            flag.disabled = DISABLED_EMPTY;
            return FLAGS.write(image, slot, &flag);
        }

        let invalid = |field: &'static str, value: u16| RadioError::InvalidValue {
            field,
            value: value.to_string(),
        };
        let rtone = tables::tone_code(self.rtone).ok_or_else(|| invalid("rtone", self.rtone))?;
        let ctone = tables::tone_code(self.ctone).ok_or_else(|| invalid("ctone", self.ctone))?;
        let dtcs = tables::dtcs_code(self.dtcs).ok_or_else(|| invalid("dtcs", self.dtcs))?;
        let name = match kind {
            SlotKind::Ordinary => Some(NameRecord::from_text(&self.name)?),
            _ => None,
        };

        let mut rec = if was_empty {
            ChannelRecord::reinit()
        } else {
            CHANNELS.read(image, slot)?
        };
        rec.freq = self.freq;
        rec.tone_mode = self.tmode.code();
        rec.rtone = rtone;
        rec.ctone = ctone;
        rec.dtcs = dtcs;
        rec.duplex = self.duplex.code();
        rec.offset = self.offset;
        rec.mode = self.mode.code();

        flag.disabled = 0;
        if kind == SlotKind::Ordinary {
            rec.cross_mode = self.cross_mode.code();
            flag.skip = self.skip.code();
        }

        FLAGS.write(image, slot, &flag)?;
        CHANNELS.write(image, slot, &rec)?;
        if let Some(name) = name {
            CHANNEL_NAMES.write(image, slot, &name)?;
        }
        Ok(())
    }
}

fn immutable_set(kind: SlotKind) -> &'static [Field] {
    match kind {
        SlotKind::Weather => &WEATHER_IMMUTABLE,
        SlotKind::ScanEdge | SlotKind::BandScope => &NAMED_SPECIAL_IMMUTABLE,
        SlotKind::Ordinary | SlotKind::Reserved => &BASE_IMMUTABLE,
    }
}

fn immutable_fields(kind: SlotKind) -> ImmutableFields {
    // every set fits, see the const asserts above
    ImmutableFields::from_slice(immutable_set(kind)).unwrap_or_default()
}

/// Name stored for a slot; slots without name storage report "".
pub fn channel_name(image: &MemoryImage, slot: usize) -> Result<String, RadioError> {
    let rec: NameRecord = match SlotKind::of(slot)? {
        SlotKind::Ordinary => CHANNEL_NAMES.read(image, slot)?,
        SlotKind::Weather => WX_NAMES.read(image, slot - WX_BASE)?,
        _ => return Ok(String::new()),
    };
    Ok(rec.text())
}

/// Stores a name for a slot that has name storage; other slots are ignored.
pub fn set_channel_name(image: &mut MemoryImage, slot: usize, name: &str) -> Result<(), RadioError> {
    match SlotKind::of(slot)? {
        SlotKind::Ordinary => CHANNEL_NAMES.write(image, slot, &NameRecord::from_text(name)?),
        SlotKind::Weather => WX_NAMES.write(image, slot - WX_BASE, &NameRecord::from_text(name)?),
        _ => Ok(()),
    }
}

/// Hex dump of a slot's channel and flag records.
pub fn raw_channel_dump(image: &MemoryImage, slot: usize) -> Result<String, RadioError> {
    SlotKind::of(slot)?;
    let mut out = String::new();
    for (label, table) in [("memory", CHANNELS), ("flag", FLAGS)] {
        let _ = write!(out, "{label}[{slot}] @ {:#06x}:", table.offset(slot));
        for b in table.raw(image, slot) {
            let _ = write!(out, " {b:02x}");
        }
        out.push('\n');
    }
    let flag: FlagRecord = FLAGS.read(image, slot)?;
    let rec: ChannelRecord = CHANNELS.read(image, slot)?;
    let _ = write!(
        out,
        "disabled={:#04x} unknown={} skip={} freq={} mode={} tone_mode={} duplex={} rtone={} ctone={} dtcs={} cross_mode={} offset={}",
        flag.disabled,
        flag.unknown,
        flag.skip,
        rec.freq,
        rec.mode,
        rec.tone_mode,
        rec.duplex,
        rec.rtone,
        rec.ctone,
        rec.dtcs,
        rec.cross_mode,
        rec.offset,
    );
    Ok(out)
}
