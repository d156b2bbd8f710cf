//! The radio as a host sees it: an in-memory image plus a link to sync it.

use log::info;

use crate::radio::{
    LinkConfig, MemoryImage, RadioError,
    channel::{Channel, raw_channel_dump},
    dirty::DirtyBlocks,
    features::RadioFeatures,
    layout::{Frontmatter, GROUP_NAMES, NameRecord},
    policy::{ProtectTrailingBlocks, UploadPolicy},
    progress::{NoProgress, ProgressSink},
    protocol::Link,
    special::{self, Location},
    transport::Transport,
};

/// A TH-D72 clone session.
///
/// Channel edits go to the local image and mark its blocks dirty;
/// [`sync_out`](Self::sync_out) sends only those blocks.
///
/// ```no_run
/// use thd72_clone::prelude::*;
/// # fn open_port() -> NullTransport { NullTransport }
///
/// let mut radio = Thd72::new(open_port(), LinkConfig::default());
/// radio.sync_in()?;
/// let mut ch = radio.get_memory(12)?;
/// ch.name = "SIMPLEX".into();
/// radio.set_memory(&ch)?;
/// radio.sync_out()?;
/// # Ok::<(), RadioError>(())
/// ```
pub struct Thd72<T: Transport, PS = NoProgress, UP = ProtectTrailingBlocks> {
    link: Link<T>,
    image: MemoryImage,
    radio_id: Option<String>,
    progress: PS,
    policy: UP,
}

impl<T: Transport> Thd72<T> {
    /// A session with a blank image.
    pub fn new(transport: T, config: LinkConfig) -> Self {
        Self {
            link: Link::new(transport, config),
            image: MemoryImage::new(),
            radio_id: None,
            progress: NoProgress,
            policy: ProtectTrailingBlocks::default(),
        }
    }

    /// A session over a saved image. The dirty set starts empty.
    pub fn from_image(transport: T, config: LinkConfig, bytes: &[u8]) -> Result<Self, RadioError> {
        let mut radio = Self::new(transport, config);
        radio.image = MemoryImage::from_bytes(bytes)?;
        Ok(radio)
    }
}

impl<T, PS, UP> Thd72<T, PS, UP>
where
    T: Transport,
    PS: ProgressSink,
    UP: UploadPolicy,
{
    pub fn with_progress<P: ProgressSink>(self, progress: P) -> Thd72<T, P, UP> {
        Thd72 {
            link: self.link,
            image: self.image,
            radio_id: self.radio_id,
            progress,
            policy: self.policy,
        }
    }

    pub fn with_policy<U: UploadPolicy>(self, policy: U) -> Thd72<T, PS, U> {
        Thd72 {
            link: self.link,
            image: self.image,
            radio_id: self.radio_id,
            progress: self.progress,
            policy,
        }
    }

    /// Reads the whole radio into the local image, discarding local edits.
    pub fn sync_in(&mut self) -> Result<(), RadioError> {
        let id = self.link.detect_baud()?;
        self.radio_id = Some(id);
        self.image = self.link.download(None, &mut self.progress)?;
        info!("image read from radio");
        Ok(())
    }

    /// Writes local edits to the radio and returns the blocks written.
    ///
    /// Only dirty blocks are sent. With nothing dirty the full image goes,
    /// less whatever the upload policy protects. Written blocks leave the
    /// dirty set once the whole upload has succeeded; a failed upload leaves
    /// the set untouched.
    pub fn sync_out(&mut self) -> Result<Vec<usize>, RadioError> {
        let id = self.link.detect_baud()?;
        self.radio_id = Some(id);

        let dirty = self.image.dirty().to_vec();
        let blocks = if dirty.is_empty() {
            info!("no tracked changes, writing the full image");
            None
        } else {
            Some(dirty.as_slice())
        };
        let written = self
            .link
            .upload(&self.image, blocks, &self.policy, &mut self.progress)?;
        self.image.dirty_mut().clear(written.iter().copied());
        info!("image written to radio");
        Ok(written)
    }

    /// Decodes a channel by number or special-location name.
    pub fn get_memory<'a>(&self, location: impl Into<Location<'a>>) -> Result<Channel, RadioError> {
        let slot = location.into().resolve()?;
        Channel::decode(&self.image, slot)
    }

    /// Encodes a channel into the local image.
    pub fn set_memory(&mut self, channel: &Channel) -> Result<(), RadioError> {
        channel.encode(&mut self.image)
    }

    pub fn special_locations(&self) -> Vec<&'static str> {
        special::special_locations()
    }

    /// Hex dump of a slot's records for debugging.
    pub fn raw_memory<'a>(&self, location: impl Into<Location<'a>>) -> Result<String, RadioError> {
        let slot = location.into().resolve()?;
        raw_channel_dump(&self.image, slot)
    }

    pub fn features(&self) -> RadioFeatures {
        RadioFeatures::th_d72()
    }

    pub fn frontmatter(&self) -> Result<Frontmatter, RadioError> {
        Frontmatter::read(&self.image)
    }

    /// Name of memory group `index` (0..10).
    pub fn group_name(&self, index: usize) -> Result<String, RadioError> {
        if index >= GROUP_NAMES.count {
            return Err(RadioError::InvalidLocation(format!(
                "group must be between 0 and {}, got {index}",
                GROUP_NAMES.count - 1
            )));
        }
        let rec: NameRecord = GROUP_NAMES.read(&self.image, index)?;
        Ok(rec.text())
    }

    /// Identifier reported by the radio during the last sync.
    pub fn radio_id(&self) -> Option<&str> {
        self.radio_id.as_deref()
    }

    pub fn image(&self) -> &MemoryImage {
        &self.image
    }

    /// Direct access for raw edits; writes still mark blocks dirty.
    pub fn image_mut(&mut self) -> &mut MemoryImage {
        &mut self.image
    }

    pub fn dirty_blocks(&self) -> &DirtyBlocks {
        self.image.dirty()
    }

    pub fn link(&self) -> &Link<T> {
        &self.link
    }

    /// Ends the session and hands back the transport.
    pub fn into_transport(self) -> T {
        self.link.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::{
        image::IMAGE_SIZE,
        policy::AllowAllBlocks,
        progress::Status,
        tables::Skip,
        test_support::{Fault, FakeRadio, ordinary_channel, programmed_image},
    };

    fn session_over(radio: FakeRadio) -> Thd72<FakeRadio> {
        Thd72::new(radio, LinkConfig::default())
    }

    fn synced() -> Thd72<FakeRadio> {
        let mut s = session_over(FakeRadio::new().with_image(&programmed_image()));
        s.sync_in().unwrap();
        s
    }

    #[test]
    fn sync_in_replaces_image() {
        let mut last = None;
        let mut s = session_over(FakeRadio::new().with_image(&programmed_image()))
            .with_progress(|st: &Status| last = Some(*st));
        s.sync_in().unwrap();

        assert_eq!(s.radio_id(), Some("TH-D72"));
        assert!(s.dirty_blocks().is_empty());
        assert_eq!(s.image().as_bytes(), programmed_image().as_bytes());
        let ch = s.get_memory(0).unwrap();
        assert_eq!(ch.name, "SIMPLEX");
        assert_eq!(ch.skip, Skip::Skip);
        drop(s);
        assert_eq!(
            last,
            Some(Status {
                phase: "Cloning from radio",
                current: 256,
                max: 256
            })
        );
    }

    #[test]
    fn sync_in_discards_local_edits() {
        let mut s = session_over(FakeRadio::new().with_image(&programmed_image()));
        s.set_memory(&ordinary_channel(5)).unwrap();
        assert!(!s.dirty_blocks().is_empty());
        s.sync_in().unwrap();
        assert!(s.dirty_blocks().is_empty());
        assert!(s.get_memory(5).unwrap().empty);
    }

    #[test]
    fn sync_out_sends_only_dirty_blocks() {
        let mut s = synced();
        s.set_memory(&ordinary_channel(300)).unwrap();
        assert_eq!(s.dirty_blocks().to_vec(), vec![0x0E, 0x27, 0x67]);

        let written = s.sync_out().unwrap();
        assert_eq!(written, vec![0x0E, 0x27, 0x67]);
        assert!(s.dirty_blocks().is_empty());

        let radio = s.into_transport();
        assert_eq!(radio.written_blocks, vec![0x0E, 0x27, 0x67]);
        let on_radio = MemoryImage::from_bytes(&radio.memory).unwrap();
        assert_eq!(Channel::decode(&on_radio, 300).unwrap(), ordinary_channel(300));
    }

    #[test]
    fn sync_out_without_tracking_writes_full_image() {
        let mut s = Thd72::from_image(FakeRadio::new(), LinkConfig::default(), programmed_image().as_bytes())
            .unwrap();
        let written = s.sync_out().unwrap();
        assert_eq!(written, (0..254).collect::<Vec<_>>());
        let radio = s.into_transport();
        assert_eq!(&radio.memory[..0xFE00], &programmed_image().as_bytes()[..0xFE00]);
        assert!(radio.memory[0xFE00..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn rejected_upload_keeps_dirty_set() {
        let mut s = session_over(FakeRadio::new().with_fault(Fault::Nak(0x27)));
        s.set_memory(&ordinary_channel(300)).unwrap();
        assert!(matches!(
            s.sync_out(),
            Err(RadioError::DeviceRejected { block: 0x27 })
        ));
        assert_eq!(s.dirty_blocks().to_vec(), vec![0x0E, 0x27, 0x67]);
    }

    #[test]
    fn protected_blocks_stay_dirty() {
        let mut s = session_over(FakeRadio::new());
        s.image_mut()
            .with_rw_slice(0xFF00, 4, |mut w| w.fill(0))
            .unwrap();
        s.set_memory(&ordinary_channel(0)).unwrap();

        let written = s.sync_out().unwrap();
        assert!(!written.contains(&0xFF));
        assert_eq!(s.dirty_blocks().to_vec(), vec![0xFF]);
        assert!(!s.link().transport().written_blocks.contains(&0xFF));
    }

    #[test]
    fn lifted_policy_writes_trailing_blocks() {
        let mut s = session_over(FakeRadio::new()).with_policy(AllowAllBlocks::default());
        s.image_mut()
            .with_rw_slice(0xFF00, 4, |mut w| w.fill(0))
            .unwrap();
        assert_eq!(s.sync_out().unwrap(), vec![0xFF]);
        assert!(s.dirty_blocks().is_empty());
    }

    #[test]
    fn silent_radio_is_no_response() {
        let mut s = session_over(FakeRadio::new().at_baud(1200));
        assert!(matches!(s.sync_in(), Err(RadioError::NoResponse(_))));
        assert_eq!(s.radio_id(), None);
    }

    #[test]
    fn lookup_by_special_name() {
        let s = synced();
        let wx = s.get_memory("WX6").unwrap();
        assert_eq!(wx.number, 1025);
        assert_eq!(wx.name, "NOAA6");
        assert_eq!(wx.freq, 162_550_000);
        assert!(s.get_memory("L0").unwrap().empty);
        assert!(matches!(
            s.get_memory("WX0"),
            Err(RadioError::InvalidLocation(_))
        ));
        assert!(matches!(
            s.get_memory(1032),
            Err(RadioError::InvalidLocation(_))
        ));
        assert!(s.raw_memory("C UHF").unwrap().starts_with("memory[1031]"));
    }

    #[test]
    fn special_locations_listed() {
        let s = session_over(FakeRadio::new());
        let names = s.special_locations();
        assert_eq!(names.first(), Some(&"C UHF"));
        assert!(names.contains(&"WX10"));
        assert_eq!(s.features().valid_special_chans, names);
    }

    #[test]
    fn image_load_and_header() {
        let mut raw = vec![0xFF; IMAGE_SIZE];
        raw[2] = 32;
        raw[GROUP_NAMES.offset(3)..GROUP_NAMES.offset(3) + 5].copy_from_slice(b"HAM  ");
        let s = Thd72::from_image(FakeRadio::new(), LinkConfig::default(), &raw).unwrap();

        assert_eq!(s.frontmatter().unwrap().shouldbe32, 32);
        assert_eq!(s.group_name(3).unwrap(), "HAM");
        assert_eq!(s.group_name(0).unwrap(), "");
        assert!(matches!(
            s.group_name(10),
            Err(RadioError::InvalidLocation(_))
        ));
        assert!(s.dirty_blocks().is_empty());

        assert!(matches!(
            Thd72::from_image(FakeRadio::new(), LinkConfig::default(), &raw[1..]),
            Err(RadioError::InvalidValue { .. })
        ));
    }
}
