//! Fixtures and an in-memory radio for unit tests.

use std::{collections::VecDeque, io, time::Duration};

use crate::radio::{
    LinkConfig, MemoryImage,
    channel::Channel,
    image::{BLOCK_SIZE, IMAGE_SIZE},
    layout::{CHANNEL_NAMES, CHANNELS, FLAGS, WX_NAMES},
    protocol::{ACK, CMD_READ, CMD_WRITE, END, Link, block_frame},
    tables::{Duplex, Mode, Skip, ToneMode},
};

const NAK: u8 = 0x15;

/// A 16-byte channel record with tone codes 12 (100.0 Hz), DCS 023 and
/// cross mode `DTCS->Tone`.
pub fn channel_bytes(freq: u32, tmode_duplex: u8, offset: u32) -> [u8; 16] {
    let mut b = [0u8; 16];
    b[0..4].copy_from_slice(&freq.to_le_bytes());
    b[4] = 0x00;
    b[5] = 0x00;
    b[6] = tmode_duplex;
    b[7] = 12;
    b[8] = 12;
    b[9] = 0;
    b[10] = 4;
    b[11..15].copy_from_slice(&offset.to_le_bytes());
    b[15] = 0x00;
    b
}

fn name_bytes(text: &str) -> [u8; 8] {
    let mut b = [0xFF; 8];
    b[..text.len()].copy_from_slice(text.as_bytes());
    b
}

/// An image holding:
/// - slot 0 `SIMPLEX` on 146.52 MHz, Tone 100.0, skip `S`
/// - slot 300 `RPT` on 145.29 MHz, TSQL, minus offset
/// - slot 1025 (WX6) on 162.55 MHz named `NOAA6`
///
/// The dirty set is empty.
pub fn programmed_image() -> MemoryImage {
    let mut image = MemoryImage::new();
    let mut put = |addr: usize, data: &[u8]| image.load(addr, data).unwrap();

    put(FLAGS.offset(0), &[0x00, 0x01]);
    put(CHANNELS.offset(0), &channel_bytes(146_520_000, 0x80, 0));
    put(CHANNEL_NAMES.offset(0), &name_bytes("SIMPLEX"));

    put(FLAGS.offset(300), &[0x01, 0x00]);
    put(CHANNELS.offset(300), &channel_bytes(145_290_000, 0x42, 600_000));
    put(CHANNEL_NAMES.offset(300), &name_bytes("RPT"));

    put(FLAGS.offset(1025), &[0x00, 0x00]);
    put(CHANNELS.offset(1025), &channel_bytes(162_550_000, 0x00, 0));
    put(WX_NAMES.offset(5), &name_bytes("NOAA6"));

    image
}

/// A fully populated ordinary channel.
pub fn ordinary_channel(slot: usize) -> Channel {
    Channel {
        name: format!("CH{slot}"),
        freq: 145_500_000,
        tmode: ToneMode::Tsql,
        rtone: 1230,
        ctone: 1230,
        dtcs: 23,
        duplex: Duplex::Plus,
        offset: 5_000_000,
        mode: Mode::Nfm,
        skip: Skip::Scan,
        ..Channel::new(slot)
    }
}

/// Memory whose every block starts with its own index.
pub fn patterned_memory() -> Vec<u8> {
    (0..IMAGE_SIZE)
        .map(|i| if i % BLOCK_SIZE == 0 { (i / BLOCK_SIZE) as u8 } else { (i % 251) as u8 })
        .collect()
}

/// A link over a fake radio with default settings.
pub fn fake_link(radio: FakeRadio) -> Link<FakeRadio> {
    Link::new(radio, LinkConfig::default())
}

/// Misbehaviour injected at a given block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    /// Answer a write of this block with NAK.
    Nak(usize),
    /// Echo the next block index when this block is read.
    WrongEcho(usize),
    /// Send only 100 payload bytes for this block.
    ShortPayload(usize),
    /// Do not echo the ACK after this block is read.
    NoAck(usize),
    /// Answer a read of this block with an `R` tag instead of `W`.
    BadTag(usize),
    /// Send only three header bytes for this block, then nothing.
    ShortHeader(usize),
    /// Swallow a write of this block without any reply.
    SilentAfterWrite(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FakeMode {
    Command,
    Program,
    AwaitAck { block: usize },
}

/// In-memory TH-D72 speaking the clone protocol.
///
/// Bytes sent at a baud rate other than the one the radio is listening at
/// are lost, as on a real serial line. Reads return at most `max_read`
/// bytes at a time.
#[derive(Debug)]
pub struct FakeRadio {
    pub memory: Vec<u8>,
    pub id: &'static str,
    pub command_baud: u32,
    pub transfer_baud: u32,
    pub fault: Fault,
    pub accept_program_mode: bool,
    pub cts: bool,
    pub rts: bool,
    pub baud: u32,
    pub bauds_tried: Vec<u32>,
    pub sent: Vec<u8>,
    pub read_blocks: Vec<usize>,
    pub written_blocks: Vec<usize>,
    pub ended: bool,
    /// Most bytes a single `read` hands back.
    pub max_read: usize,
    mode: FakeMode,
    line: Vec<u8>,
    rx: Vec<u8>,
    tx: VecDeque<u8>,
}

impl FakeRadio {
    pub fn new() -> Self {
        Self {
            memory: vec![0xFF; IMAGE_SIZE],
            id: "TH-D72",
            command_baud: 9600,
            transfer_baud: 57600,
            fault: Fault::None,
            accept_program_mode: true,
            cts: true,
            rts: false,
            baud: 9600,
            bauds_tried: Vec::new(),
            sent: Vec::new(),
            read_blocks: Vec::new(),
            written_blocks: Vec::new(),
            ended: false,
            max_read: 7,
            mode: FakeMode::Command,
            line: Vec::new(),
            rx: Vec::new(),
            tx: VecDeque::new(),
        }
    }

    /// Listens for commands at `baud`; the host port starts there too.
    pub fn at_baud(mut self, baud: u32) -> Self {
        self.command_baud = baud;
        self.baud = baud;
        self
    }

    pub fn with_memory(mut self, memory: Vec<u8>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_image(self, image: &MemoryImage) -> Self {
        self.with_memory(image.as_bytes().to_vec())
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = fault;
        self
    }

    /// Limits how many bytes each `read` returns, like a real port that
    /// hands over whatever has arrived so far.
    pub fn with_max_read(mut self, max_read: usize) -> Self {
        self.max_read = max_read.max(1);
        self
    }

    pub fn refusing_program_mode(mut self) -> Self {
        self.accept_program_mode = false;
        self
    }

    pub fn without_cts(mut self) -> Self {
        self.cts = false;
        self
    }

    fn reply(&mut self, bytes: &[u8]) {
        self.tx.extend(bytes.iter().copied());
    }

    fn command_byte(&mut self, b: u8) {
        if b != b'\r' {
            self.line.push(b);
            return;
        }
        let line = std::mem::take(&mut self.line);
        match &line[..] {
            b"ID" => {
                let id = format!("ID {}\r", self.id);
                self.reply(id.as_bytes());
            }
            b"0M PROGRAM" if self.accept_program_mode => {
                self.reply(b"0M\r");
                self.mode = FakeMode::Program;
                self.ended = false;
            }
            b"0M PROGRAM" => self.reply(b"N\r"),
            _ => self.reply(b"?\r"),
        }
    }

    fn program_bytes(&mut self) {
        loop {
            let Some(&first) = self.rx.first() else {
                return;
            };
            match self.mode {
                FakeMode::AwaitAck { block } => {
                    self.rx.remove(0);
                    if first == ACK && self.fault != Fault::NoAck(block) {
                        self.reply(&[ACK]);
                    }
                    self.mode = FakeMode::Program;
                }
                FakeMode::Program if first == END => {
                    self.rx.remove(0);
                    self.ended = true;
                    self.rts = false;
                    self.mode = FakeMode::Command;
                    return;
                }
                FakeMode::Program if first == CMD_READ => {
                    if self.rx.len() < 5 {
                        return;
                    }
                    let block = u16::from_le_bytes([self.rx[2], self.rx[3]]) as usize;
                    self.rx.drain(..5);
                    self.read_blocks.push(block);

                    let echoed = if self.fault == Fault::WrongEcho(block) {
                        block + 1
                    } else {
                        block
                    };
                    let tag = if self.fault == Fault::BadTag(block) {
                        CMD_READ
                    } else {
                        CMD_WRITE
                    };
                    let header = block_frame(tag, echoed);
                    if self.fault == Fault::ShortHeader(block) {
                        self.reply(&header[..3]);
                        self.mode = FakeMode::Program;
                        continue;
                    }
                    self.reply(&header);
                    let off = block * BLOCK_SIZE;
                    let len = if self.fault == Fault::ShortPayload(block) {
                        100
                    } else {
                        BLOCK_SIZE
                    };
                    let data = self.memory[off..off + len].to_vec();
                    self.reply(&data);
                    self.mode = FakeMode::AwaitAck { block };
                }
                FakeMode::Program if first == CMD_WRITE => {
                    if self.rx.len() < 5 + BLOCK_SIZE {
                        return;
                    }
                    let block = u16::from_le_bytes([self.rx[2], self.rx[3]]) as usize;
                    let frame: Vec<u8> = self.rx.drain(..5 + BLOCK_SIZE).collect();
                    match self.fault {
                        Fault::Nak(b) if b == block => {
                            self.reply(&[NAK]);
                            continue;
                        }
                        Fault::SilentAfterWrite(b) if b == block => continue,
                        _ => {}
                    }
                    let off = block * BLOCK_SIZE;
                    self.memory[off..off + BLOCK_SIZE].copy_from_slice(&frame[5..]);
                    self.written_blocks.push(block);
                    self.reply(&[ACK]);
                }
                FakeMode::Program => {
                    self.rx.remove(0);
                }
                FakeMode::Command => return,
            }
        }
    }
}

impl Default for FakeRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::radio::transport::Transport for FakeRadio {
    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()> {
        self.baud = baud;
        self.bauds_tried.push(baud);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> io::Result<usize> {
        let n = buf.len().min(self.tx.len()).min(self.max_read);
        for (slot, b) in buf.iter_mut().zip(self.tx.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.sent.extend_from_slice(data);
        match self.mode {
            FakeMode::Command if self.baud == self.command_baud => {
                for &b in data {
                    self.command_byte(b);
                }
            }
            FakeMode::Program | FakeMode::AwaitAck { .. } if self.baud == self.transfer_baud => {
                self.rx.extend_from_slice(data);
                self.program_bytes();
            }
            _ => {}
        }
        Ok(())
    }

    fn set_rts(&mut self, asserted: bool) -> io::Result<()> {
        if asserted && !self.rts && self.mode == FakeMode::Program {
            // the radio sends one byte when the host takes the line
            self.reply(&[0x00]);
        }
        self.rts = asserted;
        Ok(())
    }

    fn wait_cts(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(self.cts && self.mode == FakeMode::Program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programmed_image_is_clean_and_decodes() {
        let image = programmed_image();
        assert!(image.dirty().is_empty());
        assert_eq!(Channel::decode(&image, 0).unwrap().name, "SIMPLEX");
        let rpt = Channel::decode(&image, 300).unwrap();
        assert_eq!(rpt.tmode, ToneMode::Tsql);
        assert_eq!(rpt.duplex, Duplex::Minus);
        assert_eq!(Channel::decode(&image, 1025).unwrap().name, "NOAA6");
    }

    #[test]
    fn fake_radio_ignores_wrong_baud() {
        use crate::radio::transport::Transport;
        let mut radio = FakeRadio::new().at_baud(19200);
        radio.set_baud_rate(9600).unwrap();
        radio.write_all(b"ID\r").unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(radio.read(&mut buf, Duration::ZERO).unwrap(), 0);
    }
}
