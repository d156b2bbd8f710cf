//! Clone-mode block transfer.
//!
//! A session walks `Idle -> BaudScan -> ModeHandshake -> FlowHandshake ->
//! Transfer(block) -> SessionEnd`:
//!
//! ```text
//! PC  "\r\r"               (wake, reply drained)
//! PC  "ID\r"          D72  "ID TH-D72\r"
//! PC  "0M PROGRAM\r"  D72  "0M\r"
//!     switch to 57600, wait CTS, assert RTS, discard one byte
//! PC  R 00 lo hi 00   D72  W 00 lo hi 00 + 256 bytes     (download)
//! PC  06              D72  06
//! PC  W 00 lo hi 00 + 256 bytes            D72  06      (upload)
//! PC  E
//! ```
//!
//! Block indices are 16-bit little-endian. Every failure aborts the
//! transfer; nothing is retried.

use std::time::Instant;

use log::{debug, info, warn};

use crate::radio::{
    LinkConfig, MemoryImage, RadioError,
    error::Violation,
    image::{BLOCK_COUNT, BLOCK_SIZE},
    policy::UploadPolicy,
    progress::{ProgressSink, Status},
    transport::Transport,
};

/// Block acknowledgement.
pub const ACK: u8 = 0x06;
/// Ends a programming session.
pub const END: u8 = b'E';
/// Block read request tag.
pub const CMD_READ: u8 = b'R';
/// Block write request tag, also the tag of a read response.
pub const CMD_WRITE: u8 = b'W';

pub const PHASE_DOWNLOAD: &str = "Cloning from radio";
pub const PHASE_UPLOAD: &str = "Cloning to radio";

const WAKE: &[u8] = b"\r\r";
const ID_COMMAND: &str = "ID";
const MODE_COMMAND: &str = "0M PROGRAM";
const MODE_REPLY: &str = "0M";
const REPLY_CAPACITY: usize = 64;
const DRAIN_LEN: usize = 32;

/// Builds the 5-byte frame addressing `block`.
pub fn block_frame(cmd: u8, block: usize) -> [u8; 5] {
    let [lo, hi] = (block as u16).to_le_bytes();
    [cmd, 0, lo, hi, 0]
}

/// Splits a frame into its tag and block index.
pub fn parse_block_frame(frame: &[u8; 5]) -> (u8, usize) {
    (frame[0], u16::from_le_bytes([frame[2], frame[3]]) as usize)
}

/// Where the link is in the clone exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    BaudScan,
    ModeHandshake,
    FlowHandshake,
    Transfer { block: usize },
    SessionEnd,
}

/// Drives the clone protocol over a [`Transport`].
pub struct Link<T: Transport> {
    transport: T,
    config: LinkConfig,
    state: LinkState,
}

impl<T: Transport> core::fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Link")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Link<T> {
    pub fn new(transport: T, config: LinkConfig) -> Self {
        Self {
            transport,
            config,
            state: LinkState::Idle,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Releases the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    fn enter(&mut self, state: LinkState) {
        debug!("link {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Sends a command line and collects the reply.
    ///
    /// Reading stops at `\r` or when the command timeout, measured from the
    /// send, runs out. A timed-out command yields whatever arrived, which is
    /// an empty string if the radio said nothing.
    pub fn command(&mut self, cmd: &str) -> Result<String, RadioError> {
        let start = Instant::now();
        debug!("PC->D72: {cmd}");

        let mut line = Vec::with_capacity(cmd.len() + 1);
        line.extend_from_slice(cmd.as_bytes());
        line.push(b'\r');
        self.transport.write_all(&line)?;

        let mut reply: heapless::Vec<u8, REPLY_CAPACITY> = heapless::Vec::new();
        let mut byte = [0u8; 1];
        while reply.last() != Some(&b'\r') {
            let remaining = match self.config.command_timeout.checked_sub(start.elapsed()) {
                Some(d) if !d.is_zero() => d,
                _ => break,
            };
            if self.transport.read(&mut byte, remaining)? == 0 {
                break;
            }
            if reply.push(byte[0]).is_err() {
                break;
            }
        }

        let text = String::from_utf8_lossy(&reply).trim().to_string();
        debug!("D72->PC: {text}");
        Ok(text)
    }

    /// Asks the radio for its model identifier.
    pub fn identify(&mut self) -> Result<String, RadioError> {
        let reply = self.command(ID_COMMAND)?;
        reply
            .strip_prefix("ID ")
            .and_then(|rest| rest.split(' ').next())
            .map(str::to_string)
            .ok_or(RadioError::NoResponse("no response to ID command"))
    }

    /// Finds the baud rate the radio is listening at.
    ///
    /// Returns the radio's identifier from the first rate that answers.
    pub fn detect_baud(&mut self) -> Result<String, RadioError> {
        self.enter(LinkState::BaudScan);
        let bauds = self.config.scan_bauds.clone();
        for &baud in bauds.iter() {
            self.transport.set_baud_rate(baud)?;
            if let Err(e) = self.transport.write_all(WAKE) {
                warn!("wake at {baud} baud failed: {e}");
                break;
            }
            self.drain_wake_reply()?;

            match self.identify() {
                Ok(id) => {
                    info!("Radio {id} at {baud} baud");
                    self.enter(LinkState::Idle);
                    return Ok(id);
                }
                Err(RadioError::NoResponse(_)) => debug!("no answer at {baud} baud"),
                Err(e) => return Err(e),
            }
        }

        self.enter(LinkState::Idle);
        Err(RadioError::NoResponse("no response from radio"))
    }

    /// Discards the radio's answer to the wake sequence.
    ///
    /// Reads until `DRAIN_LEN` bytes have arrived or the command timeout,
    /// measured from the start of the drain, runs out.
    fn drain_wake_reply(&mut self) -> Result<usize, RadioError> {
        let start = Instant::now();
        let mut junk = [0u8; DRAIN_LEN];
        let mut got = 0;
        while got < DRAIN_LEN {
            let remaining = match self.config.command_timeout.checked_sub(start.elapsed()) {
                Some(d) if !d.is_zero() => d,
                _ => break,
            };
            let n = self.transport.read(&mut junk[got..], remaining)?;
            if n == 0 {
                break;
            }
            got += n;
        }
        if got > 0 {
            debug!("drained {got} bytes after wake");
        }
        Ok(got)
    }

    /// Puts the radio in programming mode and raises the bulk link.
    fn begin_transfer(&mut self) -> Result<(), RadioError> {
        self.enter(LinkState::ModeHandshake);
        if self.command(MODE_COMMAND)? != MODE_REPLY {
            return Err(RadioError::NoResponse("no response to program mode command"));
        }

        self.enter(LinkState::FlowHandshake);
        self.transport.set_baud_rate(self.config.transfer_baud)?;
        if !self.transport.wait_cts(self.config.cts_timeout)? {
            return Err(RadioError::NoResponse("clear to send never asserted"));
        }
        self.transport.set_rts(true)?;
        let mut lead = [0u8; 1];
        self.transport.read(&mut lead, self.config.command_timeout)?;
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), RadioError> {
        self.enter(LinkState::SessionEnd);
        self.transport.write_all(&[END])?;
        Ok(())
    }

    /// Fills `buf`, tolerating at most one byte timeout of silence.
    /// Returns how many bytes arrived.
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, RadioError> {
        let mut got = 0;
        while got < buf.len() {
            let n = self
                .transport
                .read(&mut buf[got..], self.config.byte_timeout)?;
            if n == 0 {
                break;
            }
            got += n;
        }
        Ok(got)
    }

    /// Fetches one block. The link must already be in bulk mode.
    pub fn read_block(&mut self, block: usize) -> Result<[u8; BLOCK_SIZE], RadioError> {
        self.enter(LinkState::Transfer { block });
        self.transport.write_all(&block_frame(CMD_READ, block))?;

        let mut header = [0u8; 5];
        let got = self.read_full(&mut header)?;
        if got != header.len() {
            return Err(Violation::ShortFrame { block, got }.into());
        }
        let (tag, echoed) = parse_block_frame(&header);
        if tag != CMD_WRITE {
            return Err(Violation::BadTag { block, tag }.into());
        }
        if echoed != block {
            return Err(Violation::WrongBlock {
                expected: block,
                got: echoed,
            }
            .into());
        }

        let mut data = [0u8; BLOCK_SIZE];
        let got = self.read_full(&mut data)?;
        if got != BLOCK_SIZE {
            return Err(Violation::ShortPayload { block, got }.into());
        }

        self.transport.write_all(&[ACK])?;
        let mut ack = [0u8; 1];
        match self.read_full(&mut ack)? {
            1 if ack[0] == ACK => Ok(data),
            1 => Err(Violation::MissingAck {
                block,
                got: Some(ack[0]),
            }
            .into()),
            _ => Err(Violation::MissingAck { block, got: None }.into()),
        }
    }

    /// Sends one block. Returns whether the radio acknowledged it.
    pub fn write_block(&mut self, block: usize, data: &[u8]) -> Result<bool, RadioError> {
        self.enter(LinkState::Transfer { block });
        self.transport.write_all(&block_frame(CMD_WRITE, block))?;
        self.transport.write_all(data)?;

        let mut ack = [0u8; 1];
        Ok(self.read_full(&mut ack)? == 1 && ack[0] == ACK)
    }

    /// Downloads the requested blocks (all of them for `None`).
    ///
    /// Blocks that were not requested read back as 0xFF. Indices past the
    /// end of the image are ignored.
    pub fn download<PS>(
        &mut self,
        blocks: Option<&[usize]>,
        progress: &mut PS,
    ) -> Result<MemoryImage, RadioError>
    where
        PS: ProgressSink + ?Sized,
    {
        let mut wanted = [blocks.is_none(); BLOCK_COUNT];
        for &b in blocks.unwrap_or_default() {
            if b < BLOCK_COUNT {
                wanted[b] = true;
            }
        }
        let total = wanted.iter().filter(|&&w| w).count();

        self.begin_transfer()?;
        info!("reading {total} blocks");

        let mut image = MemoryImage::new();
        let mut count = 0;
        for block in (0..BLOCK_COUNT).filter(|&b| wanted[b]) {
            let data = self.read_block(block)?;
            image.load(block * BLOCK_SIZE, &data)?;
            count += 1;
            progress.status(&Status {
                phase: PHASE_DOWNLOAD,
                current: count,
                max: total,
            });
        }

        self.end_session()?;
        Ok(image)
    }

    /// Uploads the requested blocks of `image` (every writable block for
    /// `None`). Blocks the policy refuses are skipped.
    ///
    /// Returns the blocks the radio acknowledged, in send order.
    pub fn upload<UP, PS>(
        &mut self,
        image: &MemoryImage,
        blocks: Option<&[usize]>,
        policy: &UP,
        progress: &mut PS,
    ) -> Result<Vec<usize>, RadioError>
    where
        UP: UploadPolicy + ?Sized,
        PS: ProgressSink + ?Sized,
    {
        let plan: Vec<usize> = match blocks {
            None => (0..BLOCK_COUNT)
                .filter(|&b| policy.can_write_block(b))
                .collect(),
            Some(list) => list
                .iter()
                .copied()
                .filter(|&b| {
                    let ok = b < BLOCK_COUNT && policy.can_write_block(b);
                    if !ok {
                        warn!("block {b} is protected, not writing it");
                    }
                    ok
                })
                .collect(),
        };
        if plan.is_empty() {
            info!("nothing to upload");
            return Ok(plan);
        }

        self.begin_transfer()?;
        info!("writing {} blocks", plan.len());

        let total = plan.len();
        for (i, &block) in plan.iter().enumerate() {
            if !self.write_block(block, image.block(block))? {
                return Err(RadioError::DeviceRejected { block });
            }
            progress.status(&Status {
                phase: PHASE_UPLOAD,
                current: i + 1,
                max: total,
            });
        }

        self.end_session()?;
        Ok(plan)
    }
}
