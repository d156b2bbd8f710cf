//! Clone-mode programming for the Kenwood TH-D72 handheld.
//!
//! The radio exposes its configuration as a flat 64 KiB memory image that
//! can be read and written in 256-byte blocks over a serial link. This
//! crate provides:
//!
//! - **A typed image codec** - flag, channel and name tables decoded into
//!   [`Channel`](radio::Channel) values and encoded back byte-exactly
//! - **Block-based dirty tracking** - edits mark blocks so an upload sends
//!   only what changed
//! - **The clone protocol** - baud scan, program-mode handshake and
//!   acknowledged block transfer over any [`Transport`](radio::Transport)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  get/set_memory   ┌──────────────┐
//! │   Host (App)     │──────────────────▶│ MemoryImage  │
//! │                  │                   │ + dirty bits │
//! └──────────────────┘                   └──────┬───────┘
//!                                               │ sync_in / sync_out
//!                                        ┌──────▼───────┐
//!                                        │    Link      │──▶ serial port
//!                                        └──────────────┘
//! ```
//!
//! - **Host writes** go to the image and mark blocks dirty
//! - **`sync_in`** replaces the image with the radio's and clears the dirty set
//! - **`sync_out`** writes dirty blocks (or the whole image if none are
//!   tracked) and clears the blocks the radio acknowledged
//!
//! The last two blocks of the image are never written under the default
//! [`UploadPolicy`](radio::UploadPolicy).
//!
//! # Example
//!
//! ```rust,no_run
//! use thd72_clone::prelude::*;
//!
//! # fn open_port() -> NullTransport { NullTransport }
//! let mut radio = Thd72::new(open_port(), LinkConfig::default())
//!     .with_progress(|s: &Status| eprintln!("{}: {}/{}", s.phase, s.current, s.max));
//! radio.sync_in()?;
//!
//! let mut ch = radio.get_memory("WX3")?;
//! ch.name = "NOAA".into();
//! radio.set_memory(&ch)?;
//!
//! let mut ch = radio.get_memory(40)?;
//! ch.freq = 146_520_000;
//! ch.tmode = ToneMode::Tone;
//! ch.rtone = 1000;
//! radio.set_memory(&ch)?;
//!
//! radio.sync_out()?;
//! # Ok::<(), RadioError>(())
//! ```

#![deny(unsafe_code)]

pub mod radio;

pub mod prelude {
    pub use crate::radio::prelude::*;
}
