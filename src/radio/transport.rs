//! Byte-level serial link to the radio.
//!
//! The protocol layer is generic over [`Transport`], so any serial port
//! binding (or an in-memory fake) can drive a session.

use std::{io, time::Duration};

/// Serial-port capabilities the clone protocol needs.
pub trait Transport {
    /// Reconfigures the line speed.
    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()>;

    /// Reads up to `buf.len()` bytes, waiting at most `timeout` for data.
    /// Returns 0 if nothing arrived before the timeout.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;

    /// Writes all of `data`.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Drives the request-to-send line.
    fn set_rts(&mut self, asserted: bool) -> io::Result<()>;

    /// Waits up to `timeout` for clear-to-send. Returns false on timeout.
    fn wait_cts(&mut self, timeout: Duration) -> io::Result<bool>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()> {
        (**self).set_baud_rate(baud)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        (**self).read(buf, timeout)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_all(data)
    }

    fn set_rts(&mut self, asserted: bool) -> io::Result<()> {
        (**self).set_rts(asserted)
    }

    fn wait_cts(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).wait_cts(timeout)
    }
}

/// A transport that discards all writes and never reads.
/// Useful for editing a saved image with no radio attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn set_baud_rate(&mut self, _baud: u32) -> io::Result<()> {
        Ok(())
    }

    fn read(&mut self, _buf: &mut [u8], _timeout: Duration) -> io::Result<usize> {
        Ok(0)
    }

    fn write_all(&mut self, _data: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn set_rts(&mut self, _asserted: bool) -> io::Result<()> {
        Ok(())
    }

    fn wait_cts(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(false)
    }
}
