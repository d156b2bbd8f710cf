use std::time::Duration;

use heapless::Vec;

use crate::radio::RadioError;

/// Most baud rates a scan can try.
pub const MAX_SCAN_BAUDS: usize = 8;

/// Serial link settings for a clone session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Rates tried in order while looking for the radio.
    pub scan_bauds: Vec<u32, MAX_SCAN_BAUDS>,
    /// Rate used for bulk block transfer after the mode handshake.
    pub transfer_baud: u32,
    /// Budget for a command's reply, measured from when it is sent.
    pub command_timeout: Duration,
    /// Longest silence tolerated between bytes of a block transfer.
    pub byte_timeout: Duration,
    /// How long to wait for clear-to-send before bulk transfer.
    pub cts_timeout: Duration,
}

impl LinkConfig {
    pub fn builder() -> LinkConfigBuilder {
        LinkConfigBuilder::new()
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            scan_bauds: Vec::from_slice(&[9600, 19200, 38400, 57600]).unwrap_or_default(),
            transfer_baud: 57600,
            command_timeout: Duration::from_millis(500),
            byte_timeout: Duration::from_secs(2),
            cts_timeout: Duration::from_secs(2),
        }
    }
}

/// Builder for [`LinkConfig`]; unset values keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct LinkConfigBuilder {
    config: LinkConfig,
}

impl LinkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scan list; at most [`MAX_SCAN_BAUDS`] rates.
    pub fn scan_bauds(mut self, bauds: &[u32]) -> Result<Self, RadioError> {
        self.config.scan_bauds =
            Vec::from_slice(bauds).map_err(|_| RadioError::InvalidValue {
                field: "scan_bauds",
                value: format!("{bauds:?}"),
            })?;
        Ok(self)
    }

    pub fn transfer_baud(mut self, baud: u32) -> Self {
        self.config.transfer_baud = baud;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    pub fn byte_timeout(mut self, timeout: Duration) -> Self {
        self.config.byte_timeout = timeout;
        self
    }

    pub fn cts_timeout(mut self, timeout: Duration) -> Self {
        self.config.cts_timeout = timeout;
        self
    }

    /// Validates and returns the config.
    pub fn build(self) -> Result<LinkConfig, RadioError> {
        let c = self.config;
        if c.scan_bauds.is_empty() || c.scan_bauds.contains(&0) {
            return Err(RadioError::InvalidValue {
                field: "scan_bauds",
                value: format!("{:?}", c.scan_bauds),
            });
        }
        if c.transfer_baud == 0 {
            return Err(RadioError::InvalidValue {
                field: "transfer_baud",
                value: "0".into(),
            });
        }
        for (field, timeout) in [
            ("command_timeout", c.command_timeout),
            ("byte_timeout", c.byte_timeout),
            ("cts_timeout", c.cts_timeout),
        ] {
            if timeout.is_zero() {
                return Err(RadioError::InvalidValue {
                    field,
                    value: "0s".into(),
                });
            }
        }
        Ok(c)
    }
}
