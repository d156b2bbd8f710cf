use thiserror::Error;

/// Errors that can occur while decoding the image or talking to the radio.
#[derive(Debug, Error)]
pub enum RadioError {
    /// Baud scan exhausted, or a handshake command got no/invalid reply.
    #[error("no response from radio: {0}")]
    NoResponse(&'static str),

    /// Malformed block exchange; the transfer is aborted.
    #[error("protocol violation: {0}")]
    ProtocolViolation(Violation),

    /// The radio did not acknowledge a written block.
    #[error("radio NAK'd block {block}")]
    DeviceRejected { block: usize },

    /// Slot number or special-location name outside the channel tables.
    #[error("invalid memory location: {0}")]
    InvalidLocation(String),

    /// A raw field in the image holds a code with no table entry.
    #[error("slot {slot}: {field} code {code:#04x} is not a known value")]
    CorruptField {
        slot: usize,
        field: &'static str,
        code: u8,
    },

    /// A logical value has no raw encoding on this radio.
    #[error("{field} value {value} is not supported")]
    InvalidValue { field: &'static str, value: String },

    /// Address or length exceeds image bounds.
    #[error("address or length exceeds image bounds")]
    OutOfBounds,

    /// Operation attempted with zero length.
    #[error("operation attempted with zero length")]
    ZeroLength,

    /// Transport-level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The exact framing failure behind a [`RadioError::ProtocolViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Fewer than five bytes of block response header arrived.
    ShortFrame { block: usize, got: usize },
    /// Response header carried an unexpected command byte.
    BadTag { block: usize, tag: u8 },
    /// Response header echoed a different block index.
    WrongBlock { expected: usize, got: usize },
    /// Post-block acknowledgement was missing or not `0x06`.
    MissingAck { block: usize, got: Option<u8> },
    /// Payload read stalled before 256 bytes arrived.
    ShortPayload { block: usize, got: usize },
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Violation::ShortFrame { block, got } => {
                write!(f, "block {block}: response frame was {got} of 5 bytes")
            }
            Violation::BadTag { block, tag } => {
                write!(f, "block {block}: unexpected response tag {tag:#04x}")
            }
            Violation::WrongBlock { expected, got } => {
                write!(f, "expected block {expected}, radio sent block {got}")
            }
            Violation::MissingAck { block, got: Some(b) } => {
                write!(f, "block {block}: expected ACK, got {b:#04x}")
            }
            Violation::MissingAck { block, got: None } => {
                write!(f, "block {block}: did not receive post-block ACK")
            }
            Violation::ShortPayload { block, got } => {
                write!(f, "block {block}: payload stalled after {got} bytes")
            }
        }
    }
}

impl From<Violation> for RadioError {
    fn from(v: Violation) -> Self {
        RadioError::ProtocolViolation(v)
    }
}

/// Result type alias using [`RadioError`].
pub type Result<T> = core::result::Result<T, RadioError>;
