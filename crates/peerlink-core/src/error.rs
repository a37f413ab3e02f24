//! Shared error type across peerlink crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type used by core and relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Upgrade request that could not be negotiated (e.g. missing key).
    #[error("bad handshake: {0}")]
    BadHandshake(String),
    /// Frame bytes that do not follow the wire layout.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    /// Inbound frame without the mask bit; client frames must be masked.
    #[error("unmasked client frame")]
    UnmaskedFrame,
    /// Frame with the fin bit clear; fragmented messages are not relayed.
    #[error("fragmented frame")]
    FragmentedFrame,
    /// Only text frames are relayed.
    #[error("unsupported opcode: 0x{0:x}")]
    UnsupportedOpcode(u8),
    /// Declared payload length above the configured cap.
    #[error("payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: u64, max: usize },
    /// Text frame payload that is not valid UTF-8.
    #[error("invalid utf-8 in text frame")]
    InvalidUtf8,
    /// Invalid relay configuration.
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RelayError {
    /// Stable code string used in diagnostics and test vectors.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::BadHandshake(_) => "BAD_HANDSHAKE",
            RelayError::MalformedFrame(_) => "MALFORMED_FRAME",
            RelayError::UnmaskedFrame => "UNMASKED_FRAME",
            RelayError::FragmentedFrame => "FRAGMENTED_FRAME",
            RelayError::UnsupportedOpcode(_) => "UNSUPPORTED_OPCODE",
            RelayError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            RelayError::InvalidUtf8 => "INVALID_UTF8",
            RelayError::Config(_) => "CONFIG",
            RelayError::Internal(_) => "INTERNAL",
        }
    }
}
