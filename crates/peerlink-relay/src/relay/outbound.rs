//! Outbound envelope preparation (serialize once, send N times).

use bytes::Bytes;

use peerlink_core::error::{RelayError, Result};
use peerlink_core::protocol::{envelope::ServerEnvelope, frame};

/// Serialize an envelope and wrap it in a text frame. Broadcast paths call
/// this once and fan the same bytes out to every queue.
pub fn prepare(env: &ServerEnvelope) -> Result<Bytes> {
    let json = serde_json::to_string(env)
        .map_err(|e| RelayError::Internal(format!("envelope encode failed: {e}")))?;
    Ok(frame::encode_text(json.as_bytes()))
}
