//! WebSocket text-frame codec (panic-free).
//!
//! Wire layout:
//! - byte 0: fin bit | opcode (the relay only produces and accepts text);
//! - byte 1: mask bit | 7-bit length selector (0-125 literal, 126 = 16-bit
//!   big-endian length follows, 127 = 64-bit big-endian length follows);
//! - 4-byte mask key on inbound (client) frames only;
//! - payload, XORed with the mask key on inbound frames.
//!
//! Parsing rules:
//! - Never index (`buf[0]`) without a length check; use `Buf` cursors.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.
//! - `decode_text` consumes nothing from the buffer until a complete frame
//!   has arrived, so a frame split across reads decodes once the tail shows
//!   up, and several frames packed into one read drain one at a time.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{RelayError, Result};

/// Fin bit ORed with the text opcode: the only first byte the relay emits.
pub const TEXT_FRAME_HEADER: u8 = 0x81;

const FIN_BIT: u8 = 0x80;
const MASK_BIT: u8 = 0x80;
const OPCODE_TEXT: u8 = 0x1;

/// Encode `payload` as a single unmasked text frame.
///
/// The minimal header variant is always selected: a literal length byte
/// below 126, selector 126 plus 16 bits below 65536, selector 127 plus
/// 64 bits otherwise. Server-to-client frames carry no mask.
pub fn encode_text(payload: &[u8]) -> Bytes {
    let len = payload.len();
    let mut out = BytesMut::with_capacity(10 + len);
    out.put_u8(TEXT_FRAME_HEADER);
    if len < 126 {
        out.put_u8(len as u8);
    } else if len < 65536 {
        out.put_u8(126);
        out.put_u16(len as u16);
    } else {
        out.put_u8(127);
        out.put_u64(len as u64);
    }
    out.put_slice(payload);
    out.freeze()
}

/// Try to decode one masked text frame from the front of `src`.
///
/// Returns `Ok(None)` until `src` holds a complete frame; on success exactly
/// one frame's bytes are consumed and its unmasked payload is returned as
/// text. Fragmented, unmasked, or non-text frames and payloads above
/// `max_payload` are errors; the caller treats them as the end of that
/// connection.
pub fn decode_text(src: &mut BytesMut, max_payload: usize) -> Result<Option<String>> {
    let mut peek: &[u8] = &src[..];
    if peek.remaining() < 2 {
        return Ok(None);
    }

    let b0 = peek.get_u8();
    let b1 = peek.get_u8();

    if b0 & FIN_BIT == 0 {
        return Err(RelayError::FragmentedFrame);
    }
    let opcode = b0 & 0x0f;
    if opcode != OPCODE_TEXT {
        return Err(RelayError::UnsupportedOpcode(opcode));
    }
    if b1 & MASK_BIT == 0 {
        return Err(RelayError::UnmaskedFrame);
    }

    let len = match b1 & 0x7f {
        126 => {
            if peek.remaining() < 2 {
                return Ok(None);
            }
            u64::from(peek.get_u16())
        }
        127 => {
            if peek.remaining() < 8 {
                return Ok(None);
            }
            peek.get_u64()
        }
        n => u64::from(n),
    };
    if len > max_payload as u64 {
        return Err(RelayError::PayloadTooLarge { len, max: max_payload });
    }
    if (peek.remaining() as u64) < 4 + len {
        return Ok(None);
    }

    // Complete frame buffered: consume it for real.
    let header_len = src.len() - peek.remaining();
    src.advance(header_len);
    let mut mask = [0u8; 4];
    src.copy_to_slice(&mut mask);

    let mut payload = src.split_to(len as usize);
    unmask(&mut payload, mask);

    match String::from_utf8(payload.to_vec()) {
        Ok(text) => Ok(Some(text)),
        Err(_) => Err(RelayError::InvalidUtf8),
    }
}

/// XOR `payload[i]` with `mask[i % 4]`. Applying the same key twice
/// round-trips, so this serves both directions.
pub fn unmask(payload: &mut [u8], mask: [u8; 4]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= mask[i % 4];
    }
}
