//! Protocol modules (handshake, frame codec, envelope contract).
//!
//! This module hosts the wire formats the relay speaks:
//! - HTTP upgrade handshake: request-head parsing and accept-token math.
//! - Frame codec: single text frames with length-header variants and
//!   inbound payload masking.
//! - Envelope: the tagged JSON union exchanged with browser peers.
//!
//! All parsers are panic-free: malformed input is reported as `RelayError`
//! instead of panicking or indexing raw buffers, keeping the relay resilient
//! to hostile traffic.

pub mod envelope;
pub mod frame;
pub mod handshake;
