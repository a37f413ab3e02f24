//! peerlink core: transport-agnostic wire contracts for the signaling relay.
//!
//! This crate defines the WebSocket wire layer (handshake negotiation and
//! frame codec), the JSON envelope contract exchanged with browser peers, and
//! the error surface shared by the relay. It intentionally carries no
//! transport or runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RelayError`/`Result` so the relay
//! process does not crash on malformed input or bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{RelayError, Result};
