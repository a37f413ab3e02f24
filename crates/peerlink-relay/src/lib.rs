//! peerlink relay library entry.
//!
//! This crate wires the transport (TCP accept loop, handshake, per-connection
//! sessions, static content), the connection registry, and the signaling
//! router into a runnable relay. It is intended to be consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod relay;
pub mod transport;
