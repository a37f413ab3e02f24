//! Top-level facade crate for peerlink.
//!
//! Re-exports the wire contracts and the relay library so users can depend
//! on a single crate.

pub mod core {
    pub use peerlink_core::*;
}

pub mod relay {
    pub use peerlink_relay::*;
}
