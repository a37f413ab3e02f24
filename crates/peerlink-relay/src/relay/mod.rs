//! Relay runtime: connection registry, presence broadcasting, outbound
//! envelope preparation, and the signaling router.

pub mod outbound;
pub mod presence;
pub mod registry;
pub mod router;

pub use registry::{ConnId, Connection, Registry};
