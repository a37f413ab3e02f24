//! Presence broadcasting.
//!
//! Emits the full connection roster to every connection whenever membership
//! or naming changes: after an admission (following that connection's
//! private `welcome`), after a `register`, and after a removal.

use peerlink_core::error::Result;
use peerlink_core::protocol::envelope::ServerEnvelope;

use crate::relay::{outbound, Registry};

pub fn broadcast_users(registry: &Registry) -> Result<()> {
    let frame = outbound::prepare(&ServerEnvelope::Users {
        list: registry.snapshot(),
    })?;
    registry.broadcast(frame);
    Ok(())
}
