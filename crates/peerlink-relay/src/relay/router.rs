//! Signaling router.
//!
//! Interprets decoded JSON envelopes and dispatches each to either a
//! broadcast or a targeted send. Text that fails to parse into a known
//! envelope is dropped without a reply, and a target id that is not
//! registered is a silent no-op; the sender never gets an error for either.

use peerlink_core::error::Result;
use peerlink_core::protocol::envelope::{ClientEnvelope, ServerEnvelope};

use crate::relay::{outbound, presence, Registry};

pub fn dispatch(registry: &Registry, sender_id: &str, text: &str) -> Result<()> {
    let env: ClientEnvelope = match serde_json::from_str(text) {
        Ok(env) => env,
        Err(e) => {
            tracing::debug!(sender = sender_id, error = %e, "dropping unparseable envelope");
            return Ok(());
        }
    };

    match env {
        ClientEnvelope::Register { name } => {
            if registry.set_name(sender_id, &name) {
                presence::broadcast_users(registry)?;
            }
            Ok(())
        }
        ClientEnvelope::SendMessage { text } => {
            // `from` is the sender's current display name, not its id
            let from = registry
                .lookup(sender_id)
                .map(|c| c.name)
                .unwrap_or_default();
            let frame = outbound::prepare(&ServerEnvelope::Message { from, text })?;
            registry.broadcast(frame);
            Ok(())
        }
        ClientEnvelope::CallUser { to, offer } => send_if_present(
            registry,
            &to,
            ServerEnvelope::CallMade {
                from: sender_id.to_string(),
                offer,
            },
        ),
        ClientEnvelope::MakeAnswer { to, answer } => send_if_present(
            registry,
            &to,
            ServerEnvelope::AnswerMade {
                from: sender_id.to_string(),
                answer,
            },
        ),
        ClientEnvelope::EndCall { to } => send_if_present(
            registry,
            &to,
            ServerEnvelope::CallEnded {
                from: sender_id.to_string(),
            },
        ),
    }
}

/// Targeted send; an absent target is a no-op, never an error.
fn send_if_present(registry: &Registry, to: &str, env: ServerEnvelope) -> Result<()> {
    let frame = outbound::prepare(&env)?;
    if !registry.send_to(to, frame) {
        tracing::debug!(to, "dropping envelope for unknown target");
    }
    Ok(())
}
