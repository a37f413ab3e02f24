//! JSON envelope contract between browser peers and the relay.
//!
//! Envelopes are a tagged union over `type`; anything that does not parse
//! into a known inbound variant is dropped by the router without a reply.
//! `offer`/`answer` are opaque JSON passed through unmodified; their shape
//! belongs to the browser peer-connection layer, not the relay.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelopes accepted from a connected peer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEnvelope {
    /// Claim a display name.
    Register { name: String },
    /// Chat text relayed to every connection, the sender included.
    SendMessage { text: String },
    /// Start a call: the offer goes to `to` only.
    CallUser { to: String, offer: Value },
    /// Answer a call: the answer goes to `to` only.
    MakeAnswer { to: String, answer: Value },
    /// Hang up: notifies `to` only.
    EndCall { to: String },
}

/// Envelopes produced by the relay.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEnvelope {
    /// Sent once to a freshly admitted connection with its identifier.
    Welcome { id: String },
    /// Full `(id, name)` roster, broadcast on every membership change.
    Users { list: Vec<(String, String)> },
    Message { from: String, text: String },
    CallMade { from: String, offer: Value },
    AnswerMade { from: String, answer: Value },
    CallEnded { from: String },
}
