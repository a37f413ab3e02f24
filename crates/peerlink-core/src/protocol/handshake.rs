//! HTTP upgrade handshake.
//!
//! Parses the request head that precedes the protocol switch and computes
//! the `Sec-WebSocket-Accept` token. Response assembly lives here too, so
//! the listener only shuttles bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha1::{Digest, Sha1};

use crate::error::{RelayError, Result};

/// Protocol magic GUID appended to the client key before hashing.
const ACCEPT_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// A parsed HTTP/1.1 request head (request line plus headers, no body).
#[derive(Debug)]
pub struct RequestHead {
    pub method: String,
    pub target: String,
    headers: Vec<(String, String)>,
}

impl RequestHead {
    /// Parse the head bytes read up to the blank line.
    pub fn parse(head: &str) -> Result<Self> {
        let mut lines = head.lines();
        let request_line = lines
            .next()
            .ok_or_else(|| RelayError::BadHandshake("empty request".into()))?;
        let mut parts = request_line.split_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| RelayError::BadHandshake("missing method".into()))?
            .to_string();
        let target = parts
            .next()
            .ok_or_else(|| RelayError::BadHandshake("missing request target".into()))?
            .to_string();

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| RelayError::BadHandshake(format!("bad header line: {line}")))?;
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }

        Ok(Self {
            method,
            target,
            headers,
        })
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when the request asks to switch to the WebSocket protocol.
    /// The `Upgrade` header is a comma-separated token list.
    pub fn wants_upgrade(&self) -> bool {
        self.header("upgrade")
            .map(|v| v.split(',').any(|t| t.trim().eq_ignore_ascii_case("websocket")))
            .unwrap_or(false)
    }

    /// The client handshake key, if present.
    pub fn websocket_key(&self) -> Option<&str> {
        self.header("sec-websocket-key")
    }
}

/// Compute the accept token: `base64(sha1(key ++ GUID))`.
pub fn accept_token(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(ACCEPT_GUID.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// The `101 Switching Protocols` response completing the handshake.
pub fn switching_protocols(accept: &str) -> String {
    format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {accept}\r\n\
         \r\n"
    )
}

/// The response for an upgrade request that fails negotiation.
pub fn bad_request() -> &'static str {
    "HTTP/1.1 400 Bad Request\r\n\r\n"
}

/// Validate an upgrade request and produce the handshake response.
///
/// A missing `Sec-WebSocket-Key` is the negotiation failure: the caller
/// writes the 400 response and closes without admitting the connection.
pub fn negotiate(head: &RequestHead) -> Result<String> {
    let key = head
        .websocket_key()
        .ok_or_else(|| RelayError::BadHandshake("missing Sec-WebSocket-Key".into()))?;
    Ok(switching_protocols(&accept_token(key)))
}
