//! Upgrade listener.
//!
//! Accepts incoming streams and reads each request head once. Upgrade
//! requests go through the handshake negotiator and on success into the
//! session loop; everything else is answered from the static root.

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use peerlink_core::error::{RelayError, Result};
use peerlink_core::protocol::handshake::{self, RequestHead};

use crate::app_state::AppState;
use crate::transport::{conn, statics};

/// Request heads larger than this are dropped without a response.
const MAX_HEAD_BYTES: usize = 8 * 1024;

/// Accept loop: one spawned task per stream. A connection's failure never
/// leaves its task; nothing here is fatal to the process.
pub async fn run(listener: TcpListener, state: AppState) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve(stream, state).await {
                        tracing::debug!(%peer, code = e.code(), error = %e, "connection ended with error");
                    }
                });
            }
            Err(e) => tracing::warn!(error = %e, "accept failed"),
        }
    }
}

async fn serve(mut stream: TcpStream, state: AppState) -> Result<()> {
    let (head, leftover) = read_head(&mut stream).await?;
    let head = RequestHead::parse(&head)?;

    if head.wants_upgrade() {
        match handshake::negotiate(&head) {
            Ok(response) => {
                stream
                    .write_all(response.as_bytes())
                    .await
                    .map_err(|e| RelayError::Internal(format!("handshake write failed: {e}")))?;
                conn::run_session(stream, leftover, state).await
            }
            Err(e) => {
                let _ = stream.write_all(handshake::bad_request().as_bytes()).await;
                Err(e)
            }
        }
    } else {
        statics::serve(&mut stream, &head, &state.cfg().relay.static_dir).await
    }
}

/// Read until the blank line ending the request head. Returns the head text
/// and whatever bytes arrived after it (handed to the session loop so an
/// eager client's first frames are not lost).
async fn read_head(stream: &mut TcpStream) -> Result<(String, BytesMut)> {
    let mut buf = BytesMut::with_capacity(1024);
    loop {
        if let Some(pos) = find_terminator(&buf) {
            let head_bytes = buf.split_to(pos);
            buf.advance(4);
            let head = std::str::from_utf8(&head_bytes)
                .map_err(|_| RelayError::BadHandshake("request head is not utf-8".into()))?
                .to_string();
            return Ok((head, buf));
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Err(RelayError::BadHandshake("request head too large".into()));
        }
        let n = stream
            .read_buf(&mut buf)
            .await
            .map_err(|e| RelayError::Internal(format!("read failed: {e}")))?;
        if n == 0 {
            return Err(RelayError::BadHandshake(
                "stream closed before request head".into(),
            ));
        }
    }
}

fn find_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
