//! Per-connection session loop.
//!
//! After the protocol switch the stream splits into an outbound writer task
//! draining a bounded frame queue and an inbound read loop feeding the
//! incremental frame decoder and the router. Disconnection, graceful or
//! abrupt, results in exactly one registry removal followed by one presence
//! broadcast.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use peerlink_core::error::{RelayError, Result};
use peerlink_core::protocol::envelope::ServerEnvelope;
use peerlink_core::protocol::frame;

use crate::app_state::AppState;
use crate::relay::{outbound, presence, router, Registry};

/// Outbound queue depth per connection; beyond it sends are dropped.
const OUTBOUND_QUEUE: usize = 1024;

pub async fn run_session(stream: TcpStream, initial: BytesMut, state: AppState) -> Result<()> {
    let (mut read_half, mut write_half) = stream.into_split();
    let (tx, mut rx) = mpsc::channel::<Bytes>(OUTBOUND_QUEUE);

    let registry = state.registry();
    let id = registry.admit(tx);
    tracing::info!(%id, "connection admitted");

    // The registry entry holds the only sender; once the entry is removed
    // the queue drains and this task ends, closing the write half.
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if write_half.write_all(&frame).await.is_err() {
                break;
            }
        }
    });

    let max_payload = state.cfg().relay.max_frame_bytes;
    let mut buf = initial;
    let result = async {
        // welcome goes only to the new connection; the roster broadcast follows
        let welcome = outbound::prepare(&ServerEnvelope::Welcome { id: id.clone() })?;
        registry.send_to(&id, welcome);
        presence::broadcast_users(registry)?;

        read_loop(&mut read_half, &mut buf, &id, registry, max_payload).await
    }
    .await;

    if registry.remove(&id) {
        tracing::info!(%id, "connection removed");
        let _ = presence::broadcast_users(registry);
    }
    result
}

async fn read_loop(
    read_half: &mut OwnedReadHalf,
    buf: &mut BytesMut,
    id: &str,
    registry: &Registry,
    max_payload: usize,
) -> Result<()> {
    loop {
        // drain every complete frame before waiting for more bytes
        while let Some(text) = frame::decode_text(buf, max_payload)? {
            router::dispatch(registry, id, &text)?;
        }

        let n = read_half
            .read_buf(buf)
            .await
            .map_err(|e| RelayError::Internal(format!("read failed: {e}")))?;
        if n == 0 {
            return Ok(());
        }
    }
}
