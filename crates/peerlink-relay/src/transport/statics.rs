//! Static content responses for non-upgrade requests.
//!
//! The root path aliases the default document, the content type comes from
//! the file extension, and an absent file gets a plain 404.

use std::path::{Component, Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use peerlink_core::error::{RelayError, Result};
use peerlink_core::protocol::handshake::RequestHead;

const NOT_FOUND: &str =
    "HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nContent-Length: 9\r\n\r\nNot found";

pub async fn serve(stream: &mut TcpStream, head: &RequestHead, static_dir: &str) -> Result<()> {
    let target = head.target.split('?').next().unwrap_or("/");

    if let Some(path) = resolve(static_dir, target) {
        if let Ok(body) = tokio::fs::read(&path).await {
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
                content_type(&path),
                body.len()
            );
            write_response(stream, header.as_bytes(), &body).await?;
            return Ok(());
        }
    }

    write_response(stream, NOT_FOUND.as_bytes(), &[]).await
}

async fn write_response(stream: &mut TcpStream, header: &[u8], body: &[u8]) -> Result<()> {
    stream
        .write_all(header)
        .await
        .map_err(|e| RelayError::Internal(format!("write failed: {e}")))?;
    if !body.is_empty() {
        stream
            .write_all(body)
            .await
            .map_err(|e| RelayError::Internal(format!("write failed: {e}")))?;
    }
    Ok(())
}

/// Map the request target to a file under the static root. The root path
/// aliases the default document; anything trying to climb out of the root
/// resolves to nothing.
fn resolve(static_dir: &str, target: &str) -> Option<PathBuf> {
    let rel = if target == "/" {
        "index.html"
    } else {
        target.trim_start_matches('/')
    };
    let rel = Path::new(rel);
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(Path::new(static_dir).join(rel))
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") => "text/html",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        _ => "application/octet-stream",
    }
}
